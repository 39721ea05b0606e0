use anyhow::{anyhow, Result};
use cdk_alarms::{
    AlarmDescriptor, AlarmError, ComparisonOperator, Metric, MetricId, Statistic, Threshold,
    ThresholdConfig, TreatMissingData,
};
use cdk_logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// SQS 可见性超时上限（12 小时）
const MAX_VISIBILITY_TIMEOUT_SECS: u64 = 43_200;

/// 栈配置（stack.toml）
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StackConfig {
    #[serde(default)]
    pub stack: StackSection,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub topic: TopicConfig,

    #[serde(default = "default_alarms")]
    pub alarms: Vec<AlarmConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 栈基本信息
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StackSection {
    pub name: String,
    pub description: Option<String>,
}

/// 队列配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    pub id: String,
    pub visibility_timeout_secs: u64,
    pub queue_name: Option<String>,
    pub retention_period_secs: Option<u64>,
}

/// 告警通知主题配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TopicConfig {
    pub enabled: bool,
    pub id: String,
    pub display_name: Option<String>,
}

/// 单个指标的告警集合
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlarmConfig {
    pub metric: MetricId,

    #[serde(default = "default_period_secs")]
    pub period_secs: u64,

    #[serde(default)]
    pub statistic: Statistic,

    #[serde(default)]
    pub treat_missing_data: TreatMissingData,

    /// 是否通知告警主题
    #[serde(default = "default_notify")]
    pub notify: bool,

    #[serde(default)]
    pub thresholds: Vec<ThresholdConfig>,
}

fn default_period_secs() -> u64 {
    60
}

fn default_notify() -> bool {
    true
}

fn default_alarms() -> Vec<AlarmConfig> {
    vec![AlarmConfig {
        metric: MetricId::SqsApproximateAgeOfOldestMessage,
        period_secs: default_period_secs(),
        statistic: Statistic::default(),
        treat_missing_data: TreatMissingData::Missing,
        notify: default_notify(),
        thresholds: vec![ThresholdConfig {
            comparison: ComparisonOperator::GreaterThanOrEqualToThreshold,
            threshold: 10.0,
            for_all_mins: Some(5),
            for_any_mins: None,
        }],
    }]
}

impl Default for StackSection {
    fn default() -> Self {
        Self {
            name: "HelloCdkStack".to_string(),
            description: None,
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            id: "HelloCdkQueue".to_string(),
            visibility_timeout_secs: 300,
            queue_name: None,
            retention_period_secs: None,
        }
    }
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            id: "HelloCdkAlarmTopic".to_string(),
            display_name: None,
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            stack: StackSection::default(),
            queue: QueueConfig::default(),
            topic: TopicConfig::default(),
            alarms: default_alarms(),
            logging: LoggingConfig::default(),
        }
    }
}

impl QueueConfig {
    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.visibility_timeout_secs)
    }

    pub fn retention_period(&self) -> Option<Duration> {
        self.retention_period_secs.map(Duration::from_secs)
    }
}

impl AlarmConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    pub fn thresholds(&self) -> std::result::Result<Vec<Threshold>, AlarmError> {
        self.thresholds
            .iter()
            .cloned()
            .map(Threshold::try_from)
            .collect()
    }
}

impl StackConfig {
    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.stack.name.trim().is_empty() {
            return Err(anyhow!("stack name cannot be empty"));
        }

        if self.queue.visibility_timeout_secs == 0
            || self.queue.visibility_timeout_secs > MAX_VISIBILITY_TIMEOUT_SECS
        {
            return Err(anyhow!(
                "visibility_timeout_secs must be between 1 and {}, got {}",
                MAX_VISIBILITY_TIMEOUT_SECS,
                self.queue.visibility_timeout_secs
            ));
        }

        if self.topic.enabled && self.topic.id == self.queue.id {
            return Err(anyhow!(
                "queue and topic cannot share the construct id {}",
                self.queue.id
            ));
        }

        let mut alarm_ids = HashSet::new();
        for alarm in &self.alarms {
            if alarm.period_secs == 0 {
                return Err(anyhow!("alarm period for {} must be greater than 0", alarm.metric));
            }
            if alarm.metric.dimension_name() == "TopicName" && !self.topic.enabled {
                return Err(anyhow!(
                    "alarm on {} requires the alarm topic to be enabled",
                    alarm.metric
                ));
            }

            let thresholds = alarm
                .thresholds()
                .map_err(|e| anyhow!("invalid threshold for {}: {}", alarm.metric, e))?;
            let metric = Metric {
                period: alarm.period(),
                ..Metric::new(alarm.metric)
            };
            for threshold in &thresholds {
                let id = AlarmDescriptor::identifier(&metric, threshold);
                if !alarm_ids.insert(id.clone()) {
                    return Err(anyhow!("alarm {} is defined twice", id));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stack_config() {
        let config = StackConfig::default();
        assert_eq!(config.stack.name, "HelloCdkStack");
        assert_eq!(config.queue.visibility_timeout(), Duration::from_secs(300));
        assert_eq!(config.alarms.len(), 1);

        let thresholds = config.alarms[0].thresholds().unwrap();
        assert_eq!(thresholds[0].evaluation_periods(), 5);
        assert_eq!(thresholds[0].datapoints_to_alarm(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = StackConfig::default();
        config.alarms[0].thresholds[0].for_all_mins = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_queue() {
        let mut config = StackConfig::default();
        config.queue.visibility_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.queue.visibility_timeout_secs = MAX_VISIBILITY_TIMEOUT_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_topic_metric_needs_topic() {
        let mut config = StackConfig::default();
        config.topic.enabled = false;
        config.alarms[0].metric = MetricId::SnsNumberOfNotificationsFailed;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_collections() {
        let mut config = StackConfig::default();
        let alarm = config.alarms[0].clone();
        config.alarms.push(alarm);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_distinct_thresholds_on_same_metric() {
        let mut config = StackConfig::default();
        let mut alarm = config.alarms[0].clone();
        alarm.thresholds[0].for_all_mins = None;
        alarm.thresholds[0].for_any_mins = Some(1);
        config.alarms.push(alarm);
        assert!(config.validate().is_ok());
    }
}

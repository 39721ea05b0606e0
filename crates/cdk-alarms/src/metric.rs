use cdk_core::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// 默认采样周期
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

/// 已知指标（命名空间 + 指标名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    SqsApproximateAgeOfOldestMessage,
    SqsApproximateNumberOfMessagesVisible,
    SqsApproximateNumberOfMessagesNotVisible,
    SqsApproximateNumberOfMessagesDelayed,
    SqsNumberOfMessagesSent,
    SqsNumberOfMessagesReceived,
    SqsNumberOfMessagesDeleted,
    SqsNumberOfEmptyReceives,
    SqsSentMessageSize,
    SnsNumberOfMessagesPublished,
    SnsNumberOfNotificationsDelivered,
    SnsNumberOfNotificationsFailed,
}

const SQS_NAMESPACE: &str = "AWS/SQS";
const SNS_NAMESPACE: &str = "AWS/SNS";

impl MetricId {
    pub const ALL: [MetricId; 12] = [
        MetricId::SqsApproximateAgeOfOldestMessage,
        MetricId::SqsApproximateNumberOfMessagesVisible,
        MetricId::SqsApproximateNumberOfMessagesNotVisible,
        MetricId::SqsApproximateNumberOfMessagesDelayed,
        MetricId::SqsNumberOfMessagesSent,
        MetricId::SqsNumberOfMessagesReceived,
        MetricId::SqsNumberOfMessagesDeleted,
        MetricId::SqsNumberOfEmptyReceives,
        MetricId::SqsSentMessageSize,
        MetricId::SnsNumberOfMessagesPublished,
        MetricId::SnsNumberOfNotificationsDelivered,
        MetricId::SnsNumberOfNotificationsFailed,
    ];

    pub fn namespace(&self) -> &'static str {
        match self {
            MetricId::SnsNumberOfMessagesPublished
            | MetricId::SnsNumberOfNotificationsDelivered
            | MetricId::SnsNumberOfNotificationsFailed => SNS_NAMESPACE,
            _ => SQS_NAMESPACE,
        }
    }

    pub fn metric_name(&self) -> &'static str {
        match self {
            MetricId::SqsApproximateAgeOfOldestMessage => "ApproximateAgeOfOldestMessage",
            MetricId::SqsApproximateNumberOfMessagesVisible => "ApproximateNumberOfMessagesVisible",
            MetricId::SqsApproximateNumberOfMessagesNotVisible => {
                "ApproximateNumberOfMessagesNotVisible"
            }
            MetricId::SqsApproximateNumberOfMessagesDelayed => "ApproximateNumberOfMessagesDelayed",
            MetricId::SqsNumberOfMessagesSent => "NumberOfMessagesSent",
            MetricId::SqsNumberOfMessagesReceived => "NumberOfMessagesReceived",
            MetricId::SqsNumberOfMessagesDeleted => "NumberOfMessagesDeleted",
            MetricId::SqsNumberOfEmptyReceives => "NumberOfEmptyReceives",
            MetricId::SqsSentMessageSize => "SentMessageSize",
            MetricId::SnsNumberOfMessagesPublished => "NumberOfMessagesPublished",
            MetricId::SnsNumberOfNotificationsDelivered => "NumberOfNotificationsDelivered",
            MetricId::SnsNumberOfNotificationsFailed => "NumberOfNotificationsFailed",
        }
    }

    /// 将指标限定到单个资源实例时使用的维度名
    pub fn dimension_name(&self) -> &'static str {
        match self.namespace() {
            SNS_NAMESPACE => "TopicName",
            _ => "QueueName",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace(), self.metric_name())
    }
}

/// 聚合统计方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    #[default]
    Average,
    Sum,
    Minimum,
    Maximum,
    SampleCount,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Sum => "Sum",
            Statistic::Minimum => "Minimum",
            Statistic::Maximum => "Maximum",
            Statistic::SampleCount => "SampleCount",
        }
    }
}

/// 指标引用：(命名空间, 指标名, 维度)
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: BTreeMap<String, Token>,
    pub period: Duration,
    pub statistic: Statistic,
}

impl Metric {
    pub fn new(id: MetricId) -> Self {
        Self {
            namespace: id.namespace().to_string(),
            metric_name: id.metric_name().to_string(),
            dimensions: BTreeMap::new(),
            period: DEFAULT_PERIOD,
            statistic: Statistic::default(),
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<Token>) -> Self {
        self.dimensions.insert(name.into(), value.into());
        self
    }

    pub fn period_seconds(&self) -> u64 {
        self.period.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_id_names() {
        let id = MetricId::SqsApproximateAgeOfOldestMessage;
        assert_eq!(id.namespace(), "AWS/SQS");
        assert_eq!(id.metric_name(), "ApproximateAgeOfOldestMessage");
        assert_eq!(id.to_string(), "AWS/SQS/ApproximateAgeOfOldestMessage");
        assert_eq!(id.dimension_name(), "QueueName");

        let sns = MetricId::SnsNumberOfNotificationsFailed;
        assert_eq!(sns.namespace(), "AWS/SNS");
        assert_eq!(sns.dimension_name(), "TopicName");
    }

    #[test]
    fn test_metric_id_from_config_name() {
        let id: MetricId =
            serde_json::from_str("\"sqs_approximate_age_of_oldest_message\"").unwrap();
        assert_eq!(id, MetricId::SqsApproximateAgeOfOldestMessage);
    }

    #[test]
    fn test_catalog_names_unique() {
        let mut names: Vec<_> = MetricId::ALL.iter().map(|m| m.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), MetricId::ALL.len());
    }

    #[test]
    fn test_metric_defaults() {
        let metric = Metric::new(MetricId::SqsNumberOfMessagesSent).with_dimension("QueueName", "Q1");
        assert_eq!(metric.period_seconds(), 60);
        assert_eq!(metric.statistic, Statistic::Average);
        assert_eq!(metric.dimensions["QueueName"], Token::literal("Q1"));
    }
}

use cdk_core::{Resource, ResourceHandle, Token, Topic};
use serde::{Deserialize, Serialize};

use crate::metric::Metric;
use crate::threshold::Threshold;

pub const ALARM_RESOURCE_TYPE: &str = "AWS::CloudWatch::Alarm";

/// 缺失数据处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatMissingData {
    #[default]
    Missing,
    Breaching,
    NotBreaching,
    Ignore,
}

impl TreatMissingData {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatMissingData::Missing => "missing",
            TreatMissingData::Breaching => "breaching",
            TreatMissingData::NotBreaching => "notBreaching",
            TreatMissingData::Ignore => "ignore",
        }
    }
}

/// 告警描述：由 (指标引用, 阈值规则) 确定性推导
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmDescriptor {
    pub id: String,
    pub metric: Metric,
    pub threshold: Threshold,
    pub treat_missing_data: TreatMissingData,
    /// 进入 ALARM 状态时的通知目标
    pub alarm_actions: Vec<Token>,
    /// 恢复 OK 状态时的通知目标
    pub ok_actions: Vec<Token>,
}

impl AlarmDescriptor {
    pub fn new(metric: &Metric, threshold: Threshold, treat_missing_data: TreatMissingData) -> Self {
        Self {
            id: Self::identifier(metric, &threshold),
            metric: metric.clone(),
            threshold,
            treat_missing_data,
            alarm_actions: Vec::new(),
            ok_actions: Vec::new(),
        }
    }

    /// `{namespace}_{metric}_{operator}_{period}_{threshold}_{datapoints}_{evaluation_periods}`，
    /// `/` 替换为 `_`
    pub fn identifier(metric: &Metric, threshold: &Threshold) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}_{}",
            metric.namespace,
            metric.metric_name,
            threshold.comparison().as_str(),
            metric.period_seconds(),
            threshold.threshold(),
            threshold.datapoints_to_alarm(),
            threshold.evaluation_periods(),
        )
        .replace('/', "_")
    }

    pub fn description(&self) -> String {
        format!(
            "{}/{} {} {} for {} of {} periods of {}s",
            self.metric.namespace,
            self.metric.metric_name,
            self.threshold.comparison(),
            self.threshold.threshold(),
            self.threshold.datapoints_to_alarm(),
            self.threshold.evaluation_periods(),
            self.metric.period_seconds(),
        )
    }

    pub fn has_actions(&self) -> bool {
        !self.alarm_actions.is_empty() || !self.ok_actions.is_empty()
    }

    pub fn to_resource(&self) -> cdk_core::Result<Resource> {
        let properties = AlarmProperties {
            alarm_description: self.description(),
            namespace: &self.metric.namespace,
            metric_name: &self.metric.metric_name,
            dimensions: self
                .metric
                .dimensions
                .iter()
                .map(|(name, value)| DimensionProperty { name, value })
                .collect(),
            period: self.metric.period_seconds(),
            statistic: self.metric.statistic.as_str(),
            comparison_operator: self.threshold.comparison().as_str(),
            threshold: self.threshold.threshold(),
            evaluation_periods: self.threshold.evaluation_periods(),
            datapoints_to_alarm: self.threshold.datapoints_to_alarm(),
            treat_missing_data: self.treat_missing_data.as_str(),
            actions_enabled: self.has_actions(),
            alarm_actions: self.alarm_actions.clone(),
            ok_actions: self.ok_actions.clone(),
        };
        Resource::from_props(self.id.clone(), ALARM_RESOURCE_TYPE, &properties)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DimensionProperty<'a> {
    name: &'a str,
    value: &'a Token,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AlarmProperties<'a> {
    alarm_description: String,
    namespace: &'a str,
    metric_name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dimensions: Vec<DimensionProperty<'a>>,
    period: u64,
    statistic: &'static str,
    comparison_operator: &'static str,
    threshold: f64,
    evaluation_periods: u32,
    datapoints_to_alarm: u32,
    treat_missing_data: &'static str,
    actions_enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    alarm_actions: Vec<Token>,
    #[serde(rename = "OKActions", skip_serializing_if = "Vec::is_empty")]
    ok_actions: Vec<Token>,
}

/// 将主题同时挂到告警的 ALARM 与 OK 动作上
pub fn add_actions(alarm: &mut AlarmDescriptor, topic: &Topic) {
    let arn = topic.topic_arn();
    if !alarm.alarm_actions.contains(&arn) {
        alarm.alarm_actions.push(arn.clone());
    }
    if !alarm.ok_actions.contains(&arn) {
        alarm.ok_actions.push(arn);
    }
}

/// 已注册的告警
#[derive(Debug, Clone, PartialEq)]
pub struct Alarm {
    pub descriptor: AlarmDescriptor,
    pub handle: ResourceHandle,
}

impl Alarm {
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn alarm_arn(&self) -> Token {
        self.handle.attribute("Arn")
    }
}

use cdk_core::{CdkError, Scope, Token, Topic};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::{debug, info};

use crate::alarm::{add_actions, Alarm, AlarmDescriptor, TreatMissingData};
use crate::error::{AlarmError, Result};
use crate::metric::{Metric, MetricId, Statistic, DEFAULT_PERIOD};
use crate::threshold::Threshold;

/// 告警集合构建器：一个指标 + 多条阈值规则 → 每条规则一个告警
#[derive(Debug, Clone)]
pub struct AlarmCollectionBuilder {
    metric: Option<MetricId>,
    dimensions: BTreeMap<String, Token>,
    thresholds: Vec<Threshold>,
    topic: Option<Topic>,
    period: Duration,
    statistic: Statistic,
    treat_missing_data: TreatMissingData,
}

impl AlarmCollectionBuilder {
    pub fn new() -> Self {
        Self {
            metric: None,
            dimensions: BTreeMap::new(),
            thresholds: Vec::new(),
            topic: None,
            period: DEFAULT_PERIOD,
            statistic: Statistic::default(),
            treat_missing_data: TreatMissingData::default(),
        }
    }

    pub fn with_metric(mut self, metric: MetricId) -> Self {
        self.metric = Some(metric);
        self
    }

    /// 设置维度，覆盖之前的设置
    pub fn with_dimensions<I, K, V>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Token>,
    {
        self.dimensions = dimensions
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// 追加阈值规则
    pub fn with_thresholds<I>(mut self, thresholds: I) -> Self
    where
        I: IntoIterator<Item = Threshold>,
    {
        self.thresholds.extend(thresholds);
        self
    }

    pub fn with_sns_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = statistic;
        self
    }

    pub fn with_treat_missing_data(mut self, treat_missing_data: TreatMissingData) -> Self {
        self.treat_missing_data = treat_missing_data;
        self
    }

    pub fn threshold_count(&self) -> usize {
        self.thresholds.len()
    }

    /// 生成告警描述，不注册任何资源
    pub fn descriptors(&self) -> Result<Vec<AlarmDescriptor>> {
        let metric_id = self
            .metric
            .ok_or_else(|| AlarmError::config("alarm collection requires a metric"))?;
        if self.period.as_secs() == 0 {
            return Err(AlarmError::config(
                "alarm period must be at least one second",
            ));
        }
        if self.period.subsec_nanos() != 0 {
            return Err(AlarmError::config(format!(
                "alarm period must be a whole number of seconds, got {:?}",
                self.period
            )));
        }

        let metric = Metric {
            dimensions: self.dimensions.clone(),
            period: self.period,
            statistic: self.statistic,
            ..Metric::new(metric_id)
        };

        let mut seen = HashSet::new();
        let mut descriptors = Vec::with_capacity(self.thresholds.len());
        for threshold in &self.thresholds {
            let mut descriptor = AlarmDescriptor::new(&metric, *threshold, self.treat_missing_data);
            if !seen.insert(descriptor.id.clone()) {
                return Err(AlarmError::config(format!(
                    "duplicate threshold for {}: {}",
                    metric_id, descriptor.id
                )));
            }
            if let Some(topic) = &self.topic {
                add_actions(&mut descriptor, topic);
            }
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }

    /// 生成告警并注册到 scope；消耗构建器
    pub fn build(self, scope: &mut dyn Scope) -> Result<Vec<Alarm>> {
        let descriptors = self.descriptors()?;

        // 先检查冲突并完成序列化，失败时 scope 保持不变
        let mut pending = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if scope.contains(&descriptor.id) {
                return Err(CdkError::DuplicateId(descriptor.id).into());
            }
            let resource = descriptor.to_resource()?;
            pending.push((descriptor, resource));
        }

        let mut alarms = Vec::with_capacity(pending.len());
        for (descriptor, resource) in pending {
            let handle = scope.register(resource)?;
            debug!("Registered alarm {} as {}", descriptor.id, handle.logical_id);
            alarms.push(Alarm { descriptor, handle });
        }

        info!(
            "Built {} alarms in {} (notify: {})",
            alarms.len(),
            scope.path(),
            self.topic.is_some()
        );
        Ok(alarms)
    }
}

impl Default for AlarmCollectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AlarmError, Result};

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "at_or_above")]
    GreaterThanOrEqualToThreshold,
    #[serde(rename = "above")]
    GreaterThanThreshold,
    #[serde(rename = "below")]
    LessThanThreshold,
    #[serde(rename = "at_or_below")]
    LessThanOrEqualToThreshold,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThanOrEqualToThreshold => "GreaterThanOrEqualToThreshold",
            ComparisonOperator::GreaterThanThreshold => "GreaterThanThreshold",
            ComparisonOperator::LessThanThreshold => "LessThanThreshold",
            ComparisonOperator::LessThanOrEqualToThreshold => "LessThanOrEqualToThreshold",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 评估窗口：必须且只能指定一种模式，0 视为未指定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationWindow {
    /// 窗口内每个数据点都越界
    pub for_all_mins: Option<u32>,

    /// 窗口内至少一个数据点越界
    pub for_any_mins: Option<u32>,
}

impl EvaluationWindow {
    pub fn all_of(mins: u32) -> Self {
        Self {
            for_all_mins: Some(mins),
            for_any_mins: None,
        }
    }

    pub fn any_of(mins: u32) -> Self {
        Self {
            for_all_mins: None,
            for_any_mins: Some(mins),
        }
    }

    /// 解析为 (evaluation_periods, datapoints_to_alarm)
    fn resolve(&self) -> Result<(u32, u32)> {
        let all = self.for_all_mins.filter(|&m| m > 0);
        let any = self.for_any_mins.filter(|&m| m > 0);

        match (all, any) {
            (Some(mins), None) => Ok((mins, mins)),
            (None, Some(mins)) => Ok((mins, 1)),
            (Some(_), Some(_)) => Err(AlarmError::config(
                "threshold must set only one of for_all_mins or for_any_mins",
            )),
            (None, None) => Err(AlarmError::config(
                "threshold requires a non-zero for_all_mins or for_any_mins",
            )),
        }
    }
}

/// 阈值规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    comparison: ComparisonOperator,
    threshold: f64,
    evaluation_periods: u32,
    datapoints_to_alarm: u32,
}

impl Threshold {
    pub fn new(
        comparison: ComparisonOperator,
        threshold: f64,
        window: EvaluationWindow,
    ) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(AlarmError::config(format!(
                "threshold must be a finite number, got {}",
                threshold
            )));
        }
        let (evaluation_periods, datapoints_to_alarm) = window.resolve()?;

        Ok(Self {
            comparison,
            // -0.0 和 0.0 生成相同的标识符
            threshold: if threshold == 0.0 { 0.0 } else { threshold },
            evaluation_periods,
            datapoints_to_alarm,
        })
    }

    pub fn above(threshold: f64, window: EvaluationWindow) -> Result<Self> {
        Self::new(ComparisonOperator::GreaterThanThreshold, threshold, window)
    }

    pub fn at_or_above(threshold: f64, window: EvaluationWindow) -> Result<Self> {
        Self::new(
            ComparisonOperator::GreaterThanOrEqualToThreshold,
            threshold,
            window,
        )
    }

    pub fn below(threshold: f64, window: EvaluationWindow) -> Result<Self> {
        Self::new(ComparisonOperator::LessThanThreshold, threshold, window)
    }

    pub fn at_or_below(threshold: f64, window: EvaluationWindow) -> Result<Self> {
        Self::new(
            ComparisonOperator::LessThanOrEqualToThreshold,
            threshold,
            window,
        )
    }

    pub fn comparison(&self) -> ComparisonOperator {
        self.comparison
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluation_periods(&self) -> u32 {
        self.evaluation_periods
    }

    pub fn datapoints_to_alarm(&self) -> u32 {
        self.datapoints_to_alarm
    }
}

/// 配置文件中的阈值定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub comparison: ComparisonOperator,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_all_mins: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_any_mins: Option<u32>,
}

impl TryFrom<ThresholdConfig> for Threshold {
    type Error = AlarmError;

    fn try_from(config: ThresholdConfig) -> Result<Self> {
        Threshold::new(
            config.comparison,
            config.threshold,
            EvaluationWindow {
                for_all_mins: config.for_all_mins,
                for_any_mins: config.for_any_mins,
            },
        )
    }
}

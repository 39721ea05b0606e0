pub mod alarm;
pub mod builder;
pub mod error;
pub mod metric;
pub mod threshold;

pub use alarm::{add_actions, Alarm, AlarmDescriptor, TreatMissingData};
pub use builder::AlarmCollectionBuilder;
pub use error::{AlarmError, Result};
pub use metric::{Metric, MetricId, Statistic};
pub use threshold::{ComparisonOperator, EvaluationWindow, Threshold, ThresholdConfig};

use cdk_core::CdkError;
use thiserror::Error;

/// 告警构建错误
#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Scope error: {0}")]
    Scope(#[from] CdkError),
}

impl AlarmError {
    pub fn config(message: impl Into<String>) -> Self {
        AlarmError::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AlarmError>;

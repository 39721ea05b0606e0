use thiserror::Error;

/// 资源注册与合成错误
#[derive(Error, Debug)]
pub enum CdkError {
    #[error("Duplicate construct id: {0}")]
    DuplicateId(String),

    #[error("Invalid construct id: {0:?}")]
    InvalidId(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CdkError>;

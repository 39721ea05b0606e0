pub mod loader;
pub mod stack;

pub use loader::{ConfigLoader, CONFIG_FILE_NAME, ENV_PREFIX};
pub use stack::{AlarmConfig, QueueConfig, StackConfig, StackSection, TopicConfig};

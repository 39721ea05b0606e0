pub mod error;
pub mod queue;
pub mod resource;
pub mod stack;
pub mod token;
pub mod topic;

pub use error::{CdkError, Result};
pub use queue::{Queue, QueueProps};
pub use resource::{Resource, ResourceHandle};
pub use stack::{Scope, Stack};
pub use token::Token;
pub use topic::{Topic, TopicProps};

pub mod stack;

pub use stack::{build_stack, HelloCdkStack};

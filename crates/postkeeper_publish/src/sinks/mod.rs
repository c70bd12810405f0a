//! Publish sink implementations.

pub mod noop;
pub mod telegram;

pub use noop::NoOpSink;
pub use telegram::{TelegramSink, TelegramSinkConfig, TelegramSinkConfigBuilder};

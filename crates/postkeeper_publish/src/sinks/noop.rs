//! Sink that accepts everything and sends nothing.

use crate::PublishSink;
use async_trait::async_trait;
use postkeeper_error::SendError;
use postkeeper_storage::MediaItem;
use tracing::debug;

/// Sink that confirms every call without sending anything.
///
/// Used when no Telegram credentials are configured, so that a publication
/// still exercises the full transaction against local storage.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

impl NoOpSink {
    /// Create a new no-op sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PublishSink for NoOpSink {
    async fn send_group(&self, items: &[MediaItem]) -> Result<(), SendError> {
        debug!(
            items = items.len(),
            "NoOpSink: send_group() called (no action taken)"
        );
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<(), SendError> {
        debug!(
            text_len = text.len(),
            "NoOpSink: send_text() called (no action taken)"
        );
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "noop"
    }
}

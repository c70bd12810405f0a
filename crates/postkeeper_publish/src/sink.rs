//! Publish sink trait.

use async_trait::async_trait;
use postkeeper_error::SendError;
use postkeeper_storage::MediaItem;

/// Destination of published posts.
///
/// Both calls are remote operations with their own retry policy. They must
/// return `Ok` only when delivery is confirmed.
#[async_trait]
pub trait PublishSink: Send + Sync {
    /// Send the media items as one ordered group.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The batch violates the sink's limits
    /// - The sink rejects the request
    /// - The transport fails
    async fn send_group(&self, items: &[MediaItem]) -> Result<(), SendError>;

    /// Send a text message.
    ///
    /// # Errors
    ///
    /// Returns error if the sink rejects the text or the transport fails.
    async fn send_text(&self, text: &str) -> Result<(), SendError>;

    /// Name used in logs.
    fn sink_name(&self) -> &str;
}

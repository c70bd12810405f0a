//! Top-level error wrapper types.

use crate::{
    ArchiveError, ConfigError, SelectionError, SendError, ShortageError, StateError,
    StorageError,
};

/// Every error family the engine can produce.
///
/// # Examples
///
/// ```
/// use postkeeper_error::{ConfigError, PostkeeperError};
///
/// let err: PostkeeperError = ConfigError::new("empty recipe name").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PostkeeperErrorKind {
    /// Malformed recipe, category or requirement data
    #[from(ConfigError)]
    Config(ConfigError),
    /// Inventory storage failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Not enough material to plan a post
    #[from(ShortageError)]
    Shortage(ShortageError),
    /// A counted item turned out to be missing or invalid
    #[from(SelectionError)]
    Selection(SelectionError),
    /// The publish sink rejected or timed out
    #[from(SendError)]
    Send(SendError),
    /// A published item could not be archived
    #[from(ArchiveError)]
    Archive(ArchiveError),
    /// Persisted engine state could not be read or written
    #[from(StateError)]
    State(StateError),
}

/// Postkeeper error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Postkeeper Error: {}", _0)]
pub struct PostkeeperError(Box<PostkeeperErrorKind>);

impl PostkeeperError {
    /// Create a new error from a kind.
    pub fn new(kind: PostkeeperErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PostkeeperErrorKind {
        &self.0
    }

    /// Whether the caller may simply try the whole operation again later.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            PostkeeperErrorKind::Shortage(_)
                | PostkeeperErrorKind::Selection(_)
                | PostkeeperErrorKind::Send(_)
        )
    }
}

// Generic From implementation for any type that converts to PostkeeperErrorKind
impl<T> From<T> for PostkeeperError
where
    T: Into<PostkeeperErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for postkeeper operations.
pub type PostkeeperResult<T> = std::result::Result<T, PostkeeperError>;

//! Publish sink errors.

/// Kinds of publish failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SendErrorKind {
    /// The sink answered with an explicit failure
    #[display("sink rejected the request: {}", _0)]
    Rejected(String),
    /// No definitive answer within the configured bound
    #[display("send timed out after {}s", _0)]
    Timeout(u64),
    /// Network or protocol failure talking to the sink
    #[display("transport failure: {}", _0)]
    Transport(String),
    /// The batch violates a sink constraint (size, media count)
    #[display("invalid batch: {}", _0)]
    Validation(String),
}

/// Send error with location tracking.
///
/// # Examples
///
/// ```
/// use postkeeper_error::{SendError, SendErrorKind};
///
/// let err = SendError::new(SendErrorKind::Timeout(180));
/// assert!(format!("{}", err).contains("180s"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Send Error: {} at line {} in {}", kind, line, file)]
pub struct SendError {
    /// The kind of error
    pub kind: SendErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SendError {
    /// Create a new send error.
    #[track_caller]
    pub fn new(kind: SendErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Timeouts may have partially delivered content on the sink side.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, SendErrorKind::Timeout(_))
    }
}

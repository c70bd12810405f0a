//! Persisted engine state error types.

/// Failure to load or save the engine state file.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("State Error: {} at line {} in {}", message, line, file)]
pub struct StateError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl StateError {
    /// Create a new StateError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

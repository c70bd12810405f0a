//! Post-publish cleanup errors.

/// A published item could not be moved to its archive location.
///
/// The item stays in its source location and may be selected again; this
/// needs manual reconciliation and is never answered with a resend.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Archive Error: {} ({}) could not be archived: {} at line {} in {}",
    item,
    category,
    message,
    line,
    file
)]
pub struct ArchiveError {
    /// Item identifier
    pub item: String,
    /// Source category
    pub category: String,
    /// Underlying failure
    pub message: String,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ArchiveError {
    /// Create a new archive error.
    #[track_caller]
    pub fn new(
        item: impl Into<String>,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            item: item.into(),
            category: category.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

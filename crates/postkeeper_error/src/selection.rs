//! Selecting-phase errors.

/// Why a concrete item could not be selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SelectionErrorKind {
    /// The category had no valid item left to pick
    #[display("no valid item left in {}", _0)]
    Exhausted(String),
    /// The picked item failed validation (missing, empty, wrong extension)
    #[display("item {} in {} failed validation", item, category)]
    Invalid {
        /// Category the item was drawn from
        category: String,
        /// Item identifier
        item: String,
    },
    /// The narrative store had no unit to peek
    #[display("no narrative unit left in {}", _0)]
    NarrativeExhausted(String),
    /// The store could not be read while selecting
    #[display("store unavailable for {}: {}", category, message)]
    Store {
        /// Category being read
        category: String,
        /// Underlying failure
        message: String,
    },
}

/// Selection error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Selection Error: {} at line {} in {}", kind, line, file)]
pub struct SelectionError {
    /// The kind of error
    pub kind: SelectionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SelectionError {
    /// Create a new selection error.
    #[track_caller]
    pub fn new(kind: SelectionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

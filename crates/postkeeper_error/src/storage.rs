//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a category or archive directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to list a category directory
    #[display("Failed to list directory: {}", _0)]
    DirectoryRead(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to move a file between locations
    #[display("Failed to move file: {}", _0)]
    FileMove(String),
    /// Target of a move is already taken
    #[display("Already exists: {}", _0)]
    AlreadyExists(String),
    /// Item or narrative unit not found
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// Category is not configured for this kind of access
    #[display("Unknown category: {}", _0)]
    UnknownCategory(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use postkeeper_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("materials/ero-real/1.jpg".to_string()));
/// assert!(format!("{}", err).contains("Not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

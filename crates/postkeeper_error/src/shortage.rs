//! Planning-phase shortage errors.

/// What ran out while planning a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ShortageErrorKind {
    /// No category in a slot's chain had enough items
    #[display("out of {} (recipe '{}', slot {})", chain, recipe, slot_index)]
    Slot {
        /// Recipe being planned
        recipe: String,
        /// Zero-based slot position
        slot_index: usize,
        /// Primary and fallbacks joined with '/'
        chain: String,
        /// First category of the chain
        category: String,
    },
    /// Not enough narrative units for the auxiliary cost
    #[display("auxiliary exhausted: out of {} (recipe '{}')", category, recipe)]
    Auxiliary {
        /// Recipe being planned
        recipe: String,
        /// Narrative category
        category: String,
    },
}

impl ShortageErrorKind {
    /// The first category that could not be satisfied.
    pub fn category(&self) -> &str {
        match self {
            Self::Slot { category, .. } | Self::Auxiliary { category, .. } => category,
        }
    }
}

/// Shortage error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Shortage: {} at line {} in {}", kind, line, file)]
pub struct ShortageError {
    /// The kind of shortage
    pub kind: ShortageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ShortageError {
    /// Create a new shortage error.
    #[track_caller]
    pub fn new(kind: ShortageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

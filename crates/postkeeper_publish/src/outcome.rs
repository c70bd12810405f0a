//! Structured results of a publication attempt.

use postkeeper_core::ConsumedItemRecord;
use postkeeper_error::{ArchiveError, SelectionError, SendError, ShortageError};

/// States of a publication transaction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TransactionPhase {
    /// Evaluating the recipe against current counts.
    Planning,
    /// Choosing concrete items.
    Selecting,
    /// Sending media and text to the sink.
    Sending,
    /// Archiving published items.
    Committing,
    /// Reporting a failed send; storage is untouched.
    RollingBack,
    /// Finished.
    Done,
}

/// How a publication attempt ended.
///
/// Planning, selection and send failures are outcomes, not errors: the
/// transaction boundary absorbs them. Only configuration and storage failures
/// surface as `Err`.
#[derive(Debug, Clone, derive_more::Display)]
pub enum PublicationOutcome {
    /// Sent and committed. Archive failures do not undo the publication.
    #[display("published {} ({} items, {} archive failures)", recipe, items.len(), archive_failures.len())]
    Published {
        /// Recipe that was published.
        recipe: String,
        /// Items sent, in slot order.
        items: Vec<ConsumedItemRecord>,
        /// Narrative units sent and consumed.
        narratives: usize,
        /// Items that were sent but could not be archived.
        archive_failures: Vec<ArchiveError>,
    },
    /// The recipe is not satisfiable right now.
    #[display("{}", _0)]
    Shortage(ShortageError),
    /// A counted item turned out unusable.
    #[display("{}", _0)]
    SelectionFailed(SelectionError),
    /// The sink failed; nothing was archived.
    #[display("rolled back {} items: {}", items.len(), error)]
    RolledBack {
        /// Items that had been selected.
        items: Vec<ConsumedItemRecord>,
        /// Why sending failed.
        error: SendError,
    },
    /// Scheduled publication skipped because autopost is off.
    #[display("autopost disabled")]
    Disabled,
}

impl PublicationOutcome {
    /// True for [`PublicationOutcome::Published`].
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    /// Items archived or selected, depending on the outcome.
    pub fn items(&self) -> &[ConsumedItemRecord] {
        match self {
            Self::Published { items, .. } | Self::RolledBack { items, .. } => items,
            _ => &[],
        }
    }
}

//! Items handed out by the stores.

use derive_getters::Getters;
use postkeeper_core::{Category, ConsumedItemRecord, ItemId, MediaKind};
use std::path::PathBuf;

/// One media file selected from a category.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_more::Display)]
#[display("{}:{}", category, id)]
pub struct MediaItem {
    /// File name inside the category directory.
    id: ItemId,
    /// Source category.
    category: Category,
    /// Full path of the file.
    path: PathBuf,
    /// How the file is published.
    media: MediaKind,
}

impl MediaItem {
    /// Describe a media file.
    pub fn new(id: ItemId, category: Category, path: PathBuf, media: MediaKind) -> Self {
        Self {
            id,
            category,
            path,
            media,
        }
    }

    /// The (identifier, category) record of this item.
    pub fn record(&self) -> ConsumedItemRecord {
        ConsumedItemRecord::new(self.id.clone(), self.category.clone())
    }
}

/// One narrative unit read from a narrative file, not yet removed.
///
/// Identical texts may appear more than once in a file; `position` tells
/// the occurrences apart.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct NarrativeUnit {
    /// Narrative category.
    category: Category,
    /// Index of the unit in the file when it was read.
    position: usize,
    /// Unit text, trimmed.
    text: String,
}

impl NarrativeUnit {
    /// Describe the unit at `position` of a narrative file.
    pub fn new(category: Category, position: usize, text: impl Into<String>) -> Self {
        Self {
            category,
            position,
            text: text.into(),
        }
    }
}

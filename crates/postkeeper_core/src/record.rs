//! Concrete items chosen for a publication.

use crate::Category;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Identifier of one concrete content item (a file name within its category).
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct ItemId(String);

impl ItemId {
    /// Create an item identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One concretely selected item and the category it was drawn from.
///
/// This is the unit a publication transaction reserves, sends and archives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct ConsumedItemRecord {
    /// Selected item.
    item: ItemId,
    /// Category the item was drawn from (after fallback resolution).
    category: Category,
}

impl ConsumedItemRecord {
    /// Pair an item with its source category.
    pub fn new(item: ItemId, category: Category) -> Self {
        Self { item, category }
    }
}

impl std::fmt::Display for ConsumedItemRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.category, self.item)
    }
}

//! Inventory store traits.

use crate::{MediaItem, NarrativeUnit};
use postkeeper_core::{Category, EngineConfig, InventorySnapshot, ItemId};
use postkeeper_error::StorageError;

/// Media inventory: one item per file in a category directory.
///
/// Implementations guarantee that an item returned by
/// [`InventoryStore::pick_random`] exists and is valid at call time, but
/// offer no exclusivity.
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    /// Every valid item of a media category, in identifier order.
    ///
    /// A missing category directory holds no items.
    async fn list_valid_items(&self, category: &Category) -> Result<Vec<MediaItem>, StorageError>;

    /// Number of valid items in a media category.
    async fn count(&self, category: &Category) -> Result<u64, StorageError> {
        Ok(self.list_valid_items(category).await?.len() as u64)
    }

    /// Uniform random choice among valid items not listed in `exclude`.
    ///
    /// Returns `None` when no candidate is left.
    async fn pick_random(
        &self,
        category: &Category,
        exclude: &[ItemId],
    ) -> Result<Option<MediaItem>, StorageError>;

    /// Re-check that an item still exists and is valid.
    async fn is_valid(&self, item: &MediaItem) -> bool;

    /// Move an item to its category's archive location.
    async fn archive(&self, item: &MediaItem) -> Result<(), StorageError>;
}

/// Narrative inventory: units of text consumed one per post.
#[async_trait::async_trait]
pub trait NarrativeStore: Send + Sync {
    /// Units left in a narrative category.
    async fn count_units(&self, category: &Category) -> Result<u64, StorageError>;

    /// Random unit whose position is not taken by `exclude`, left in place.
    async fn peek_random(
        &self,
        category: &Category,
        exclude: &[NarrativeUnit],
    ) -> Result<Option<NarrativeUnit>, StorageError>;

    /// Remove exactly one unit: the one at `unit`'s position, or another
    /// occurrence of the same text if the file shifted.
    async fn consume(&self, unit: &NarrativeUnit) -> Result<(), StorageError>;
}

/// A store serving both media and narrative categories.
#[async_trait::async_trait]
pub trait ContentStore: InventoryStore + NarrativeStore {
    /// Counts of every configured category.
    #[tracing::instrument(skip_all)]
    async fn snapshot(&self, config: &EngineConfig) -> Result<InventorySnapshot, StorageError> {
        let mut snapshot = InventorySnapshot::new();
        for (category, _) in config.media_categories() {
            snapshot.set(category.clone(), self.count(category).await?);
        }
        for (category, _) in config.narrative_categories() {
            snapshot.set(category.clone(), self.count_units(category).await?);
        }
        tracing::debug!(total = snapshot.total(), "Inventory snapshot taken");
        Ok(snapshot)
    }
}

impl<T: InventoryStore + NarrativeStore + ?Sized> ContentStore for T {}

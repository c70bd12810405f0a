//! Point-in-time inventory counts.

use crate::{Category, ResolutionPlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from category to the number of items available at one instant.
///
/// Categories absent from the map count as zero. Evaluation never mutates a
/// snapshot; forecasting clones one and applies plans to its own copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySnapshot(BTreeMap<Category, u64>);

impl InventorySnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(category, count)` pairs.
    pub fn from_pairs<C, I>(pairs: I) -> Self
    where
        C: Into<Category>,
        I: IntoIterator<Item = (C, u64)>,
    {
        pairs.into_iter().map(|(c, n)| (c.into(), n)).collect()
    }

    /// Count for a category (zero when unknown).
    pub fn count(&self, category: &Category) -> u64 {
        self.0.get(category).copied().unwrap_or(0)
    }

    /// Return a copy with one count replaced.
    pub fn with_count(mut self, category: impl Into<Category>, count: u64) -> Self {
        self.0.insert(category.into(), count);
        self
    }

    /// Set a count on a snapshot the caller owns.
    pub fn set(&mut self, category: Category, count: u64) {
        self.0.insert(category, count);
    }

    /// Iterate over `(category, count)` in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, u64)> {
        self.0.iter().map(|(c, n)| (c, *n))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// True when every category in `other` has at most our count.
    pub fn dominates(&self, other: &InventorySnapshot) -> bool {
        other.iter().all(|(c, n)| self.count(c) >= n)
    }

    /// Deduct a plan's consumption from this (caller-owned) copy.
    ///
    /// The plan must have been evaluated against these counts; deductions
    /// saturate at zero otherwise.
    pub fn apply(&mut self, plan: &ResolutionPlan) {
        for (category, amount) in plan.deductions() {
            self.deduct(category, *amount);
        }
    }

    pub(crate) fn deduct(&mut self, category: &Category, amount: u64) {
        let current = self.count(category);
        debug_assert!(current >= amount, "deducting {amount} from {category}={current}");
        self.0.insert(category.clone(), current.saturating_sub(amount));
    }
}

impl<C: Into<Category>> FromIterator<(C, u64)> for InventorySnapshot {
    fn from_iter<T: IntoIterator<Item = (C, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(c, n)| (c.into(), n)).collect())
    }
}

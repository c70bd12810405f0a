//! Per-category exclusive locks.

use parking_lot::Mutex;
use postkeeper_core::Category;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, instrument};

/// Registry of one async mutex per category.
///
/// Mutexes are created on first use, so categories added by a configuration
/// reload need no registration.
#[derive(Debug, Default)]
pub struct CategoryLocks {
    locks: Mutex<BTreeMap<Category, Arc<AsyncMutex<()>>>>,
}

/// Guards over a set of categories, released together on drop.
#[derive(Debug)]
pub struct LockSet {
    categories: Vec<Category>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl LockSet {
    /// Locked categories in acquisition order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

impl CategoryLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex(&self, category: &Category) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(category.clone()).or_default())
    }

    /// Lock every category in `categories`, waiting as needed.
    ///
    /// The set is iterated in category order, which is the global acquisition
    /// order shared by every transaction.
    #[instrument(skip_all, fields(categories = categories.len()))]
    pub async fn acquire(&self, categories: &BTreeSet<Category>) -> LockSet {
        let mut guards = Vec::with_capacity(categories.len());
        for category in categories {
            let mutex = self.mutex(category);
            guards.push(mutex.lock_owned().await);
            debug!(category = %category, "Category locked");
        }
        LockSet {
            categories: categories.iter().cloned().collect(),
            _guards: guards,
        }
    }

    /// True when no transaction currently holds `category`.
    pub fn is_free(&self, category: &Category) -> bool {
        self.mutex(category).try_lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<Category> {
        names.iter().map(|n| Category::new(*n)).collect()
    }

    #[tokio::test]
    async fn guards_release_on_drop() {
        let locks = CategoryLocks::new();
        let held = locks.acquire(&set(&["b", "a"])).await;
        assert_eq!(held.categories(), &[Category::new("a"), Category::new("b")]);
        assert!(!locks.is_free(&Category::new("a")));
        assert!(locks.is_free(&Category::new("c")));

        drop(held);
        assert!(locks.is_free(&Category::new("a")));
        assert!(locks.is_free(&Category::new("b")));
    }
}

//! Recipe definitions: the fixed composition of one post type.

use crate::Category;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn one() -> u64 {
    1
}

/// One position in a recipe.
///
/// A slot resolves to the first category in `[primary] + fallbacks` holding
/// at least `quantity` items.
///
/// ```toml
/// [[recipes.slots]]
/// primary = "standart-art"
/// fallbacks = ["standart-meme"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct Slot {
    /// Preferred category.
    #[setters(into)]
    primary: Category,
    /// Substitutes tried in order when the primary is short.
    #[serde(default)]
    fallbacks: Vec<Category>,
    /// Items this slot takes from its resolved category.
    #[serde(default = "one")]
    quantity: u64,
}

impl Slot {
    /// Slot taking one item from `primary`, with no fallbacks.
    pub fn new(primary: impl Into<Category>) -> Self {
        Self {
            primary: primary.into(),
            fallbacks: Vec::new(),
            quantity: 1,
        }
    }

    /// Append a fallback category.
    pub fn with_fallback(mut self, fallback: impl Into<Category>) -> Self {
        self.fallbacks.push(fallback.into());
        self
    }

    /// Primary followed by fallbacks, in resolution order.
    pub fn chain(&self) -> impl Iterator<Item = &Category> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    /// True when some fallback can absorb exhaustion of the primary.
    pub fn is_replaceable(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

/// Narrative units consumed by every post of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AuxiliaryCost {
    /// Narrative category the units come from.
    category: Category,
    /// Units per post.
    #[serde(default = "one")]
    quantity: u64,
}

impl AuxiliaryCost {
    /// Auxiliary cost of `quantity` units from `category`.
    pub fn new(category: impl Into<Category>, quantity: u64) -> Self {
        Self {
            category: category.into(),
            quantity,
        }
    }
}

/// An ordered sequence of slots plus an auxiliary cost.
///
/// Recipes are data: new post types are added through configuration, the
/// evaluator never special-cases a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe name.
    name: String,
    /// Slots in publication order.
    #[serde(default)]
    slots: Vec<Slot>,
    /// Narrative cost, if any.
    #[serde(default)]
    auxiliary: Option<AuxiliaryCost>,
}

impl Recipe {
    /// Empty recipe with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
            auxiliary: None,
        }
    }

    /// Append a slot.
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Set the auxiliary cost.
    pub fn with_auxiliary(mut self, category: impl Into<Category>, quantity: u64) -> Self {
        self.auxiliary = Some(AuxiliaryCost::new(category, quantity));
        self
    }

    /// Every category this recipe could touch: all slot chains and the auxiliary.
    pub fn categories(&self) -> BTreeSet<Category> {
        let mut all: BTreeSet<Category> = self
            .slots
            .iter()
            .flat_map(|slot| slot.chain().cloned())
            .collect();
        if let Some(aux) = &self.auxiliary {
            all.insert(aux.category.clone());
        }
        all
    }

    /// Total media items one post of this recipe publishes.
    pub fn item_count(&self) -> u64 {
        self.slots.iter().map(|s| s.quantity).sum()
    }
}

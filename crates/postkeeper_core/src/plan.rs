//! Results of evaluating a recipe against a snapshot.

use crate::{AuxiliaryCost, Category};
use derive_getters::Getters;
use postkeeper_error::{ShortageError, ShortageErrorKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// The category chosen for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct SlotResolution {
    /// Zero-based slot position.
    slot_index: usize,
    /// Resolved category.
    category: Category,
    /// Items taken from `category`.
    quantity: u64,
    /// True when a fallback served the slot instead of the primary.
    substituted: bool,
}

impl SlotResolution {
    pub(crate) fn new(
        slot_index: usize,
        category: Category,
        quantity: u64,
        substituted: bool,
    ) -> Self {
        Self {
            slot_index,
            category,
            quantity,
            substituted,
        }
    }
}

/// Slot-to-category mapping for one satisfiable post, plus its total
/// per-category deduction.
///
/// A plan names categories only; concrete items are picked by the inventory
/// store during publication.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct ResolutionPlan {
    /// Recipe the plan was built for.
    recipe: String,
    /// One resolution per slot, in slot order.
    slots: Vec<SlotResolution>,
    /// Narrative cost, if the recipe has one.
    auxiliary: Option<AuxiliaryCost>,
    /// Total consumption per category, auxiliary included.
    deductions: BTreeMap<Category, u64>,
}

impl ResolutionPlan {
    pub(crate) fn new(
        recipe: String,
        slots: Vec<SlotResolution>,
        auxiliary: Option<AuxiliaryCost>,
        deductions: BTreeMap<Category, u64>,
    ) -> Self {
        Self {
            recipe,
            slots,
            auxiliary,
            deductions,
        }
    }

    /// Amount this plan takes from a category.
    pub fn deduction(&self, category: &Category) -> u64 {
        self.deductions.get(category).copied().unwrap_or(0)
    }

    /// True when the plan consumes nothing at all.
    pub fn is_empty(&self) -> bool {
        self.deductions.values().all(|n| *n == 0)
    }
}

/// Why a recipe cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Infeasible {
    /// No category in the slot's chain had enough items.
    #[display("slot {} unresolved ({})", slot_index, chain_label(chain))]
    SlotUnresolved {
        /// Zero-based slot position.
        slot_index: usize,
        /// Primary followed by fallbacks.
        chain: Vec<Category>,
    },
    /// Every slot resolved but the narrative cost cannot be paid.
    #[display("auxiliary exhausted ({}: {} of {})", category, available, required)]
    AuxiliaryExhausted {
        /// Narrative category.
        category: Category,
        /// Units needed.
        required: u64,
        /// Units left after the slots.
        available: u64,
    },
}

fn chain_label(chain: &[Category]) -> String {
    chain
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join("/")
}

impl Infeasible {
    /// The first category that could not be satisfied.
    pub fn category(&self) -> Option<&Category> {
        match self {
            Self::SlotUnresolved { chain, .. } => chain.first(),
            Self::AuxiliaryExhausted { category, .. } => Some(category),
        }
    }

    /// Convert into the planning-phase error reported by publication.
    #[track_caller]
    pub fn into_shortage(self, recipe: &str) -> ShortageError {
        let kind = match self {
            Self::SlotUnresolved { slot_index, chain } => ShortageErrorKind::Slot {
                recipe: recipe.to_string(),
                slot_index,
                category: chain.first().map(|c| c.to_string()).unwrap_or_default(),
                chain: chain_label(&chain),
            },
            Self::AuxiliaryExhausted { category, .. } => ShortageErrorKind::Auxiliary {
                recipe: recipe.to_string(),
                category: category.to_string(),
            },
        };
        ShortageError::new(kind)
    }
}

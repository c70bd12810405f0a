//! Per-category exhaustion ratios and the limiting resource.

use crate::{Category, InventorySnapshot};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// Whether a category limits publication or can be substituted away.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequirementRole {
    /// Exhaustion stops publication.
    #[default]
    Primary,
    /// A fallback absorbs exhaustion; reported but never the bottleneck.
    Replaceable,
}

/// Daily demand for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Requirement {
    /// Items consumed per day.
    daily: u64,
    /// Role in the bottleneck computation.
    #[serde(default)]
    role: RequirementRole,
}

impl Requirement {
    /// Requirement of `daily` items with the given role.
    pub fn new(daily: u64, role: RequirementRole) -> Self {
        Self { daily, role }
    }

    /// Primary requirement.
    pub fn primary(daily: u64) -> Self {
        Self::new(daily, RequirementRole::Primary)
    }

    /// Replaceable requirement.
    pub fn replaceable(daily: u64) -> Self {
        Self::new(daily, RequirementRole::Replaceable)
    }
}

/// Per-category daily requirements.
///
/// ```toml
/// [requirements.ero-real]
/// daily = 9
///
/// [requirements.standart-art]
/// daily = 3
/// role = "replaceable"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyRequirements(BTreeMap<Category, Requirement>);

impl DailyRequirements {
    /// Empty requirement set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one requirement.
    pub fn with(mut self, category: impl Into<Category>, requirement: Requirement) -> Self {
        self.0.insert(category.into(), requirement);
        self
    }

    /// Requirement for a category.
    pub fn get(&self, category: &Category) -> Option<&Requirement> {
        self.0.get(category)
    }

    /// Iterate in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &Requirement)> {
        self.0.iter()
    }

    /// Number of categories with a requirement.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no requirement is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn entry_mut(&mut self, category: Category, role: RequirementRole) -> &mut u64 {
        &mut self
            .0
            .entry(category)
            .or_insert(Requirement::new(0, role))
            .daily
    }

    pub(crate) fn set_role(&mut self, category: &Category, role: RequirementRole) {
        if let Some(req) = self.0.get_mut(category) {
            req.role = role;
        }
    }
}

impl FromIterator<(Category, Requirement)> for DailyRequirements {
    fn from_iter<T: IntoIterator<Item = (Category, Requirement)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Count-to-requirement ratio for one category.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct CategoryRatio {
    /// Category.
    category: Category,
    /// Items currently available.
    count: u64,
    /// Items needed per day.
    daily: u64,
    /// `count / daily` as a float.
    ratio: f64,
}

impl CategoryRatio {
    /// Whole days this category alone can sustain.
    pub fn days(&self) -> u64 {
        self.ratio.floor() as u64
    }
}

/// Bottleneck analysis of a snapshot.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct BottleneckReport {
    /// Primary categories, smallest ratio first.
    primary: Vec<CategoryRatio>,
    /// Replaceable categories, smallest ratio first; never the bottleneck.
    replaceable: Vec<CategoryRatio>,
}

impl BottleneckReport {
    /// The primary category with the strictly smallest ratio (ties go to
    /// the first category in order).
    pub fn bottleneck(&self) -> Option<&CategoryRatio> {
        self.primary.first()
    }

    /// Floor of the bottleneck ratio, zero when nothing is measured.
    pub fn days_remaining(&self) -> u64 {
        self.bottleneck().map(CategoryRatio::days).unwrap_or(0)
    }
}

/// Compute per-category ratios and name the limiting primary category.
///
/// Categories with a zero daily requirement have no ratio and are omitted.
#[instrument(level = "debug", skip_all, fields(requirements = requirements.len()))]
pub fn compute_bottleneck(
    snapshot: &InventorySnapshot,
    requirements: &DailyRequirements,
) -> BottleneckReport {
    let mut primary = Vec::new();
    let mut replaceable = Vec::new();

    for (category, requirement) in requirements.iter() {
        let daily = *requirement.daily();
        if daily == 0 {
            continue;
        }
        let count = snapshot.count(category);
        let ratio = CategoryRatio {
            category: category.clone(),
            count,
            daily,
            ratio: count as f64 / daily as f64,
        };
        match requirement.role() {
            RequirementRole::Primary => primary.push(ratio),
            RequirementRole::Replaceable => replaceable.push(ratio),
        }
    }

    // Stable sort keeps category order among equal ratios.
    primary.sort_by(|a, b| a.ratio.total_cmp(&b.ratio));
    replaceable.sort_by(|a, b| a.ratio.total_cmp(&b.ratio));

    if let Some(limit) = primary.first() {
        tracing::debug!(
            category = %limit.category,
            ratio = limit.ratio,
            "Bottleneck computed"
        );
    }

    BottleneckReport {
        primary,
        replaceable,
    }
}

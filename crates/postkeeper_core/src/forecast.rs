//! Forecasting how much content remains.
//!
//! All functions here work on a private copy of the snapshot and always
//! terminate with a definite number.

use crate::{
    BottleneckReport, Category, DailyRequirements, EngineConfig, Infeasible, InventorySnapshot,
    Recipe, RequirementRole, compute_bottleneck, evaluate,
};
use derive_getters::Getters;
use postkeeper_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument, warn};

/// Outcome of applying a recipe repeatedly to a working copy.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct RepeatSimulation {
    /// Successful applications.
    repeats: u64,
    /// Working copy after the last successful application.
    remaining: InventorySnapshot,
    /// Sum of all deductions made.
    consumed: BTreeMap<Category, u64>,
    /// The failure that stopped the loop; `None` when the recipe consumes
    /// nothing and is therefore unbounded.
    halted_by: Option<Infeasible>,
}

/// Apply `recipe` to a copy of `snapshot` until it first becomes infeasible.
///
/// A recipe that consumes nothing can never exhaust anything; it reports
/// `u64::MAX` repeats instead of looping.
#[instrument(level = "debug", skip_all, fields(recipe = %recipe.name()))]
pub fn simulate_repeatable(recipe: &Recipe, snapshot: &InventorySnapshot) -> RepeatSimulation {
    let mut working = snapshot.clone();
    let mut consumed: BTreeMap<Category, u64> = BTreeMap::new();
    let mut repeats = 0u64;

    loop {
        match evaluate(recipe, &working) {
            Ok(plan) => {
                if plan.is_empty() {
                    warn!("Recipe consumes nothing, forecast is unbounded");
                    return RepeatSimulation {
                        repeats: u64::MAX,
                        remaining: working,
                        consumed,
                        halted_by: None,
                    };
                }
                working.apply(&plan);
                for (category, amount) in plan.deductions() {
                    *consumed.entry(category.clone()).or_insert(0) += amount;
                }
                repeats += 1;
            }
            Err(reason) => {
                debug!(repeats, %reason, "Repeat simulation halted");
                return RepeatSimulation {
                    repeats,
                    remaining: working,
                    consumed,
                    halted_by: Some(reason),
                };
            }
        }
    }
}

/// How many posts of `recipe` the snapshot can still supply.
pub fn count_repeatable(recipe: &Recipe, snapshot: &InventorySnapshot) -> u64 {
    *simulate_repeatable(recipe, snapshot).repeats()
}

/// How many full days the snapshot can supply.
///
/// One day applies every recipe `multiplicity` times against one shared
/// working copy; a day counts only if all of them succeed.
#[instrument(level = "debug", skip_all, fields(recipes = day.len()))]
pub fn count_combined_days(day: &[(&Recipe, u32)], snapshot: &InventorySnapshot) -> u64 {
    let mut working = snapshot.clone();
    let mut days = 0u64;

    loop {
        let mut consumed_any = false;
        for (recipe, multiplicity) in day {
            for _ in 0..*multiplicity {
                match evaluate(recipe, &working) {
                    Ok(plan) => {
                        consumed_any |= !plan.is_empty();
                        working.apply(&plan);
                    }
                    Err(reason) => {
                        debug!(days, recipe = %recipe.name(), %reason, "Day simulation halted");
                        return days;
                    }
                }
            }
        }
        if !consumed_any {
            warn!("Day consumes nothing, forecast is unbounded");
            return u64::MAX;
        }
        days += 1;
    }
}

/// One recipe and how many times it is published per day.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct DayEntry {
    /// Recipe name.
    recipe: String,
    /// Posts of this recipe per day.
    multiplicity: u32,
}

impl DayEntry {
    /// Day entry for `recipe` published `multiplicity` times.
    pub fn new(recipe: impl Into<String>, multiplicity: u32) -> Self {
        Self {
            recipe: recipe.into(),
            multiplicity,
        }
    }
}

/// The recipe mix that makes up one publishing day.
///
/// ```toml
/// [[day]]
/// recipe = "ten-pics"
/// multiplicity = 3
///
/// [[day]]
/// recipe = "four-videos"
/// multiplicity = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayPlan(Vec<DayEntry>);

impl DayPlan {
    /// Day plan from entries.
    pub fn new(entries: Vec<DayEntry>) -> Self {
        Self(entries)
    }

    /// Entries in order.
    pub fn entries(&self) -> &[DayEntry] {
        &self.0
    }

    /// True when no recipe is scheduled per day.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up every entry's recipe.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an entry names an unknown recipe.
    pub fn resolve<'a>(&self, recipes: &'a [Recipe]) -> Result<Vec<(&'a Recipe, u32)>, ConfigError> {
        self.0
            .iter()
            .map(|entry| {
                recipes
                    .iter()
                    .find(|r| r.name() == &entry.recipe)
                    .map(|r| (r, entry.multiplicity))
                    .ok_or_else(|| {
                        ConfigError::new(format!(
                            "day plan references unknown recipe '{}'",
                            entry.recipe
                        ))
                    })
            })
            .collect()
    }

    /// Daily demand derived from the recipe mix, counting slot primaries
    /// and auxiliaries only.
    ///
    /// A category is replaceable when every slot that names it as primary
    /// has a fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an entry names an unknown recipe.
    pub fn requirements(&self, recipes: &[Recipe]) -> Result<DailyRequirements, ConfigError> {
        self.derive_requirements(recipes, None)
    }

    /// Like [`DayPlan::requirements`], but a replaceable primary that cannot
    /// cover its own daily demand in `snapshot` pushes the shortfall onto
    /// its first fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an entry names an unknown recipe.
    pub fn effective_requirements(
        &self,
        recipes: &[Recipe],
        snapshot: &InventorySnapshot,
    ) -> Result<DailyRequirements, ConfigError> {
        self.derive_requirements(recipes, Some(snapshot))
    }

    fn derive_requirements(
        &self,
        recipes: &[Recipe],
        snapshot: Option<&InventorySnapshot>,
    ) -> Result<DailyRequirements, ConfigError> {
        let mut requirements = DailyRequirements::new();
        let mut fixed: BTreeSet<Category> = BTreeSet::new();
        let mut substitutable: BTreeSet<Category> = BTreeSet::new();
        let mut remaining = snapshot.cloned();

        for (recipe, multiplicity) in self.resolve(recipes)? {
            for _ in 0..multiplicity {
                for slot in recipe.slots() {
                    let quantity = *slot.quantity();
                    let primary = slot.primary();
                    *requirements.entry_mut(primary.clone(), RequirementRole::Primary) += quantity;

                    if !slot.is_replaceable() {
                        fixed.insert(primary.clone());
                        continue;
                    }
                    substitutable.insert(primary.clone());

                    if let (Some(remaining), Some(fallback)) =
                        (remaining.as_mut(), slot.fallbacks().first())
                    {
                        let used = remaining.count(primary).min(quantity);
                        remaining.deduct(primary, used);
                        let shortfall = quantity - used;
                        if shortfall > 0 {
                            *requirements
                                .entry_mut(fallback.clone(), RequirementRole::Primary) +=
                                shortfall;
                        }
                    }
                }
                if let Some(aux) = recipe.auxiliary() {
                    *requirements.entry_mut(aux.category().clone(), RequirementRole::Primary) +=
                        *aux.quantity();
                    fixed.insert(aux.category().clone());
                }
            }
        }

        for category in substitutable.difference(&fixed) {
            requirements.set_role(category, RequirementRole::Replaceable);
        }
        Ok(requirements)
    }
}

/// Complete inventory forecast for a configuration.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct Forecast {
    /// Counts the forecast was computed from.
    snapshot: InventorySnapshot,
    /// Posts remaining per recipe, in configuration order.
    posts: Vec<(String, u64)>,
    /// Full days remaining under the day plan (zero without a day plan).
    days: u64,
    /// Requirements used for the bottleneck report.
    requirements: DailyRequirements,
    /// Bottleneck analysis.
    bottleneck: BottleneckReport,
}

impl Forecast {
    /// Forecast every recipe, the day plan and the bottleneck.
    ///
    /// Explicitly configured requirements take precedence; otherwise they are
    /// derived from the day plan against the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the day plan names an unknown recipe.
    #[instrument(skip_all)]
    pub fn build(config: &EngineConfig, snapshot: InventorySnapshot) -> Result<Self, ConfigError> {
        let posts = config
            .recipes()
            .iter()
            .map(|recipe| (recipe.name().clone(), count_repeatable(recipe, &snapshot)))
            .collect();

        let day = config.day().resolve(config.recipes())?;
        let days = if day.is_empty() {
            0
        } else {
            count_combined_days(&day, &snapshot)
        };

        let requirements = match config.requirements() {
            Some(explicit) => explicit.clone(),
            None => config
                .day()
                .effective_requirements(config.recipes(), &snapshot)?,
        };
        let bottleneck = compute_bottleneck(&snapshot, &requirements);

        Ok(Self {
            snapshot,
            posts,
            days,
            requirements,
            bottleneck,
        })
    }

    /// Posts remaining for one recipe.
    pub fn posts_for(&self, recipe: &str) -> Option<u64> {
        self.posts
            .iter()
            .find(|(name, _)| name == recipe)
            .map(|(_, n)| *n)
    }
}

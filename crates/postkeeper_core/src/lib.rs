//! Core of the postkeeper content publication engine.
//!
//! Content lives in finite, categorized inventories. A [`Recipe`] describes one
//! post type as an ordered list of [`Slot`]s, each with a primary [`Category`]
//! and a fallback chain, plus an optional auxiliary cost (a narrative unit such
//! as an anecdote).
//!
//! This crate is pure: it never touches real storage.
//!
//! - [`evaluate`] decides whether a recipe is satisfiable against an
//!   [`InventorySnapshot`] and which category serves each slot.
//! - [`count_repeatable`] and [`count_combined_days`] forecast how much
//!   content remains.
//! - [`compute_bottleneck`] names the category that will run out first.
//! - [`EngineConfig`] and [`ConfigSource`] load, validate and hot-reload the
//!   category, recipe and requirement definitions.
//!
//! # Example
//!
//! ```
//! use postkeeper_core::{count_repeatable, evaluate, InventorySnapshot, Recipe, Slot};
//!
//! let recipe = Recipe::new("duo")
//!     .with_slot(Slot::new("art").with_fallback("meme"))
//!     .with_slot(Slot::new("meme"));
//!
//! let snapshot = InventorySnapshot::from_pairs([("art", 0), ("meme", 5)]);
//! let plan = evaluate(&recipe, &snapshot).expect("two memes are available");
//! assert_eq!(plan.deduction(&"meme".into()), 2);
//! assert_eq!(count_repeatable(&recipe, &snapshot), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bottleneck;
mod category;
mod config;
mod evaluator;
mod forecast;
mod plan;
mod recipe;
mod record;
mod snapshot;
mod source;

pub use bottleneck::{
    BottleneckReport, CategoryRatio, DailyRequirements, Requirement, RequirementRole,
    compute_bottleneck,
};
pub use category::Category;
pub use config::{
    CategoryConfig, DEFAULT_NARRATIVE_SEPARATOR, EngineConfig, MediaKind, PublishSettings,
};
pub use evaluator::evaluate;
pub use forecast::{
    DayEntry, DayPlan, Forecast, RepeatSimulation, count_combined_days, count_repeatable,
    simulate_repeatable,
};
pub use plan::{Infeasible, ResolutionPlan, SlotResolution};
pub use recipe::{AuxiliaryCost, Recipe, Slot};
pub use record::{ConsumedItemRecord, ItemId};
pub use snapshot::InventorySnapshot;
pub use source::ConfigSource;

//! Recipe evaluation with sequential fallback substitution.

use crate::{InventorySnapshot, Infeasible, Recipe, ResolutionPlan, SlotResolution};
use std::collections::BTreeMap;
use tracing::{instrument, trace};

/// Decide whether `recipe` can be satisfied by `snapshot`.
///
/// Slots are processed in order against a working copy local to this call.
/// Each slot takes the first category of its chain with enough items left,
/// and the working copy is reduced immediately, so a later slot sharing a
/// fallback sees the reduced count. The auxiliary cost is checked last.
///
/// The snapshot itself is never modified; repeated calls with the same
/// inputs give the same verdict and the same categories.
///
/// # Errors
///
/// Returns [`Infeasible`] naming the first slot that could not resolve, or
/// the exhausted auxiliary. No partial plan is returned.
#[instrument(level = "trace", skip_all, fields(recipe = %recipe.name()))]
pub fn evaluate(
    recipe: &Recipe,
    snapshot: &InventorySnapshot,
) -> Result<ResolutionPlan, Infeasible> {
    let mut working = snapshot.clone();
    let mut deductions = BTreeMap::new();
    let mut resolutions = Vec::with_capacity(recipe.slots().len());

    for (slot_index, slot) in recipe.slots().iter().enumerate() {
        let quantity = *slot.quantity();
        let Some(category) = slot
            .chain()
            .find(|category| working.count(category) >= quantity)
            .cloned()
        else {
            trace!(slot_index, "No category in chain can serve slot");
            return Err(Infeasible::SlotUnresolved {
                slot_index,
                chain: slot.chain().cloned().collect(),
            });
        };

        working.deduct(&category, quantity);
        *deductions.entry(category.clone()).or_insert(0) += quantity;
        let substituted = &category != slot.primary();
        resolutions.push(SlotResolution::new(slot_index, category, quantity, substituted));
    }

    if let Some(aux) = recipe.auxiliary() {
        let available = working.count(aux.category());
        if available < *aux.quantity() {
            trace!(category = %aux.category(), available, "Auxiliary cost unaffordable");
            return Err(Infeasible::AuxiliaryExhausted {
                category: aux.category().clone(),
                required: *aux.quantity(),
                available,
            });
        }
        *deductions.entry(aux.category().clone()).or_insert(0) += *aux.quantity();
    }

    Ok(ResolutionPlan::new(
        recipe.name().clone(),
        resolutions,
        recipe.auxiliary().clone(),
        deductions,
    ))
}

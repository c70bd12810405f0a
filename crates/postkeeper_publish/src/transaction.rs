//! The select, publish, commit protocol.

use crate::{CategoryLocks, LockSet, PublicationOutcome, PublishSink, TransactionPhase};
use postkeeper_core::{
    Category, EngineConfig, Infeasible, InventorySnapshot, ItemId, Recipe,
    ResolutionPlan, evaluate,
};
use postkeeper_error::{
    ArchiveError, PostkeeperResult, SelectionError, SelectionErrorKind, SendError, SendErrorKind,
};
use postkeeper_storage::{ContentStore, MediaItem, NarrativeUnit};
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// One publication attempt of one recipe.
///
/// The transaction locks the categories its plan resolves to, in category
/// order, and holds them until it finishes, so no two concurrent
/// transactions can pick the same item while transactions over disjoint
/// categories never wait on each other. Storage is mutated only in
/// `Committing`, after the sink confirmed every send.
pub struct Transaction<'a> {
    config: &'a EngineConfig,
    store: &'a dyn ContentStore,
    sink: &'a dyn PublishSink,
    locks: &'a CategoryLocks,
    recipe: &'a Recipe,
    send_timeout: Duration,
    phase: TransactionPhase,
}

type Selection = (Vec<MediaItem>, Vec<NarrativeUnit>);

impl<'a> Transaction<'a> {
    /// Prepare a transaction; the send timeout comes from `config`.
    pub fn new(
        config: &'a EngineConfig,
        store: &'a dyn ContentStore,
        sink: &'a dyn PublishSink,
        locks: &'a CategoryLocks,
        recipe: &'a Recipe,
    ) -> Self {
        Self {
            config,
            store,
            sink,
            locks,
            recipe,
            send_timeout: Duration::from_secs(*config.publish().send_timeout_secs()),
            phase: TransactionPhase::Planning,
        }
    }

    /// Override the upper bound of each sink call.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> TransactionPhase {
        self.phase
    }

    fn enter(&mut self, phase: TransactionPhase) {
        debug!(from = %self.phase, to = %phase, "Transaction phase");
        self.phase = phase;
    }

    /// Run the transaction to `Done`.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration or storage failures before
    /// anything was sent. Shortages, selection failures and send failures
    /// are reported as [`PublicationOutcome`]s.
    #[instrument(skip_all, fields(recipe = %self.recipe.name(), sink = self.sink.sink_name()))]
    pub async fn run(mut self) -> PostkeeperResult<PublicationOutcome> {
        let outcome = self.execute().await;
        self.enter(TransactionPhase::Done);
        outcome
    }

    async fn execute(&mut self) -> PostkeeperResult<PublicationOutcome> {
        let (plan, _lock_set) = match self.plan().await? {
            Ok(planned) => planned,
            Err(reason) => {
                info!(%reason, "Recipe not satisfiable");
                return Ok(PublicationOutcome::Shortage(
                    reason.into_shortage(self.recipe.name()),
                ));
            }
        };

        self.enter(TransactionPhase::Selecting);
        let (items, units) = match self.select(&plan).await {
            Ok(selection) => selection,
            Err(e) => {
                warn!(error = %e, "Selection failed, nothing reserved");
                return Ok(PublicationOutcome::SelectionFailed(e));
            }
        };

        self.enter(TransactionPhase::Sending);
        if let Err(e) = self.send(&items, &units).await {
            self.enter(TransactionPhase::RollingBack);
            let records: Vec<_> = items.iter().map(MediaItem::record).collect();
            error!(
                items = %records.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
                error = %e,
                "Send failed, publication rolled back"
            );
            return Ok(PublicationOutcome::RolledBack { items: records, error: e });
        }

        self.enter(TransactionPhase::Committing);
        let archive_failures = self.commit(&items, &units).await;
        info!(
            items = items.len(),
            narratives = units.len(),
            archive_failures = archive_failures.len(),
            "Published"
        );
        Ok(PublicationOutcome::Published {
            recipe: self.recipe.name().clone(),
            items: items.iter().map(MediaItem::record).collect(),
            narratives: units.len(),
            archive_failures,
        })
    }

    /// Evaluate the recipe and lock the categories it resolves to.
    ///
    /// A first evaluation runs without locks to find the resolved categories.
    /// Once those are locked the recipe is evaluated again; if it now
    /// resolves to a category outside the lock set, the set is widened to the
    /// union and the locks are taken again in order. The union only grows
    /// within the recipe's categories, so this terminates.
    async fn plan(&self) -> PostkeeperResult<Result<(ResolutionPlan, LockSet), Infeasible>> {
        let snapshot = self.snapshot().await?;
        let mut wanted = match evaluate(self.recipe, &snapshot) {
            Ok(plan) => resolved_categories(&plan),
            Err(reason) => return Ok(Err(reason)),
        };

        loop {
            let lock_set = self.locks.acquire(&wanted).await;
            debug!(categories = lock_set.categories().len(), "Lock set acquired");

            let snapshot = self.snapshot().await?;
            let plan = match evaluate(self.recipe, &snapshot) {
                Ok(plan) => plan,
                Err(reason) => return Ok(Err(reason)),
            };
            let resolved = resolved_categories(&plan);
            if resolved.is_subset(&wanted) {
                return Ok(Ok((plan, lock_set)));
            }

            debug!(
                locked = ?wanted,
                resolved = ?resolved,
                "Resolution moved outside the lock set, widening"
            );
            drop(lock_set);
            wanted.extend(resolved);
        }
    }

    /// Live counts of the recipe's categories.
    async fn snapshot(&self) -> PostkeeperResult<InventorySnapshot> {
        Ok(self.store.snapshot(self.config).await?)
    }

    async fn select(&self, plan: &ResolutionPlan) -> Result<Selection, SelectionError> {
        let mut items: Vec<MediaItem> = Vec::new();
        for slot in plan.slots() {
            let category = slot.category();
            for _ in 0..*slot.quantity() {
                let taken: Vec<ItemId> = items
                    .iter()
                    .filter(|item| item.category() == category)
                    .map(|item| item.id().clone())
                    .collect();
                let item = self
                    .store
                    .pick_random(category, &taken)
                    .await
                    .map_err(|e| {
                        SelectionError::new(SelectionErrorKind::Store {
                            category: category.to_string(),
                            message: e.to_string(),
                        })
                    })?
                    .ok_or_else(|| {
                        SelectionError::new(SelectionErrorKind::Exhausted(category.to_string()))
                    })?;

                if !self.store.is_valid(&item).await {
                    return Err(SelectionError::new(SelectionErrorKind::Invalid {
                        category: category.to_string(),
                        item: item.id().to_string(),
                    }));
                }
                debug!(slot = slot.slot_index(), item = %item, "Item selected");
                items.push(item);
            }
        }

        let mut units = Vec::new();
        if let Some(aux) = plan.auxiliary() {
            let category = aux.category();
            for _ in 0..*aux.quantity() {
                let unit = self
                    .store
                    .peek_random(category, &units)
                    .await
                    .map_err(|e| {
                        SelectionError::new(SelectionErrorKind::Store {
                            category: category.to_string(),
                            message: e.to_string(),
                        })
                    })?
                    .ok_or_else(|| {
                        SelectionError::new(SelectionErrorKind::NarrativeExhausted(
                            category.to_string(),
                        ))
                    })?;
                units.push(unit);
            }
        }

        Ok((items, units))
    }

    async fn send(&self, items: &[MediaItem], units: &[NarrativeUnit]) -> Result<(), SendError> {
        if !items.is_empty() {
            self.bounded(self.sink.send_group(items)).await?;
            debug!(items = items.len(), "Media group confirmed");
        }
        for unit in units {
            self.bounded(self.sink.send_text(unit.text())).await?;
            debug!(category = %unit.category(), "Narrative confirmed");
        }
        Ok(())
    }

    async fn bounded<F>(&self, call: F) -> Result<(), SendError>
    where
        F: Future<Output = Result<(), SendError>>,
    {
        match tokio::time::timeout(self.send_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SendError::new(SendErrorKind::Timeout(
                self.send_timeout.as_secs(),
            ))),
        }
    }

    /// Archive items and remove narrative units. Failures are collected, never
    /// retried as a resend.
    async fn commit(&self, items: &[MediaItem], units: &[NarrativeUnit]) -> Vec<ArchiveError> {
        let mut failures = Vec::new();
        for item in items {
            if let Err(e) = self.store.archive(item).await {
                warn!(item = %item, error = %e, "Published item could not be archived");
                failures.push(ArchiveError::new(
                    item.id().to_string(),
                    item.category().to_string(),
                    e.to_string(),
                ));
            }
        }
        for unit in units {
            if let Err(e) = self.store.consume(unit).await {
                warn!(category = %unit.category(), error = %e, "Published narrative could not be removed");
                failures.push(ArchiveError::new(
                    "narrative unit",
                    unit.category().to_string(),
                    e.to_string(),
                ));
            }
        }
        failures
    }
}

fn resolved_categories(plan: &ResolutionPlan) -> BTreeSet<Category> {
    plan.deductions()
        .iter()
        .filter(|(_, amount)| **amount > 0)
        .map(|(category, _)| category.clone())
        .collect()
}

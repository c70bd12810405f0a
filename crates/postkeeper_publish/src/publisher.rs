//! Publication facade over configuration, storage, sink and state.

use crate::{CategoryLocks, PublicationOutcome, PublishSink, StateStore, Transaction};
use postkeeper_core::{ConfigSource, EngineConfig, Forecast, ResolutionPlan, evaluate};
use postkeeper_error::PostkeeperResult;
use postkeeper_storage::{ContentStore, FileSystemInventory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Runs publications against the filesystem inventory under `root`.
///
/// The configuration is re-read (if changed) at the start of every call, so
/// an edited file takes effect between transactions without restart.
pub struct Publisher {
    config: Arc<ConfigSource>,
    root: PathBuf,
    sink: Arc<dyn PublishSink>,
    locks: CategoryLocks,
    state: StateStore,
}

impl Publisher {
    /// Create a publisher.
    pub fn new(
        config: Arc<ConfigSource>,
        root: impl Into<PathBuf>,
        sink: Arc<dyn PublishSink>,
        state: StateStore,
    ) -> Self {
        Self {
            config,
            root: root.into(),
            sink,
            locks: CategoryLocks::new(),
            state,
        }
    }

    /// Base directory of the inventory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persisted autopost switch.
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Category lock registry shared by every transaction of this publisher.
    pub fn locks(&self) -> &CategoryLocks {
        &self.locks
    }

    /// Configuration for the next operation.
    pub fn config(&self) -> Arc<EngineConfig> {
        self.config.current()
    }

    fn store(&self, config: &EngineConfig) -> FileSystemInventory {
        FileSystemInventory::from_config(&self.root, config)
    }

    /// Publish one post of `recipe` now, regardless of the autopost switch.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown recipes and storage failures before
    /// sending; every other failure is a [`PublicationOutcome`].
    #[instrument(skip(self))]
    pub async fn publish(&self, recipe: &str) -> PostkeeperResult<PublicationOutcome> {
        let config = self.config();
        let recipe = config.recipe(recipe)?;
        let store = self.store(&config);
        Transaction::new(&config, &store, self.sink.as_ref(), &self.locks, recipe)
            .run()
            .await
    }

    /// Publish as the scheduler would: skipped while autopost is off.
    ///
    /// # Errors
    ///
    /// Same as [`Publisher::publish`].
    #[instrument(skip(self))]
    pub async fn publish_scheduled(&self, recipe: &str) -> PostkeeperResult<PublicationOutcome> {
        if !self.state.autopost_enabled() {
            info!("Autopost disabled, skipping scheduled publication");
            return Ok(PublicationOutcome::Disabled);
        }
        self.publish(recipe).await
    }

    /// Evaluate `recipe` against the current inventory without locking,
    /// selecting or sending anything.
    ///
    /// # Errors
    ///
    /// Returns a shortage error when the recipe is not satisfiable, or a
    /// configuration/storage error.
    #[instrument(skip(self))]
    pub async fn preview(&self, recipe: &str) -> PostkeeperResult<ResolutionPlan> {
        let config = self.config();
        let recipe = config.recipe(recipe)?;
        let snapshot = self.store(&config).snapshot(&config).await?;
        evaluate(recipe, &snapshot).map_err(|reason| reason.into_shortage(recipe.name()).into())
    }

    /// Forecast every recipe and the day plan from the current inventory.
    ///
    /// The snapshot may be stale by at most one in-flight transaction.
    ///
    /// # Errors
    ///
    /// Returns a storage or configuration error.
    #[instrument(skip(self))]
    pub async fn forecast(&self) -> PostkeeperResult<Forecast> {
        let config = self.config();
        let snapshot = self.store(&config).snapshot(&config).await?;
        Ok(Forecast::build(&config, snapshot)?)
    }
}

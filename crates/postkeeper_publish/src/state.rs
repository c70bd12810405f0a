//! Persisted autopost switch.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use parking_lot::RwLock;
use postkeeper_error::StateError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Engine state that survives restarts.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AutopostState {
    /// Whether scheduled publication runs.
    autopost_enabled: bool,
    /// Last time the state was changed.
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Default for AutopostState {
    fn default() -> Self {
        Self {
            autopost_enabled: true,
            updated_at: None,
        }
    }
}

/// JSON file holding an [`AutopostState`].
///
/// Loaded once at startup; every mutation is written back before it becomes
/// visible.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: RwLock<AutopostState>,
}

impl StateStore {
    /// Load the state file, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the file exists but cannot be read or parsed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading state");

        let state = match tokio::fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                StateError::new(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file, using defaults");
                AutopostState::default()
            }
            Err(e) => {
                return Err(StateError::new(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        info!(autopost_enabled = state.autopost_enabled, "State loaded");
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current state.
    pub fn current(&self) -> AutopostState {
        self.state.read().clone()
    }

    /// Whether scheduled publication is on.
    pub fn autopost_enabled(&self) -> bool {
        self.state.read().autopost_enabled
    }

    /// Switch autopost on or off and persist the change.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the file cannot be written; the in-memory
    /// state is left unchanged in that case.
    #[instrument(skip(self))]
    pub async fn set_autopost(&self, enabled: bool) -> Result<AutopostState, StateError> {
        let next = AutopostState {
            autopost_enabled: enabled,
            updated_at: Some(Utc::now()),
        };
        self.save(&next).await?;
        *self.state.write() = next.clone();
        info!(enabled, "Autopost switched");
        Ok(next)
    }

    async fn save(&self, state: &AutopostState) -> Result<(), StateError> {
        debug!(path = ?self.path, "Saving state");
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StateError::new(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StateError::new(format!("Failed to encode state: {}", e)))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            StateError::new(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

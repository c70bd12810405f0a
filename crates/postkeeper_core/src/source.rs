//! Hot-reloading configuration source.

use crate::EngineConfig;
use parking_lot::RwLock;
use postkeeper_error::ConfigError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct Cached {
    config: Arc<EngineConfig>,
    modified: Option<SystemTime>,
}

/// Configuration file watched by modification time.
///
/// [`ConfigSource::current`] hands out an immutable `Arc<EngineConfig>`;
/// callers take a fresh one per transaction so an edited file takes effect
/// without restart. A reload that fails to parse or validate keeps the
/// previous configuration.
#[derive(Debug)]
pub struct ConfigSource {
    path: PathBuf,
    cached: RwLock<Cached>,
}

impl ConfigSource {
    /// Load the file once; a broken initial configuration is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be loaded or validated.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let modified = modified_at(&path);
        let config = EngineConfig::from_file(&path)?;
        Ok(Self {
            path,
            cached: RwLock::new(Cached {
                config: Arc::new(config),
                modified,
            }),
        })
    }

    /// Path of the watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current configuration, re-read first if the file changed.
    pub fn current(&self) -> Arc<EngineConfig> {
        let modified = modified_at(&self.path);
        {
            let cached = self.cached.read();
            if modified.is_none() || cached.modified == modified {
                return Arc::clone(&cached.config);
            }
        }

        debug!(path = %self.path.display(), "Config file changed, reloading");
        match EngineConfig::from_file(&self.path) {
            Ok(config) => self.store(config, modified),
            Err(e) => {
                warn!(error = %e, "Config reload failed, keeping previous configuration");
                let mut cached = self.cached.write();
                // Do not retry the same broken revision on every call.
                cached.modified = modified;
                Arc::clone(&cached.config)
            }
        }
    }

    /// Force a re-read.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] and keeps the previous configuration when the
    /// file is invalid.
    pub fn reload(&self) -> Result<Arc<EngineConfig>, ConfigError> {
        let modified = modified_at(&self.path);
        let config = EngineConfig::from_file(&self.path)?;
        Ok(self.store(config, modified))
    }

    /// Install an in-memory configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` does not validate.
    pub fn replace(&self, config: EngineConfig) -> Result<Arc<EngineConfig>, ConfigError> {
        config.validate()?;
        let modified = self.cached.read().modified;
        Ok(self.store(config, modified))
    }

    fn store(&self, config: EngineConfig, modified: Option<SystemTime>) -> Arc<EngineConfig> {
        let config = Arc::new(config);
        let mut cached = self.cached.write();
        cached.config = Arc::clone(&config);
        cached.modified = modified;
        info!(path = %self.path.display(), "Configuration reloaded");
        config
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

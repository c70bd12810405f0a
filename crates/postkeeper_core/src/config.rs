//! Engine configuration: categories, recipes, day plan and requirements.

use crate::{Category, DailyRequirements, DayPlan, Recipe};
use derive_getters::Getters;
use postkeeper_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Separator line between narrative units in a narrative file.
pub const DEFAULT_NARRATIVE_SEPARATOR: &str =
    "==================================================";

/// How media of a category is published.
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
pub enum MediaKind {
    /// Still image (sent as a photo).
    #[default]
    Photo,
    /// Video clip.
    Video,
}

/// Storage definition of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CategoryConfig {
    /// Directory of media files, moved to `archive_dir` once published.
    Media {
        /// Storage directory.
        dir: PathBuf,
        /// Archive directory.
        archive_dir: PathBuf,
        /// Media kind for publishing.
        #[serde(default)]
        media: MediaKind,
    },
    /// Text file of narrative units separated by `separator` lines.
    Narrative {
        /// Narrative file.
        file: PathBuf,
        /// Separator line.
        #[serde(default = "default_separator")]
        separator: String,
    },
}

fn default_separator() -> String {
    DEFAULT_NARRATIVE_SEPARATOR.to_string()
}

impl CategoryConfig {
    /// True for media categories.
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Media { .. })
    }

    /// True for narrative categories.
    pub fn is_narrative(&self) -> bool {
        matches!(self, Self::Narrative { .. })
    }
}

/// Publication settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct PublishSettings {
    /// Upper bound for each sink call, in seconds.
    #[serde(default = "default_send_timeout")]
    send_timeout_secs: u64,
    /// File extensions (lowercase, without dot) accepted as media.
    #[serde(default = "default_valid_extensions")]
    valid_extensions: Vec<String>,
    /// Where the autopost switch is persisted.
    #[serde(default = "default_state_file")]
    #[setters(into)]
    state_file: PathBuf,
}

fn default_send_timeout() -> u64 {
    180
}

fn default_valid_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "mp4", "webm", "webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_state_file() -> PathBuf {
    PathBuf::from("postkeeper_state.json")
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            send_timeout_secs: default_send_timeout(),
            valid_extensions: default_valid_extensions(),
            state_file: default_state_file(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The closed set of categories.
    #[serde(default)]
    categories: BTreeMap<Category, CategoryConfig>,
    /// Post types.
    #[serde(default)]
    recipes: Vec<Recipe>,
    /// Recipe mix of one day.
    #[serde(default)]
    day: DayPlan,
    /// Explicit daily requirements; derived from `day` when absent.
    #[serde(default)]
    requirements: Option<DailyRequirements>,
    /// Publication settings.
    #[serde(default)]
    publish: PublishSettings,
}

impl EngineConfig {
    /// Assemble a configuration in code. Call [`EngineConfig::validate`] before use.
    pub fn new(
        categories: BTreeMap<Category, CategoryConfig>,
        recipes: Vec<Recipe>,
        day: DayPlan,
        requirements: Option<DailyRequirements>,
        publish: PublishSettings,
    ) -> Self {
        Self {
            categories,
            recipes,
            day,
            requirements,
            publish,
        }
    }

    /// Load and validate a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!("Loading engine config from file");

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&contents)?;

        tracing::info!(
            categories = config.categories.len(),
            recipes = config.recipes.len(),
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on parse or validation failure.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross references and numeric constraints.
    ///
    /// # Errors
    ///
    /// Returns the first problem found as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = BTreeSet::new();
        for recipe in &self.recipes {
            if recipe.name().is_empty() {
                return Err(ConfigError::new("recipe name cannot be empty"));
            }
            if !names.insert(recipe.name()) {
                return Err(ConfigError::new(format!(
                    "duplicate recipe '{}'",
                    recipe.name()
                )));
            }
            if recipe.slots().is_empty() && recipe.auxiliary().is_none() {
                return Err(ConfigError::new(format!(
                    "recipe '{}' consumes nothing",
                    recipe.name()
                )));
            }
            for (index, slot) in recipe.slots().iter().enumerate() {
                if *slot.quantity() == 0 {
                    return Err(ConfigError::new(format!(
                        "recipe '{}' slot {} has zero quantity",
                        recipe.name(),
                        index
                    )));
                }
                for category in slot.chain() {
                    if !self.category(category)?.is_media() {
                        return Err(ConfigError::new(format!(
                            "recipe '{}' slot {} uses narrative category '{}'",
                            recipe.name(),
                            index,
                            category
                        )));
                    }
                }
            }
            if let Some(aux) = recipe.auxiliary() {
                if !self.category(aux.category())?.is_narrative() {
                    return Err(ConfigError::new(format!(
                        "recipe '{}' auxiliary '{}' is not a narrative category",
                        recipe.name(),
                        aux.category()
                    )));
                }
                if *aux.quantity() == 0 {
                    return Err(ConfigError::new(format!(
                        "recipe '{}' auxiliary has zero quantity",
                        recipe.name()
                    )));
                }
            }
        }

        self.day.resolve(&self.recipes)?;
        for entry in self.day.entries() {
            if *entry.multiplicity() == 0 {
                return Err(ConfigError::new(format!(
                    "day entry for '{}' has zero multiplicity",
                    entry.recipe()
                )));
            }
        }

        if let Some(requirements) = &self.requirements {
            for (category, requirement) in requirements.iter() {
                self.category(category)?;
                if *requirement.daily() == 0 {
                    return Err(ConfigError::new(format!(
                        "daily requirement for '{}' must be positive",
                        category
                    )));
                }
            }
        }

        if self.publish.send_timeout_secs == 0 {
            return Err(ConfigError::new("send_timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Storage definition of a category.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for categories outside the configured set.
    #[track_caller]
    pub fn category(&self, category: &Category) -> Result<&CategoryConfig, ConfigError> {
        self.categories
            .get(category)
            .ok_or_else(|| ConfigError::new(format!("unknown category '{}'", category)))
    }

    /// Recipe by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no recipe has that name.
    #[track_caller]
    pub fn recipe(&self, name: &str) -> Result<&Recipe, ConfigError> {
        self.recipes
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| ConfigError::new(format!("unknown recipe '{}'", name)))
    }

    /// Media categories in order.
    pub fn media_categories(&self) -> impl Iterator<Item = (&Category, &CategoryConfig)> {
        self.categories.iter().filter(|(_, c)| c.is_media())
    }

    /// Narrative categories in order.
    pub fn narrative_categories(&self) -> impl Iterator<Item = (&Category, &CategoryConfig)> {
        self.categories.iter().filter(|(_, c)| c.is_narrative())
    }
}

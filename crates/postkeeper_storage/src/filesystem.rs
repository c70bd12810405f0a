//! Directory-backed media inventory.

use crate::{InventoryStore, MediaItem, is_valid_item};
use postkeeper_core::{Category, CategoryConfig, EngineConfig, ItemId, MediaKind};
use postkeeper_error::{StorageError, StorageErrorKind};
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Filesystem inventory built from the category layout of one configuration.
///
/// Relative directories and files in the configuration are resolved against
/// `root`. Build a fresh inventory whenever the configuration changes.
///
/// ```text
/// {root}/materials/ero-real/        media items
/// {root}/archive/ero-real/          published items
/// {root}/materials/anecdotes.txt    narrative units
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemInventory {
    root: PathBuf,
    categories: BTreeMap<Category, CategoryConfig>,
    valid_extensions: Vec<String>,
}

pub(crate) struct MediaLocation {
    pub(crate) dir: PathBuf,
    pub(crate) archive_dir: PathBuf,
    pub(crate) media: MediaKind,
}

impl FileSystemInventory {
    /// Inventory over the categories of `config`.
    #[tracing::instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn from_config(root: impl AsRef<Path>, config: &EngineConfig) -> Self {
        let valid_extensions = config
            .publish()
            .valid_extensions()
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        tracing::debug!(
            categories = config.categories().len(),
            "Created filesystem inventory"
        );
        Self {
            root: root.as_ref().to_path_buf(),
            categories: config.categories().clone(),
            valid_extensions,
        }
    }

    /// Base directory for relative paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub(crate) fn category_config(
        &self,
        category: &Category,
    ) -> Result<&CategoryConfig, StorageError> {
        self.categories.get(category).ok_or_else(|| {
            StorageError::new(StorageErrorKind::UnknownCategory(category.to_string()))
        })
    }

    pub(crate) fn media_location(&self, category: &Category) -> Result<MediaLocation, StorageError> {
        match self.category_config(category)? {
            CategoryConfig::Media {
                dir,
                archive_dir,
                media,
            } => Ok(MediaLocation {
                dir: self.resolve(dir),
                archive_dir: self.resolve(archive_dir),
                media: *media,
            }),
            CategoryConfig::Narrative { .. } => Err(StorageError::new(
                StorageErrorKind::UnknownCategory(format!("{} is not a media category", category)),
            )),
        }
    }
}

#[async_trait::async_trait]
impl InventoryStore for FileSystemInventory {
    #[tracing::instrument(skip_all, fields(category = %category))]
    async fn list_valid_items(&self, category: &Category) -> Result<Vec<MediaItem>, StorageError> {
        let location = self.media_location(category)?;

        let mut entries = match tokio::fs::read_dir(&location.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %location.dir.display(), "Category directory missing");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::DirectoryRead(format!(
                    "{}: {}",
                    location.dir.display(),
                    e
                ))));
            }
        };

        let mut items = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryRead(format!(
                    "{}: {}",
                    location.dir.display(),
                    e
                )))
            })?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            if !is_valid_item(&path, &self.valid_extensions).await {
                continue;
            }
            let id = ItemId::new(entry.file_name().to_string_lossy());
            items.push(MediaItem::new(id, category.clone(), path, location.media));
        }

        items.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(items)
    }

    async fn pick_random(
        &self,
        category: &Category,
        exclude: &[ItemId],
    ) -> Result<Option<MediaItem>, StorageError> {
        let candidates: Vec<MediaItem> = self
            .list_valid_items(category)
            .await?
            .into_iter()
            .filter(|item| !exclude.contains(item.id()))
            .collect();

        let picked = candidates.choose(&mut rand::thread_rng()).cloned();
        tracing::debug!(
            category = %category,
            candidates = candidates.len(),
            picked = picked.as_ref().map(|i| i.id().to_string()),
            "Picked random item"
        );
        Ok(picked)
    }

    async fn is_valid(&self, item: &MediaItem) -> bool {
        is_valid_item(item.path(), &self.valid_extensions).await
    }

    #[tracing::instrument(skip_all, fields(item = %item))]
    async fn archive(&self, item: &MediaItem) -> Result<(), StorageError> {
        let location = self.media_location(item.category())?;

        tokio::fs::create_dir_all(&location.archive_dir)
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    location.archive_dir.display(),
                    e
                )))
            })?;

        let target = location.archive_dir.join(item.id().as_str());
        match tokio::fs::try_exists(&target).await {
            Ok(false) => {}
            Ok(true) => {
                return Err(StorageError::new(StorageErrorKind::AlreadyExists(
                    target.display().to_string(),
                )));
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    target.display(),
                    e
                ))));
            }
        }

        move_file(item.path(), &target).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(item.path().display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileMove(format!(
                    "{} to {}: {}",
                    item.path().display(),
                    target.display(),
                    e
                )))
            }
        })?;

        tracing::info!(target = %target.display(), "Archived item");
        Ok(())
    }
}

/// Rename, or copy and delete when source and target are on different
/// filesystems.
async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            tracing::debug!(from = %from.display(), to = %to.display(), "Cross-device move, copying");
            tokio::fs::copy(from, to).await?;
            tokio::fs::remove_file(from).await
        }
        other => other,
    }
}

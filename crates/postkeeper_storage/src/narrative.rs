//! Separator-delimited narrative files.

use crate::{FileSystemInventory, NarrativeStore, NarrativeUnit};
use postkeeper_core::{Category, CategoryConfig};
use postkeeper_error::{StorageError, StorageErrorKind};
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};

/// Split file contents into trimmed, non-empty units.
pub fn split_units<'a>(contents: &'a str, separator: &str) -> Vec<&'a str> {
    contents
        .split(separator)
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .collect()
}

/// Join units back into file contents, one separator line between units.
pub fn join_units<S: AsRef<str>>(units: &[S], separator: &str) -> String {
    units
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&format!("\n{}\n", separator))
}

impl FileSystemInventory {
    fn narrative_location(&self, category: &Category) -> Result<(PathBuf, &str), StorageError> {
        match self.category_config(category)? {
            CategoryConfig::Narrative { file, separator } => {
                Ok((self.resolve(file), separator.as_str()))
            }
            CategoryConfig::Media { .. } => Err(StorageError::new(
                StorageErrorKind::UnknownCategory(format!(
                    "{} is not a narrative category",
                    category
                )),
            )),
        }
    }
}

async fn read_narrative(path: &Path) -> Result<String, StorageError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))),
    }
}

#[async_trait::async_trait]
impl NarrativeStore for FileSystemInventory {
    async fn count_units(&self, category: &Category) -> Result<u64, StorageError> {
        let (path, separator) = self.narrative_location(category)?;
        let contents = read_narrative(&path).await?;
        Ok(split_units(&contents, separator).len() as u64)
    }

    #[tracing::instrument(skip_all, fields(category = %category))]
    async fn peek_random(
        &self,
        category: &Category,
        exclude: &[NarrativeUnit],
    ) -> Result<Option<NarrativeUnit>, StorageError> {
        let (path, separator) = self.narrative_location(category)?;
        let contents = read_narrative(&path).await?;
        let units: Vec<(usize, &str)> = split_units(&contents, separator)
            .into_iter()
            .enumerate()
            .filter(|(position, _)| {
                !exclude
                    .iter()
                    .any(|unit| unit.category() == category && unit.position() == position)
            })
            .collect();
        Ok(units
            .choose(&mut rand::thread_rng())
            .map(|(position, text)| NarrativeUnit::new(category.clone(), *position, *text)))
    }

    #[tracing::instrument(skip_all, fields(category = %unit.category()))]
    async fn consume(&self, unit: &NarrativeUnit) -> Result<(), StorageError> {
        let (path, separator) = self.narrative_location(unit.category())?;
        let contents = read_narrative(&path).await?;
        let mut units = split_units(&contents, separator);

        // Earlier removals shift positions; any occurrence of the same text
        // is an equivalent unit.
        let position = Some(*unit.position())
            .filter(|&p| units.get(p) == Some(&unit.text().as_str()))
            .or_else(|| units.iter().position(|text| *text == unit.text().as_str()))
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound(format!(
                    "narrative unit in {}",
                    path.display()
                )))
            })?;
        units.remove(position);

        // Write to temp file first, then rename for atomicity
        let temp = path.with_extension("tmp");
        tokio::fs::write(&temp, join_units(&units, separator))
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "{}: {}",
                    temp.display(),
                    e
                )))
            })?;
        tokio::fs::rename(&temp, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(remaining = units.len(), "Consumed narrative unit");
        Ok(())
    }
}

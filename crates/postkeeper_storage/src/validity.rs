//! Which files count as publishable items.

use std::path::Path;

const PLACEHOLDER: &str = ".gitkeep";

/// True when the file name ends in one of `extensions` (lowercase, no dot),
/// compared case-insensitively.
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| extensions.iter().any(|valid| *valid == ext))
}

/// True when `path` is an existing, non-empty regular file with a valid
/// extension that is not a directory placeholder.
pub async fn is_valid_item(path: &Path, extensions: &[String]) -> bool {
    if path.file_name().is_some_and(|name| name == PLACEHOLDER) {
        return false;
    }
    if !has_valid_extension(path, extensions) {
        return false;
    }
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["jpg".to_string(), "mp4".to_string()]
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert!(has_valid_extension(Path::new("a/b.JPG"), &extensions()));
        assert!(has_valid_extension(Path::new("clip.mp4"), &extensions()));
    }

    #[test]
    fn unknown_or_missing_extension_rejected() {
        assert!(!has_valid_extension(Path::new("notes.txt"), &extensions()));
        assert!(!has_valid_extension(Path::new("README"), &extensions()));
        assert!(!has_valid_extension(Path::new(".gitkeep"), &extensions()));
    }
}

//! Tests for the filesystem inventory.

use postkeeper_core::{Category, EngineConfig, ItemId, MediaKind};
use postkeeper_error::StorageErrorKind;
use postkeeper_storage::{
    ContentStore, FileSystemInventory, InventoryStore, NarrativeStore, split_units,
};
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
[categories.art]
kind = "media"
dir = "materials/art"
archive_dir = "archive/art"

[categories.clips]
kind = "media"
dir = "materials/clips"
archive_dir = "archive/clips"
media = "video"

[categories.jokes]
kind = "narrative"
file = "materials/jokes.txt"
separator = "====="

[[recipes]]
name = "duo"
auxiliary = { category = "jokes" }
slots = [{ primary = "art" }, { primary = "clips" }]
"#;

fn setup() -> (TempDir, FileSystemInventory, EngineConfig) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = EngineConfig::from_toml_str(CONFIG).expect("Test config is valid");
    let store = FileSystemInventory::from_config(dir.path(), &config);
    (dir, store, config)
}

fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().expect("Path has a parent"))
        .expect("Failed to create parent");
    std::fs::write(path, contents).expect("Failed to write file");
}

fn art() -> Category {
    Category::new("art")
}

fn jokes() -> Category {
    Category::new("jokes")
}

#[tokio::test]
async fn test_only_valid_files_are_items() {
    let (dir, store, _) = setup();
    write_file(dir.path(), "materials/art/a.jpg", b"image");
    write_file(dir.path(), "materials/art/B.PNG", b"image");
    write_file(dir.path(), "materials/art/empty.jpg", b"");
    write_file(dir.path(), "materials/art/.gitkeep", b"keep");
    write_file(dir.path(), "materials/art/notes.txt", b"text");
    std::fs::create_dir_all(dir.path().join("materials/art/nested.jpg"))
        .expect("Failed to create dir");

    let items = store
        .list_valid_items(&art())
        .await
        .expect("Listing should succeed");

    let ids: Vec<&str> = items.iter().map(|i| i.id().as_str()).collect();
    assert_eq!(ids, vec!["B.PNG", "a.jpg"]);
    assert_eq!(store.count(&art()).await.expect("Count should succeed"), 2);
}

#[tokio::test]
async fn test_missing_directory_is_empty() {
    let (_dir, store, _) = setup();
    assert!(store.list_valid_items(&art()).await.expect("Listing").is_empty());
    assert_eq!(store.count_units(&jokes()).await.expect("Counting"), 0);
    assert!(store.peek_random(&jokes(), &[]).await.expect("Peeking").is_none());
}

#[tokio::test]
async fn test_pick_random_respects_exclusions() {
    let (dir, store, _) = setup();
    write_file(dir.path(), "materials/art/a.jpg", b"image");
    write_file(dir.path(), "materials/art/b.jpg", b"image");

    let first = store
        .pick_random(&art(), &[ItemId::new("a.jpg")])
        .await
        .expect("Picking should succeed")
        .expect("One candidate left");
    assert_eq!(first.id().as_str(), "b.jpg");

    let none = store
        .pick_random(&art(), &[ItemId::new("a.jpg"), ItemId::new("b.jpg")])
        .await
        .expect("Picking should succeed");
    assert!(none.is_none());
}

#[tokio::test]
async fn test_media_kind_follows_category() {
    let (dir, store, _) = setup();
    write_file(dir.path(), "materials/clips/c.mp4", b"video");

    let clip = store
        .pick_random(&Category::new("clips"), &[])
        .await
        .expect("Picking should succeed")
        .expect("Clip exists");
    assert_eq!(clip.media(), &MediaKind::Video);
}

#[tokio::test]
async fn test_archive_moves_file() {
    let (dir, store, _) = setup();
    write_file(dir.path(), "materials/art/a.jpg", b"image");
    let item = store
        .pick_random(&art(), &[])
        .await
        .expect("Picking should succeed")
        .expect("Item exists");

    store.archive(&item).await.expect("Archive should succeed");

    assert!(!dir.path().join("materials/art/a.jpg").exists());
    assert!(dir.path().join("archive/art/a.jpg").exists());
    assert!(!store.is_valid(&item).await);
    assert_eq!(store.count(&art()).await.expect("Count"), 0);
}

#[tokio::test]
async fn test_archive_keeps_existing_target() {
    let (dir, store, _) = setup();
    write_file(dir.path(), "materials/art/a.jpg", b"new image");
    write_file(dir.path(), "archive/art/a.jpg", b"old image");
    let item = store
        .pick_random(&art(), &[])
        .await
        .expect("Picking should succeed")
        .expect("Item exists");

    let err = store.archive(&item).await.expect_err("Target is taken");

    assert!(matches!(err.kind, StorageErrorKind::AlreadyExists(_)));
    assert!(dir.path().join("materials/art/a.jpg").exists());
    assert_eq!(
        std::fs::read(dir.path().join("archive/art/a.jpg")).expect("Read archive"),
        b"old image"
    );
}

#[tokio::test]
async fn test_archive_missing_file_is_not_found() {
    let (dir, store, _) = setup();
    write_file(dir.path(), "materials/art/a.jpg", b"image");
    let item = store
        .pick_random(&art(), &[])
        .await
        .expect("Picking should succeed")
        .expect("Item exists");
    std::fs::remove_file(item.path()).expect("Failed to remove");

    let err = store.archive(&item).await.expect_err("File is gone");
    assert!(matches!(err.kind, StorageErrorKind::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_category_is_error() {
    let (_dir, store, _) = setup();
    let err = store
        .list_valid_items(&Category::new("nope"))
        .await
        .expect_err("Category is not configured");
    assert!(matches!(err.kind, StorageErrorKind::UnknownCategory(_)));

    let err = store
        .list_valid_items(&jokes())
        .await
        .expect_err("Narrative category has no items");
    assert!(matches!(err.kind, StorageErrorKind::UnknownCategory(_)));
}

#[tokio::test]
async fn test_narrative_peek_does_not_remove() {
    let (dir, store, _) = setup();
    write_file(
        dir.path(),
        "materials/jokes.txt",
        "one\n=====\ntwo\n=====\nthree\n".as_bytes(),
    );

    let unit = store
        .peek_random(&jokes(), &[])
        .await
        .expect("Peeking should succeed")
        .expect("Units exist");

    assert!(["one", "two", "three"].contains(&unit.text().as_str()));
    assert_eq!(store.count_units(&jokes()).await.expect("Counting"), 3);

    let excluded = [
        postkeeper_storage::NarrativeUnit::new(jokes(), 0, "one"),
        postkeeper_storage::NarrativeUnit::new(jokes(), 1, "two"),
    ];
    let last = store
        .peek_random(&jokes(), &excluded)
        .await
        .expect("Peeking should succeed")
        .expect("One unit left");
    assert_eq!(last.text(), "three");
}

#[tokio::test]
async fn test_narrative_consume_removes_exactly_one() {
    let (dir, store, _) = setup();
    write_file(
        dir.path(),
        "materials/jokes.txt",
        "one\n=====\ntwo\n=====\ntwo\n=====\nthree".as_bytes(),
    );
    let unit = postkeeper_storage::NarrativeUnit::new(jokes(), 2, "two");

    store.consume(&unit).await.expect("Consume should succeed");

    let contents =
        std::fs::read_to_string(dir.path().join("materials/jokes.txt")).expect("Read back");
    assert_eq!(split_units(&contents, "====="), vec!["one", "two", "three"]);

    let missing = postkeeper_storage::NarrativeUnit::new(jokes(), 3, "four");
    let err = store.consume(&missing).await.expect_err("Unit is absent");
    assert!(matches!(err.kind, StorageErrorKind::NotFound(_)));
}

#[tokio::test]
async fn test_duplicate_narrative_units_are_distinct() {
    let (dir, store, _) = setup();
    write_file(
        dir.path(),
        "materials/jokes.txt",
        "same joke\n=====\nsame joke".as_bytes(),
    );
    assert_eq!(store.count_units(&jokes()).await.expect("Counting"), 2);

    let first = store
        .peek_random(&jokes(), &[])
        .await
        .expect("Peeking should succeed")
        .expect("Units exist");
    let second = store
        .peek_random(&jokes(), std::slice::from_ref(&first))
        .await
        .expect("Peeking should succeed")
        .expect("Second occurrence is still available");
    assert_eq!(second.text(), "same joke");
    assert_ne!(first.position(), second.position());

    let both = [first, second];
    assert!(
        store
            .peek_random(&jokes(), &both)
            .await
            .expect("Peeking should succeed")
            .is_none()
    );

    for unit in &both {
        store.consume(unit).await.expect("Consume should succeed");
    }
    assert_eq!(store.count_units(&jokes()).await.expect("Counting"), 0);
}

#[tokio::test]
async fn test_snapshot_counts_every_category() {
    let (dir, store, config) = setup();
    write_file(dir.path(), "materials/art/a.jpg", b"image");
    write_file(dir.path(), "materials/art/b.jpg", b"image");
    write_file(dir.path(), "materials/art/c.txt", b"text");
    write_file(dir.path(), "materials/clips/c.mp4", b"video");
    write_file(dir.path(), "materials/jokes.txt", b"one\n=====\ntwo");

    let snapshot = store.snapshot(&config).await.expect("Snapshot should succeed");

    assert_eq!(snapshot.count(&art()), 2);
    assert_eq!(snapshot.count(&Category::new("clips")), 1);
    assert_eq!(snapshot.count(&jokes()), 2);
    assert_eq!(snapshot.total(), 5);
}

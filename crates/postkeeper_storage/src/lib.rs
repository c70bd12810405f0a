//! File-backed content inventories.
//!
//! Media categories are directories of files; a file is one item. Narrative
//! categories are text files holding units separated by a separator line.
//!
//! The stores offer no atomicity of their own. Callers that mutate them
//! concurrently must serialize access per category.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod item;
mod narrative;
mod store;
mod validity;

pub use filesystem::FileSystemInventory;
pub use item::{MediaItem, NarrativeUnit};
pub use narrative::{join_units, split_units};
pub use store::{ContentStore, InventoryStore, NarrativeStore};
pub use validity::{has_valid_extension, is_valid_item};

//! Content category identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a class of content items, e.g. `ero-real` or `video-meme`.
///
/// The set of valid categories is closed and fixed by the loaded
/// [`EngineConfig`](crate::EngineConfig). Ordering is lexical and is the
/// global order used when acquiring category locks.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct Category(String);

impl Category {
    /// Create a category identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

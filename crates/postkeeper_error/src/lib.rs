//! Error types for the postkeeper engine.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The publication families mirror the phases of a publication transaction:
//! [`ShortageError`] (planning), [`SelectionError`] (selecting),
//! [`SendError`] (sending) and [`ArchiveError`] (post-publish cleanup).
//!
//! # Examples
//!
//! ```
//! use postkeeper_error::{ConfigError, PostkeeperResult};
//!
//! fn load() -> PostkeeperResult<()> {
//!     Err(ConfigError::new("recipe 'pics' references unknown category 'memes'"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod config;
mod error;
mod selection;
mod send;
mod shortage;
mod state;
mod storage;

pub use archive::ArchiveError;
pub use config::ConfigError;
pub use error::{PostkeeperError, PostkeeperErrorKind, PostkeeperResult};
pub use selection::{SelectionError, SelectionErrorKind};
pub use send::{SendError, SendErrorKind};
pub use shortage::{ShortageError, ShortageErrorKind};
pub use state::StateError;
pub use storage::{StorageError, StorageErrorKind};

//! Publication of recipes to an external sink.
//!
//! A publication runs as one transaction:
//!
//! ```text
//! Planning -> Selecting -> Sending -> Committing  -> Done
//!                                 \-> RollingBack -> Done
//! ```
//!
//! Every category the recipe could touch is locked before planning and
//! released at `Done`. Locks are taken in category order, so transactions
//! over overlapping fallback chains cannot deadlock. Items are archived and
//! narrative units removed only after the sink confirmed both the media group
//! and the text.
//!
//! [`Publisher`] ties the pieces together for the operator CLI: it re-reads
//! the configuration before each transaction and honours the persisted
//! autopost switch for scheduled runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod locks;
mod outcome;
mod publisher;
mod sink;
mod sinks;
mod state;
mod transaction;

pub use locks::{CategoryLocks, LockSet};
pub use outcome::{PublicationOutcome, TransactionPhase};
pub use publisher::Publisher;
pub use sink::PublishSink;
pub use sinks::{NoOpSink, TelegramSink, TelegramSinkConfig, TelegramSinkConfigBuilder};
pub use state::{AutopostState, StateStore};
pub use transaction::Transaction;

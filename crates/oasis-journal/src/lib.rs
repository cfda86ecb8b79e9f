//! `oasis-journal` — daily journal entries, persisted in SQLite.
//!
//! Entries are keyed by calendar date (`YYYY-MM-DD`); a user may write any
//! number of entries for the same day.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use error::{JournalError, Result};
pub use store::JournalStore;
pub use types::JournalEntry;

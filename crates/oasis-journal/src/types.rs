use serde::{Deserialize, Serialize};

/// A single journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// UUIDv7 — time-sortable.
    pub id: String,
    pub content: String,
    /// The day this entry is about (YYYY-MM-DD); not the write timestamp.
    pub entry_date: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

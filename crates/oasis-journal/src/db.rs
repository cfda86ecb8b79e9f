use rusqlite::{Connection, Result};

use crate::types::JournalEntry;

/// Initialise the journal schema. Idempotent; run on every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS journal_entries (
            id          TEXT PRIMARY KEY NOT NULL,
            content     TEXT NOT NULL,
            entry_date  TEXT NOT NULL,      -- YYYY-MM-DD
            user_id     TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_journal_user_date
            ON journal_entries (user_id, entry_date);",
    )?;
    Ok(())
}

pub(crate) const ENTRY_SELECT: &str =
    "SELECT id, content, entry_date, user_id, created_at, updated_at FROM journal_entries";

pub(crate) fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<JournalEntry> {
    Ok(JournalEntry {
        id: row.get(0)?,
        content: row.get(1)?,
        entry_date: row.get(2)?,
        user_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

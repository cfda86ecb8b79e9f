use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

use crate::db::{row_to_entry, ENTRY_SELECT};
use crate::error::{JournalError, Result};
use crate::types::JournalEntry;

/// Thread-safe store for journal entries.
pub struct JournalStore {
    db: Mutex<Connection>,
}

impl JournalStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Insert an entry. Multiple entries for the same day are allowed.
    pub fn create(&self, content: &str, entry_date: &str, user_id: &str) -> Result<JournalEntry> {
        let now = Utc::now().to_rfc3339();
        let entry = JournalEntry {
            id: Uuid::now_v7().to_string(),
            content: content.to_string(),
            entry_date: entry_date.to_string(),
            user_id: user_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO journal_entries
                (id, content, entry_date, user_id, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                entry.id,
                entry.content,
                entry.entry_date,
                entry.user_id,
                entry.created_at,
                entry.updated_at,
            ],
        )?;
        info!(entry_id = %entry.id, entry_date, "journal entry created");
        Ok(entry)
    }

    pub fn get(&self, id: &str) -> Result<Option<JournalEntry>> {
        let db = self.db.lock().unwrap();
        let sql = format!("{ENTRY_SELECT} WHERE id = ?1");
        match db.query_row(&sql, params![id], row_to_entry) {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(JournalError::Database(e)),
        }
    }

    /// All entries for a user, most recent day first, newest write first
    /// within a day.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        let db = self.db.lock().unwrap();
        let sql = format!(
            "{ENTRY_SELECT} WHERE user_id = ?1 ORDER BY entry_date DESC, created_at DESC"
        );
        let mut stmt = db.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Entries for one specific day.
    pub fn list_for_date(&self, user_id: &str, entry_date: &str) -> Result<Vec<JournalEntry>> {
        let db = self.db.lock().unwrap();
        let sql = format!(
            "{ENTRY_SELECT} WHERE user_id = ?1 AND entry_date = ?2 ORDER BY created_at DESC"
        );
        let mut stmt = db.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id, entry_date], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn update(&self, id: &str, content: &str, entry_date: &str) -> Result<JournalEntry> {
        let now = Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "UPDATE journal_entries SET content = ?2, entry_date = ?3, updated_at = ?4
             WHERE id = ?1",
            params![id, content, entry_date, now],
        )?;
        if rows == 0 {
            return Err(JournalError::NotFound(id.to_string()));
        }
        let sql = format!("{ENTRY_SELECT} WHERE id = ?1");
        Ok(db.query_row(&sql, params![id], row_to_entry)?)
    }

    /// Delete an entry, ownership-checked.
    pub fn delete(&self, id: &str, user_id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "DELETE FROM journal_entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if rows == 0 {
            return Err(JournalError::NotFound(id.to_string()));
        }
        info!(entry_id = %id, "journal entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> JournalStore {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        JournalStore::new(conn)
    }

    #[test]
    fn multiple_entries_per_day_allowed() {
        let store = store();
        store.create("morning pages", "2024-03-10", "user-1").unwrap();
        store.create("evening recap", "2024-03-10", "user-1").unwrap();

        let entries = store.list_for_date("user-1", "2024-03-10").unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn list_orders_by_date_then_created() {
        let store = store();
        store.create("old", "2024-03-01", "user-1").unwrap();
        store.create("new", "2024-03-10", "user-1").unwrap();
        store.create("other user", "2024-03-20", "user-2").unwrap();

        let entries = store.list_for_user("user-1").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_date, "2024-03-10");
        assert_eq!(entries[1].entry_date, "2024-03-01");
    }

    #[test]
    fn update_moves_entry_to_new_date() {
        let store = store();
        let entry = store.create("draft", "2024-03-10", "user-1").unwrap();
        let updated = store.update(&entry.id, "final", "2024-03-11").unwrap();
        assert_eq!(updated.content, "final");
        assert_eq!(updated.entry_date, "2024-03-11");
    }

    #[test]
    fn delete_checks_ownership() {
        let store = store();
        let entry = store.create("secret", "2024-03-10", "user-1").unwrap();
        assert!(matches!(
            store.delete(&entry.id, "intruder"),
            Err(JournalError::NotFound(_))
        ));
        store.delete(&entry.id, "user-1").unwrap();
        assert!(store.get(&entry.id).unwrap().is_none());
    }
}

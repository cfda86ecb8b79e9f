use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

use crate::db::row_to_category;
use crate::error::{HabitError, Result};
use crate::types::Category;

/// Categories seeded for every new account at signup.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Health", "💪"),
    ("Studies", "📚"),
    ("Work", "💼"),
    ("Personal", "🌟"),
    ("Fitness", "🏃"),
    ("Mindfulness", "🧘"),
];

const CATEGORY_SELECT: &str = "SELECT id, name, emoji, user_id, created_at FROM categories";

/// Thread-safe store for habit categories.
pub struct CategoryStore {
    db: Mutex<Connection>,
}

impl CategoryStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    pub fn create(&self, name: &str, emoji: &str, user_id: &str) -> Result<Category> {
        let db = self.db.lock().unwrap();
        insert(&db, name, emoji, user_id)
    }

    /// Seed the default category set for a freshly-registered user.
    pub fn seed_defaults(&self, user_id: &str) -> Result<Vec<Category>> {
        let db = self.db.lock().unwrap();
        let mut seeded = Vec::with_capacity(DEFAULT_CATEGORIES.len());
        for (name, emoji) in DEFAULT_CATEGORIES {
            seeded.push(insert(&db, name, emoji, user_id)?);
        }
        info!(user_id, count = seeded.len(), "default categories seeded");
        Ok(seeded)
    }

    pub fn get(&self, id: &str) -> Result<Option<Category>> {
        let db = self.db.lock().unwrap();
        let sql = format!("{CATEGORY_SELECT} WHERE id = ?1");
        match db.query_row(&sql, params![id], row_to_category) {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(HabitError::Database(e)),
        }
    }

    /// List categories, optionally filtered by owner, name-ordered.
    pub fn list(&self, user_id: Option<&str>) -> Result<Vec<Category>> {
        let db = self.db.lock().unwrap();
        let mut out = Vec::new();
        match user_id {
            Some(uid) => {
                let sql = format!("{CATEGORY_SELECT} WHERE user_id = ?1 ORDER BY name ASC");
                let mut stmt = db.prepare(&sql)?;
                for row in stmt.query_map(params![uid], row_to_category)? {
                    out.push(row?);
                }
            }
            None => {
                let sql = format!("{CATEGORY_SELECT} ORDER BY name ASC");
                let mut stmt = db.prepare(&sql)?;
                for row in stmt.query_map([], row_to_category)? {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    pub fn update(&self, id: &str, name: &str, emoji: &str) -> Result<Category> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "UPDATE categories SET name = ?2, emoji = ?3 WHERE id = ?1",
            params![id, name, emoji],
        )?;
        if rows == 0 {
            return Err(HabitError::CategoryNotFound(id.to_string()));
        }
        let sql = format!("{CATEGORY_SELECT} WHERE id = ?1");
        Ok(db.query_row(&sql, params![id], row_to_category)?)
    }

    /// Delete a category. Refused while habits still reference it, and the
    /// category must belong to `user_id`.
    pub fn delete(&self, id: &str, user_id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();

        let owned: bool = match db.query_row(
            "SELECT 1 FROM categories WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            |_| Ok(true),
        ) {
            Ok(v) => v,
            Err(rusqlite::Error::QueryReturnedNoRows) => false,
            Err(e) => return Err(HabitError::Database(e)),
        };
        if !owned {
            return Err(HabitError::CategoryNotFound(id.to_string()));
        }

        let in_use: i64 = db.query_row(
            "SELECT COUNT(*) FROM habits WHERE category_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if in_use > 0 {
            return Err(HabitError::CategoryInUse(id.to_string()));
        }

        db.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(())
    }
}

fn insert(conn: &Connection, name: &str, emoji: &str, user_id: &str) -> Result<Category> {
    let category = Category {
        id: Uuid::now_v7().to_string(),
        name: name.to_string(),
        emoji: emoji.to_string(),
        user_id: user_id.to_string(),
        created_at: Utc::now().to_rfc3339(),
    };
    conn.execute(
        "INSERT INTO categories (id, name, emoji, user_id, created_at)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            category.id,
            category.name,
            category.emoji,
            category.user_id,
            category.created_at,
        ],
    )?;
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CategoryStore {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        CategoryStore::new(conn)
    }

    #[test]
    fn seed_defaults_creates_six() {
        let store = store();
        let seeded = store.seed_defaults("user-1").unwrap();
        assert_eq!(seeded.len(), 6);
        assert!(seeded.iter().any(|c| c.name == "Health" && c.emoji == "💪"));

        let listed = store.list(Some("user-1")).unwrap();
        assert_eq!(listed.len(), 6);
        // Name-ordered.
        let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn list_filters_by_owner() {
        let store = store();
        store.create("Reading", "📖", "user-1").unwrap();
        store.create("Cooking", "🍳", "user-2").unwrap();

        assert_eq!(store.list(Some("user-1")).unwrap().len(), 1);
        assert_eq!(store.list(None).unwrap().len(), 2);
    }

    #[test]
    fn update_and_get() {
        let store = store();
        let cat = store.create("Reading", "📖", "user-1").unwrap();
        let updated = store.update(&cat.id, "Books", "📕").unwrap();
        assert_eq!(updated.name, "Books");
        assert_eq!(store.get(&cat.id).unwrap().unwrap().emoji, "📕");
    }

    #[test]
    fn delete_requires_ownership() {
        let store = store();
        let cat = store.create("Reading", "📖", "user-1").unwrap();
        assert!(matches!(
            store.delete(&cat.id, "someone-else"),
            Err(HabitError::CategoryNotFound(_))
        ));
        store.delete(&cat.id, "user-1").unwrap();
        assert!(store.get(&cat.id).unwrap().is_none());
    }

    #[test]
    fn delete_refused_while_habits_reference_it() {
        // Habits and categories share one schema, so exercise both tables
        // through one connection.
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        let store = CategoryStore::new(conn);
        let cat = store.create("Reading", "📖", "user-1").unwrap();

        {
            let db = store.db.lock().unwrap();
            db.execute(
                "INSERT INTO habits
                    (id, title, category_id, repeats, completed, user_id, created_at, updated_at)
                 VALUES ('h1', 'Read', ?1, 0, 0, 'user-1', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
                params![cat.id],
            )
            .unwrap();
        }

        assert!(matches!(
            store.delete(&cat.id, "user-1"),
            Err(HabitError::CategoryInUse(_))
        ));
    }
}

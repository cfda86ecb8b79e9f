use std::str::FromStr;

use oasis_schedule::RepetitionKind;
use rusqlite::{Connection, Result};

use crate::types::{Category, Habit};

/// Initialise the habits subsystem schema. Idempotent; run on every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id          TEXT PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            emoji       TEXT NOT NULL,
            user_id     TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_categories_user ON categories (user_id);

        CREATE TABLE IF NOT EXISTS habits (
            id          TEXT PRIMARY KEY NOT NULL,
            title       TEXT NOT NULL,
            description TEXT,
            category_id TEXT NOT NULL REFERENCES categories(id),
            repeats     INTEGER NOT NULL DEFAULT 0,
            repetition  TEXT,               -- daily | weekly | monthly, NULL unless repeats
            completed   INTEGER NOT NULL DEFAULT 0,
            next_due    TEXT,               -- YYYY-MM-DD or NULL
            user_id     TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_habits_user ON habits (user_id);
        CREATE INDEX IF NOT EXISTS idx_habits_category ON habits (category_id);",
    )?;
    Ok(())
}

/// Shared SELECT for habit reads — every habit leaves the store with its
/// category name/emoji joined in.
pub(crate) const HABIT_SELECT_SQL: &str = "SELECT h.id, h.title, h.description, h.category_id, h.repeats, h.repetition,
        h.completed, h.next_due, h.user_id, h.created_at, h.updated_at,
        c.name, c.emoji
 FROM habits h
 LEFT JOIN categories c ON h.category_id = c.id";

/// Map a SELECT row (column order from HABIT_SELECT_SQL) to a Habit.
pub(crate) fn row_to_habit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
    let repetition = row
        .get::<_, Option<String>>(5)?
        .and_then(|s| RepetitionKind::from_str(&s).ok());
    Ok(Habit {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category_id: row.get(3)?,
        repeats: row.get::<_, i32>(4)? != 0,
        repetition,
        completed: row.get::<_, i32>(6)? != 0,
        next_due: row.get(7)?,
        user_id: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        category_name: row.get(11)?,
        category_emoji: row.get(12)?,
    })
}

pub(crate) fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        emoji: row.get(2)?,
        user_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

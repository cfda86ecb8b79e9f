use rusqlite::{Connection, Result};

use crate::types::User;

/// Map a SELECT row (column order from USER_SELECT_COLUMNS) to a User.
/// Centralised here so every query in this crate stays consistent.
pub(crate) fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        birth_date: row.get(4)?,
        age: row.get(5)?,
        gender: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub(crate) const USER_SELECT_COLUMNS: &str =
    "id, name, email, password_hash, birth_date, age, gender, created_at, updated_at";

/// Initialise the users schema. Safe to call on every startup —
/// CREATE IF NOT EXISTS makes it idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY NOT NULL,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            birth_date    TEXT,               -- YYYY-MM-DD or NULL
            age           INTEGER,
            gender        TEXT,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_users_email ON users (email);",
    )?;
    Ok(())
}

use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

use crate::db::{row_to_user, USER_SELECT_COLUMNS};
use crate::error::{Result, UserError};
use crate::password::hash_password;
use crate::types::{NewUser, ProfileUpdate, User};

/// Thread-safe store for user accounts.
///
/// Wraps a single SQLite connection in a `Mutex`. For high-concurrency
/// deployments consider a connection pool, but a Mutex is sufficient for a
/// single-node deployment.
pub struct UserStore {
    db: Mutex<Connection>,
}

impl UserStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Register a new user. The clear-text password is argon2id-hashed here;
    /// it never reaches the database.
    pub fn create(&self, new: NewUser) -> Result<User> {
        let db = self.db.lock().unwrap();

        let taken: bool = db
            .query_row(
                "SELECT 1 FROM users WHERE email = ?1",
                params![new.email],
                |_| Ok(true),
            )
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(false),
                other => Err(other),
            })?;
        if taken {
            return Err(UserError::EmailTaken(new.email));
        }

        let now = Utc::now().to_rfc3339();
        let user = User {
            id: Uuid::now_v7().to_string(),
            name: new.name,
            email: new.email,
            password_hash: hash_password(&new.password)?,
            birth_date: new.birth_date,
            age: new.age,
            gender: new.gender,
            created_at: now.clone(),
            updated_at: now,
        };

        db.execute(
            "INSERT INTO users
                (id, name, email, password_hash, birth_date, age, gender, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                user.id,
                user.name,
                user.email,
                user.password_hash,
                user.birth_date,
                user.age,
                user.gender,
                user.created_at,
                user.updated_at,
            ],
        )?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Load a user by primary key. Returns None instead of an error when
    /// absent so callers decide whether missing is exceptional.
    pub fn get(&self, user_id: &str) -> Result<Option<User>> {
        let db = self.db.lock().unwrap();
        get_with(&db, user_id)
    }

    /// Credential check for login. Unknown email and wrong password both
    /// collapse to `InvalidCredentials` so callers cannot tell (and so leak)
    /// which addresses are registered.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .find_by_email(email)?
            .ok_or(UserError::InvalidCredentials)?;
        if !crate::password::verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Login lookup.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = self.db.lock().unwrap();
        let sql = format!("SELECT {USER_SELECT_COLUMNS} FROM users WHERE email = ?1");
        match db.query_row(&sql, params![email], row_to_user) {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(UserError::Database(e)),
        }
    }

    /// Apply a partial profile update. A changed email is re-checked for
    /// uniqueness; a new password is re-hashed. Always bumps updated_at.
    pub fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        let db = self.db.lock().unwrap();
        let mut user = get_with(&db, user_id)?.ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        if let Some(ref email) = update.email {
            if email != &user.email {
                let clash: Option<String> = match db.query_row(
                    "SELECT id FROM users WHERE email = ?1 AND id != ?2",
                    params![email, user_id],
                    |row| row.get(0),
                ) {
                    Ok(id) => Some(id),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(UserError::Database(e)),
                };
                if clash.is_some() {
                    return Err(UserError::EmailTaken(email.clone()));
                }
                user.email = email.clone();
            }
        }
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(password) = update.password {
            user.password_hash = hash_password(&password)?;
        }
        if let Some(birth_date) = update.birth_date {
            user.birth_date = birth_date;
        }
        if let Some(age) = update.age {
            user.age = age;
        }
        if let Some(gender) = update.gender {
            user.gender = gender;
        }
        user.updated_at = Utc::now().to_rfc3339();

        db.execute(
            "UPDATE users SET
                name=?2, email=?3, password_hash=?4, birth_date=?5, age=?6,
                gender=?7, updated_at=?8
             WHERE id=?1",
            params![
                user.id,
                user.name,
                user.email,
                user.password_hash,
                user.birth_date,
                user.age,
                user.gender,
                user.updated_at,
            ],
        )?;

        Ok(user)
    }

    /// Total registered users (insights endpoint).
    pub fn count(&self) -> Result<u64> {
        let db = self.db.lock().unwrap();
        let n: i64 = db.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(n as u64)
    }
}

fn get_with(conn: &Connection, user_id: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_SELECT_COLUMNS} FROM users WHERE id = ?1");
    match conn.query_row(&sql, params![user_id], row_to_user) {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(UserError::Database(e)),
    }
}

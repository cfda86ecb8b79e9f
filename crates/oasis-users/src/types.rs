use serde::{Deserialize, Serialize};

/// Full user record as stored in SQLite. Never serialized to clients
/// directly — handlers convert to [`PublicUser`] first so the password hash
/// stays server-side.
#[derive(Debug, Clone)]
pub struct User {
    /// UUIDv7 — time-sortable, useful for log correlation.
    pub id: String,
    pub name: String,
    pub email: String,
    /// PHC-formatted argon2id hash.
    pub password_hash: String,
    /// ISO-8601 date string (YYYY-MM-DD).
    pub birth_date: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// Audit timestamps (RFC 3339).
    pub created_at: String,
    pub updated_at: String,
}

/// The client-visible projection of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub birth_date: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            birth_date: u.birth_date.clone(),
            age: u.age,
            gender: u.gender.clone(),
        }
    }
}

/// Fields required to register a user. The password arrives in clear text
/// and is hashed inside the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub birth_date: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

/// Partial profile update — `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub birth_date: Option<Option<String>>,
    pub age: Option<Option<u32>>,
    pub gender: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.birth_date.is_none()
            && self.age.is_none()
            && self.gender.is_none()
    }
}

use oasis_schedule::RepetitionKind;
use serde::{Deserialize, Serialize};

/// A tracked habit. `category_name`/`category_emoji` come from the LEFT JOIN
/// against categories on every read, so list views need no second query.
///
/// Invariants (enforced by the store, not the schema): `repetition` is set
/// iff `repeats` is true; `next_due` is non-null only when `repeats` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// UUIDv7 — time-sortable.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category_id: String,
    pub repeats: bool,
    pub repetition: Option<RepetitionKind>,
    pub completed: bool,
    /// Calendar date (YYYY-MM-DD), no time component.
    pub next_due: Option<String>,
    pub user_id: String,
    /// Immutable once set — the alignment anchor for due-date computation.
    pub created_at: String,
    pub updated_at: String,

    pub category_name: Option<String>,
    pub category_emoji: Option<String>,
}

/// Fields required to create a habit.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub category_id: String,
    pub repeats: bool,
    pub repetition: Option<RepetitionKind>,
    pub user_id: String,
}

/// Full-row habit update (PUT semantics — every mutable field is replaced).
#[derive(Debug, Clone)]
pub struct HabitUpdate {
    pub title: String,
    pub description: Option<String>,
    pub category_id: String,
    pub repeats: bool,
    pub repetition: Option<RepetitionKind>,
}

/// A habit category owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub user_id: String,
    pub created_at: String,
}

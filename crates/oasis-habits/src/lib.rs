//! `oasis-habits` — habits and categories, persisted in SQLite.
//!
//! The due-date lifecycle lives here: [`HabitStore::create`] assigns the
//! first `next_due` for a repeating habit, and [`HabitStore::toggle`]
//! recomputes it on every incomplete→complete transition, always anchored on
//! the habit's creation date so weekday / day-of-month alignment never
//! drifts. The date arithmetic itself is `oasis_schedule::compute_next`.

pub mod category;
pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use category::CategoryStore;
pub use error::{HabitError, Result};
pub use store::HabitStore;
pub use types::{Category, Habit, HabitUpdate, NewHabit};

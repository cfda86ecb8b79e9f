use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use oasis_schedule::{compute_next, RepetitionKind};
use rusqlite::{params, Connection};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{row_to_habit, HABIT_SELECT_SQL};
use crate::error::{HabitError, Result};
use crate::types::{Habit, HabitUpdate, NewHabit};

/// Thread-safe store for habits.
///
/// All date arithmetic takes `today` as an argument rather than reading the
/// clock, so callers (and tests) control the reference date. Read-compute-
/// write sequences hold the store mutex for their whole duration, which
/// serialises concurrent toggles of the same habit within this process;
/// across processes the update is last-write-wins.
pub struct HabitStore {
    db: Mutex<Connection>,
}

impl HabitStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Create a habit. Two-phase insert for repeating habits: the row goes
    /// in with a no-anchor estimate, then `next_due` is recomputed against
    /// the row's own `created_at` once that timestamp is persisted — the
    /// creation date is the stable alignment anchor from then on.
    pub fn create(&self, new: NewHabit, today: NaiveDate) -> Result<Habit> {
        // repetition iff repeats: a repeats flag without a kind (or the
        // reverse) is normalised away at this boundary.
        let repetition = if new.repeats { new.repetition } else { None };
        let repeats = repetition.is_some();

        let id = Uuid::now_v7().to_string();
        let now = Utc::now().to_rfc3339();
        let estimate = repetition.map(|kind| compute_next(kind, today, None).to_string());

        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO habits
                (id, title, description, category_id, repeats, repetition,
                 completed, next_due, user_id, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,0,?7,?8,?9,?9)",
            params![
                id,
                new.title,
                new.description,
                new.category_id,
                repeats as i32,
                repetition.map(|k| k.to_string()),
                estimate,
                new.user_id,
                now,
            ],
        )?;

        // Phase two: read the persisted timestamp back and align on it.
        if let Some(kind) = repetition {
            let created_at: String = db.query_row(
                "SELECT created_at FROM habits WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            if let Some(anchor) = date_of(&created_at) {
                let due = compute_next(kind, today, Some(anchor)).to_string();
                db.execute(
                    "UPDATE habits SET next_due = ?2 WHERE id = ?1",
                    params![id, due],
                )?;
            }
        }

        info!(habit_id = %id, repeats, "habit created");
        get_with(&db, &id)?.ok_or_else(|| HabitError::NotFound(id))
    }

    pub fn get(&self, id: &str) -> Result<Option<Habit>> {
        let db = self.db.lock().unwrap();
        get_with(&db, id)
    }

    /// List a user's habits, newest first.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Habit>> {
        let db = self.db.lock().unwrap();
        let sql = format!("{HABIT_SELECT_SQL} WHERE h.user_id = ?1 ORDER BY h.created_at DESC");
        let mut stmt = db.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Replace a habit's mutable fields. `next_due` is recomputed only on a
    /// false→true transition of `repeats` (anchored on the stored creation
    /// date) and cleared on true→false; otherwise the scheduled date stands.
    pub fn update(&self, id: &str, update: HabitUpdate, today: NaiveDate) -> Result<Habit> {
        let repetition = if update.repeats { update.repetition } else { None };
        let repeats = repetition.is_some();

        let db = self.db.lock().unwrap();
        let existing = get_with(&db, id)?.ok_or_else(|| HabitError::NotFound(id.to_string()))?;

        let next_due = if repeats {
            if !existing.repeats {
                let anchor = date_of(&existing.created_at);
                repetition.map(|kind| compute_next(kind, today, anchor).to_string())
            } else {
                existing.next_due
            }
        } else {
            None
        };

        let now = Utc::now().to_rfc3339();
        db.execute(
            "UPDATE habits
             SET title=?2, description=?3, category_id=?4, repeats=?5,
                 repetition=?6, next_due=?7, updated_at=?8
             WHERE id=?1",
            params![
                id,
                update.title,
                update.description,
                update.category_id,
                repeats as i32,
                repetition.map(|k| k.to_string()),
                next_due,
                now,
            ],
        )?;

        get_with(&db, id)?.ok_or_else(|| HabitError::NotFound(id.to_string()))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let rows = db.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(HabitError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Flip the completion flag. Marking a repeating habit complete
    /// recomputes `next_due`, anchored on the stored creation date (not the
    /// previous due date, so alignment never drifts). Unmarking leaves the
    /// scheduled date untouched.
    pub fn toggle(&self, id: &str, today: NaiveDate) -> Result<Habit> {
        let db = self.db.lock().unwrap();
        let habit = get_with(&db, id)?.ok_or_else(|| HabitError::NotFound(id.to_string()))?;

        let completed = !habit.completed;
        let mut next_due = habit.next_due.clone();
        if completed && habit.repeats {
            if let Some(kind) = habit.repetition {
                let anchor = date_of(&habit.created_at);
                next_due = Some(compute_next(kind, today, anchor).to_string());
                debug!(habit_id = %id, kind = %kind, due = ?next_due, "next occurrence scheduled");
            }
        }

        let now = Utc::now().to_rfc3339();
        db.execute(
            "UPDATE habits SET completed=?2, next_due=?3, updated_at=?4 WHERE id=?1",
            params![id, completed as i32, next_due, now],
        )?;

        get_with(&db, id)?.ok_or_else(|| HabitError::NotFound(id.to_string()))
    }

    /// Total habit count (insights endpoint).
    pub fn count(&self) -> Result<u64> {
        let db = self.db.lock().unwrap();
        let n: i64 = db.query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))?;
        Ok(n as u64)
    }
}

fn get_with(conn: &Connection, id: &str) -> Result<Option<Habit>> {
    let sql = format!("{HABIT_SELECT_SQL} WHERE h.id = ?1");
    match conn.query_row(&sql, params![id], row_to_habit) {
        Ok(h) => Ok(Some(h)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(HabitError::Database(e)),
    }
}

/// Calendar date of an RFC 3339 timestamp, truncated to midnight.
fn date_of(rfc3339: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(rfc3339)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HabitStore {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        conn.execute(
            "INSERT INTO categories (id, name, emoji, user_id, created_at)
             VALUES ('cat-1', 'Reading', '📚', 'user-1', ?1)",
            params![Utc::now().to_rfc3339()],
        )
        .unwrap();
        HabitStore::new(conn)
    }

    fn new_habit(repeats: bool, repetition: Option<RepetitionKind>) -> NewHabit {
        NewHabit {
            title: "Read 20 pages".into(),
            description: None,
            category_id: "cat-1".into(),
            repeats,
            repetition,
            user_id: "user-1".into(),
        }
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn create_non_repeating_has_no_due_date() {
        let store = store();
        let habit = store.create(new_habit(false, None), d("2024-03-10")).unwrap();
        assert!(!habit.repeats);
        assert!(habit.repetition.is_none());
        assert!(habit.next_due.is_none());
        assert!(!habit.completed);
    }

    #[test]
    fn create_daily_is_due_tomorrow() {
        let store = store();
        let habit = store
            .create(new_habit(true, Some(RepetitionKind::Daily)), d("2024-03-10"))
            .unwrap();
        assert_eq!(habit.next_due.as_deref(), Some("2024-03-11"));
    }

    #[test]
    fn create_weekly_anchors_on_creation_date() {
        // created_at is "now", so its weekday equals today's and the first
        // due date is a full week out.
        let store = store();
        let today = Utc::now().date_naive();
        let habit = store
            .create(new_habit(true, Some(RepetitionKind::Weekly)), today)
            .unwrap();
        let expected = (today + chrono::Duration::days(7)).to_string();
        assert_eq!(habit.next_due.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn repeats_without_kind_is_normalised() {
        let store = store();
        let habit = store.create(new_habit(true, None), d("2024-03-10")).unwrap();
        assert!(!habit.repeats);
        assert!(habit.next_due.is_none());
    }

    #[test]
    fn toggle_complete_reschedules_daily() {
        let store = store();
        let habit = store
            .create(new_habit(true, Some(RepetitionKind::Daily)), d("2024-03-10"))
            .unwrap();

        let toggled = store.toggle(&habit.id, d("2024-03-15")).unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.next_due.as_deref(), Some("2024-03-16"));
    }

    #[test]
    fn toggle_incomplete_keeps_schedule() {
        let store = store();
        let habit = store
            .create(new_habit(true, Some(RepetitionKind::Daily)), d("2024-03-10"))
            .unwrap();
        let completed = store.toggle(&habit.id, d("2024-03-15")).unwrap();
        let due_before = completed.next_due.clone();

        // Unmarking must not move or clear the scheduled date.
        let unmarked = store.toggle(&habit.id, d("2024-03-20")).unwrap();
        assert!(!unmarked.completed);
        assert_eq!(unmarked.next_due, due_before);
    }

    #[test]
    fn toggle_non_repeating_never_schedules() {
        let store = store();
        let habit = store.create(new_habit(false, None), d("2024-03-10")).unwrap();
        let toggled = store.toggle(&habit.id, d("2024-03-10")).unwrap();
        assert!(toggled.completed);
        assert!(toggled.next_due.is_none());
    }

    #[test]
    fn update_enables_repetition() {
        let store = store();
        let habit = store.create(new_habit(false, None), d("2024-03-10")).unwrap();

        let updated = store
            .update(
                &habit.id,
                HabitUpdate {
                    title: habit.title.clone(),
                    description: None,
                    category_id: habit.category_id.clone(),
                    repeats: true,
                    repetition: Some(RepetitionKind::Daily),
                },
                d("2024-03-12"),
            )
            .unwrap();
        assert!(updated.repeats);
        assert_eq!(updated.next_due.as_deref(), Some("2024-03-13"));
    }

    #[test]
    fn update_disables_repetition_clears_due_date() {
        let store = store();
        let habit = store
            .create(new_habit(true, Some(RepetitionKind::Weekly)), d("2024-03-10"))
            .unwrap();

        let updated = store
            .update(
                &habit.id,
                HabitUpdate {
                    title: habit.title.clone(),
                    description: Some("paused".into()),
                    category_id: habit.category_id.clone(),
                    repeats: false,
                    repetition: None,
                },
                d("2024-03-12"),
            )
            .unwrap();
        assert!(!updated.repeats);
        assert!(updated.repetition.is_none());
        assert!(updated.next_due.is_none());
    }

    #[test]
    fn update_keeps_schedule_when_still_repeating() {
        let store = store();
        let habit = store
            .create(new_habit(true, Some(RepetitionKind::Daily)), d("2024-03-10"))
            .unwrap();
        let due_before = habit.next_due.clone();

        let updated = store
            .update(
                &habit.id,
                HabitUpdate {
                    title: "Read 30 pages".into(),
                    description: None,
                    category_id: habit.category_id.clone(),
                    repeats: true,
                    repetition: Some(RepetitionKind::Daily),
                },
                d("2024-03-14"),
            )
            .unwrap();
        assert_eq!(updated.title, "Read 30 pages");
        assert_eq!(updated.next_due, due_before);
    }

    #[test]
    fn list_is_newest_first_and_scoped_to_user() {
        let store = store();
        store.create(new_habit(false, None), d("2024-03-10")).unwrap();
        store.create(new_habit(false, None), d("2024-03-10")).unwrap();
        store
            .create(
                NewHabit {
                    user_id: "user-2".into(),
                    ..new_habit(false, None)
                },
                d("2024-03-10"),
            )
            .unwrap();

        let habits = store.list_for_user("user-1").unwrap();
        assert_eq!(habits.len(), 2);
        assert!(habits[0].created_at >= habits[1].created_at);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = store();
        assert!(matches!(store.delete("nope"), Err(HabitError::NotFound(_))));
    }
}

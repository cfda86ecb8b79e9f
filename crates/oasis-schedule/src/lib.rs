//! `oasis-schedule` — next-occurrence calculation for recurring habits.
//!
//! # Overview
//!
//! A habit with `repeats = true` carries a [`RepetitionKind`] and is assigned
//! a next due date whenever it is created or marked complete. The calculation
//! is a pure function of the repetition kind, the current calendar date, and
//! the habit's creation date (the alignment anchor) — see [`compute_next`].
//!
//! # Repetition kinds
//!
//! | Kind      | Behaviour                                                   |
//! |-----------|-------------------------------------------------------------|
//! | `Daily`   | Due the next calendar day, always                           |
//! | `Weekly`  | Due on the next weekday matching the creation date          |
//! | `Monthly` | Due on the creation day-of-month, clamped to month length   |

pub mod next;
pub mod types;

pub use next::compute_next;
pub use types::RepetitionKind;

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::types::RepetitionKind;

/// Compute the next due date for a repeating habit.
///
/// `today` must already be truncated to a calendar date (no time-of-day
/// component) — callers pass a fixed date, never a live clock, so a single
/// invocation is deterministic. `anchor` is the habit's creation date; it
/// keeps weekday / day-of-month alignment stable across recomputations.
/// When `anchor` is `None` (only before the creation timestamp is known)
/// the result is a fixed offset from `today` with no alignment.
///
/// Never fails: an impossible day-of-month (e.g. the 31st in April) clamps
/// to the last day of the target month instead of erroring.
pub fn compute_next(kind: RepetitionKind, today: NaiveDate, anchor: Option<NaiveDate>) -> NaiveDate {
    let Some(anchor) = anchor else {
        return match kind {
            RepetitionKind::Daily => today + Duration::days(1),
            RepetitionKind::Weekly => today + Duration::days(7),
            // chrono clamps the day when the target month is shorter.
            RepetitionKind::Monthly => today + Months::new(1),
        };
    };

    match kind {
        // Daily habits are always due the next calendar day; the anchor
        // carries no alignment information for them.
        RepetitionKind::Daily => today + Duration::days(1),

        RepetitionKind::Weekly => {
            let target = anchor.weekday().num_days_from_monday() as i64;
            let current = today.weekday().num_days_from_monday() as i64;
            let mut delta = (target - current).rem_euclid(7);
            if delta == 0 {
                // Today already falls on the target weekday — the habit is
                // never due "today", so push a full week out.
                delta = 7;
            }
            today + Duration::days(delta)
        }

        RepetitionKind::Monthly => {
            let target_dom = anchor.day();

            // The target day already passed (or is) today's — roll over to
            // the following month.
            let (year, month) = if today.day() >= target_dom {
                if today.month() == 12 {
                    (today.year() + 1, 1)
                } else {
                    (today.year(), today.month() + 1)
                }
            } else {
                (today.year(), today.month())
            };

            // Re-verify the day after construction: some date layers roll an
            // invalid day over into the next month instead of rejecting it.
            match NaiveDate::from_ymd_opt(year, month, target_dom) {
                Some(d) if d.day() == target_dom => d,
                _ => last_day_of_month(year, month),
            }
        }
    }
}

/// Last valid calendar day of `(year, month)`.
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is always a valid date")
        - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(s: &str) -> NaiveDate {
        s.parse().expect("test date literal")
    }

    #[test]
    fn daily_is_always_tomorrow() {
        assert_eq!(
            compute_next(RepetitionKind::Daily, d("2024-03-10"), Some(d("2024-01-01"))),
            d("2024-03-11")
        );
        // Anchor carries no information for daily habits.
        let today = d("2024-02-28");
        for anchor in [None, Some(d("2020-06-15")), Some(today)] {
            assert_eq!(
                compute_next(RepetitionKind::Daily, today, anchor),
                d("2024-02-29")
            );
        }
    }

    #[test]
    fn weekly_aligns_to_anchor_weekday() {
        // 2024-03-10 is a Sunday, 2024-01-03 a Wednesday → next Wednesday.
        assert_eq!(
            compute_next(RepetitionKind::Weekly, d("2024-03-10"), Some(d("2024-01-03"))),
            d("2024-03-13")
        );
    }

    #[test]
    fn weekly_same_weekday_pushes_full_week() {
        // Today is already a Wednesday — never "today", so a full week out.
        assert_eq!(
            compute_next(RepetitionKind::Weekly, d("2024-03-13"), Some(d("2024-01-03"))),
            d("2024-03-20")
        );
    }

    #[test]
    fn weekly_lands_in_half_open_week_window() {
        // For any today/anchor pair the result falls on the anchor's weekday
        // and lies strictly in (today, today + 7].
        let anchors = [d("2024-01-01"), d("2024-01-03"), d("2024-01-06"), d("2023-12-31")];
        let mut today = d("2024-02-01");
        for _ in 0..60 {
            for anchor in anchors {
                let next = compute_next(RepetitionKind::Weekly, today, Some(anchor));
                assert_eq!(next.weekday(), anchor.weekday());
                let gap = (next - today).num_days();
                assert!(gap >= 1 && gap <= 7, "gap {gap} out of window");
            }
            today += Duration::days(1);
        }
    }

    #[test]
    fn monthly_clamps_to_leap_february() {
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-01-31"), Some(d("2024-01-31"))),
            d("2024-02-29")
        );
    }

    #[test]
    fn monthly_non_leap_february_clamps_to_28() {
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2023-01-31"), Some(d("2023-01-31"))),
            d("2023-02-28")
        );
    }

    #[test]
    fn monthly_short_current_month_may_return_today() {
        // Degenerate case: the target day (31) cannot exist in the current
        // month either. day(today)=29 < 31, so the rollover guard keeps the
        // target month at February, and the clamp lands on today itself.
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-02-29"), Some(d("2024-01-31"))),
            d("2024-02-29")
        );
    }

    #[test]
    fn monthly_clamps_to_thirty_day_month() {
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-03-31"), Some(d("2024-01-31"))),
            d("2024-04-30")
        );
    }

    #[test]
    fn monthly_target_day_still_ahead_stays_in_month() {
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-03-10"), Some(d("2024-01-15"))),
            d("2024-03-15")
        );
    }

    #[test]
    fn monthly_target_day_reached_rolls_over() {
        // day(today) == target counts as passed.
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-03-15"), Some(d("2024-01-15"))),
            d("2024-04-15")
        );
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-03-20"), Some(d("2024-01-15"))),
            d("2024-04-15")
        );
    }

    #[test]
    fn monthly_december_rolls_into_january() {
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-12-31"), Some(d("2024-01-31"))),
            d("2025-01-31")
        );
    }

    #[test]
    fn monthly_day_is_min_of_target_and_month_length() {
        let anchor = d("2024-01-31");
        let mut today = d("2024-01-01");
        for _ in 0..400 {
            let next = compute_next(RepetitionKind::Monthly, today, Some(anchor));
            let month_len = last_day_of_month(next.year(), next.month()).day();
            assert_eq!(next.day(), anchor.day().min(month_len));
            today += Duration::days(1);
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let today = d("2024-05-17");
        let anchor = Some(d("2024-02-29"));
        for kind in [RepetitionKind::Daily, RepetitionKind::Weekly, RepetitionKind::Monthly] {
            assert_eq!(
                compute_next(kind, today, anchor),
                compute_next(kind, today, anchor)
            );
        }
    }

    #[test]
    fn no_anchor_uses_fixed_offsets() {
        assert_eq!(
            compute_next(RepetitionKind::Daily, d("2024-03-10"), None),
            d("2024-03-11")
        );
        assert_eq!(
            compute_next(RepetitionKind::Weekly, d("2024-03-10"), None),
            d("2024-03-17")
        );
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-03-10"), None),
            d("2024-04-10")
        );
        // Month addition clamps when the next month is shorter.
        assert_eq!(
            compute_next(RepetitionKind::Monthly, d("2024-01-31"), None),
            d("2024-02-29")
        );
    }

    #[test]
    fn last_day_helper_handles_year_boundary() {
        assert_eq!(last_day_of_month(2024, 12), d("2024-12-31"));
        assert_eq!(last_day_of_month(2024, 2), d("2024-02-29"));
        assert_eq!(last_day_of_month(2023, 2), d("2023-02-28"));
    }

    #[test]
    fn weekday_numbering_matches_chrono() {
        // Sanity pin for the dates used above.
        assert_eq!(d("2024-03-10").weekday(), Weekday::Sun);
        assert_eq!(d("2024-01-03").weekday(), Weekday::Wed);
    }
}

//! # Due Dates and Overdue Fines
//!
//! Pure arithmetic behind the issue and return operations.
//!
//! ## Fine Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  due instant = 00:00 UTC of the due date                                │
//! │                                                                         │
//! │  returned ≤ due instant      → 0 days                                   │
//! │  returned > due instant      → max(1, ceil(elapsed / 24h)) days         │
//! │                                                                         │
//! │  fine = overdue days × fine per day                                     │
//! │                                                                         │
//! │  due 2024-03-02, returned 2024-03-03 01:00 (25h late) → 2 days          │
//! │  due 2024-03-02, returned 2024-03-02 00:00:01         → 1 day           │
//! │  no due date                                          → 0 days          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::money::Money;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Computes the due date for a loan issued at `issued_at`.
///
/// `due_days ≤ 0` means the loan has no deadline. Returns `None` in that case
/// and when the date would fall outside chrono's calendar.
pub fn due_date_for(issued_at: DateTime<Utc>, due_days: i64) -> Option<NaiveDate> {
    if due_days <= 0 {
        return None;
    }
    let days = u64::try_from(due_days).ok()?;
    issued_at.date_naive().checked_add_days(Days::new(days))
}

/// The instant a due date starts counting as overdue.
pub fn due_instant(due_date: NaiveDate) -> DateTime<Utc> {
    due_date.and_time(NaiveTime::default()).and_utc()
}

/// Number of chargeable overdue days at `returned_at`.
///
/// Partial days round up, and any time past the due instant is at least one
/// day.
pub fn overdue_days(due_date: Option<NaiveDate>, returned_at: DateTime<Utc>) -> i64 {
    let Some(due_date) = due_date else {
        return 0;
    };

    let due = due_instant(due_date);
    if returned_at <= due {
        return 0;
    }

    let late_seconds = (returned_at - due).num_seconds();
    let days = (late_seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    days.max(1)
}

/// Fine owed when a loan with `due_date` comes back at `returned_at`.
pub fn overdue_fine(
    due_date: Option<NaiveDate>,
    returned_at: DateTime<Utc>,
    fine_per_day: Money,
) -> Money {
    fine_per_day.times_days(overdue_days(due_date, returned_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_due_date_is_calendar_date() {
        let issued = at(2024, 2, 28, 23, 59, 0);
        assert_eq!(due_date_for(issued, 1), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(due_date_for(issued, 14), NaiveDate::from_ymd_opt(2024, 3, 13));
    }

    #[test]
    fn test_no_due_date_for_non_positive_days() {
        let issued = at(2024, 1, 1, 0, 0, 0);
        assert_eq!(due_date_for(issued, 0), None);
        assert_eq!(due_date_for(issued, -3), None);
    }

    #[test]
    fn test_not_overdue_on_or_before_due_instant() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 2);
        assert_eq!(overdue_days(due, at(2024, 3, 1, 18, 0, 0)), 0);
        assert_eq!(overdue_days(due, at(2024, 3, 2, 0, 0, 0)), 0);
    }

    #[test]
    fn test_any_lateness_is_at_least_one_day() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 2);
        assert_eq!(overdue_days(due, at(2024, 3, 2, 0, 0, 1)), 1);
        assert_eq!(overdue_days(due, at(2024, 3, 2, 23, 59, 59)), 1);
        assert_eq!(overdue_days(due, at(2024, 3, 3, 0, 0, 0)), 1);
    }

    #[test]
    fn test_partial_days_round_up() {
        let due_date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let returned = due_instant(due_date) + Duration::hours(25);
        assert_eq!(overdue_days(Some(due_date), returned), 2);

        let returned = due_instant(due_date) + Duration::hours(72);
        assert_eq!(overdue_days(Some(due_date), returned), 3);
    }

    #[test]
    fn test_fine_is_days_times_rate() {
        let due_date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let returned = due_instant(due_date) + Duration::hours(25);
        let fine = overdue_fine(Some(due_date), returned, Money::from_cents(100));
        assert_eq!(fine.cents(), 200);

        let fine = overdue_fine(Some(due_date), returned, Money::from_cents(35));
        assert_eq!(fine.cents(), 70);
    }

    #[test]
    fn test_no_fine_without_due_date() {
        let fine = overdue_fine(None, at(2030, 1, 1, 0, 0, 0), Money::from_cents(100));
        assert!(fine.is_zero());
    }
}

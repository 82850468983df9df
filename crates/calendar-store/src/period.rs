//! Calendar period boundaries.
//!
//! Boundaries are the first instant (midnight UTC) of a day, a week or a
//! month. Weeks start on Sunday.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};

/// Midnight (UTC) of `day`.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Midnight (UTC) of the most recent Sunday on or before `day`.
pub fn week_start(day: NaiveDate) -> DateTime<Utc> {
    let back = Days::new(u64::from(day.weekday().num_days_from_sunday()));
    start_of_day(day.checked_sub_days(back).unwrap_or(day))
}

/// Midnight (UTC) of the first day of the month containing `day`.
pub fn month_start(day: NaiveDate) -> DateTime<Utc> {
    start_of_day(day.with_day(1).unwrap_or(day))
}

//! Weekly rebalance schedule anchored to a weekday.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Every occurrence of `anchor` in `[start_date, end_date]`, ascending.
pub fn rebalance_schedule(
    start_date: NaiveDate,
    end_date: NaiveDate,
    anchor: Weekday,
) -> Vec<NaiveDate> {
    if start_date > end_date {
        return Vec::new();
    }

    let offset = (anchor.num_days_from_monday() + 7
        - start_date.weekday().num_days_from_monday())
        % 7;
    let mut current = start_date + Duration::days(offset as i64);

    let mut dates = Vec::new();
    while current <= end_date {
        dates.push(current);
        current += Duration::days(7);
    }
    dates
}

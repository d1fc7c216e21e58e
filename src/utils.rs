///! Some utility functions

use chrono::{Datelike, NaiveDate};

/// The canonical `YYYY-MM` key of the month a date belongs to.
/// Used by per-month attributes such as month background colors.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parse a `YYYY-MM` month key back into its year and month
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let mut parts = key.splitn(2, '-');
    let year = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    if month < 1 || month > 12 {
        return None;
    }
    Some((year, month))
}

/// How many leading cells of a month grid are padding, given which weekday the grid
/// starts on (0 = Sunday .. 6 = Saturday, like [`crate::Schedule::start_day_of_week`])
pub fn leading_padding_days(first_of_month: NaiveDate, start_day_of_week: u8) -> u32 {
    let first_weekday = first_of_month.weekday().num_days_from_sunday();
    (first_weekday + 7 - start_day_of_week as u32) % 7
}

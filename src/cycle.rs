//! The duty-cycle generator: projects a repeating work/holiday pattern over a date window

use chrono::{Duration, NaiveDate};

use crate::day::{DayMap, DayType};

/// How many days a generation pass covers: 10 years back, 10 years forward.
/// Navigating far from "today" must still show classified days.
const WINDOW_DAYS: i64 = 365 * 20;

/// Classify every day of the generation window according to a repeating cycle of
/// `work_len` work days followed by `holiday_len` holidays, with `anchor` as day 0.
///
/// Only the classification is written: notes and pins already present on a day
/// survive, and entries outside the window pass through untouched. Running this
/// twice with the same arguments yields the same map.
///
/// A zero-length cycle (`work_len + holiday_len == 0`) is degenerate and returns
/// `existing` unchanged.
pub fn generate_cycle(anchor: NaiveDate, work_len: u32, holiday_len: u32, existing: &DayMap) -> DayMap {
    let mut days = existing.clone();

    let cycle_len = (work_len + holiday_len) as i64;
    if cycle_len == 0 {
        return days;
    }

    let window_start = anchor - Duration::days(WINDOW_DAYS / 2);
    for offset in 0..WINDOW_DAYS {
        let date = window_start + Duration::days(offset);
        let day_type = classify(date, anchor, work_len, cycle_len);

        days.entry(date).or_default().set_day_type(day_type);
    }

    days
}

/// The classification rule alone, for one date.
///
/// `cycle_len` must be non-zero. Days before the anchor get a negative offset,
/// normalized into `[0, cycle_len)` by the euclidean remainder.
fn classify(date: NaiveDate, anchor: NaiveDate, work_len: u32, cycle_len: i64) -> DayType {
    let days_since_anchor = (date - anchor).num_days();
    let position = days_since_anchor.rem_euclid(cycle_len);
    if position < work_len as i64 {
        DayType::Work
    } else {
        DayType::Holiday
    }
}

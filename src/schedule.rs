//! Named schedules and their identifiers

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::DayMap;

/// Opaque unique identifier of a [`Schedule`], generated at creation and immutable
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId {
    content: String,
}

impl ScheduleId {
    /// Generate a random ScheduleId.
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for ScheduleId {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl FromStr for ScheduleId {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { content: s.to_string() })
    }
}

impl Display for ScheduleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

fn default_months_to_show() -> u32 {
    12
}

/// A named, independently configured calendar.
///
/// Exactly one schedule is "active" at a time (or none when the collection is empty);
/// the active pointer is owned by [`crate::ScheduleStore`], not by the schedule itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    id: ScheduleId,

    /// User-editable display label
    name: String,

    /// The weekday shown as the first column of a month grid (0 = Sunday .. 6 = Saturday)
    start_day_of_week: u8,

    #[serde(default)]
    days: DayMap,

    #[serde(default = "default_months_to_show")]
    months_to_show: u32,

    /// Day 0 of the duty cycle, and the default viewport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,

    /// Per-month background color tokens, keyed by `YYYY-MM`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    month_backgrounds: BTreeMap<String, String>,
}

impl Schedule {
    /// Create a brand new schedule with no days.
    /// This will pick a new (random) schedule ID.
    pub fn new(name: String, start_day_of_week: u8, months_to_show: Option<u32>, start_date: Option<NaiveDate>) -> Self {
        Self {
            id: ScheduleId::random(),
            name,
            start_day_of_week,
            days: DayMap::new(),
            months_to_show: months_to_show.unwrap_or_else(default_months_to_show),
            start_date,
            month_backgrounds: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &ScheduleId   { &self.id   }
    pub fn name(&self) -> &str        { &self.name }
    pub fn start_day_of_week(&self) -> u8  { self.start_day_of_week }
    pub fn months_to_show(&self) -> u32    { self.months_to_show    }
    pub fn start_date(&self) -> Option<NaiveDate>  { self.start_date }
    pub fn days(&self) -> &DayMap                  { &self.days      }
    pub fn month_backgrounds(&self) -> &BTreeMap<String, String> { &self.month_backgrounds }

    pub(crate) fn days_mut(&mut self) -> &mut DayMap {
        &mut self.days
    }

    /// Deep-copy this schedule under a fresh id and a derived name
    pub fn duplicated(&self) -> Self {
        let mut copy = self.clone();
        copy.id = ScheduleId::random();
        copy.name = format!("{} (copy)", self.name);
        copy
    }

    /// Apply a partial patch. `None` fields are left untouched.
    pub fn apply(&mut self, patch: SchedulePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(start_day_of_week) = patch.start_day_of_week {
            self.start_day_of_week = start_day_of_week;
        }
        if let Some(days) = patch.days {
            self.days = days;
        }
        if let Some(months_to_show) = patch.months_to_show {
            self.months_to_show = months_to_show;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = Some(start_date);
        }
        if let Some(month_backgrounds) = patch.month_backgrounds {
            self.month_backgrounds = month_backgrounds;
        }
    }
}

/// A partial update to a [`Schedule`], for [`crate::ScheduleStore::update_schedule`].
///
/// The `id` is deliberately not patchable.
#[derive(Clone, Debug, Default)]
pub struct SchedulePatch {
    pub name: Option<String>,
    pub start_day_of_week: Option<u8>,
    pub days: Option<DayMap>,
    pub months_to_show: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub month_backgrounds: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_schedules_get_distinct_ids() {
        let left = Schedule::new("A".to_string(), 0, None, None);
        let right = Schedule::new("A".to_string(), 0, None, None);
        assert!(left.id() != right.id());
        assert_eq!(left.months_to_show(), 12);
    }

    #[test]
    fn duplicated_schedule_has_fresh_id_and_derived_name() {
        let original = Schedule::new("May rota".to_string(), 6, Some(3), None);
        let copy = original.duplicated();

        assert!(copy.id() != original.id());
        assert_eq!(copy.name(), "May rota (copy)");
        assert_eq!(copy.months_to_show(), 3);
        assert_eq!(copy.days(), original.days());
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut schedule = Schedule::new("Before".to_string(), 0, Some(6), None);
        schedule.apply(SchedulePatch {
            name: Some("After".to_string()),
            ..SchedulePatch::default()
        });

        assert_eq!(schedule.name(), "After");
        assert_eq!(schedule.start_day_of_week(), 0);
        assert_eq!(schedule.months_to_show(), 6);
    }

    #[test]
    fn legacy_colors_field_is_dropped_on_deserialization() {
        // Old exports carried a per-schedule `colors` object; it must not survive a round-trip
        let json = serde_json::json!({
            "id": "abc",
            "name": "legacy",
            "startDayOfWeek": 0,
            "days": {},
            "monthsToShow": 12,
            "colors": {"workDay": "#10B981"}
        });
        let schedule: Schedule = serde_json::from_value(json).unwrap();
        let back = serde_json::to_value(&schedule).unwrap();
        assert!(back.get("colors").is_none());
    }
}

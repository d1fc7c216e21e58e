//! Per-day classification and annotations

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The map every schedule stores its days in.
///
/// Keyed by the day itself, so that serialized data uses canonical `YYYY-MM-DD` keys
/// and iteration is already in date order.
pub type DayMap = BTreeMap<NaiveDate, DayData>;

/// How a given day is classified
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// Not classified by any duty cycle
    Default,
    /// A work day
    Work,
    /// A holiday
    Holiday,
}

impl Default for DayType {
    fn default() -> Self {
        DayType::Default
    }
}

/// One calendar day's classification and annotations.
///
/// A `DayData` that carries no information (default type, no note, not pinned) is
/// "prunable": it must not be kept in a [`DayMap`], since it is equivalent to the day
/// not being there at all. [`crate::ScheduleStore`] enforces this on every mutation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DayData {
    #[serde(rename = "type", default)]
    day_type: DayType,

    /// A free-text annotation. An empty note is normalized to `None` in [`DayData::merge`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,

    /// Whether the user pinned this day. Absent on the wire means `false`
    #[serde(default, skip_serializing_if = "is_false")]
    pinned: bool,
}

fn is_false(b: &bool) -> bool {
    *b == false
}

impl DayData {
    pub fn day_type(&self) -> DayType { self.day_type }
    pub fn note(&self) -> Option<&str> { self.note.as_deref() }
    pub fn pinned(&self) -> bool { self.pinned }

    /// Build a classified day with no annotations
    pub fn with_type(day_type: DayType) -> Self {
        Self {
            day_type,
            note: None,
            pinned: false,
        }
    }

    /// Re-classify this day, leaving the annotations alone
    pub fn set_day_type(&mut self, day_type: DayType) {
        self.day_type = day_type;
    }

    /// Merge a partial patch onto this day.
    ///
    /// This is the single place where the "empty note means no note" convention is
    /// applied, so call sites never have to care about it.
    pub fn merge(&mut self, patch: DayPatch) {
        if let Some(day_type) = patch.day_type {
            self.day_type = day_type;
        }
        if let Some(note) = patch.note {
            self.note = Some(note);
        }
        if let Some(pinned) = patch.pinned {
            self.pinned = pinned;
        }
        if self.note.as_ref().map_or(false, |n| n.is_empty()) {
            self.note = None;
        }
    }

    /// Strip the user annotations (note and pin), keeping the classification
    pub fn clear_annotations(&mut self) {
        self.note = None;
        self.pinned = false;
    }

    /// Whether this entry carries no information beyond the default state
    pub fn is_prunable(&self) -> bool {
        self.day_type == DayType::Default && self.note.is_none() && self.pinned == false
    }
}

/// A partial update to a [`DayData`].
///
/// `None` fields are left untouched. Setting `note` to an empty string clears it
/// (see [`DayData::merge`]).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub day_type: Option<DayType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl DayPatch {
    pub fn day_type(day_type: DayType) -> Self {
        Self { day_type: Some(day_type), ..Self::default() }
    }

    pub fn note<S: Into<String>>(note: S) -> Self {
        Self { note: Some(note.into()), ..Self::default() }
    }

    pub fn pinned(pinned: bool) -> Self {
        Self { pinned: Some(pinned), ..Self::default() }
    }
}

/// What a holiday-import source feeds into the core: one dated note.
///
/// Parsing holiday calendars is not this crate's job; whatever does it hands over a
/// list of these (see [`crate::ScheduleStore::add_official_holidays`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub note: String,
}

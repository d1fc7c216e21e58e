//! This module provides the schedule collection store, persisted in a local file.
//!
//! The store is the single source of truth for the schedules and the active-schedule
//! pointer. All mutations go through its coarse-grained read-modify-write operations,
//! so no caller ever reimplements the merge-and-prune logic. Operations aimed at a
//! schedule id that does not exist (or at the active schedule when there is none) are
//! silent no-ops: the UI layer is expected to only ever offer valid targets.

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cycle::generate_cycle;
use crate::day::{DayData, DayMap, DayPatch, HolidayEntry};
use crate::schedule::{Schedule, ScheduleId, SchedulePatch};

/// The schedule collection and the active pointer, stored in a local file
#[derive(Debug, PartialEq)]
pub struct ScheduleStore {
    backing_file: Option<PathBuf>,
    data: ScheduleData,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleData {
    schedules: Vec<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_schedule_id: Option<ScheduleId>,
}

impl ScheduleStore {
    /// Get the path to the default schedules file
    pub fn default_data_file() -> PathBuf {
        crate::config::data_dir().join("schedules.json")
    }

    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data: ScheduleData = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        let mut store = Self {
            backing_file: Some(PathBuf::from(path)),
            data,
        };
        store.repair_active_pointer();
        Ok(store)
    }

    /// Initialize a store from a backing file, falling back to an empty store if the
    /// file is missing or its content cannot be parsed.
    ///
    /// This is the regular startup path: stale or corrupt persisted data must not
    /// prevent the app from opening.
    pub fn open(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("Starting from an empty schedule store: {}", err);
                Self {
                    backing_file: Some(PathBuf::from(path)),
                    data: ScheduleData::default(),
                }
            },
        }
    }

    /// Initialize an empty store with the given backing file
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: Some(PathBuf::from(path)),
            data: ScheduleData::default(),
        }
    }

    /// Initialize an empty store that is not persisted anywhere.
    ///
    /// Useful for tests, or for callers that handle persistence themselves.
    pub fn ephemeral() -> Self {
        Self {
            backing_file: None,
            data: ScheduleData::default(),
        }
    }

    /// Store the current data to the backing file
    fn save_to_file(&self) {
        let path = match &self.backing_file {
            None => return,
            Some(p) => p,
        };

        let file = match std::fs::File::create(path) {
            Err(err) => {
                log::warn!("Unable to save file {:?}: {}", path, err);
                return;
            },
            Ok(f) => f,
        };

        if let Err(err) = serde_json::to_writer(file, &self.data) {
            log::warn!("Unable to serialize: {}", err);
            return;
        };
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.data.schedules
    }

    pub fn active_schedule_id(&self) -> Option<&ScheduleId> {
        self.data.active_schedule_id.as_ref()
    }

    pub fn active_schedule(&self) -> Option<&Schedule> {
        let id = self.data.active_schedule_id.as_ref()?;
        self.data.schedules.iter().find(|s| s.id() == id)
    }

    pub fn schedule(&self, id: &ScheduleId) -> Option<&Schedule> {
        self.data.schedules.iter().find(|s| s.id() == id)
    }

    /// Point the active selection at the given schedule.
    /// Pointing at an id that is not in the collection is a no-op.
    pub fn set_active_schedule(&mut self, id: &ScheduleId) {
        if self.schedule(id).is_some() {
            self.data.active_schedule_id = Some(id.clone());
            self.save_to_file();
        }
    }

    /// Make sure the active pointer refers to a schedule that actually exists:
    /// an invalid or missing pointer snaps to the first schedule, and an empty
    /// collection clears it.
    fn repair_active_pointer(&mut self) {
        let valid = match &self.data.active_schedule_id {
            Some(id) => self.data.schedules.iter().any(|s| s.id() == id),
            None => false,
        };
        if valid == false {
            self.data.active_schedule_id = self.data.schedules.first().map(|s| s.id().clone());
        }
    }

    /// Create a schedule with no days and make it the active one.
    ///
    /// The name is not validated here (it may even be empty): whether an empty name is
    /// acceptable is a UI concern.
    pub fn add_schedule(&mut self, name: &str, start_day_of_week: u8, months_to_show: Option<u32>, start_date: Option<NaiveDate>) -> Schedule {
        let schedule = Schedule::new(name.to_string(), start_day_of_week, months_to_show, start_date);
        self.data.active_schedule_id = Some(schedule.id().clone());
        self.data.schedules.push(schedule.clone());
        self.save_to_file();
        schedule
    }

    /// Apply a partial patch to the schedule matching `id`
    pub fn update_schedule(&mut self, id: &ScheduleId, patch: SchedulePatch) {
        if let Some(schedule) = self.data.schedules.iter_mut().find(|s| s.id() == id) {
            schedule.apply(patch);
            self.save_to_file();
        }
    }

    /// Apply a patch computed from the schedule's own latest committed state.
    ///
    /// Callers that need to read-then-write (day mutation, cycle generation) use this
    /// entry point so the patch is always relative to the current state, not to some
    /// stale copy they captured earlier.
    pub fn update_schedule_with<F>(&mut self, id: &ScheduleId, update: F)
    where
        F: FnOnce(&Schedule) -> SchedulePatch,
    {
        if let Some(schedule) = self.data.schedules.iter_mut().find(|s| s.id() == id) {
            let patch = update(schedule);
            schedule.apply(patch);
            self.save_to_file();
        }
    }

    /// Remove the schedule. If it was the active one, the active pointer moves to the
    /// first remaining schedule, or to none if the collection becomes empty.
    pub fn delete_schedule(&mut self, id: &ScheduleId) {
        let before = self.data.schedules.len();
        self.data.schedules.retain(|s| s.id() != id);
        if self.data.schedules.len() == before {
            return;
        }

        if self.data.active_schedule_id.as_ref() == Some(id) {
            self.data.active_schedule_id = self.data.schedules.first().map(|s| s.id().clone());
        }
        self.save_to_file();
    }

    /// Deep-copy a schedule under a new id and a derived name, and make the copy active
    pub fn duplicate_schedule(&mut self, id: &ScheduleId) {
        let copy = match self.schedule(id) {
            None => return,
            Some(schedule) => schedule.duplicated(),
        };
        self.data.active_schedule_id = Some(copy.id().clone());
        self.data.schedules.push(copy);
        self.save_to_file();
    }

    /// The core single-day mutation, on the active schedule.
    ///
    /// `None` deletes the day entry entirely. `Some(patch)` merges the patch onto the
    /// existing entry (an unclassified one if absent); if the result carries no
    /// information it is pruned, keeping storage proportional to interesting days.
    pub fn update_day(&mut self, date: NaiveDate, patch: Option<DayPatch>) {
        let id = match &self.data.active_schedule_id {
            None => return,
            Some(id) => id.clone(),
        };

        self.update_schedule_with(&id, |prev| {
            let mut days = prev.days().clone();
            match patch {
                None => {
                    days.remove(&date);
                },
                Some(patch) => {
                    let mut day = days.remove(&date).unwrap_or_default();
                    day.merge(patch);
                    if day.is_prunable() == false {
                        days.insert(date, day);
                    }
                },
            }
            SchedulePatch { days: Some(days), ..SchedulePatch::default() }
        });
    }

    /// Strip notes and pins from every day of the given year in the active schedule.
    ///
    /// Classifications are preserved; entries that end up carrying no information are
    /// pruned. Other years are not touched.
    pub fn delete_year_data(&mut self, year: i32) {
        self.clear_annotations_where(|date| date.year() == year);
    }

    /// Strip notes and pins from every day of the active schedule
    pub fn delete_all_events(&mut self) {
        self.clear_annotations_where(|_| true);
    }

    fn clear_annotations_where<P>(&mut self, applies: P)
    where
        P: Fn(&NaiveDate) -> bool,
    {
        let id = match &self.data.active_schedule_id {
            None => return,
            Some(id) => id.clone(),
        };

        self.update_schedule_with(&id, |prev| {
            let mut days = prev.days().clone();
            days.retain(|date, day| {
                if applies(date) {
                    day.clear_annotations();
                }
                day.is_prunable() == false
            });
            SchedulePatch { days: Some(days), ..SchedulePatch::default() }
        });
    }

    /// Merge a batch of imported holidays into the active schedule.
    ///
    /// Each entry goes through the same merge path as a day edit, with the
    /// classification forced to holiday. A note already present on the day is kept:
    /// the imported note is appended after a blank line rather than overwriting it.
    pub fn add_official_holidays(&mut self, holidays: &[HolidayEntry]) {
        let id = match &self.data.active_schedule_id {
            None => return,
            Some(id) => id.clone(),
        };

        self.update_schedule_with(&id, |prev| {
            let mut days = prev.days().clone();
            for holiday in holidays {
                let mut day = days.remove(&holiday.date).unwrap_or_default();
                let note = match day.note() {
                    Some(existing) => format!("{}\n\n{}", existing, holiday.note),
                    None => holiday.note.clone(),
                };
                day.merge(DayPatch {
                    day_type: Some(crate::day::DayType::Holiday),
                    note: Some(note),
                    pinned: None,
                });
                days.insert(holiday.date, day);
            }
            SchedulePatch { days: Some(days), ..SchedulePatch::default() }
        });
    }

    /// Re-classify a schedule's days according to a repeating duty cycle anchored at
    /// `anchor` (see [`generate_cycle`] for the exact rules)
    pub fn apply_cycle(&mut self, id: &ScheduleId, anchor: NaiveDate, work_len: u32, holiday_len: u32) {
        self.update_schedule_with(id, |prev| {
            let days = generate_cycle(anchor, work_len, holiday_len, prev.days());
            SchedulePatch { days: Some(days), ..SchedulePatch::default() }
        });
    }

    /// Replace the whole collection (the import entry point).
    /// The first schedule becomes active, or none if the list is empty.
    pub fn replace_all(&mut self, schedules: Vec<Schedule>) {
        self.data.schedules = schedules;
        self.data.active_schedule_id = self.data.schedules.first().map(|s| s.id().clone());
        self.save_to_file();
    }

    /// A snapshot of the active schedule's days, sorted by date
    pub fn active_days(&self) -> Option<&DayMap> {
        self.active_schedule().map(|s| s.days())
    }

    /// Direct access to one day of the active schedule
    pub fn day(&self, date: &NaiveDate) -> Option<&DayData> {
        self.active_schedule().and_then(|s| s.days().get(date))
    }
}

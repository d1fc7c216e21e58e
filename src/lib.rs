//! This crate is the persistent core of a personal work-schedule planner.
//!
//! A user defines one or more named [`Schedule`]s, each carrying a map of classified
//! days (work/holiday) with optional notes and pins. The [`cycle`] module projects a
//! repeating work/holiday pattern over a ±10-year window without erasing the user's
//! annotations. \
//! All of it is owned by two stores backed by local JSON files: the
//! [`ScheduleStore`] (the schedule collection and the active-schedule pointer) and
//! the [`ViewSettingsStore`] (presentation preferences, read through a
//! schema-reconciling merge so data written by older app versions stays usable).
//!
//! The [`backup`] module handles whole-state import/export, including the legacy
//! schedules-only format and standalone theme files.
//!
//! UI concerns (rendering, dialogs, holiday-calendar fetching) live outside this
//! crate: they read the data types as plain values and mutate them only through the
//! store operations.

pub mod schedule;
pub use schedule::Schedule;
pub use schedule::ScheduleId;
pub use schedule::SchedulePatch;
mod day;
pub use day::{DayData, DayMap, DayPatch, DayType, HolidayEntry};
pub mod cycle;
pub mod store;
pub use store::ScheduleStore;
pub mod settings;
pub use settings::ViewSettingsStore;
pub mod backup;

pub mod config;
pub mod utils;

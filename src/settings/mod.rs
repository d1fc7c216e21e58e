//! Process-wide presentation settings, persisted in a local file.
//!
//! The settings schema evolves between app versions, so a stored blob may be missing
//! fields that exist today. Every read goes through the [`reconcile`](reconcile::reconcile)
//! merge against the current default schema, and every mutator writes the healed,
//! complete shape back, so the persisted blob repairs itself over time and callers
//! never observe a partially-shaped object.

pub mod reconcile;

use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use reconcile::reconcile;

/// The color theme: named color tokens for every themed surface.
///
/// Values are CSS color strings; theme-variable references such as
/// `hsl(var(--primary))` are legal tokens, so no parsing is enforced here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundColors {
    pub page: String,
    pub header: String,
    pub controls: String,
    pub container: String,
    pub day_number: String,
    pub month_name: String,
    pub work_day: String,
    pub holiday_day: String,
}

impl Default for BackgroundColors {
    fn default() -> Self {
        Self {
            page: "hsl(220 14% 10%)".to_string(),
            header: "hsl(220 14% 10%)".to_string(),
            controls: "hsl(220 14% 10%)".to_string(),
            container: "hsl(220 14% 12%)".to_string(),
            day_number: "#000000".to_string(),
            month_name: "hsl(var(--primary))".to_string(),
            work_day: "#10B981".to_string(),
            holiday_day: "#FFFFFF".to_string(),
        }
    }
}

/// A saved color theme, so the user can switch between a few favorites
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorPreset {
    pub id: String,
    pub name: String,
    pub colors: BackgroundColors,
}

/// Where the last holiday import came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSource {
    Google,
    OfficeHolidays,
    Custom,
}

/// Presentation preferences. Process-wide, not per-schedule.
///
/// This is plain data: UI layers read it directly, and mutate it only through
/// [`ViewSettingsStore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSettings {
    pub zoom_level: f64,
    pub grid_cols: u32,
    pub background_colors: BackgroundColors,
    pub ticker_speed: f64,
    pub show_ticker: bool,
    /// Most recent first, capped at [`MAX_COLOR_PRESETS`]
    pub color_presets: Vec<ColorPreset>,
    /// User-saved holiday calendar sources, keyed by country code
    pub custom_holiday_calendars: BTreeMap<String, Url>,
    pub last_holiday_source: Option<CalendarSource>,
    pub last_holiday_country: Option<String>,
    /// User-chosen display names for individual holidays
    pub custom_holiday_names: BTreeMap<String, String>,
    /// Holidays the user chose not to display
    pub hidden_holidays: Vec<String>,
    pub holiday_translations: BTreeMap<String, String>,
    pub has_seen_rotation_tip: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom_level: 1.0,
            grid_cols: 3,
            background_colors: BackgroundColors::default(),
            ticker_speed: 8.0,
            show_ticker: true,
            color_presets: Vec::new(),
            custom_holiday_calendars: BTreeMap::new(),
            last_holiday_source: None,
            last_holiday_country: None,
            custom_holiday_names: BTreeMap::new(),
            hidden_holidays: Vec::new(),
            holiday_translations: BTreeMap::new(),
            has_seen_rotation_tip: false,
        }
    }
}

/// How many color presets are kept; saving a new one evicts the oldest
pub const MAX_COLOR_PRESETS: usize = 3;

/// The default schema every stored blob is reconciled against
static DEFAULT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::to_value(ViewSettings::default()).unwrap(/* a plain settings struct with string-keyed maps cannot fail to serialize */)
});

/// The view-settings store: owns the stored blob and its backing file
#[derive(Debug, PartialEq)]
pub struct ViewSettingsStore {
    backing_file: Option<PathBuf>,
    /// The blob as persisted. Possibly stale-shaped; reconciled on every read.
    raw: Value,
}

/// Declares a trivial setter that routes through [`ViewSettingsStore::update`]
macro_rules! settings_setter {
    ($setter:ident, $field:ident, $ty:ty) => {
        pub fn $setter(&mut self, $field: $ty) {
            self.update(|settings| settings.$field = $field);
        }
    }
}

impl ViewSettingsStore {
    /// Get the path to the default settings file
    pub fn default_data_file() -> PathBuf {
        crate::config::data_dir().join("view_settings.json")
    }

    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self {
            backing_file: Some(PathBuf::from(path)),
            raw,
        })
    }

    /// Initialize a store from a backing file, treating missing or malformed content
    /// as an empty blob (which reconciles to the full default schema)
    pub fn open(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("Starting from default view settings: {}", err);
                Self {
                    backing_file: Some(PathBuf::from(path)),
                    raw: Value::Object(Map::new()),
                }
            },
        }
    }

    /// Initialize a store with the default contents
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: Some(PathBuf::from(path)),
            raw: Value::Object(Map::new()),
        }
    }

    /// Initialize a store that is not persisted anywhere
    pub fn ephemeral() -> Self {
        Self {
            backing_file: None,
            raw: Value::Object(Map::new()),
        }
    }

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

        if let Err(err) = serde_json::to_writer(file, &self.raw) {
            log::warn!("Unable to serialize: {}", err);
            return;
        };
    }

    /// The current settings: the stored blob reconciled against the default schema.
    ///
    /// Always complete and current-shaped, whatever app version wrote the blob.
    pub fn current(&self) -> ViewSettings {
        let healed = reconcile(&DEFAULT_SCHEMA, &self.raw);
        match serde_json::from_value(healed) {
            Ok(settings) => settings,
            Err(err) => {
                // A field holds a value of the wrong type. The next mutation will
                // rewrite a healed blob.
                log::warn!("Stored view settings are unusable ({}), falling back to defaults", err);
                ViewSettings::default()
            },
        }
    }

    /// The single mutation entry point: read the reconciled settings, let the caller
    /// change them, write the complete shape back.
    ///
    /// Keys of the stored blob this schema does not know about are carried along
    /// unchanged, so a blob written by a newer app version is not damaged.
    pub fn update<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut ViewSettings),
    {
        let mut settings = self.current();
        mutate(&mut settings);

        let value = match serde_json::to_value(&settings) {
            Ok(v) => v,
            Err(err) => {
                log::warn!("Unable to serialize view settings: {}", err);
                return;
            },
        };

        let mut merged = match &self.raw {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        if let Value::Object(new) = value {
            for (key, val) in new {
                merged.insert(key, val);
            }
        }
        self.raw = Value::Object(merged);
        self.save_to_file();
    }

    settings_setter!(set_zoom_level, zoom_level, f64);
    settings_setter!(set_grid_cols, grid_cols, u32);
    settings_setter!(set_ticker_speed, ticker_speed, f64);
    settings_setter!(set_show_ticker, show_ticker, bool);
    settings_setter!(set_background_colors, background_colors, BackgroundColors);
    settings_setter!(set_last_holiday_source, last_holiday_source, Option<CalendarSource>);
    settings_setter!(set_last_holiday_country, last_holiday_country, Option<String>);
    settings_setter!(set_holiday_translations, holiday_translations, BTreeMap<String, String>);
    settings_setter!(set_has_seen_rotation_tip, has_seen_rotation_tip, bool);

    /// Change the theme colors relative to the current ones
    pub fn set_background_colors_with<F>(&mut self, change: F)
    where
        F: FnOnce(&BackgroundColors) -> BackgroundColors,
    {
        self.update(|settings| settings.background_colors = change(&settings.background_colors));
    }

    /// Save the current name/colors pair as a preset. Newest first; the oldest preset
    /// is evicted beyond [`MAX_COLOR_PRESETS`].
    pub fn save_color_preset(&mut self, name: &str, colors: BackgroundColors) {
        let preset = ColorPreset {
            id: uuid::Uuid::new_v4().to_hyphenated().to_string(),
            name: name.to_string(),
            colors,
        };
        self.update(|settings| {
            settings.color_presets.insert(0, preset);
            settings.color_presets.truncate(MAX_COLOR_PRESETS);
        });
    }

    pub fn delete_color_preset(&mut self, id: &str) {
        self.update(|settings| settings.color_presets.retain(|p| p.id != id));
    }

    /// Make a preset's colors the current theme
    pub fn apply_color_preset(&mut self, colors: BackgroundColors) {
        self.set_background_colors(colors);
    }

    /// Remember a holiday-calendar source URL under a country key.
    /// The URL has already been validated by construction of the [`Url`].
    pub fn save_custom_holiday_calendar(&mut self, key: &str, url: Url) {
        self.update(|settings| {
            settings.custom_holiday_calendars.insert(key.to_string(), url);
        });
    }

    pub fn delete_custom_holiday_calendar(&mut self, key: &str) {
        self.update(|settings| {
            settings.custom_holiday_calendars.remove(key);
        });
    }

    pub fn save_custom_holiday_name(&mut self, key: &str, name: &str) {
        let (key, name) = (key.to_string(), name.to_string());
        self.update(|settings| {
            settings.custom_holiday_names.insert(key, name);
        });
    }

    /// Hide a holiday from display. Hiding one that is already hidden changes nothing.
    pub fn add_hidden_holiday(&mut self, key: &str) {
        self.update(|settings| {
            if settings.hidden_holidays.iter().any(|k| k == key) == false {
                settings.hidden_holidays.push(key.to_string());
            }
        });
    }

    pub fn remove_hidden_holiday(&mut self, key: &str) {
        self.update(|settings| settings.hidden_holidays.retain(|k| k != key));
    }

    /// Import a (possibly partial) settings blob: its fields override the current
    /// ones at the top level, and the result is reconciled back to the full schema.
    ///
    /// Anything that is not a JSON object is ignored with a warning.
    pub fn import(&mut self, incoming: &Value) {
        let incoming = match incoming {
            Value::Object(map) => map,
            other => {
                log::warn!("Ignoring a view-settings import that is not an object: {}", other);
                return;
            },
        };

        let mut merged = match &self.raw {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        for (key, val) in incoming {
            merged.insert(key.clone(), val.clone());
        }

        self.raw = reconcile(&DEFAULT_SCHEMA, &Value::Object(merged));
        self.save_to_file();
    }

    /// The raw reconciled blob, for export
    pub(crate) fn export_value(&self) -> Value {
        reconcile(&DEFAULT_SCHEMA, &self.raw)
    }
}

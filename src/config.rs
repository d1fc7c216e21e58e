//! Support for library configuration options

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The application name, used for the default data directory and for derived export
/// file names (e.g. `my-planner_backup_2024-01-01.json`).
/// Feel free to override it when initing this library.
pub static APP_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("my-planner".to_string())));

/// The directory the stores keep their backing files in by default
pub fn data_dir() -> PathBuf {
    let app_name = APP_NAME.lock().unwrap(/* no code path panics while holding this lock */).clone();
    PathBuf::from(format!("~/.config/{}", app_name))
}

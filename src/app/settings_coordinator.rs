//! Settings persistence for the demo.
//!
//! Settings are stored as JSON strings in eframe's persistent storage. The
//! widget configuration round-trips whole; a stored configuration that no
//! longer parses falls back to the defaults.

use rtreeselect::TreeSelectConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

const CONFIG_KEY: &str = "treeselect_config";
const DARK_MODE_KEY: &str = "dark_mode";

/// Coordinates settings persistence.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads the persisted widget configuration.
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface, if persistence is available
    ///
    /// # Returns
    /// The stored configuration, or `TreeSelectConfig::default()` if none is
    /// stored or it does not parse
    pub fn load_config(storage: Option<&dyn eframe::Storage>) -> TreeSelectConfig {
        Self::try_load_setting(storage, CONFIG_KEY).unwrap_or_default()
    }

    pub fn save_config(storage: &mut dyn eframe::Storage, config: &TreeSelectConfig) {
        Self::save_setting(storage, CONFIG_KEY, config);
    }

    pub fn load_dark_mode(storage: Option<&dyn eframe::Storage>) -> bool {
        Self::load_setting_or(storage, DARK_MODE_KEY, true)
    }

    pub fn save_dark_mode(storage: &mut dyn eframe::Storage, dark_mode: bool) {
        Self::save_setting(storage, DARK_MODE_KEY, &dark_mode);
    }

    /// Saves a setting to persistent storage.
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface (mutable)
    /// * `key` - The storage key for this setting
    /// * `value` - The value to serialize and save
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(json_str) => {
                storage.set_string(key, json_str);
                storage.flush();
            }
            Err(e) => debug!(key, error = %e, "setting not serializable"),
        }
    }

    /// Loads a setting with a caller-provided fallback.
    pub fn load_setting_or<T>(storage: Option<&dyn eframe::Storage>, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        Self::try_load_setting(storage, key).unwrap_or(default)
    }

    /// Attempts to load a setting.
    ///
    /// # Returns
    /// `Some(value)` if the key exists and parses, `None` otherwise
    pub fn try_load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let json_str = storage?.get_string(key)?;
        match serde_json::from_str(&json_str) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "ignoring unreadable setting");
                None
            }
        }
    }
}

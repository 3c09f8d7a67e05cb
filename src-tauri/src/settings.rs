use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

#[derive(Debug, thiserror::Error)]
pub(crate) enum SettingsError {
    #[error("settings file {path} does not exist")]
    Missing { path: PathBuf },
    #[error("failed to read settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("settings file {path} does not contain a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to create settings directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write settings file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// The flat record persisted to `settings.json`.
///
/// Keys the shell does not know about are carried in `extra` so they survive
/// a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Settings {
    pub(crate) hide_sidebar: bool,
    pub(crate) hide_banner: bool,
    pub(crate) replace_text: bool,
    pub(crate) hide_navigation: bool,
    pub(crate) dark_mode: bool,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) minimize_to_tray: bool,
    pub(crate) start_minimized: bool,
    #[serde(rename = "customCSS")]
    pub(crate) custom_css: String,
    pub(crate) zoom_level: f64,
    pub(crate) auto_reload: bool,
    pub(crate) block_ads: bool,
    pub(crate) disable_all: bool,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hide_sidebar: true,
            hide_banner: true,
            replace_text: true,
            hide_navigation: true,
            dark_mode: false,
            window_width: 1200,
            window_height: 800,
            minimize_to_tray: false,
            start_minimized: false,
            custom_css: String::new(),
            zoom_level: 1.0,
            auto_reload: false,
            block_ads: true,
            disable_all: false,
            extra: Map::new(),
        }
    }
}

impl Settings {
    pub(crate) fn any_feature_enabled(&self) -> bool {
        self.hide_sidebar
            || self.hide_banner
            || self.replace_text
            || self.hide_navigation
            || self.block_ads
    }

    pub(crate) fn has_custom_css(&self) -> bool {
        !self.custom_css.trim().is_empty()
    }

    pub(crate) fn effective_window_size(&self) -> (u32, u32) {
        (
            self.window_width.max(MIN_WINDOW_WIDTH),
            self.window_height.max(MIN_WINDOW_HEIGHT),
        )
    }

    pub(crate) fn effective_zoom(&self) -> f64 {
        if self.zoom_level.is_finite() && self.zoom_level > 0.0 {
            self.zoom_level
        } else {
            1.0
        }
    }
}

fn default_settings_object() -> Map<String, Value> {
    match serde_json::to_value(Settings::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

// Integer fields only take non-negative values that fit in u32; float fields
// take any number.
fn accepts_value(default: &Value, candidate: &Value) -> bool {
    match (default, candidate) {
        (Value::Bool(_), Value::Bool(_)) | (Value::String(_), Value::String(_)) => true,
        (Value::Number(expected), Value::Number(actual)) => {
            if expected.is_f64() {
                true
            } else {
                actual
                    .as_u64()
                    .is_some_and(|value| value <= u64::from(u32::MAX))
            }
        }
        _ => false,
    }
}

/// Shallow merge: every persisted key overwrites the default of the same name.
pub(crate) fn merge_over_defaults(persisted: Map<String, Value>) -> Settings {
    let mut merged = default_settings_object();
    for (key, value) in persisted {
        match merged.get(&key) {
            Some(default) if !accepts_value(default, &value) => {
                log::warn!("ignoring settings key '{key}' with unexpected value {value}");
            }
            _ => {
                merged.insert(key, value);
            }
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|error| {
        log::warn!("merged settings did not decode, using defaults: {error}");
        Settings::default()
    })
}

#[derive(Debug, Clone)]
pub(crate) struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub(crate) fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn try_load(&self) -> Result<Settings, SettingsError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SettingsError::Missing {
                    path: self.path.clone(),
                }
            } else {
                SettingsError::Read {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let parsed: Value = serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let Value::Object(persisted) = parsed else {
            return Err(SettingsError::NotAnObject {
                path: self.path.clone(),
            });
        };

        Ok(merge_over_defaults(persisted))
    }

    /// Loads the persisted record, falling back to defaults on any failure.
    pub(crate) fn load(&self) -> Settings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(error @ SettingsError::Missing { .. }) => {
                log::debug!("{error}; using default settings");
                Settings::default()
            }
            Err(error) => {
                log::warn!("{error}; using default settings");
                Settings::default()
            }
        }
    }

    pub(crate) fn try_save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let serialized = serde_json::to_string_pretty(settings).map_err(SettingsError::Encode)?;
        if let Some(parent_dir) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent_dir).map_err(|source| SettingsError::CreateDir {
                path: parent_dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, serialized).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrites the settings file. Returns false instead of failing.
    pub(crate) fn save(&self, settings: &Settings) -> bool {
        match self.try_save(settings) {
            Ok(()) => true,
            Err(error) => {
                log::warn!("{error}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::at_path(dir.path().join("settings.json"))
    }

    #[test]
    fn load_returns_defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(matches!(store.try_load(), Err(SettingsError::Missing { .. })));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn load_backfills_missing_custom_css() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{ "hideSidebar": false, "zoomLevel": 1.25 }"#).unwrap();

        let loaded = store.load();

        assert_eq!(loaded.custom_css, Settings::default().custom_css);
        assert!(!loaded.hide_sidebar);
        assert_eq!(loaded.zoom_level, 1.25);
        assert!(loaded.block_ads);
    }

    #[test]
    fn load_returns_defaults_for_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.try_load(), Err(SettingsError::Parse { .. })));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn load_returns_defaults_for_non_object_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[true, false]").unwrap();

        assert!(matches!(
            store.try_load(),
            Err(SettingsError::NotAnObject { .. })
        ));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn load_keeps_default_for_wrongly_typed_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{ "hideBanner": "yes", "windowWidth": -5, "darkMode": true }"#,
        )
        .unwrap();

        let loaded = store.load();

        assert!(loaded.hide_banner);
        assert_eq!(loaded.window_width, 1200);
        assert!(loaded.dark_mode);
    }

    #[test]
    fn unknown_keys_survive_a_save_load_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{ "legacyTheme": "sepia", "blockAds": false }"#).unwrap();

        let loaded = store.load();
        assert_eq!(
            loaded.extra.get("legacyTheme"),
            Some(&Value::String("sepia".to_string()))
        );
        assert!(store.save(&loaded));

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["legacyTheme"], "sepia");
        assert_eq!(raw["blockAds"], false);
        assert_eq!(raw["customCSS"], "");
    }

    #[test]
    fn save_then_load_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let settings = Settings {
            hide_sidebar: false,
            hide_banner: false,
            replace_text: false,
            hide_navigation: false,
            dark_mode: true,
            window_width: 1440,
            window_height: 900,
            minimize_to_tray: true,
            start_minimized: true,
            custom_css: "body { font-size: 15px; }\n.x{color:red}".to_string(),
            zoom_level: 0.85,
            auto_reload: true,
            block_ads: false,
            disable_all: true,
            extra: Map::new(),
        };

        assert!(store.save(&settings));
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn zoom_level_survives_save_and_load_bit_for_bit() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for zoom_level in [
            1.1047802727761427,
            1.0026570038193279,
            0.9259074186938085,
            0.9236058067589763,
        ] {
            let settings = Settings {
                zoom_level,
                ..Settings::default()
            };

            assert!(store.save(&settings));
            assert_eq!(
                store.load().zoom_level.to_bits(),
                zoom_level.to_bits(),
                "zoom {zoom_level} changed across save/load"
            );
        }
    }

    #[test]
    fn save_writes_pretty_json_with_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.save(&Settings::default()));

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains('\n'));
        for key in [
            "hideSidebar",
            "hideBanner",
            "replaceText",
            "hideNavigation",
            "darkMode",
            "windowWidth",
            "windowHeight",
            "minimizeToTray",
            "startMinimized",
            "customCSS",
            "zoomLevel",
            "autoReload",
            "blockAds",
            "disableAll",
        ] {
            assert!(raw.contains(&format!("\"{key}\"")), "missing key {key}");
        }
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at_path(dir.path().join("nested").join("settings.json"));

        assert!(store.save(&Settings::default()));
        assert!(store.path().is_file());
    }

    #[test]
    fn save_returns_false_for_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "occupied").unwrap();
        let store = SettingsStore::at_path(blocker.join("settings.json"));

        assert!(!store.save(&Settings::default()));
        assert!(matches!(
            store.try_save(&Settings::default()),
            Err(SettingsError::CreateDir { .. })
        ));
    }

    #[test]
    fn effective_window_size_respects_minimum() {
        let settings = Settings {
            window_width: 0,
            window_height: 700,
            ..Settings::default()
        };

        assert_eq!(settings.effective_window_size(), (800, 700));
    }

    #[test]
    fn effective_zoom_rejects_non_positive_values() {
        let mut settings = Settings::default();
        settings.zoom_level = 0.0;
        assert_eq!(settings.effective_zoom(), 1.0);
        settings.zoom_level = f64::NAN;
        assert_eq!(settings.effective_zoom(), 1.0);
        settings.zoom_level = 1.5;
        assert_eq!(settings.effective_zoom(), 1.5);
    }
}

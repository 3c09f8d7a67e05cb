use std::sync::Mutex;

use crate::settings::{Settings, SettingsStore};

/// The settings record of the running session and the store that mirrors it.
#[derive(Debug)]
pub(crate) struct SettingsState {
    store: SettingsStore,
    current: Mutex<Settings>,
}

impl SettingsState {
    pub(crate) fn load(store: SettingsStore) -> Self {
        let current = store.load();
        Self {
            store,
            current: Mutex::new(current),
        }
    }

    pub(crate) fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub(crate) fn current(&self) -> Settings {
        match self.current.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_current(&self, settings: Settings) {
        match self.current.lock() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }

    /// Makes `next` the running record and persists it.
    ///
    /// The running record is replaced whether or not the write succeeds;
    /// `on_persisted` only runs after a successful write.
    pub(crate) fn replace<F>(&self, next: Settings, on_persisted: F) -> bool
    where
        F: FnOnce(&Settings),
    {
        let saved = self.store.save(&next);
        self.set_current(next);
        if saved {
            on_persisted(&self.current());
        }
        saved
    }

    pub(crate) fn remember_window_size(&self, width: u32, height: u32) -> bool {
        let mut next = self.current();
        if next.window_width == width && next.window_height == height {
            return true;
        }
        next.window_width = width;
        next.window_height = height;
        self.replace(next, |_| {})
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, fs};

    use super::*;

    #[test]
    fn load_uses_persisted_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "darkMode": true }"#).unwrap();

        let state = SettingsState::load(SettingsStore::at_path(path));

        assert!(state.current().dark_mode);
    }

    #[test]
    fn replace_runs_callback_after_successful_save() {
        let dir = tempfile::tempdir().unwrap();
        let state = SettingsState::load(SettingsStore::at_path(dir.path().join("settings.json")));
        let next = Settings {
            hide_sidebar: false,
            ..Settings::default()
        };
        let calls = Cell::new(0);

        assert!(state.replace(next.clone(), |applied| {
            assert_eq!(applied, &next);
            calls.set(calls.get() + 1);
        }));

        assert_eq!(calls.get(), 1);
        assert_eq!(state.current(), next);
        assert_eq!(state.store().load(), next);
    }

    #[test]
    fn failed_save_returns_false_and_keeps_submitted_record_intact() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "occupied").unwrap();
        let state = SettingsState::load(SettingsStore::at_path(blocker.join("settings.json")));
        let next = Settings {
            custom_css: ".x{color:red}".to_string(),
            zoom_level: 1.1,
            ..Settings::default()
        };
        let calls = Cell::new(0);

        assert!(!state.replace(next.clone(), |_| calls.set(calls.get() + 1)));

        assert_eq!(calls.get(), 0);
        assert_eq!(state.current(), next);
    }

    #[test]
    fn remember_window_size_persists_new_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let state = SettingsState::load(SettingsStore::at_path(dir.path().join("settings.json")));

        assert!(state.remember_window_size(1024, 768));

        let reloaded = state.store().load();
        assert_eq!((reloaded.window_width, reloaded.window_height), (1024, 768));
    }
}

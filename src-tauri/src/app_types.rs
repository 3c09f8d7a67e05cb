use std::sync::atomic::{AtomicBool, Ordering};

use tauri::menu::MenuItem;

use crate::{
    injection::ConfigApplicator, reapply_timer::ReapplyTimer, settings::SettingsStore,
    settings_state::SettingsState, task_slot::TaskSlot,
};

/// Tray menu items kept so their labels can be changed after the menu is built.
#[derive(Clone)]
pub(crate) struct TrayMenuState {
    items: Vec<MenuItem<tauri::Wry>>,
}

impl TrayMenuState {
    pub(crate) fn new(items: Vec<MenuItem<tauri::Wry>>) -> Self {
        Self { items }
    }

    pub(crate) fn item(&self, menu_id: &str) -> Option<&MenuItem<tauri::Wry>> {
        self.items
            .iter()
            .find(|item| item.id().as_ref() == menu_id)
    }
}

/// Everything the shell keeps for the lifetime of the process.
#[derive(Debug)]
pub(crate) struct ShellState {
    pub(crate) settings: SettingsState,
    pub(crate) applicator: ConfigApplicator,
    pub(crate) reapply_timer: ReapplyTimer,
    /// Pending write of the main window size; resizes restart it.
    pub(crate) window_size_save: TaskSlot,
    is_quitting: AtomicBool,
}

impl ShellState {
    pub(crate) fn new(store: SettingsStore) -> Self {
        Self {
            settings: SettingsState::load(store),
            applicator: ConfigApplicator::default(),
            reapply_timer: ReapplyTimer::default(),
            window_size_save: TaskSlot::default(),
            is_quitting: AtomicBool::new(false),
        }
    }

    pub(crate) fn mark_quitting(&self) {
        self.is_quitting.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.is_quitting.load(Ordering::Relaxed)
    }
}

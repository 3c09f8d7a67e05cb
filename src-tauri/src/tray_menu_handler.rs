use tauri::{AppHandle, Manager};

use crate::{append_desktop_log, settings_window, tray_actions, window_actions, ShellState};

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ToggleWindow) => {
            window_actions::toggle_main_window(app_handle, append_desktop_log)
        }
        Some(tray_actions::TrayMenuAction::OpenSettings) => {
            if let Err(error) = settings_window::open_settings_window(app_handle) {
                append_desktop_log(&format!("failed to open settings window from tray: {error}"));
            }
        }
        Some(tray_actions::TrayMenuAction::ReloadWindow) => {
            window_actions::reload_main_window(
                app_handle,
                window_actions::ReloadKind::Soft,
                append_desktop_log,
            )
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            if let Some(state) = app_handle.try_state::<ShellState>() {
                state.mark_quitting();
            }
            append_desktop_log("tray quit requested, exiting desktop process");
            app_handle.exit(0);
        }
        None => {}
    }
}

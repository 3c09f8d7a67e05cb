use tauri::{AppHandle, Emitter, Manager};

use crate::{
    append_desktop_log, settings::Settings, shell_controller, ShellState, SETTINGS_SAVED_EVENT,
    SETTINGS_WINDOW_LABEL,
};

#[tauri::command]
pub(crate) fn load_settings(app_handle: AppHandle) -> Settings {
    app_handle
        .try_state::<ShellState>()
        .map(|state| state.settings.current())
        .unwrap_or_default()
}

#[tauri::command]
pub(crate) fn save_settings(app_handle: AppHandle, settings: Settings) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        append_desktop_log("save_settings ignored: shell state is not ready");
        return;
    };

    let saved = state.settings.replace(settings, |persisted| {
        shell_controller::on_settings_persisted(&app_handle, persisted)
    });
    append_desktop_log(&format!(
        "settings saved to {}: {saved}",
        state.settings.store().path().display()
    ));

    if let Err(error) = app_handle.emit_to(SETTINGS_WINDOW_LABEL, SETTINGS_SAVED_EVENT, saved) {
        append_desktop_log(&format!("failed to emit {SETTINGS_SAVED_EVENT}: {error}"));
    }
}

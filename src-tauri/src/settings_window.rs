use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::{
    BRAND_NAME, MAIN_WINDOW_LABEL, SETTINGS_PAGE_PATH, SETTINGS_WINDOW_HEIGHT,
    SETTINGS_WINDOW_LABEL, SETTINGS_WINDOW_WIDTH,
};

/// Opens the settings surface, or focuses it when it is already open.
pub(crate) fn open_settings_window(app_handle: &AppHandle) -> Result<(), String> {
    if let Some(existing) = app_handle.get_webview_window(SETTINGS_WINDOW_LABEL) {
        existing
            .show()
            .and_then(|_| existing.set_focus())
            .map_err(|error| format!("Failed to focus settings window: {error}"))?;
        return Ok(());
    }

    let mut builder = WebviewWindowBuilder::new(
        app_handle,
        SETTINGS_WINDOW_LABEL,
        WebviewUrl::App(SETTINGS_PAGE_PATH.into()),
    )
    .title(format!("{BRAND_NAME} Settings"))
    .inner_size(SETTINGS_WINDOW_WIDTH, SETTINGS_WINDOW_HEIGHT)
    .resizable(false);

    if let Some(main_window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        builder = builder
            .parent(&main_window)
            .map_err(|error| format!("Failed to attach settings window to main window: {error}"))?;
    }

    builder
        .build()
        .map(|_| ())
        .map_err(|error| format!("Failed to create settings window: {error}"))
}

use tauri::{AppHandle, Manager};

use crate::{main_window, tray_labels, MAIN_WINDOW_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    Soft,
    Force,
}

/// Shows or hides the main window and keeps the tray toggle label in sync.
pub fn set_main_window_visible<F>(app_handle: &AppHandle, visible: bool, log: F)
where
    F: Fn(&str),
{
    if visible {
        main_window::show_main_window(app_handle, &log);
    } else {
        main_window::hide_main_window(app_handle, &log);
    }
    tray_labels::refresh_tray_labels(app_handle, Some(visible), log);
}

pub fn toggle_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("toggle_main_window skipped: main window not found");
        return;
    };

    match window.is_visible() {
        Ok(visible) => set_main_window_visible(app_handle, !visible, log),
        Err(error) => log(&format!(
            "failed to read main window visibility in toggle_main_window: {error}"
        )),
    }
}

pub fn reload_main_window<F>(app_handle: &AppHandle, kind: ReloadKind, log: F)
where
    F: Fn(&str),
{
    match kind {
        ReloadKind::Soft => main_window::reload_main_window(app_handle, log),
        ReloadKind::Force => main_window::force_reload_main_window(app_handle, log),
    }
}

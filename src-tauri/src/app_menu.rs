use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle, Manager,
};

use crate::{
    append_desktop_log, settings_window, shell_locale, window_actions,
    window_actions::ReloadKind, ShellState, DEFAULT_SHELL_LOCALE,
};

pub const MENU_OPEN_SETTINGS: &str = "menu_open_settings";
pub const MENU_QUIT: &str = "menu_quit";
pub const MENU_RELOAD: &str = "menu_reload";
pub const MENU_FORCE_RELOAD: &str = "menu_force_reload";
pub const MENU_TOGGLE_DEVTOOLS: &str = "menu_toggle_devtools";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMenuAction {
    OpenSettings,
    Quit,
    Reload,
    ForceReload,
    ToggleDevtools,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<AppMenuAction> {
    match menu_id {
        MENU_OPEN_SETTINGS => Some(AppMenuAction::OpenSettings),
        MENU_QUIT => Some(AppMenuAction::Quit),
        MENU_RELOAD => Some(AppMenuAction::Reload),
        MENU_FORCE_RELOAD => Some(AppMenuAction::ForceReload),
        MENU_TOGGLE_DEVTOOLS => Some(AppMenuAction::ToggleDevtools),
        _ => None,
    }
}

fn devtools_available() -> bool {
    cfg!(any(debug_assertions, feature = "devtools"))
}

pub fn build_app_menu(app_handle: &AppHandle) -> Result<Menu<tauri::Wry>, String> {
    let locale = shell_locale::resolve_shell_locale(DEFAULT_SHELL_LOCALE);
    let texts = shell_locale::shell_texts_for_locale(locale);

    let settings_item = MenuItem::with_id(
        app_handle,
        MENU_OPEN_SETTINGS,
        texts.menu_settings,
        true,
        Some("CmdOrCtrl+,"),
    )
    .map_err(|error| format!("Failed to create settings menu item: {error}"))?;
    let quit_item = MenuItem::with_id(app_handle, MENU_QUIT, texts.menu_quit, true, Some("CmdOrCtrl+Q"))
        .map_err(|error| format!("Failed to create quit menu item: {error}"))?;
    let reload_item = MenuItem::with_id(
        app_handle,
        MENU_RELOAD,
        texts.menu_reload,
        true,
        Some("CmdOrCtrl+R"),
    )
    .map_err(|error| format!("Failed to create reload menu item: {error}"))?;
    let force_reload_item = MenuItem::with_id(
        app_handle,
        MENU_FORCE_RELOAD,
        texts.menu_force_reload,
        true,
        Some("CmdOrCtrl+Shift+R"),
    )
    .map_err(|error| format!("Failed to create force reload menu item: {error}"))?;
    let devtools_accelerator = if cfg!(target_os = "macos") {
        "Alt+Cmd+I"
    } else {
        "Ctrl+Shift+I"
    };
    let devtools_item = MenuItem::with_id(
        app_handle,
        MENU_TOGGLE_DEVTOOLS,
        texts.menu_devtools,
        devtools_available(),
        Some(devtools_accelerator),
    )
    .map_err(|error| format!("Failed to create devtools menu item: {error}"))?;
    let file_separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create menu separator: {error}"))?;
    let view_separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create menu separator: {error}"))?;

    let file_menu = Submenu::with_items(
        app_handle,
        texts.menu_file,
        true,
        &[&settings_item, &file_separator, &quit_item],
    )
    .map_err(|error| format!("Failed to build file menu: {error}"))?;
    let view_menu = Submenu::with_items(
        app_handle,
        texts.menu_view,
        true,
        &[&reload_item, &force_reload_item, &view_separator, &devtools_item],
    )
    .map_err(|error| format!("Failed to build view menu: {error}"))?;

    Menu::with_items(app_handle, &[&file_menu, &view_menu])
        .map_err(|error| format!("Failed to build application menu: {error}"))
}

#[cfg(any(debug_assertions, feature = "devtools"))]
pub(crate) fn toggle_devtools(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(crate::MAIN_WINDOW_LABEL) else {
        return;
    };
    if window.is_devtools_open() {
        window.close_devtools();
    } else {
        window.open_devtools();
    }
}

#[cfg(not(any(debug_assertions, feature = "devtools")))]
pub(crate) fn toggle_devtools(_app_handle: &AppHandle) {
    append_desktop_log("developer tools are not available in this build");
}

pub fn handle_app_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match action_from_menu_id(menu_id) {
        Some(AppMenuAction::OpenSettings) => {
            if let Err(error) = settings_window::open_settings_window(app_handle) {
                append_desktop_log(&format!("failed to open settings window: {error}"));
            }
        }
        Some(AppMenuAction::Quit) => {
            if let Some(state) = app_handle.try_state::<ShellState>() {
                state.mark_quitting();
            }
            append_desktop_log("menu quit requested, exiting desktop process");
            app_handle.exit(0);
        }
        Some(AppMenuAction::Reload) => {
            window_actions::reload_main_window(app_handle, ReloadKind::Soft, append_desktop_log)
        }
        Some(AppMenuAction::ForceReload) => {
            window_actions::reload_main_window(app_handle, ReloadKind::Force, append_desktop_log)
        }
        Some(AppMenuAction::ToggleDevtools) => toggle_devtools(app_handle),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_from_menu_id_maps_all_known_actions() {
        assert_eq!(
            action_from_menu_id(MENU_OPEN_SETTINGS),
            Some(AppMenuAction::OpenSettings)
        );
        assert_eq!(action_from_menu_id(MENU_QUIT), Some(AppMenuAction::Quit));
        assert_eq!(action_from_menu_id(MENU_RELOAD), Some(AppMenuAction::Reload));
        assert_eq!(
            action_from_menu_id(MENU_FORCE_RELOAD),
            Some(AppMenuAction::ForceReload)
        );
        assert_eq!(
            action_from_menu_id(MENU_TOGGLE_DEVTOOLS),
            Some(AppMenuAction::ToggleDevtools)
        );
    }

    #[test]
    fn app_menu_ids_do_not_collide_with_tray_ids() {
        for tray_id in [
            crate::tray_actions::TRAY_MENU_TOGGLE_WINDOW,
            crate::tray_actions::TRAY_MENU_OPEN_SETTINGS,
            crate::tray_actions::TRAY_MENU_RELOAD_WINDOW,
            crate::tray_actions::TRAY_MENU_QUIT,
        ] {
            assert_eq!(action_from_menu_id(tray_id), None);
        }
    }
}

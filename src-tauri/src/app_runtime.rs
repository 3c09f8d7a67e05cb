use std::{env, path::PathBuf};

use tauri::{webview::PageLoadEvent, AppHandle, Manager, RunEvent, WindowEvent};

use crate::{
    app_menu, append_desktop_log, append_startup_log, logging, main_window,
    settings::SettingsStore, shell_controller, tray_setup, window_actions, ShellState, DEV_FLAG,
    MAIN_WINDOW_LABEL, SETTINGS_FILE_NAME, SETTINGS_PATH_ENV,
};

pub(crate) fn settings_path_override(raw: Option<&str>) -> Option<PathBuf> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn resolve_settings_path(app_handle: &AppHandle) -> PathBuf {
    if let Some(path) = settings_path_override(env::var(SETTINGS_PATH_ENV).ok().as_deref()) {
        return path;
    }

    match app_handle.path().app_data_dir() {
        Ok(dir) => dir.join(SETTINGS_FILE_NAME),
        Err(error) => {
            log::warn!("app data directory is unavailable ({error}); using working directory");
            PathBuf::from(SETTINGS_FILE_NAME)
        }
    }
}

fn wants_devtools_on_start() -> bool {
    env::args().any(|arg| arg == DEV_FLAG)
}

pub(crate) fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            append_desktop_log("second instance launched, focusing main window");
            window_actions::set_main_window_visible(app, true, append_desktop_log);
        }))
        .plugin(logging::build_log_plugin())
        .invoke_handler(tauri::generate_handler![
            crate::settings_commands::load_settings,
            crate::settings_commands::save_settings,
        ])
        .menu(|app_handle| {
            app_menu::build_app_menu(app_handle).map_err(|error| {
                append_startup_log(&error);
                tauri::Error::Io(std::io::Error::other(error))
            })
        })
        .on_menu_event(|app_handle, event| {
            app_menu::handle_app_menu_event(app_handle, event.id().as_ref())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            match event {
                WindowEvent::CloseRequested { api, .. } => {
                    if shell_controller::handle_main_window_close_requested(window) {
                        api.prevent_close();
                    }
                }
                WindowEvent::Resized(size) => {
                    shell_controller::handle_main_window_resized(window, size);
                }
                WindowEvent::Destroyed => {
                    shell_controller::handle_main_window_destroyed(window.app_handle());
                }
                _ => {}
            }
        })
        .on_page_load(|webview, payload| {
            if webview.label() != MAIN_WINDOW_LABEL {
                return;
            }
            match payload.event() {
                PageLoadEvent::Started => {
                    append_desktop_log(&format!("page-load started: {}", payload.url()));
                    shell_controller::handle_main_page_started(webview);
                }
                PageLoadEvent::Finished => {
                    append_desktop_log(&format!("page-load finished: {}", payload.url()));
                    shell_controller::handle_main_page_finished(webview, payload.url());
                }
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            append_startup_log("desktop process starting");

            let settings_path = resolve_settings_path(&app_handle);
            append_startup_log(&format!("settings path: {}", settings_path.display()));
            app.manage(ShellState::new(SettingsStore::at_path(settings_path)));

            let settings = app_handle.state::<ShellState>().settings.current();
            match main_window::build_main_window(&app_handle, &settings) {
                Ok(window) => {
                    if wants_devtools_on_start() {
                        open_devtools_on_start(&window);
                    }
                }
                Err(error) => append_startup_log(&error),
            }

            if let Err(error) = tray_setup::setup_tray(&app_handle) {
                append_startup_log(&format!("failed to initialize tray: {error}"));
            }

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                if code.is_none() && shell_controller::should_keep_running(app_handle) {
                    append_desktop_log("all windows closed, staying in tray");
                    api.prevent_exit();
                }
            }
            RunEvent::Exit => {
                if let Some(state) = app_handle.try_state::<ShellState>() {
                    state.mark_quitting();
                    state.reapply_timer.cancel();
                }
                append_desktop_log("desktop process exiting");
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                window_actions::set_main_window_visible(app_handle, true, append_desktop_log);
            }
            _ => {}
        });
}

#[cfg(any(debug_assertions, feature = "devtools"))]
fn open_devtools_on_start(window: &tauri::WebviewWindow) {
    window.open_devtools();
}

#[cfg(not(any(debug_assertions, feature = "devtools")))]
fn open_devtools_on_start(_window: &tauri::WebviewWindow) {
    append_startup_log("--dev ignored: developer tools are not available in this build");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::settings_path_override;

    #[test]
    fn settings_path_override_ignores_blank_values() {
        assert_eq!(settings_path_override(None), None);
        assert_eq!(settings_path_override(Some("   ")), None);
    }

    #[test]
    fn settings_path_override_trims_value() {
        assert_eq!(
            settings_path_override(Some(" /tmp/perlient/settings.json ")),
            Some(PathBuf::from("/tmp/perlient/settings.json"))
        );
    }
}

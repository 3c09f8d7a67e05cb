//! Glue between the host windows and the settings/applicator state.

use std::time::Duration;

use tauri::{AppHandle, Manager, PhysicalSize, Webview, Window};
use url::Url;

use crate::{
    append_desktop_log,
    injection::DocumentHandle,
    load_failure::{self, LoadFailure},
    main_window, page_policy,
    settings::Settings,
    ui_dispatch,
    window_actions::{self, ReloadKind},
    ShellState, AUTO_RELOAD_DELAY, CONNECTIVITY_PROBE_TIMEOUT, MAIN_WINDOW_LABEL,
    REAPPLY_INTERVAL, SETTINGS_RELOAD_DELAY, TARGET_URL, WINDOW_SIZE_SAVE_DELAY,
};

fn apply_if_patchable<D>(state: &ShellState, document: &D, url: &Url)
where
    D: DocumentHandle + ?Sized,
{
    if !page_policy::should_patch_page(url) {
        log::debug!("skipping page patches for {url}");
        return;
    }
    let settings = state.settings.current();
    state.applicator.apply(&settings, document);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerCommand {
    Restart,
    Cancel,
}

/// What the reapply timer does once the main webview finished loading `url`.
pub(crate) fn timer_command_after_load(url: &Url) -> TimerCommand {
    if page_policy::is_target_page(url) {
        TimerCommand::Restart
    } else {
        TimerCommand::Cancel
    }
}

/// Whether a timer tick keeps going given the main window's current URL;
/// `None` when the window or its URL is unavailable.
pub(crate) fn keeps_ticking(current: Option<&Url>) -> bool {
    current.is_some_and(page_policy::is_target_page)
}

pub(crate) fn should_check_connectivity_after_load(url: &Url) -> bool {
    page_policy::is_target_page(url) || !page_policy::is_navigation_allowed(url)
}

/// Logical size to persist for a resize, `None` while minimized.
pub(crate) fn window_size_to_persist(
    size: PhysicalSize<u32>,
    scale_factor: f64,
) -> Option<(u32, u32)> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    let logical = size.to_logical::<f64>(scale_factor);
    Some((logical.width.round() as u32, logical.height.round() as u32))
}

pub(crate) fn handle_main_page_started(webview: &Webview) {
    let Some(state) = webview.app_handle().try_state::<ShellState>() else {
        return;
    };
    // no ticks against a document that is still loading
    state.reapply_timer.cancel();
    state.applicator.begin_session();
}

pub(crate) fn handle_main_page_finished(webview: &Webview, url: &Url) {
    let app_handle = webview.app_handle();
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };

    match timer_command_after_load(url) {
        TimerCommand::Restart => {
            state.applicator.mark_document_ready();
            apply_if_patchable(state.inner(), webview, url);
            restart_reapply_timer(app_handle, state.inner());
        }
        TimerCommand::Cancel => state.reapply_timer.cancel(),
    }

    if should_check_connectivity_after_load(url) {
        spawn_load_failure_probe(app_handle.clone(), url.to_string());
    }
}

fn restart_reapply_timer(app_handle: &AppHandle, state: &ShellState) {
    let tick_app = app_handle.clone();
    state.reapply_timer.restart(REAPPLY_INTERVAL, move || {
        if let Err(error) =
            ui_dispatch::run_on_main_thread_dispatch(&tick_app, "reapply page patches", reapply_tick)
        {
            log::warn!("{error}");
        }
    });
}

/// One tick of the reapply timer; runs on the main thread.
pub(crate) fn reapply_tick(app_handle: &AppHandle) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };
    let window = app_handle.get_webview_window(MAIN_WINDOW_LABEL);
    let url = window.as_ref().and_then(|window| match window.url() {
        Ok(url) => Some(url),
        Err(error) => {
            append_desktop_log(&format!("failed to read main window url: {error}"));
            None
        }
    });

    if !keeps_ticking(url.as_ref()) {
        log::debug!("main window left the target site, stopping reapply timer");
        state.reapply_timer.cancel();
        return;
    }
    if let (Some(window), Some(url)) = (window, url) {
        apply_if_patchable(state.inner(), &window, &url);
    }
}

fn target_host_and_port() -> Option<(String, u16)> {
    let target = Url::parse(TARGET_URL).ok()?;
    let host = target.host_str()?.to_string();
    Some((host, target.port_or_known_default().unwrap_or(443)))
}

fn spawn_load_failure_probe(app_handle: AppHandle, url: String) {
    let Some((host, port)) = target_host_and_port() else {
        return;
    };

    tauri::async_runtime::spawn(async move {
        let probe = tauri::async_runtime::spawn_blocking(move || {
            load_failure::probe_connectivity(&host, port, CONNECTIVITY_PROBE_TIMEOUT)
        })
        .await;
        let Ok(Some((code, description))) = probe else {
            return;
        };

        let failure = LoadFailure {
            code,
            description,
            url,
        };
        if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
            &app_handle,
            "report page load failure",
            move |main_app| handle_load_failure(main_app, &failure),
        ) {
            append_desktop_log(&error);
        }
    });
}

pub(crate) fn handle_load_failure(app_handle: &AppHandle, failure: &LoadFailure) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };
    let settings = state.settings.current();
    let response = load_failure::decide_failure_response(failure.code, settings.auto_reload);

    if response.show_fallback {
        log::error!(
            "page load failed: code={} description={} url={}",
            failure.code,
            failure.description,
            failure.url
        );
        if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
            if let Err(error) = window.eval(&load_failure::fallback_page_script(failure)) {
                append_desktop_log(&format!("failed to show load failure message: {error}"));
            }
        }
    } else {
        log::info!(
            "ignoring benign page load failure: code={} url={}",
            failure.code,
            failure.url
        );
    }

    if response.schedule_reload {
        schedule_main_window_reload(app_handle, AUTO_RELOAD_DELAY, "auto reload after failure");
    }
}

pub(crate) fn schedule_main_window_reload(app_handle: &AppHandle, delay: Duration, reason: &'static str) {
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(&app_handle, reason, |main_app| {
            window_actions::reload_main_window(main_app, ReloadKind::Soft, append_desktop_log);
        }) {
            append_desktop_log(&error);
        }
    });
}

/// Settings-change callback: window-level settings take effect immediately,
/// page-level settings after the reload.
pub(crate) fn on_settings_persisted(app_handle: &AppHandle, settings: &Settings) {
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        main_window::apply_zoom(&window, settings.effective_zoom());
        main_window::apply_background(&window, settings.dark_mode);
    }
    schedule_main_window_reload(app_handle, SETTINGS_RELOAD_DELAY, "reload after settings change");
}

pub(crate) fn handle_main_window_resized(window: &Window, size: &PhysicalSize<u32>) {
    let Ok(scale_factor) = window.scale_factor() else {
        return;
    };
    let Some((width, height)) = window_size_to_persist(*size, scale_factor) else {
        return;
    };
    let app_handle = window.app_handle();
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };

    // a drag emits a stream of resizes; only the last one is written
    let save_app = app_handle.clone();
    state
        .window_size_save
        .schedule(WINDOW_SIZE_SAVE_DELAY, move || {
            let Some(state) = save_app.try_state::<ShellState>() else {
                return;
            };
            if !state.settings.remember_window_size(width, height) {
                append_desktop_log("failed to persist main window size");
            }
        });
}

pub(crate) fn handle_main_window_close_requested(window: &Window) -> bool {
    let app_handle = window.app_handle();
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return false;
    };
    if state.is_quitting() || !state.settings.current().minimize_to_tray {
        return false;
    }

    window_actions::set_main_window_visible(app_handle, false, append_desktop_log);
    true
}

pub(crate) fn handle_main_window_destroyed(app_handle: &AppHandle) {
    if let Some(state) = app_handle.try_state::<ShellState>() {
        state.reapply_timer.cancel();
    }
}

pub(crate) fn should_keep_running(app_handle: &AppHandle) -> bool {
    app_handle
        .try_state::<ShellState>()
        .is_some_and(|state| !state.is_quitting() && state.settings.current().minimize_to_tray)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn finished_target_load_restarts_timer() {
        assert_eq!(
            timer_command_after_load(&url("https://www.perplexity.ai/search/abc")),
            TimerCommand::Restart
        );
        assert_eq!(
            timer_command_after_load(&url("https://www.google.com/recaptcha/api2/anchor")),
            TimerCommand::Cancel
        );
        assert_eq!(
            timer_command_after_load(&url("about:blank")),
            TimerCommand::Cancel
        );
    }

    #[test]
    fn tick_stops_when_window_left_target_or_is_gone() {
        assert!(keeps_ticking(Some(&url("https://perplexity.ai/library"))));
        assert!(!keeps_ticking(Some(&url("https://github.com/"))));
        assert!(!keeps_ticking(None));
    }

    #[test]
    fn connectivity_check_runs_for_target_and_foreign_pages_only() {
        assert!(should_check_connectivity_after_load(&url("https://www.perplexity.ai/")));
        assert!(should_check_connectivity_after_load(&url("https://example.com/")));
        assert!(!should_check_connectivity_after_load(&url("https://www.gstatic.com/recaptcha/x")));
        assert!(!should_check_connectivity_after_load(&url("about:blank")));
    }

    #[test]
    fn window_size_uses_logical_pixels_and_skips_minimized() {
        assert_eq!(
            window_size_to_persist(PhysicalSize::new(2400, 1600), 2.0),
            Some((1200, 800))
        );
        assert_eq!(
            window_size_to_persist(PhysicalSize::new(1280, 720), 1.0),
            Some((1280, 720))
        );
        assert_eq!(window_size_to_persist(PhysicalSize::new(0, 0), 1.0), None);
    }
}

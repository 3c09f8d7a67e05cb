use tauri::{
    webview::{NewWindowFeatures, NewWindowResponse},
    window::Color,
    AppHandle, Manager, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder, Wry,
};
use url::Url;

use crate::{
    append_desktop_log, external_links,
    page_policy::{self, NewWindowAction},
    settings::Settings,
    BRAND_NAME, DARK_BACKGROUND_RGB, DESKTOP_USER_AGENT, LIGHT_BACKGROUND_RGB, MAIN_WINDOW_LABEL,
    MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH, TARGET_URL,
};

pub(crate) fn background_color(dark_mode: bool) -> Color {
    let (r, g, b) = if dark_mode {
        DARK_BACKGROUND_RGB
    } else {
        LIGHT_BACKGROUND_RGB
    };
    Color(r, g, b, 255)
}

fn handle_navigation(url: &Url) -> bool {
    if page_policy::is_navigation_allowed(url) {
        return true;
    }

    if page_policy::should_open_externally(url) {
        open_externally(url);
    } else {
        append_desktop_log(&format!("blocked navigation to {url}"));
    }
    false
}

fn open_externally(url: &Url) {
    append_desktop_log(&format!("opening external link in system browser: {url}"));
    if let Err(error) = external_links::open_url_with_system_browser(url.as_str()) {
        append_desktop_log(&format!("failed to open external link {url}: {error}"));
    }
}

fn handle_new_window(url: Url, _features: NewWindowFeatures) -> NewWindowResponse<Wry> {
    match page_policy::new_window_action(&url) {
        NewWindowAction::Allow => NewWindowResponse::Allow,
        NewWindowAction::OpenExternally => {
            open_externally(&url);
            NewWindowResponse::Deny
        }
        NewWindowAction::Deny => {
            append_desktop_log(&format!("blocked new window for {url}"));
            NewWindowResponse::Deny
        }
    }
}

pub(crate) fn build_main_window(
    app_handle: &AppHandle,
    settings: &Settings,
) -> Result<WebviewWindow, String> {
    let target_url =
        Url::parse(TARGET_URL).map_err(|error| format!("Invalid target URL {TARGET_URL}: {error}"))?;
    let (width, height) = settings.effective_window_size();

    let window = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::External(target_url),
    )
    .title(BRAND_NAME)
    .inner_size(f64::from(width), f64::from(height))
    .min_inner_size(f64::from(MIN_WINDOW_WIDTH), f64::from(MIN_WINDOW_HEIGHT))
    .background_color(background_color(settings.dark_mode))
    .user_agent(DESKTOP_USER_AGENT)
    .visible(!settings.start_minimized)
    .on_navigation(handle_navigation)
    .on_new_window(handle_new_window)
    .build()
    .map_err(|error| format!("Failed to create main window: {error}"))?;

    apply_zoom(&window, settings.effective_zoom());
    Ok(window)
}

pub(crate) fn apply_zoom<R: Runtime>(window: &WebviewWindow<R>, zoom: f64) {
    if let Err(error) = window.set_zoom(zoom) {
        append_desktop_log(&format!("failed to set main window zoom to {zoom}: {error}"));
    }
}

pub(crate) fn apply_background<R: Runtime>(window: &WebviewWindow<R>, dark_mode: bool) {
    if let Err(error) = window.set_background_color(Some(background_color(dark_mode))) {
        append_desktop_log(&format!("failed to set main window background: {error}"));
    }
}

pub(crate) fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub(crate) fn hide_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("hide_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.hide() {
        log(&format!("failed to hide main window: {error}"));
    }
}

pub(crate) fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("reload_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.eval("window.location.reload();") {
        log(&format!("failed to reload main window: {error}"));
    }
}

/// Navigates back to the target site, which also drops cached page state the
/// soft reload keeps.
pub(crate) fn force_reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("force_reload_main_window skipped: main window not found");
        return;
    };

    let current = window.url().ok().filter(page_policy::is_target_page);
    let destination = current.map(|url| url.to_string()).unwrap_or_else(|| TARGET_URL.to_string());
    let js = format!(
        "window.location.replace({});",
        serde_json::to_string(&destination).unwrap_or_else(|_| "\"/\"".to_string())
    );
    if let Err(error) = window.eval(&js) {
        log(&format!("failed to force reload main window: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_color_follows_dark_mode() {
        assert_eq!(background_color(true), Color(0x1a, 0x1a, 0x1a, 255));
        assert_eq!(background_color(false), Color(0xff, 0xff, 0xff, 255));
    }
}

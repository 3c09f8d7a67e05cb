use tauri::{AppHandle, Manager};

use crate::{
    shell_locale::{self, ShellTexts},
    tray_actions, TrayMenuState, DEFAULT_SHELL_LOCALE, MAIN_WINDOW_LABEL,
};

/// Tray entries in menu order, as `(menu id, label)`.
pub(crate) fn tray_entries(
    texts: &ShellTexts,
    main_window_visible: bool,
) -> [(&'static str, &'static str); 4] {
    let toggle_label = if main_window_visible {
        texts.tray_hide
    } else {
        texts.tray_show
    };

    [
        (tray_actions::TRAY_MENU_TOGGLE_WINDOW, toggle_label),
        (tray_actions::TRAY_MENU_OPEN_SETTINGS, texts.tray_settings),
        (tray_actions::TRAY_MENU_RELOAD_WINDOW, texts.tray_reload),
        (tray_actions::TRAY_MENU_QUIT, texts.tray_quit),
    ]
}

pub(crate) fn current_shell_texts() -> ShellTexts {
    shell_locale::shell_texts_for_locale(shell_locale::resolve_shell_locale(DEFAULT_SHELL_LOCALE))
}

pub(crate) fn main_window_visible(app_handle: &AppHandle) -> bool {
    app_handle
        .get_webview_window(MAIN_WINDOW_LABEL)
        .and_then(|window| window.is_visible().ok())
        .unwrap_or(true)
}

/// Re-labels the tray menu; `visible_override` skips asking the window, which
/// may not have applied a pending show/hide yet.
pub fn refresh_tray_labels<F>(app_handle: &AppHandle, visible_override: Option<bool>, log: F)
where
    F: Fn(&str),
{
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };

    let visible = visible_override.unwrap_or_else(|| main_window_visible(app_handle));
    for (menu_id, label) in tray_entries(&current_shell_texts(), visible) {
        let Some(item) = tray_state.item(menu_id) else {
            continue;
        };
        if let Err(error) = item.set_text(label) {
            log(&format!("failed to update tray menu text for {menu_id}: {error}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_label_follows_window_visibility() {
        let texts = shell_locale::shell_texts_for_locale("en-US");

        assert_eq!(tray_entries(&texts, true)[0].1, "Hide Perlient");
        assert_eq!(tray_entries(&texts, false)[0].1, "Show Perlient");
    }

    #[test]
    fn tray_entries_map_to_known_actions() {
        let texts = shell_locale::shell_texts_for_locale("ru-RU");

        for (menu_id, label) in tray_entries(&texts, true) {
            assert!(tray_actions::action_from_menu_id(menu_id).is_some());
            assert!(!label.is_empty());
        }
        assert_eq!(
            tray_entries(&texts, true)[3],
            (tray_actions::TRAY_MENU_QUIT, "Выход")
        );
    }
}

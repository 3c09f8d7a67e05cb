use std::env;

use crate::LOCALE_ENV;

#[derive(Debug, Clone, Copy)]
pub struct ShellTexts {
    pub tray_hide: &'static str,
    pub tray_show: &'static str,
    pub tray_settings: &'static str,
    pub tray_reload: &'static str,
    pub tray_quit: &'static str,
    pub menu_file: &'static str,
    pub menu_settings: &'static str,
    pub menu_quit: &'static str,
    pub menu_view: &'static str,
    pub menu_reload: &'static str,
    pub menu_force_reload: &'static str,
    pub menu_devtools: &'static str,
}

pub fn shell_texts_for_locale(locale: &str) -> ShellTexts {
    if locale == "ru-RU" {
        return ShellTexts {
            tray_hide: "Скрыть Perlient",
            tray_show: "Показать Perlient",
            tray_settings: "Настройки",
            tray_reload: "Перезагрузить",
            tray_quit: "Выход",
            menu_file: "Файл",
            menu_settings: "Настройки",
            menu_quit: "Выход",
            menu_view: "Вид",
            menu_reload: "Перезагрузить",
            menu_force_reload: "Полная перезагрузка",
            menu_devtools: "Инструменты разработчика",
        };
    }

    ShellTexts {
        tray_hide: "Hide Perlient",
        tray_show: "Show Perlient",
        tray_settings: "Settings",
        tray_reload: "Reload",
        tray_quit: "Quit",
        menu_file: "File",
        menu_settings: "Settings",
        menu_quit: "Quit",
        menu_view: "View",
        menu_reload: "Reload",
        menu_force_reload: "Force Reload",
        menu_devtools: "Developer Tools",
    }
}

pub fn resolve_shell_locale(default_shell_locale: &'static str) -> &'static str {
    for env_key in [LOCALE_ENV, "LC_ALL", "LANG"] {
        if let Ok(value) = env::var(env_key) {
            if let Some(locale) = normalize_shell_locale(&value) {
                return locale;
            }
        }
    }

    default_shell_locale
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw == "ru-RU" {
        return Some("ru-RU");
    }
    if raw == "en-US" {
        return Some("en-US");
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("ru") {
        return Some("ru-RU");
    }
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_texts_for_locale_returns_russian_copy() {
        let texts = shell_texts_for_locale("ru-RU");
        assert_eq!(texts.menu_file, "Файл");
        assert_eq!(texts.tray_quit, "Выход");
    }

    #[test]
    fn shell_texts_for_locale_falls_back_to_english_copy() {
        let texts = shell_texts_for_locale("de-DE");
        assert_eq!(texts.tray_show, "Show Perlient");
        assert_eq!(texts.menu_settings, "Settings");
    }

    #[test]
    fn normalize_shell_locale_accepts_language_prefixes() {
        assert_eq!(normalize_shell_locale("ru_RU.UTF-8"), Some("ru-RU"));
        assert_eq!(normalize_shell_locale("EN_gb"), Some("en-US"));
        assert_eq!(normalize_shell_locale("C"), None);
        assert_eq!(normalize_shell_locale("  "), None);
    }
}

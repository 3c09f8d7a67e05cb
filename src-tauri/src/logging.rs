use std::{env, str::FromStr};

use log::LevelFilter;
use tauri::{plugin::TauriPlugin, Runtime};
use tauri_plugin_log::{Target, TargetKind};

use crate::{LOG_FILE_NAME, LOG_LEVEL_ENV};

const DESKTOP_TARGET: &str = "perlient::desktop";
const STARTUP_TARGET: &str = "perlient::startup";

pub(crate) fn parse_log_level(raw: Option<&str>) -> LevelFilter {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| LevelFilter::from_str(value).ok())
        .unwrap_or(LevelFilter::Info)
}

pub(crate) fn build_log_plugin<R: Runtime>() -> TauriPlugin<R> {
    let level = parse_log_level(env::var(LOG_LEVEL_ENV).ok().as_deref());

    tauri_plugin_log::Builder::new()
        .clear_targets()
        .target(Target::new(TargetKind::Stdout))
        .target(Target::new(TargetKind::LogDir {
            file_name: Some(LOG_FILE_NAME.to_string()),
        }))
        .level(level)
        // webview engines are chatty at info level
        .level_for("tao", LevelFilter::Warn)
        .level_for("wry", LevelFilter::Warn)
        .build()
}

pub(crate) fn append_desktop_log(message: &str) {
    log::info!(target: DESKTOP_TARGET, "{message}");
}

pub(crate) fn append_startup_log(message: &str) {
    log::info!(target: STARTUP_TARGET, "{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_level_defaults_to_info() {
        assert_eq!(parse_log_level(None), LevelFilter::Info);
        assert_eq!(parse_log_level(Some("   ")), LevelFilter::Info);
        assert_eq!(parse_log_level(Some("chatty")), LevelFilter::Info);
    }

    #[test]
    fn parse_log_level_accepts_any_case() {
        assert_eq!(parse_log_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(parse_log_level(Some(" WARN ")), LevelFilter::Warn);
        assert_eq!(parse_log_level(Some("off")), LevelFilter::Off);
    }
}

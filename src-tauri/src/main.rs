#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_menu;
mod app_runtime;
mod app_types;
mod external_links;
mod injection;
mod load_failure;
mod logging;
mod main_window;
mod page_policy;
mod reapply_timer;
mod settings;
mod settings_commands;
mod settings_state;
mod settings_window;
mod shell_controller;
mod shell_locale;
mod task_slot;
mod tray_actions;
mod tray_labels;
mod tray_menu_handler;
mod tray_setup;
mod ui_dispatch;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{ShellState, TrayMenuState};
pub(crate) use logging::{append_desktop_log, append_startup_log};

fn main() {
    app_runtime::run();
}

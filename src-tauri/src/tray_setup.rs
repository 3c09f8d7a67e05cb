use tauri::{
    menu::{IsMenuItem, Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_desktop_log, tray_labels, tray_menu_handler, window_actions, TrayMenuState,
    BRAND_NAME, TRAY_ID,
};

fn build_tray_menu(app_handle: &AppHandle) -> Result<(Menu<tauri::Wry>, TrayMenuState), String> {
    let entries = tray_labels::tray_entries(
        &tray_labels::current_shell_texts(),
        tray_labels::main_window_visible(app_handle),
    );
    let items = entries
        .into_iter()
        .map(|(menu_id, label)| {
            MenuItem::with_id(app_handle, menu_id, label, true, None::<&str>)
                .map_err(|error| format!("Failed to create tray menu item {menu_id}: {error}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;

    // quit sits below the separator
    let mut menu_items: Vec<&dyn IsMenuItem<tauri::Wry>> = items
        .iter()
        .map(|item| item as &dyn IsMenuItem<tauri::Wry>)
        .collect();
    menu_items.insert(menu_items.len().saturating_sub(1), &separator);

    let menu = Menu::with_items(app_handle, &menu_items)
        .map_err(|error| format!("Failed to build tray menu: {error}"))?;
    Ok((menu, TrayMenuState::new(items)))
}

pub fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    let (menu, tray_state) = build_tray_menu(app_handle)?;
    if !app_handle.manage(tray_state) {
        append_desktop_log("tray menu state already exists, skipping manage");
    }

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(BRAND_NAME)
        .icon(tauri::include_image!("./icons/tray.png"))
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
        })
        .on_tray_icon_event(|tray, event| {
            let TrayIconEvent::Click {
                button,
                button_state: MouseButtonState::Up,
                ..
            } = event
            else {
                return;
            };

            let app_handle = tray.app_handle();
            if button == MouseButton::Left {
                window_actions::toggle_main_window(app_handle, append_desktop_log);
            } else {
                tray_labels::refresh_tray_labels(app_handle, None, append_desktop_log);
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;
    Ok(())
}

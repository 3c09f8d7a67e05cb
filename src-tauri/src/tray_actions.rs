pub const TRAY_MENU_TOGGLE_WINDOW: &str = "tray_toggle_window";
pub const TRAY_MENU_OPEN_SETTINGS: &str = "tray_open_settings";
pub const TRAY_MENU_RELOAD_WINDOW: &str = "tray_reload_window";
pub const TRAY_MENU_QUIT: &str = "tray_quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    ToggleWindow,
    OpenSettings,
    ReloadWindow,
    Quit,
}

impl TrayMenuAction {
    pub const ALL: [TrayMenuAction; 4] = [
        TrayMenuAction::ToggleWindow,
        TrayMenuAction::OpenSettings,
        TrayMenuAction::ReloadWindow,
        TrayMenuAction::Quit,
    ];

    pub fn menu_id(self) -> &'static str {
        match self {
            TrayMenuAction::ToggleWindow => TRAY_MENU_TOGGLE_WINDOW,
            TrayMenuAction::OpenSettings => TRAY_MENU_OPEN_SETTINGS,
            TrayMenuAction::ReloadWindow => TRAY_MENU_RELOAD_WINDOW,
            TrayMenuAction::Quit => TRAY_MENU_QUIT,
        }
    }
}

pub fn action_from_menu_id(menu_id: &str) -> Option<TrayMenuAction> {
    TrayMenuAction::ALL
        .into_iter()
        .find(|action| action.menu_id() == menu_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_ids_round_trip_through_actions() {
        for action in TrayMenuAction::ALL {
            assert_eq!(action_from_menu_id(action.menu_id()), Some(action));
        }
    }

    #[test]
    fn unknown_menu_id_has_no_action() {
        assert_eq!(action_from_menu_id("unknown-menu"), None);
        assert_eq!(action_from_menu_id(""), None);
    }
}

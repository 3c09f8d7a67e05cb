use std::time::Duration;

pub(crate) const BRAND_NAME: &str = "Perlient";
pub(crate) const ORIGINAL_BRAND_NAME: &str = "Perplexity";
pub(crate) const TARGET_URL: &str = "https://www.perplexity.ai";
pub(crate) const TARGET_DOMAIN: &str = "perplexity.ai";

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const SETTINGS_WINDOW_LABEL: &str = "settings";
pub(crate) const SETTINGS_PAGE_PATH: &str = "settings.html";
pub(crate) const TRAY_ID: &str = "perlient-tray";

pub(crate) const MIN_WINDOW_WIDTH: u32 = 800;
pub(crate) const MIN_WINDOW_HEIGHT: u32 = 600;
pub(crate) const SETTINGS_WINDOW_WIDTH: f64 = 550.0;
pub(crate) const SETTINGS_WINDOW_HEIGHT: f64 = 600.0;

pub(crate) const DARK_BACKGROUND_RGB: (u8, u8, u8) = (0x1a, 0x1a, 0x1a);
pub(crate) const LIGHT_BACKGROUND_RGB: (u8, u8, u8) = (0xff, 0xff, 0xff);

pub(crate) const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub(crate) const REAPPLY_INTERVAL: Duration = Duration::from_secs(5);
pub(crate) const SETTINGS_RELOAD_DELAY: Duration = Duration::from_millis(500);
pub(crate) const WINDOW_SIZE_SAVE_DELAY: Duration = Duration::from_millis(400);
pub(crate) const AUTO_RELOAD_DELAY: Duration = Duration::from_secs(3);
pub(crate) const CONNECTIVITY_PROBE_TIMEOUT: Duration = Duration::from_millis(800);

pub(crate) const SETTINGS_FILE_NAME: &str = "settings.json";
pub(crate) const SETTINGS_PATH_ENV: &str = "PERLIENT_SETTINGS_PATH";
pub(crate) const LOG_LEVEL_ENV: &str = "PERLIENT_LOG_LEVEL";
pub(crate) const LOCALE_ENV: &str = "PERLIENT_LOCALE";
pub(crate) const DEV_FLAG: &str = "--dev";
pub(crate) const LOG_FILE_NAME: &str = "perlient";

pub(crate) const DEFAULT_SHELL_LOCALE: &str = "en-US";
pub(crate) const SETTINGS_SAVED_EVENT: &str = "settings-saved";

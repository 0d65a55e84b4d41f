//! Application-level configuration constants.

use log::Level;

// Timer
pub const SAMPLE_INTERVAL_MS: u32 = 10;

// Theme persistence
pub const THEME_STORAGE_KEY: &str = "theme";
pub const THEME_DARK: &str = "dark";
pub const THEME_LIGHT: &str = "light";

// Logging
#[cfg(debug_assertions)]
pub const LOG_LEVEL: Level = Level::Debug;
#[cfg(not(debug_assertions))]
pub const LOG_LEVEL: Level = Level::Info;

// UI text
pub const TITLE_LEFT: &str = "ST";
pub const TITLE_RIGHT: &str = "PWatch";
pub const TOGGLE_ARIA_LABEL: &str = "Toggle dark mode";

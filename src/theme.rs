//! Light/dark preference and the key-value store it persists to.
//!
//! The stored value is the literal `"dark"` or `"light"` under the `"theme"`
//! key. Anything else, including a missing key or an unreachable store,
//! reads as light. Storage failures are logged and otherwise ignored.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::config::{THEME_DARK, THEME_LIGHT, THEME_STORAGE_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Only the exact `"dark"` marker selects dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some(THEME_DARK) => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => THEME_LIGHT,
            Theme::Dark => THEME_DARK,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal string key-value store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Why a browser storage access failed.
#[derive(Debug)]
pub enum StorageError {
    NoWindow,
    Unavailable,
    Denied(String),
    Read(String),
    Write(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NoWindow => write!(f, "No global window object"),
            StorageError::Unavailable => write!(f, "localStorage is not available"),
            StorageError::Denied(e) => write!(f, "localStorage access denied: {}", e),
            StorageError::Read(e) => write!(f, "Failed to read from localStorage: {}", e),
            StorageError::Write(e) => write!(f, "Failed to write to localStorage: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

fn describe(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Key-value store whose accesses can fail.
pub trait TryPreferenceStore {
    fn try_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn try_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Adapts a fallible store to [`PreferenceStore`]: failed reads come back
/// as `None`, failed writes are dropped. Both are logged at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lenient<S>(pub S);

impl<S: TryPreferenceStore> PreferenceStore for Lenient<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.0.try_get(key).unwrap_or_else(|e| {
            warn!("{}; using default for '{}'", e, key);
            None
        })
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.0.try_set(key, value) {
            warn!("{}; '{}' not persisted", e, key);
        }
    }
}

/// `window.localStorage`, resolved on every access.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Result<Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::NoWindow)?
            .local_storage()
            .map_err(|e| StorageError::Denied(describe(e)))?
            .ok_or(StorageError::Unavailable)
    }
}

impl TryPreferenceStore for LocalStore {
    fn try_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read(describe(e)))
    }

    fn try_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(describe(e)))
    }
}

/// In-memory store. Clones share contents, like two page loads sharing one
/// browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Current theme plus the store it is persisted to.
#[derive(Debug, Clone)]
pub struct ThemeToggle<S: PreferenceStore> {
    theme: Theme,
    store: S,
}

impl<S: PreferenceStore> ThemeToggle<S> {
    /// Read the stored preference once.
    pub fn load(store: S) -> Self {
        let stored = store.get(THEME_STORAGE_KEY);
        let theme = Theme::from_stored(stored.as_deref());
        debug!("loaded theme preference: {:?} -> {}", stored, theme);
        Self { theme, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    /// Flip and persist synchronously. Returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.store.set(THEME_STORAGE_KEY, self.theme.as_str());
        debug!("theme toggled to {}", self.theme);
        self.theme
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::paths;

pub const PREFS_FILE: &str = "prefs.json";
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than `true` reads as light.
    pub fn from_stored(raw: &str) -> Theme {
        if raw.trim() == "true" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn stored_value(self) -> &'static str {
        match self {
            Theme::Light => "false",
            Theme::Dark => "true",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon on the toggle control: the mode you would switch to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "☾",
            Theme::Dark => "☀",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Key/value preference file. Without a resolvable location the store is
/// inert: reads give defaults and writes are skipped.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
}

impl PreferenceStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn default_location() -> Self {
        Self {
            path: paths::config_dir().map(|dir| dir.join(PREFS_FILE)),
        }
    }

    pub fn from_override(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::at(path),
            None => Self::default_location(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load_on_startup(&self) -> Theme {
        self.get(DARK_MODE_KEY)
            .map(|raw| Theme::from_stored(&raw))
            .unwrap_or_default()
    }

    /// Flips `current` and persists the result.
    pub fn toggle(&self, current: Theme) -> Result<Theme> {
        let next = current.toggled();
        self.set(DARK_MODE_KEY, next.stored_value())?;
        Ok(next)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.read_entries()?;
        match entries.get(key)? {
            Value::String(raw) => Some(raw.clone()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            log::debug!("no preference location; skipping write of {key}");
            return Ok(());
        };
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("create {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&entries).context("serialize preferences")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write preferences")?;
        fs::rename(&tmp, path).context("swap preferences")?;
        Ok(())
    }

    fn read_entries(&self) -> Option<BTreeMap<String, Value>> {
        let path = self.path.as_ref()?;
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
            Ok(entries) => Some(entries),
            Err(err) => {
                log::warn!("ignoring unreadable preferences {}: {err}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_values_read_as_light() {
        assert_eq!(Theme::from_stored("true"), Theme::Dark);
        assert_eq!(Theme::from_stored("false"), Theme::Light);
        assert_eq!(Theme::from_stored("dark"), Theme::Light);
        assert_eq!(Theme::from_stored(""), Theme::Light);
    }

    #[test]
    fn inert_store_defaults_and_skips_writes() {
        let store = PreferenceStore { path: None };
        assert_eq!(store.load_on_startup(), Theme::Light);
        assert_eq!(store.toggle(Theme::Light).unwrap(), Theme::Dark);
        assert_eq!(store.load_on_startup(), Theme::Light);
    }
}

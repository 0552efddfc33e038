use std::path::PathBuf;

pub const APP_DIR: &str = "lane_roster";

/// `$XDG_CACHE_HOME/lane_roster`, falling back to `~/.cache/lane_roster`.
pub fn cache_dir() -> Option<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

/// `$XDG_CONFIG_HOME/lane_roster`, falling back to `~/.config/lane_roster`.
pub fn config_dir() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Ok(base) = std::env::var(var) {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(home_fallback).join(APP_DIR))
}

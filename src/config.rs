use std::env;
use std::path::PathBuf;

use crate::assets::{DEFAULT_ICON_DIR, DEFAULT_ICON_EXT, DEFAULT_REMOTE_BASE, IconScheme};
use crate::detail::DetailLayout;
use crate::loader::{DEFAULT_SOURCE, RosterSource};

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub source: RosterSource,
    pub icon_scheme: IconScheme,
    pub detail_layout: DetailLayout,
    pub prefs_path: Option<PathBuf>,
    pub log_level: String,
    /// Problems found while reading settings; surfaced in the console.
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut warnings = Vec::new();

        let source_raw = read("ROSTER_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        let source = RosterSource::parse(&source_raw);

        let icon_dir = read("ROSTER_ICON_DIR").unwrap_or_else(|| DEFAULT_ICON_DIR.to_string());
        let icon_ext = read("ROSTER_ICON_EXT").unwrap_or_else(|| DEFAULT_ICON_EXT.to_string());
        let remote_base =
            read("ROSTER_REMOTE_BASE").unwrap_or_else(|| DEFAULT_REMOTE_BASE.to_string());
        let icon_scheme = match read("ROSTER_ICONS") {
            None => IconScheme::Glyph,
            Some(raw) => IconScheme::parse(&raw, PathBuf::from(icon_dir), icon_ext, remote_base)
                .unwrap_or_else(|| {
                    warnings.push(format!("[WARN] Unknown ROSTER_ICONS={raw}; using glyph"));
                    IconScheme::Glyph
                }),
        };

        let detail_layout = match read("ROSTER_DETAIL_LAYOUT") {
            None => DetailLayout::default(),
            Some(raw) => DetailLayout::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "[WARN] Unknown ROSTER_DETAIL_LAYOUT={raw}; using tabs"
                ));
                DetailLayout::default()
            }),
        };

        Self {
            source,
            icon_scheme,
            detail_layout,
            prefs_path: read("ROSTER_PREFS_PATH").map(PathBuf::from),
            log_level: read("ROSTER_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            warnings,
        }
    }

    /// A positional argument takes precedence over `ROSTER_SOURCE`.
    pub fn with_source_arg(mut self, arg: Option<String>) -> Self {
        if let Some(raw) = arg.filter(|a| !a.trim().is_empty()) {
            self.source = RosterSource::parse(&raw);
        }
        self
    }
}

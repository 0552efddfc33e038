use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use env_logger::{Builder, Target};

use crate::paths;

pub const LOG_FILE: &str = "lane_roster.log";

/// Routes `log` output to a file in the cache directory so it never
/// draws over the terminal UI. Returns the log path on success.
pub fn init(level: &str) -> Result<PathBuf> {
    let dir = paths::cache_dir().context("no cache directory available")?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    Builder::new()
        .parse_filters(level)
        .format_timestamp_secs()
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialised")?;
    Ok(path)
}

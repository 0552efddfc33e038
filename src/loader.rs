use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::http_client::http_client;
use crate::state::{Delta, PlayerRecord};

pub const DEFAULT_SOURCE: &str = "jugadores.json";
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("http {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid player data: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    Http(String),
    File(PathBuf),
}

impl RosterSource {
    pub fn parse(raw: &str) -> RosterSource {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            RosterSource::Http(trimmed.to_string())
        } else if trimmed.is_empty() {
            RosterSource::File(PathBuf::from(DEFAULT_SOURCE))
        } else {
            RosterSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RosterSource::Http(url) => url.clone(),
            RosterSource::File(path) => path.display().to_string(),
        }
    }
}

/// Fetches and parses the roster once. No retry.
pub fn load(source: &RosterSource) -> Result<Vec<PlayerRecord>, LoadError> {
    let body = match source {
        RosterSource::Http(url) => fetch_http(url)?,
        RosterSource::File(path) => fs::read_to_string(path).map_err(|err| {
            let detail = format!("{}: {err}", path.display());
            match err.kind() {
                ErrorKind::InvalidData => LoadError::Parse(detail),
                _ => LoadError::Network(detail),
            }
        })?,
    };
    parse_players_json(&body)
}

fn fetch_http(url: &str) -> Result<String, LoadError> {
    let client = http_client().map_err(|err| LoadError::Network(format!("{err:#}")))?;
    let resp = client
        .get(url)
        .send()
        .map_err(|err| LoadError::Network(err.to_string()))?;
    let status = resp.status();
    let body = resp
        .text()
        .map_err(|err| LoadError::Network(format!("failed reading body: {err}")))?;
    if !status.is_success() {
        return Err(LoadError::Status {
            status: status.as_u16(),
            body: truncate(body.trim(), MAX_ERROR_BODY),
        });
    }
    Ok(body)
}

/// Parses a JSON array of player records. An empty body or `null` is an
/// empty roster, not an error.
pub fn parse_players_json(raw: &str) -> Result<Vec<PlayerRecord>, LoadError> {
    let trimmed = raw.trim().trim_start_matches('\u{feff}');
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<PlayerRecord>>(trimmed)
        .map_err(|err| LoadError::Parse(err.to_string()))
}

/// Runs a single load on a background thread and reports the outcome as
/// deltas for the UI loop.
pub fn spawn_loader(source: RosterSource, tx: Sender<Delta>) -> JoinHandle<()> {
    thread::spawn(move || {
        let label = source.describe();
        let _ = tx.send(Delta::Log(format!("[INFO] Loading players from {label}")));
        match load(&source) {
            Ok(players) => {
                log::info!("loaded {} players from {label}", players.len());
                let _ = tx.send(Delta::Loaded(players));
            }
            Err(err) => {
                log::error!("failed to load players from {label}: {err}");
                let _ = tx.send(Delta::LoadFailed(err.to_string()));
            }
        }
    })
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push('…');
    out
}

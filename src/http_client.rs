use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("lane_roster/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. The roster request is never timed out: a hung
/// server leaves the list in its loading state.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>)
            .build()
            .context("failed to build http client")
    })
}

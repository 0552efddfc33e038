pub mod app;
pub mod assets;
pub mod config;
pub mod detail;
pub mod filter;
pub mod http_client;
pub mod loader;
pub mod logging;
pub mod paths;
pub mod prefs;
pub mod state;
pub mod ui;

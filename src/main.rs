use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use lane_roster::app::App;
use lane_roster::config::Config;
use lane_roster::loader::spawn_loader;
use lane_roster::logging;
use lane_roster::prefs::PreferenceStore;
use lane_roster::state::Delta;
use lane_roster::ui;

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::from_env().with_source_arg(std::env::args().nth(1));
    let log_path = logging::init(&config.log_level);
    log::info!("starting with source {}", config.source.describe());

    let prefs = PreferenceStore::from_override(config.prefs_path.clone());
    let mut app = App::new(&config, prefs);
    match &log_path {
        Ok(path) => app.state.push_log(format!("[INFO] Logging to {}", path.display())),
        Err(err) => app.state.push_log(format!("[WARN] File logging disabled: {err:#}")),
    }
    match app.prefs.path() {
        Some(path) => app.state.push_log(format!("[INFO] Preferences at {}", path.display())),
        None => app.state.push_log("[WARN] No config dir; theme will not persist"),
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    spawn_loader(config.source.clone(), tx);

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("terminal loop failed: {err}");
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.drain_deltas(&rx);

        let mut hits = None;
        terminal.draw(|f| hits = Some(ui::render(f, &app.state, &app.resolver)))?;
        if let Some(hits) = hits {
            app.hits = hits;
        }
        app.drain_asset_warnings();

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

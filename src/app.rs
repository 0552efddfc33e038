use std::sync::mpsc::Receiver;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::assets::AssetResolver;
use crate::config::Config;
use crate::prefs::PreferenceStore;
use crate::state::{AppState, Delta, InputMode, apply_delta};
use crate::ui::{HitMap, HitTarget};

/// Top-level controller: owns session state and routes input to it.
pub struct App {
    pub state: AppState,
    pub resolver: AssetResolver,
    pub prefs: PreferenceStore,
    pub hits: HitMap,
    pub should_quit: bool,
}

impl App {
    /// Builds the controller and applies the stored theme before anything is
    /// drawn.
    pub fn new(config: &Config, prefs: PreferenceStore) -> Self {
        let mut state = AppState::new();
        state.detail_layout = config.detail_layout;
        state.source_label = config.source.describe();
        state.theme = prefs.load_on_startup();
        for warning in &config.warnings {
            state.push_log(warning.clone());
        }
        Self {
            state,
            resolver: AssetResolver::new(config.icon_scheme.clone()),
            prefs,
            hits: HitMap::default(),
            should_quit: false,
        }
    }

    pub fn drain_deltas(&mut self, rx: &Receiver<Delta>) {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut self.state, delta);
        }
    }

    /// Moves placeholder fallbacks noticed while drawing into the console.
    pub fn drain_asset_warnings(&mut self) {
        for tag in self.resolver.take_missing() {
            self.state.push_log(format!(
                "[WARN] No {} asset for role {tag}; using placeholder",
                self.resolver.scheme().label()
            ));
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.help_overlay = false;
            }
            return;
        }
        if self.state.detail.is_open() {
            self.on_detail_key(key);
            return;
        }
        match self.state.input_mode {
            InputMode::Search => self.on_search_key(key),
            InputMode::Browse => self.on_browse_key(key),
        }
    }

    fn on_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.state.input_mode = InputMode::Search,
            KeyCode::Char('r') => self.state.cycle_role_filter_next(),
            KeyCode::Char('R') => self.state.cycle_role_filter_prev(),
            KeyCode::Char('c') => self.state.clear_filters(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('l') | KeyCode::Right => self.state.focus_next_role(),
            KeyCode::Char('h') | KeyCode::Left => self.state.focus_prev_role(),
            KeyCode::Enter => self.state.open_selected(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.state.input_mode = InputMode::Browse,
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Down => self.state.select_next(),
            KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(c) => self.state.push_search_char(c),
            _ => {}
        }
    }

    fn on_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.detail.handle_escape();
            }
            KeyCode::Char('x') | KeyCode::Char('q') => self.state.detail.close(),
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => {
                self.state.detail.next_role();
            }
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
                self.state.detail.prev_role();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                self.state.detail.select_role(idx);
            }
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            self.click(mouse.column, mouse.row);
        }
    }

    /// Routes a click through the regions of the last drawn frame. While the
    /// detail view is open, anything outside its content box is backdrop.
    pub fn click(&mut self, x: u16, y: u16) {
        let target = self.hits.hit(x, y);
        if self.state.help_overlay {
            self.state.help_overlay = false;
            return;
        }
        if self.state.detail.is_open() {
            match target {
                Some(HitTarget::ModalClose) => self.state.detail.close(),
                Some(HitTarget::ModalRole(idx)) => {
                    self.state.detail.select_role(idx);
                }
                Some(HitTarget::ModalContent) => {}
                _ => self.state.detail.close(),
            }
            return;
        }
        match target {
            Some(HitTarget::RoleChip { record, role }) => {
                self.state.select_record(record);
                self.state.focused_role = Some(role);
                let tag = self
                    .state
                    .players
                    .get(record)
                    .and_then(|p| p.roles.get(role))
                    .cloned();
                self.state.open_detail(record, tag.as_deref());
            }
            Some(HitTarget::Card { record }) => {
                self.state.select_record(record);
                self.state.open_detail(record, None);
            }
            Some(HitTarget::ThemeToggle) => self.toggle_theme(),
            _ => {}
        }
    }

    pub fn toggle_theme(&mut self) {
        match self.prefs.toggle(self.state.theme) {
            Ok(next) => {
                self.state.theme = next;
                log::info!("theme set to {}", next.label());
            }
            Err(err) => {
                self.state.theme = self.state.theme.toggled();
                self.state
                    .push_log(format!("[WARN] Could not save theme preference: {err:#}"));
                log::warn!("could not persist theme: {err:#}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::PlayerRecord;
    use crate::prefs::Theme;
    use ratatui::layout::Rect;
    use tempfile::TempDir;

    /// The returned dir owns the prefs file; keep it alive for the test.
    fn app() -> (App, TempDir) {
        let config = Config::from_lookup(|_| None);
        let dir = TempDir::new().expect("temp dir");
        let mut app = App::new(&config, PreferenceStore::at(dir.path().join("prefs.json")));
        apply_delta(
            &mut app.state,
            Delta::Loaded(vec![
                PlayerRecord::new("Zeus", &["Top"]),
                PlayerRecord::new("Keria", &["Sup", "Adc"]),
            ]),
        );
        (app, dir)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn search_mode_filters_on_each_keystroke() {
        let (mut app, _dir) = app();
        app.on_key(key(KeyCode::Char('/')));
        app.on_key(key(KeyCode::Char('K')));
        assert_eq!(app.state.visible, vec![1]);
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.state.visible, vec![0, 1]);
        app.on_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.state.input_mode, InputMode::Browse);
    }

    #[test]
    fn chip_click_opens_on_that_role_not_the_card() {
        let (mut app, _dir) = app();
        app.hits.push(Rect::new(0, 0, 30, 3), HitTarget::Card { record: 1 });
        app.hits
            .push(Rect::new(10, 1, 7, 1), HitTarget::RoleChip { record: 1, role: 1 });
        app.click(11, 1);
        let view = app.state.detail.view().copied().expect("detail open");
        assert_eq!(view.record_index, 1);
        assert_eq!(view.active_role, Some(1));
    }

    #[test]
    fn backdrop_click_closes_detail() {
        let (mut app, _dir) = app();
        app.state.open_detail(0, None);
        app.hits = HitMap::default();
        app.hits.push(Rect::new(10, 5, 40, 10), HitTarget::ModalContent);
        app.click(12, 6);
        assert!(app.state.detail.is_open());
        app.click(1, 1);
        assert!(!app.state.detail.is_open());
    }

    #[test]
    fn detail_keys_switch_roles_without_closing() {
        let (mut app, _dir) = app();
        app.state.open_detail(1, None);
        app.on_key(key(KeyCode::Char('2')));
        assert_eq!(app.state.detail.view().and_then(|v| v.active_role), Some(1));
        app.on_key(key(KeyCode::Esc));
        assert!(!app.state.detail.is_open());
        app.on_key(key(KeyCode::Esc));
        assert!(!app.state.detail.is_open());
    }

    #[test]
    fn theme_key_persists_next_to_the_app() {
        let (mut app, dir) = app();
        assert_eq!(app.state.theme, Theme::Light);
        app.on_key(key(KeyCode::Char('t')));
        assert_eq!(app.state.theme, Theme::Dark);

        let reopened = PreferenceStore::at(dir.path().join("prefs.json"));
        assert_eq!(reopened.load_on_startup(), Theme::Dark);
    }
}

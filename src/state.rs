use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

use crate::detail::{DetailLayout, DetailState};
use crate::filter;
use crate::prefs::Theme;

pub const MAX_LOGS: usize = 200;
pub const MISSING_DESCRIPTION: &str = "No description available.";
pub const UNNAMED_PLAYER: &str = "(unnamed)";

/// Closed set of lane roles a player can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Top,
    Jungla,
    Medio,
    Adc,
    Sup,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungla, Role::Medio, Role::Adc, Role::Sup];

    /// Exact, case-sensitive lookup of a role tag.
    pub fn from_tag(tag: &str) -> Option<Role> {
        match tag {
            "Top" => Some(Role::Top),
            "Jungla" => Some(Role::Jungla),
            "Medio" => Some(Role::Medio),
            "Adc" => Some(Role::Adc),
            "Sup" => Some(Role::Sup),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Role::Top => "Top",
            Role::Jungla => "Jungla",
            Role::Medio => "Medio",
            Role::Adc => "Adc",
            Role::Sup => "Sup",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Top => "Top lane",
            Role::Jungla => "Jungle",
            Role::Medio => "Mid lane",
            Role::Adc => "Bot carry",
            Role::Sup => "Support",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(default, alias = "nombre", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "lineas", deserialize_with = "roles_skipping_nulls")]
    pub roles: Vec<String>,
    #[serde(
        default,
        alias = "descripciones",
        deserialize_with = "descriptions_skipping_nulls"
    )]
    pub descriptions: HashMap<String, String>,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            name: name.into(),
            roles: roles.iter().map(|r| (*r).to_string()).collect(),
            descriptions: HashMap::new(),
        }
    }

    pub fn with_description(mut self, role: &str, text: impl Into<String>) -> Self {
        self.descriptions.insert(role.to_string(), text.into());
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            UNNAMED_PLAYER
        } else {
            &self.name
        }
    }

    /// First role tag; drives the default imagery.
    pub fn primary_role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }

    pub fn description_for(&self, tag: &str) -> Option<&str> {
        self.descriptions
            .get(tag)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    pub fn description_or_fallback(&self, tag: &str) -> &str {
        self.description_for(tag).unwrap_or(MISSING_DESCRIPTION)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn roles_skipping_nulls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

/// A `null` text for one role reads as "no description" for that role only.
fn descriptions_skipping_nulls<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(tag, text)| text.map(|text| (tag, text)))
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub fn parse(value: &str) -> Option<RoleFilter> {
        if value.eq_ignore_ascii_case("all") {
            return Some(RoleFilter::All);
        }
        Role::from_tag(value).map(RoleFilter::Only)
    }

    pub fn value(self) -> &'static str {
        match self {
            RoleFilter::All => "all",
            RoleFilter::Only(role) => role.tag(),
        }
    }

    pub fn matches(self, roles: &[String]) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(role) => roles.iter().any(|tag| tag == role.tag()),
        }
    }

    pub fn cycle_next(self) -> RoleFilter {
        match self {
            RoleFilter::All => RoleFilter::Only(Role::ALL[0]),
            RoleFilter::Only(role) => {
                let idx = Role::ALL.iter().position(|r| *r == role).unwrap_or(0);
                match Role::ALL.get(idx + 1) {
                    Some(next) => RoleFilter::Only(*next),
                    None => RoleFilter::All,
                }
            }
        }
    }

    pub fn cycle_prev(self) -> RoleFilter {
        match self {
            RoleFilter::All => RoleFilter::Only(Role::ALL[Role::ALL.len() - 1]),
            RoleFilter::Only(role) => {
                let idx = Role::ALL.iter().position(|r| *r == role).unwrap_or(0);
                if idx == 0 {
                    RoleFilter::All
                } else {
                    RoleFilter::Only(Role::ALL[idx - 1])
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub role: RoleFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Search,
}

#[derive(Debug, Clone)]
pub enum Delta {
    Loaded(Vec<PlayerRecord>),
    LoadFailed(String),
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub players: Vec<PlayerRecord>,
    pub load_status: LoadStatus,
    pub loaded_at: Option<DateTime<Local>>,
    pub source_label: String,
    pub criteria: FilterCriteria,
    pub visible: Vec<usize>,
    pub selected: usize,
    pub focused_role: Option<usize>,
    pub input_mode: InputMode,
    pub detail: DetailState,
    pub detail_layout: DetailLayout,
    pub theme: Theme,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            load_status: LoadStatus::Loading,
            loaded_at: None,
            source_label: String::new(),
            criteria: FilterCriteria::default(),
            visible: Vec::new(),
            selected: 0,
            focused_role: None,
            input_mode: InputMode::Browse,
            detail: DetailState::Closed,
            detail_layout: DetailLayout::RoleTabs,
            theme: Theme::Light,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn selected_record_index(&self) -> Option<usize> {
        self.visible.get(self.selected).copied()
    }

    pub fn selected_player(&self) -> Option<&PlayerRecord> {
        self.selected_record_index()
            .and_then(|idx| self.players.get(idx))
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        self.refilter();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.criteria.search_text.push(c);
        self.refilter();
    }

    pub fn pop_search_char(&mut self) {
        if self.criteria.search_text.pop().is_some() {
            self.refilter();
        }
    }

    pub fn set_role_filter(&mut self, role: RoleFilter) {
        self.criteria.role = role;
        self.refilter();
    }

    pub fn cycle_role_filter_next(&mut self) {
        self.set_role_filter(self.criteria.role.cycle_next());
    }

    pub fn cycle_role_filter_prev(&mut self) {
        self.set_role_filter(self.criteria.role.cycle_prev());
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refilter();
    }

    /// Recomputes the visible subset from the full roster.
    pub fn refilter(&mut self) {
        let selected_id = self.selected_record_index();
        self.visible = filter::matching_indices(&self.players, &self.criteria);
        if let Some(id) = selected_id {
            if let Some(pos) = self.visible.iter().position(|idx| *idx == id) {
                self.selected = pos;
                return;
            }
        }
        self.selected = 0;
        self.focused_role = None;
    }

    pub fn select_next(&mut self) {
        let total = self.visible.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
        self.focused_role = None;
    }

    pub fn select_prev(&mut self) {
        let total = self.visible.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
        self.focused_role = None;
    }

    pub fn select_record(&mut self, record_index: usize) {
        if let Some(pos) = self.visible.iter().position(|idx| *idx == record_index) {
            if pos != self.selected {
                self.focused_role = None;
            }
            self.selected = pos;
        }
    }

    /// Moves role focus right within the selected card; past the last chip
    /// focus returns to the card itself.
    pub fn focus_next_role(&mut self) {
        let count = self.selected_player().map(|p| p.roles.len()).unwrap_or(0);
        self.focused_role = match self.focused_role {
            None if count > 0 => Some(0),
            Some(idx) if idx + 1 < count => Some(idx + 1),
            _ => None,
        };
    }

    pub fn focus_prev_role(&mut self) {
        let count = self.selected_player().map(|p| p.roles.len()).unwrap_or(0);
        self.focused_role = match self.focused_role {
            None if count > 0 => Some(count - 1),
            Some(idx) if idx > 0 => Some(idx - 1),
            _ => None,
        };
    }

    /// Opens the detail view for a roster entry, optionally on one of its roles.
    pub fn open_detail(&mut self, record_index: usize, role: Option<&str>) {
        let Some(record) = self.players.get(record_index) else {
            return;
        };
        let name = record.display_name().to_string();
        self.detail.open(record_index, record, role);
        let active = self
            .detail
            .view()
            .and_then(|view| view.active_role)
            .and_then(|idx| record.roles.get(idx))
            .cloned()
            .unwrap_or_else(|| "-".to_string());
        log::debug!("detail opened for {name} ({active})");
    }

    pub fn open_selected(&mut self) {
        let Some(record_index) = self.selected_record_index() else {
            return;
        };
        let role = self.focused_role.and_then(|idx| {
            self.players
                .get(record_index)
                .and_then(|p| p.roles.get(idx))
                .cloned()
        });
        self.open_detail(record_index, role.as_deref());
    }

    pub fn detail_record(&self) -> Option<&PlayerRecord> {
        self.detail
            .view()
            .and_then(|view| self.players.get(view.record_index))
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Loaded(players) => {
            if state.load_status != LoadStatus::Loading {
                state.push_log("[WARN] Roster already loaded; ignoring second payload");
                log::warn!("ignored a second roster payload");
                return;
            }
            let without_roles = players.iter().filter(|p| p.roles.is_empty()).count();
            if without_roles > 0 {
                state.push_log(format!(
                    "[WARN] {without_roles} player(s) have no roles listed"
                ));
            }
            state.push_log(format!("[INFO] Loaded {} players", players.len()));
            state.players = players;
            state.load_status = LoadStatus::Loaded;
            state.loaded_at = Some(Local::now());
            state.selected = 0;
            state.focused_role = None;
            state.refilter();
        }
        Delta::LoadFailed(message) => {
            state.push_log(format!("[ERROR] Could not load players: {message}"));
            state.load_status = LoadStatus::Failed(message);
        }
        Delta::Log(line) => state.push_log(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new("Faker", &["Medio"]),
            PlayerRecord::new("Keria", &["Sup", "Adc"]),
            PlayerRecord::new("Zeus", &["Top"]),
        ]
    }

    #[test]
    fn role_filter_cycles_through_all_roles() {
        let mut filter = RoleFilter::All;
        let mut seen = Vec::new();
        for _ in 0..6 {
            filter = filter.cycle_next();
            seen.push(filter.value());
        }
        assert_eq!(seen, vec!["Top", "Jungla", "Medio", "Adc", "Sup", "all"]);
        assert_eq!(RoleFilter::All.cycle_prev(), RoleFilter::Only(Role::Sup));
        assert_eq!(RoleFilter::Only(Role::Top).cycle_prev(), RoleFilter::All);
    }

    #[test]
    fn role_tags_are_case_sensitive() {
        assert_eq!(Role::from_tag("Sup"), Some(Role::Sup));
        assert_eq!(Role::from_tag("sup"), None);
        assert_eq!(RoleFilter::parse("all"), Some(RoleFilter::All));
        assert_eq!(RoleFilter::parse("Mid"), None);
    }

    #[test]
    fn refilter_keeps_selected_player_when_still_visible() {
        let mut state = AppState::new();
        apply_delta(&mut state, Delta::Loaded(roster()));
        state.select_next();
        assert_eq!(state.selected_player().map(|p| p.name.as_str()), Some("Keria"));

        state.set_search_text("e");
        assert_eq!(state.selected_player().map(|p| p.name.as_str()), Some("Keria"));

        state.set_search_text("zeu");
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_player().map(|p| p.name.as_str()), Some("Zeus"));
    }

    #[test]
    fn second_payload_is_ignored() {
        let mut state = AppState::new();
        apply_delta(&mut state, Delta::Loaded(roster()));
        apply_delta(&mut state, Delta::Loaded(Vec::new()));
        assert_eq!(state.players.len(), 3);
        assert!(state.logs.iter().any(|l| l.contains("ignoring")));
    }

    #[test]
    fn role_focus_wraps_back_to_card() {
        let mut state = AppState::new();
        apply_delta(&mut state, Delta::Loaded(roster()));
        state.select_next();
        state.focus_next_role();
        assert_eq!(state.focused_role, Some(0));
        state.focus_next_role();
        assert_eq!(state.focused_role, Some(1));
        state.focus_next_role();
        assert_eq!(state.focused_role, None);
        state.focus_prev_role();
        assert_eq!(state.focused_role, Some(1));
    }

    #[test]
    fn open_selected_uses_focused_role() {
        let mut state = AppState::new();
        apply_delta(&mut state, Delta::Loaded(roster()));
        state.select_next();
        state.focus_next_role();
        state.focus_next_role();
        state.open_selected();
        let view = state.detail.view().expect("detail should be open");
        assert_eq!(view.record_index, 1);
        assert_eq!(view.active_role, Some(1));
    }

    #[test]
    fn log_ring_is_bounded() {
        let mut state = AppState::new();
        for i in 0..(MAX_LOGS + 20) {
            state.push_log(format!("line {i}"));
        }
        assert_eq!(state.logs.len(), MAX_LOGS);
        assert_eq!(state.logs.front().map(String::as_str), Some("line 20"));
    }
}

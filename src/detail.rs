//! Player detail modal: open/closed state plus the content builder used by
//! the renderer.

use crate::assets::{RoleAsset, RoleAssetResolver};
use crate::state::{PlayerRecord, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLayout {
    /// Image and description of the active role only.
    SingleRole,
    /// Every role's description under its own heading.
    AllRoles,
    /// Role buttons that swap the image and description in place.
    #[default]
    RoleTabs,
}

impl DetailLayout {
    pub fn parse(value: &str) -> Option<DetailLayout> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" | "single_role" => Some(DetailLayout::SingleRole),
            "all" | "all_roles" | "grouped" => Some(DetailLayout::AllRoles),
            "tabs" | "role_tabs" | "buttons" => Some(DetailLayout::RoleTabs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailView {
    pub record_index: usize,
    /// Index into the record's `roles`; `None` for records without roles.
    pub active_role: Option<usize>,
    role_count: usize,
}

impl DetailView {
    pub fn role_count(&self) -> usize {
        self.role_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    Open(DetailView),
}

impl DetailState {
    pub fn is_open(&self) -> bool {
        matches!(self, DetailState::Open(_))
    }

    pub fn view(&self) -> Option<&DetailView> {
        match self {
            DetailState::Open(view) => Some(view),
            DetailState::Closed => None,
        }
    }

    /// Opens on `role` when the record has it, else on the primary role.
    /// Opening while already open replaces the content.
    pub fn open(&mut self, record_index: usize, record: &PlayerRecord, role: Option<&str>) {
        let active_role = role
            .and_then(|tag| record.roles.iter().position(|r| r == tag))
            .or(if record.roles.is_empty() { None } else { Some(0) });
        *self = DetailState::Open(DetailView {
            record_index,
            active_role,
            role_count: record.roles.len(),
        });
    }

    /// Switches the active role without closing. Returns whether anything
    /// changed.
    pub fn select_role(&mut self, idx: usize) -> bool {
        let DetailState::Open(view) = self else {
            return false;
        };
        if idx >= view.role_count || view.active_role == Some(idx) {
            return false;
        }
        view.active_role = Some(idx);
        true
    }

    pub fn next_role(&mut self) -> bool {
        let Some(view) = self.view() else {
            return false;
        };
        if view.role_count < 2 {
            return false;
        }
        let next = view.active_role.map(|i| (i + 1) % view.role_count).unwrap_or(0);
        self.select_role(next)
    }

    pub fn prev_role(&mut self) -> bool {
        let Some(view) = self.view() else {
            return false;
        };
        if view.role_count < 2 {
            return false;
        }
        let prev = match view.active_role {
            Some(0) | None => view.role_count - 1,
            Some(i) => i - 1,
        };
        self.select_role(prev)
    }

    pub fn close(&mut self) {
        *self = DetailState::Closed;
    }

    /// Escape closes an open view and is a no-op otherwise.
    pub fn handle_escape(&mut self) -> bool {
        if self.is_open() {
            self.close();
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleButton {
    pub tag: String,
    pub glyph: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub heading: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailContent {
    pub title: String,
    pub image: RoleAsset,
    pub summary: String,
    pub role_buttons: Vec<RoleButton>,
    pub sections: Vec<DetailSection>,
}

pub fn roles_summary(record: &PlayerRecord) -> String {
    if record.roles.is_empty() {
        "No roles listed for this player.".to_string()
    } else {
        format!(
            "Plays the following roles: {}.",
            record.roles.join(", ")
        )
    }
}

pub fn build_content(
    view: &DetailView,
    record: &PlayerRecord,
    layout: DetailLayout,
    resolver: &dyn RoleAssetResolver,
) -> DetailContent {
    let name = record.display_name();
    let active_tag = view
        .active_role
        .and_then(|idx| record.roles.get(idx))
        .map(String::as_str);

    let image = match active_tag {
        Some(tag) => resolver.resolve_or_placeholder(tag, name),
        None => RoleAsset::placeholder(),
    };

    let role_buttons = if layout == DetailLayout::RoleTabs {
        record
            .roles
            .iter()
            .enumerate()
            .map(|(idx, tag)| RoleButton {
                tag: tag.clone(),
                glyph: resolver.resolve_or_placeholder(tag, name).glyph,
                active: view.active_role == Some(idx),
            })
            .collect()
    } else {
        Vec::new()
    };

    let sections = match layout {
        DetailLayout::AllRoles => record
            .roles
            .iter()
            .map(|tag| DetailSection {
                heading: Some(role_heading(tag)),
                body: record.description_or_fallback(tag).to_string(),
            })
            .collect(),
        DetailLayout::SingleRole | DetailLayout::RoleTabs => match active_tag {
            Some(tag) => vec![DetailSection {
                heading: Some(role_heading(tag)),
                body: record.description_or_fallback(tag).to_string(),
            }],
            None => Vec::new(),
        },
    };

    DetailContent {
        title: name.to_string(),
        image,
        summary: roles_summary(record),
        role_buttons,
        sections,
    }
}

fn role_heading(tag: &str) -> String {
    match Role::from_tag(tag) {
        Some(role) => format!("{} ({})", role.tag(), role.label()),
        None => tag.to_string(),
    }
}

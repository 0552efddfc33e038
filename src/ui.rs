use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::assets::RoleAssetResolver;
use crate::detail::{self, DetailContent};
use crate::prefs::Theme;
use crate::state::{AppState, InputMode, LoadStatus, PlayerRecord};

pub const CARD_HEIGHT: u16 = 3;
pub const LOADING_MESSAGE: &str = "Loading players…";
pub const EMPTY_ROSTER_MESSAGE: &str = "The player list is empty.";
pub const NO_RESULTS_MESSAGE: &str = "No players match the current search.";
pub const LOAD_ERROR_MESSAGE: &str = "Could not load the player list.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Card { record: usize },
    RoleChip { record: usize, role: usize },
    ThemeToggle,
    ModalContent,
    ModalClose,
    ModalRole(usize),
}

/// Clickable regions from the last drawn frame. Later entries sit on top.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    targets: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn push(&mut self, area: Rect, target: HitTarget) {
        if area.width > 0 && area.height > 0 {
            self.targets.push((area, target));
        }
    }

    pub fn hit(&self, x: u16, y: u16) -> Option<HitTarget> {
        self.targets
            .iter()
            .rev()
            .find(|(area, _)| rect_contains(*area, x, y))
            .map(|(_, target)| *target)
    }

    pub fn area_of(&self, target: HitTarget) -> Option<Rect> {
        self.targets
            .iter()
            .find(|(_, t)| *t == target)
            .map(|(area, _)| *area)
    }
}

fn rect_contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x
        && x < area.x.saturating_add(area.width)
        && y >= area.y
        && y < area.y.saturating_add(area.height)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub selected_bg: Color,
    pub chip: Color,
    pub error: Color,
    pub border: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Palette {
        match theme {
            Theme::Light => Palette {
                bg: Color::Rgb(250, 250, 252),
                fg: Color::Rgb(20, 20, 28),
                muted: Color::Rgb(110, 110, 125),
                accent: Color::Rgb(30, 90, 170),
                selected_bg: Color::Rgb(222, 230, 244),
                chip: Color::Rgb(20, 110, 90),
                error: Color::Rgb(190, 30, 45),
                border: Color::Rgb(170, 170, 185),
            },
            Theme::Dark => Palette {
                bg: Color::Rgb(13, 17, 23),
                fg: Color::Rgb(230, 230, 236),
                muted: Color::Rgb(120, 120, 140),
                accent: Color::Rgb(255, 183, 3),
                selected_bg: Color::Rgb(40, 44, 62),
                chip: Color::Rgb(76, 201, 240),
                error: Color::Rgb(230, 57, 70),
                border: Color::Rgb(80, 80, 100),
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Draws the whole frame and returns the clickable regions it produced.
pub fn render(frame: &mut Frame, state: &AppState, resolver: &dyn RoleAssetResolver) -> HitMap {
    let palette = Palette::for_theme(state.theme);
    let area = frame.size();
    let mut hits = HitMap::default();

    frame.render_widget(Block::default().style(palette.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, chunks[0], state, &palette, &mut hits);
    render_list(frame, chunks[1], state, resolver, &palette, &mut hits);
    render_footer(frame, chunks[2], state, &palette);

    if state.detail.is_open() {
        render_detail(frame, area, state, resolver, &palette, &mut hits);
    }
    if state.help_overlay {
        render_help_overlay(frame, area, &palette);
    }
    hits
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    palette: &Palette,
    hits: &mut HitMap,
) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut title = vec![Span::styled(
        " LANE ROSTER ",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )];
    if state.load_status == LoadStatus::Loaded {
        let loaded = state
            .loaded_at
            .map(|t| format!(" · loaded {}", t.format("%H:%M")))
            .unwrap_or_default();
        title.push(Span::styled(
            format!(" {} players{loaded}", state.players.len()),
            Style::default().fg(palette.muted),
        ));
    }

    let searching = state.input_mode == InputMode::Search;
    let search_style = if searching {
        Style::default()
            .fg(palette.fg)
            .bg(palette.selected_bg)
    } else {
        Style::default().fg(palette.fg)
    };
    let mut search_text = state.criteria.search_text.clone();
    if searching {
        search_text.push('▏');
    } else if search_text.is_empty() {
        search_text.push_str("(press /)");
    }
    let controls = vec![
        Span::styled(" Search: ", Style::default().fg(palette.muted)),
        Span::styled(search_text, search_style),
        Span::styled("   Role: ", Style::default().fg(palette.muted)),
        Span::styled(
            state.criteria.role.value(),
            Style::default()
                .fg(palette.chip)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   Showing {}/{}", state.visible.len(), state.players.len()),
            Style::default().fg(palette.muted),
        ),
    ];

    frame.render_widget(Paragraph::new(vec![Line::from(title), Line::from(controls)]), inner);

    if inner.height > 0 {
        let toggle = format!(" {} {} ", state.theme.toggle_icon(), state.theme.toggled().label());
        let width = (Span::raw(toggle.as_str()).width() as u16).min(inner.width);
        let toggle_area = Rect {
            x: inner.x + inner.width - width,
            y: inner.y,
            width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(toggle).style(Style::default().fg(palette.accent)),
            toggle_area,
        );
        hits.push(toggle_area, HitTarget::ThemeToggle);
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    resolver: &dyn RoleAssetResolver,
    palette: &Palette,
    hits: &mut HitMap,
) {
    match &state.load_status {
        LoadStatus::Loading => {
            render_message(frame, area, vec![Line::from(LOADING_MESSAGE)], palette.muted);
        }
        LoadStatus::Failed(reason) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    LOAD_ERROR_MESSAGE,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(reason.clone()),
            ];
            if !state.source_label.is_empty() {
                lines.push(Line::from(format!(
                    "Check that {} exists and is reachable.",
                    state.source_label
                )));
            }
            render_message(frame, area, lines, palette.error);
        }
        LoadStatus::Loaded if state.players.is_empty() => {
            render_message(frame, area, vec![Line::from(EMPTY_ROSTER_MESSAGE)], palette.muted);
        }
        LoadStatus::Loaded if state.visible.is_empty() => {
            render_message(frame, area, vec![Line::from(NO_RESULTS_MESSAGE)], palette.muted);
        }
        LoadStatus::Loaded => render_cards(frame, area, state, resolver, palette, hits),
    }
}

fn render_message(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>, color: Color) {
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    let padded = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(1),
    };
    frame.render_widget(paragraph, padded);
}

fn render_cards(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    resolver: &dyn RoleAssetResolver,
    palette: &Palette,
    hits: &mut HitMap,
) {
    if area.height < CARD_HEIGHT {
        render_message(
            frame,
            area,
            vec![Line::from("Player list needs more height")],
            palette.muted,
        );
        return;
    }

    let visible = (area.height / CARD_HEIGHT) as usize;
    let (start, end) = visible_range(state.selected, state.visible.len(), visible);

    for (i, pos) in (start..end).enumerate() {
        let Some(record_index) = state.visible.get(pos).copied() else {
            continue;
        };
        let Some(record) = state.players.get(record_index) else {
            continue;
        };
        let card_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT,
        };
        let selected = pos == state.selected;
        let focused_role = if selected { state.focused_role } else { None };
        render_card(
            frame,
            card_area,
            record_index,
            record,
            selected,
            focused_role,
            resolver,
            palette,
            hits,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn render_card(
    frame: &mut Frame,
    area: Rect,
    record_index: usize,
    record: &PlayerRecord,
    selected: bool,
    focused_role: Option<usize>,
    resolver: &dyn RoleAssetResolver,
    palette: &Palette,
    hits: &mut HitMap,
) {
    let (border, background) = if selected {
        (palette.accent, palette.selected_bg)
    } else {
        (palette.border, palette.bg)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(background))
        .title(Span::styled(
            format!(" {} ", record.display_name()),
            Style::default()
                .fg(palette.fg)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    hits.push(area, HitTarget::Card {
        record: record_index,
    });

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let label = Span::styled("Roles: ", Style::default().fg(palette.muted));
    let mut x = inner.x + label.width() as u16;
    let mut spans = vec![label];

    if record.roles.is_empty() {
        spans.push(Span::styled("none listed", Style::default().fg(palette.muted)));
    }

    let right = inner.x + inner.width;
    for (idx, tag) in record.roles.iter().enumerate() {
        let asset = resolver.resolve_or_placeholder(tag, record.display_name());
        let chip = Span::styled(
            format!(" {} {} ", asset.glyph, tag),
            chip_style(palette, focused_role == Some(idx), asset.is_placeholder()),
        );
        let width = chip.width() as u16;
        if x < right {
            let chip_area = Rect {
                x,
                y: inner.y,
                width: width.min(right - x),
                height: 1,
            };
            hits.push(chip_area, HitTarget::RoleChip {
                record: record_index,
                role: idx,
            });
        }
        spans.push(chip);
        spans.push(Span::raw(" "));
        x = x.saturating_add(width + 1);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn chip_style(palette: &Palette, focused: bool, placeholder: bool) -> Style {
    let color = if placeholder { palette.muted } else { palette.chip };
    if focused {
        Style::default()
            .fg(palette.bg)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    }
}

const BROWSE_HINTS: &str = concat!(
    "/ Search | r/R Role | c Clear | j/k Move | h/l Role focus | ",
    "Enter Open | t Theme | ? Help | q Quit"
);

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let hints = if state.detail.is_open() {
        "←/→ Tab 1-9 Role | Esc/x Close | t Theme | q Close"
    } else {
        match state.input_mode {
            InputMode::Search => "Type to search | Backspace Delete | Enter/Esc Done",
            InputMode::Browse => BROWSE_HINTS,
        }
    };
    let console = state
        .logs
        .back()
        .cloned()
        .unwrap_or_else(|| "No messages yet".to_string());
    let console_color = if console.starts_with("[ERROR]") {
        palette.error
    } else {
        palette.muted
    };
    let text = vec![
        Line::from(Span::styled(hints, Style::default().fg(palette.fg))),
        Line::from(Span::styled(console, Style::default().fg(console_color))),
    ];
    let footer = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(palette.border)),
    );
    frame.render_widget(footer, area);
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    resolver: &dyn RoleAssetResolver,
    palette: &Palette,
    hits: &mut HitMap,
) {
    let (Some(view), Some(record)) = (state.detail.view(), state.detail_record()) else {
        return;
    };
    let content = detail::build_content(view, record, state.detail_layout, resolver);

    let popup = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup);
    hits.push(popup, HitTarget::ModalContent);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(palette.base())
        .title(Span::styled(
            format!(" {} ", content.title),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if popup.width >= 8 {
        let close_area = Rect {
            x: popup.x + popup.width - 5,
            y: popup.y,
            width: 3,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new("[x]").style(Style::default().fg(palette.error)),
            close_area,
        );
        hits.push(close_area, HitTarget::ModalClose);
    }

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(10)])
        .split(inner);

    render_detail_image(frame, columns[0], &content, palette);
    render_detail_text(frame, columns[1], &content, palette, hits);
}

fn render_detail_image(frame: &mut Frame, area: Rect, content: &DetailContent, palette: &Palette) {
    let color = if content.image.is_placeholder() {
        palette.muted
    } else {
        palette.chip
    };
    let mut lines: Vec<Line> = content
        .image
        .art
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(color))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        content.image.reference(),
        Style::default().fg(palette.muted),
    )));
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_detail_text(
    frame: &mut Frame,
    area: Rect,
    content: &DetailContent,
    palette: &Palette,
    hits: &mut HitMap,
) {
    let has_buttons = !content.role_buttons.is_empty();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(if has_buttons { 2 } else { 0 }),
            Constraint::Min(1),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(content.summary.as_str())
            .style(Style::default().fg(palette.fg))
            .wrap(Wrap { trim: true }),
        rows[0],
    );

    if has_buttons && rows[1].height > 0 {
        let right = rows[1].x + rows[1].width;
        let mut x = rows[1].x;
        let mut spans = Vec::new();
        for (idx, button) in content.role_buttons.iter().enumerate() {
            let style = if button.active {
                Style::default()
                    .fg(palette.bg)
                    .bg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.accent)
            };
            let label = format!("[{} {} {}]", idx + 1, button.glyph, button.tag);
            let span = Span::styled(label, style);
            let width = span.width() as u16;
            if x < right {
                hits.push(
                    Rect {
                        x,
                        y: rows[1].y,
                        width: width.min(right - x),
                        height: 1,
                    },
                    HitTarget::ModalRole(idx),
                );
            }
            spans.push(span);
            spans.push(Span::raw(" "));
            x = x.saturating_add(width + 1);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[1]);
    }

    let mut lines = Vec::new();
    for section in &content.sections {
        if let Some(heading) = &section.heading {
            lines.push(Line::from(Span::styled(
                heading.clone(),
                Style::default()
                    .fg(palette.chip)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(Span::styled(
            section.body.clone(),
            Style::default().fg(palette.fg),
        )));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[2]);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, palette: &Palette) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Lane Roster - Help",
        "",
        "List:",
        "  /            Search by name",
        "  r / R        Next / previous role filter",
        "  c            Clear search and role filter",
        "  j/k or ↑/↓   Move between players",
        "  h/l or ←/→   Focus a role chip",
        "  Enter        Open player detail",
        "  Mouse        Click a card or role chip",
        "",
        "Detail:",
        "  ←/→ Tab 1-9  Switch role",
        "  Esc / x      Close (or click outside)",
        "",
        "  t            Toggle light/dark theme",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        )
        .style(palette.base());
    frame.render_widget(help, popup_area);
}

pub fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_range_centres_selection() {
        assert_eq!(visible_range(0, 0, 5), (0, 0));
        assert_eq!(visible_range(3, 4, 5), (0, 4));
        assert_eq!(visible_range(10, 20, 5), (8, 13));
        assert_eq!(visible_range(19, 20, 5), (15, 20));
    }

    #[test]
    fn later_targets_win_hit_tests() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 20, 3), HitTarget::Card { record: 0 });
        hits.push(Rect::new(8, 1, 6, 1), HitTarget::RoleChip { record: 0, role: 0 });
        assert_eq!(hits.hit(9, 1), Some(HitTarget::RoleChip { record: 0, role: 0 }));
        assert_eq!(hits.hit(2, 1), Some(HitTarget::Card { record: 0 }));
        assert_eq!(hits.hit(25, 1), None);
    }
}

//! Home component - Labeling screen
//!
//! Shows the entry list with label markers, the progress gauge, both images
//! of the current pair and the two candidate captions. Remembers where
//! everything was drawn so mouse clicks can be resolved to the same Actions
//! the keyboard produces.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::{calculate_main_layout, hit, MainLayout};
use crate::model::entry::basename;
use crate::model::ui::ClickTarget;
use crate::model::{Choice, Entry, Session};
use crate::services::{caption_sections, CaptionSection};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Labeling screen state that is purely presentational
#[derive(Default)]
pub struct HomeComponent {
    /// List selection and scroll state
    pub list_state: ListState,

    /// Areas from the last draw, for mouse hit-testing
    layout: Option<MainLayout>,

    /// Number of entries in the last drawn list
    entry_count: usize,
}

impl HomeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget layout and scroll position, e.g. after a new dataset loads
    pub fn reset(&mut self) {
        self.list_state = ListState::default();
        self.layout = None;
        self.entry_count = 0;
    }

    /// Resolve a terminal cell to whatever was drawn there
    pub fn click_target(&self, column: u16, row: u16) -> Option<ClickTarget> {
        let layout = self.layout?;

        if hit(layout.left_caption, column, row) {
            return Some(ClickTarget::LeftCaption);
        }
        if hit(layout.right_caption, column, row) {
            return Some(ClickTarget::RightCaption);
        }
        if hit(layout.no_preference, column, row) {
            return Some(ClickTarget::NoPreference);
        }
        if hit(layout.list, column, row) {
            // Skip the top and bottom borders
            let first_row = layout.list.y + 1;
            let last_row = layout.list.y + layout.list.height.saturating_sub(1);
            if row < first_row || row >= last_row {
                return None;
            }
            let index = (row - first_row) as usize + self.list_state.offset();
            return (index < self.entry_count).then_some(ClickTarget::ListRow(index));
        }

        None
    }
}

/// The Action a click on `target` stands for
pub fn action_for(target: ClickTarget) -> Action {
    match target {
        ClickTarget::ListRow(index) => Action::SelectEntry(index),
        ClickTarget::LeftCaption => Action::ChooseLeft,
        ClickTarget::RightCaption => Action::ChooseRight,
        ClickTarget::NoPreference => Action::ChooseNoPreference,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => Some(Action::NextEntry),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => Some(Action::PrevEntry),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstEntry),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastEntry),

            // Labeling
            KeyCode::Char('1') | KeyCode::Char('a') | KeyCode::Left => Some(Action::ChooseLeft),
            KeyCode::Char('2') | KeyCode::Char('d') | KeyCode::Right => Some(Action::ChooseRight),
            KeyCode::Char('0') | KeyCode::Char('s') | KeyCode::Char(' ') => {
                Some(Action::ChooseNoPreference)
            }

            // Dataset
            KeyCode::Char('o') => Some(Action::OpenDatasetDialog),
            KeyCode::Char('e') => Some(Action::Export),
            KeyCode::Char('R') => Some(Action::OpenResetDialog),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self
                .click_target(mouse.column, mouse.row)
                .map(action_for),
            MouseEventKind::ScrollDown => Some(Action::NextEntry),
            MouseEventKind::ScrollUp => Some(Action::PrevEntry),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_home_screen which takes the session
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything the labeling screen reads but does not own
pub struct HomeRenderContext<'a> {
    pub session: &'a Session,
    pub display_tags: &'a [String],
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
    pub exporting: bool,
}

pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);
    home.layout = Some(layout);
    home.entry_count = ctx.session.len();
    home.list_state.select(ctx.session.current_index());

    let entry = ctx.session.current_entry();
    let chosen = entry.and_then(|e| ctx.session.label_of(e).and_then(|l| e.choice_for(l)));

    render_progress(frame, layout.progress, ctx.session);
    render_entry_list(frame, layout.list, home, ctx.session);

    match entry {
        Some(entry) => {
            render_asset(frame, layout.goal_asset, " Goal ", &entry.goal_image, ctx.session);
            render_asset(
                frame,
                layout.current_asset,
                " Current ",
                &entry.current_image,
                ctx.session,
            );
            render_caption(
                frame,
                layout.left_caption,
                " [1] Left ",
                &entry.caption1_text,
                ctx.display_tags,
                chosen == Some(Choice::Left),
            );
            render_caption(
                frame,
                layout.right_caption,
                " [2] Right ",
                &entry.caption2_text,
                ctx.display_tags,
                chosen == Some(Choice::Right),
            );
        }
        None => {
            let empty = Paragraph::new("No entries in this dataset").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(empty, layout.left_caption.union(layout.right_caption));
        }
    }

    render_no_preference(frame, layout.no_preference, chosen == Some(Choice::NoPreference));
    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help);

    Ok(())
}

fn render_progress(frame: &mut Frame, area: Rect, session: &Session) {
    let labeled = session.labeled_count();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Progress ")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(session.progress())
        .label(format!("{}/{}", labeled, session.len()));
    frame.render_widget(gauge, area);
}

fn render_entry_list(frame: &mut Frame, area: Rect, home: &mut HomeComponent, session: &Session) {
    // Border, highlight symbol, marker
    let name_width = (area.width as usize).saturating_sub(2 + 2 + 2);

    let items: Vec<ListItem> = session
        .entries()
        .iter()
        .map(|entry| {
            let (marker, color) = label_marker(session, entry);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", marker),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    truncate_to_width(entry.pair_key().as_str(), name_width),
                    Style::default().fg(Color::White),
                ),
            ]))
        })
        .collect();

    let title = format!(" Pairs ({}) ", session.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut home.list_state);
}

/// Marker shown next to an entry in the list
fn label_marker(session: &Session, entry: &Entry) -> (&'static str, Color) {
    match session.label_of(entry) {
        None => ("·", Color::DarkGray),
        Some(label) => match entry.choice_for(label) {
            Some(Choice::Left) => ("L", Color::Green),
            Some(Choice::Right) => ("R", Color::Green),
            Some(Choice::NoPreference) => ("=", Color::Yellow),
            // Stored index no longer matches either caption
            None => ("?", Color::Red),
        },
    }
}

fn render_asset(frame: &mut Frame, area: Rect, title: &str, image_ref: &str, session: &Session) {
    let status = match session.assets().get(image_ref) {
        Some(bytes) => Span::styled(format_size(bytes.len()), Style::default().fg(Color::Green)),
        None => Span::styled("missing", Style::default().fg(Color::Red)),
    };

    let lines = vec![
        Line::from(Span::styled(
            basename(image_ref).to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(status),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn render_caption(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    raw: &str,
    tags: &[String],
    chosen: bool,
) {
    let border = if chosen {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if chosen {
        format!("{}✓ ", title)
    } else {
        title.to_string()
    };

    let paragraph = Paragraph::new(caption_lines(&caption_sections(raw, tags)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn caption_lines(sections: &[CaptionSection]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        if let Some(ref tag) = section.tag {
            lines.push(Line::from(Span::styled(
                tag.to_uppercase(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        lines.extend(section.lines.iter().map(|l| Line::from(l.clone())));
    }
    lines
}

fn render_no_preference(frame: &mut Frame, area: Rect, chosen: bool) {
    let style = if chosen {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(" [0] No preference ", style)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let mut spans = vec![];

    if let Some(key) = ctx.session.current_key() {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(index) = ctx.session.current_index() {
        spans.push(Span::styled(
            format!("{}/{}", index + 1, ctx.session.len()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if ctx.exporting {
        spans.push(Span::styled(
            " exporting… ",
            Style::default().fg(Color::Magenta),
        ));
    }

    if let Some(error) = ctx.error {
        spans.clear();
        spans.push(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let help_spans = vec![
        key(" q ", Color::Yellow),
        Span::raw("Quit "),
        key(" 1 ", Color::Green),
        Span::raw("Left "),
        key(" 2 ", Color::Green),
        Span::raw("Right "),
        key(" 0 ", Color::Green),
        Span::raw("None "),
        key(" j/k ", Color::Cyan),
        Span::raw("Move "),
        key(" e ", Color::Magenta),
        Span::raw("Export "),
        key(" o ", Color::Magenta),
        Span::raw("Open "),
        key(" ? ", Color::White),
        Span::raw("Help"),
    ];

    let paragraph = Paragraph::new(Line::from(help_spans))
        .alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`
fn truncate_to_width(text: &str, max: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    if max > 0 {
        out.push('…');
    }
    out
}

fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::Dataset;
    use crate::model::{LabelFile, LabelStore};
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::Map;
    use tempfile::TempDir;

    fn entry(key: &str) -> Entry {
        Entry {
            goal_image: format!("{}_goal.jpg", key),
            current_image: format!("{}_current.jpg", key),
            caption1_text: "<action>go left</action>".to_string(),
            caption2_text: "<action>go right</action>".to_string(),
            caption1_index: 3,
            caption2_index: 7,
            extra: Map::new(),
        }
    }

    fn session(dir: &TempDir, count: usize) -> Session {
        let entries = (0..count).map(|i| entry(&format!("{:04}", i))).collect();
        let dataset = Dataset {
            entries,
            assets: Default::default(),
        };
        Session::new(dataset, LabelStore::open(LabelFile::in_dir(dir.path())))
    }

    fn draw(home: &mut HomeComponent, session: &Session) {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let tags = vec!["action".to_string()];
        let ctx = HomeRenderContext {
            session,
            display_tags: &tags,
            error: None,
            status_message: None,
            exporting: false,
        };
        terminal
            .draw(|frame| {
                draw_home_screen(frame, frame.area(), home, &ctx).unwrap();
            })
            .unwrap();
    }

    #[test]
    fn test_keys_and_clicks_share_actions() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, 3);
        let mut home = HomeComponent::new();
        draw(&mut home, &session);

        let layout = home.layout.unwrap();
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        let by_key = home
            .handle_key_event(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE))
            .unwrap();
        let by_mouse = home
            .handle_mouse_event(click(layout.left_caption.x + 2, layout.left_caption.y + 2))
            .unwrap();
        assert_eq!(by_key, Some(Action::ChooseLeft));
        assert_eq!(by_mouse, by_key);

        let by_mouse = home
            .handle_mouse_event(click(layout.no_preference.x + 2, layout.no_preference.y + 1))
            .unwrap();
        assert_eq!(by_mouse, Some(Action::ChooseNoPreference));
    }

    #[test]
    fn test_list_click_selects_row_and_ignores_borders() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, 3);
        let mut home = HomeComponent::new();
        draw(&mut home, &session);

        let list = home.layout.unwrap().list;
        assert_eq!(
            home.click_target(list.x + 3, list.y + 1),
            Some(ClickTarget::ListRow(0))
        );
        assert_eq!(
            home.click_target(list.x + 3, list.y + 3),
            Some(ClickTarget::ListRow(2))
        );
        // Past the last entry
        assert_eq!(home.click_target(list.x + 3, list.y + 4), None);
        // Top border
        assert_eq!(home.click_target(list.x + 3, list.y), None);
    }

    #[test]
    fn test_no_click_targets_before_first_draw() {
        let home = HomeComponent::new();
        assert_eq!(home.click_target(5, 5), None);
    }

    #[test]
    fn test_scroll_wheel_navigates() {
        let mut home = HomeComponent::new();
        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(home.handle_mouse_event(scroll).unwrap(), Some(Action::NextEntry));
    }

    #[test]
    fn test_draw_follows_session_cursor() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, 4);
        session.last();
        let mut home = HomeComponent::new();
        draw(&mut home, &session);
        assert_eq!(home.list_state.selected(), Some(3));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("0000", 10), "0000");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}

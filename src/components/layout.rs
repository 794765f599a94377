//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Labeling screen layout areas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainLayout {
    pub progress: Rect,
    pub list: Rect,
    pub goal_asset: Rect,
    pub current_asset: Rect,
    pub left_caption: Rect,
    pub right_caption: Rect,
    pub no_preference: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Whether the terminal cell at (`column`, `row`) falls inside `rect`
pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Calculate the labeling screen layout
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    // Content + status line + help bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // Entry list (left) and pair detail (right)
    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(main_chunks[0]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(horizontal_chunks[0]);

    // Assets row, captions, no-preference button
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(horizontal_chunks[1]);

    let asset_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right_chunks[0]);

    let caption_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right_chunks[1]);

    MainLayout {
        progress: left_chunks[0],
        list: left_chunks[1],
        goal_asset: asset_chunks[0],
        current_asset: asset_chunks[1],
        left_caption: caption_chunks[0],
        right_caption: caption_chunks[1],
        no_preference: right_chunks[2],
        status: main_chunks[1],
        help: main_chunks[2],
    }
}

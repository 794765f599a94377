//! Welcome screen shown until a dataset is loaded

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct WelcomeComponent {
    /// Error from the last load attempt
    pub error: Option<String>,
}

impl Component for WelcomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('o') | KeyCode::Enter => Some(Action::OpenDatasetDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::ForceQuit),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 4;
        let content_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Help
            ])
            .split(content_area);

        let title = Paragraph::new(Line::from(Span::styled(
            " pairpick ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Pairwise caption preference labeling",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Open a dataset folder containing:"),
            Line::from(Span::styled(
                "  data.json   the list of caption pairs",
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                "  *.jpg/png   the goal and current images it names",
                Style::default().fg(Color::Cyan),
            )),
            Line::from(""),
        ];

        if let Some(ref error) = self.error {
            lines.push(Line::from(Span::styled(
                format!("✗ {}", error),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "Press o or Enter to open a folder...",
            Style::default().fg(Color::Yellow),
        )));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Welcome ")
                    .border_style(Style::default().fg(Color::Green)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, chunks[1]);

        let help = Paragraph::new(Line::from(Span::styled(
            " o  Open dataset   ?  Help   q  Quit",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_welcome_keys() {
        let mut welcome = WelcomeComponent::default();
        let open = welcome
            .handle_key_event(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(open, Some(Action::OpenDatasetDialog));

        let quit = welcome
            .handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(quit, Some(Action::ForceQuit));
    }
}

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::ui::{Component, EventResult, Result};

pub enum ErrorDialogEvent {
    Dismissed,
}

/// Modal error message. Swallows every key until dismissed.
pub struct ErrorDialog {
    message: String,
    resolver: Arc<KeyResolver>,
}

impl ErrorDialog {
    pub fn new(message: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            message: message.into(),
            resolver,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Component for ErrorDialog {
    type Output = ErrorDialogEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_dialog(&key, DialogAction::Dismiss) {
            return Ok(ErrorDialogEvent::Dismissed.into());
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(60), Constraint::Percentage(40));

        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(&self.message, Style::default().fg(theme.text))),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or Esc to dismiss",
                Style::default().fg(theme.overlay1),
            )),
        ];

        let block = Block::default()
            .title(" Error ")
            .title_style(Style::default().fg(theme.error()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.error()))
            .style(Style::default().bg(theme.base));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_only_dismiss_keys_close() {
        let mut dialog = ErrorDialog::new("Dataset not found", Arc::new(KeyResolver::default()));
        let other = dialog
            .handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(other, EventResult::Consumed));
        let esc = dialog
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(esc, EventResult::Event(ErrorDialogEvent::Dismissed)));
    }
}

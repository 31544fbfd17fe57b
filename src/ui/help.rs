use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Theme;
use crate::ui::{Component, EventResult, Result};

pub struct Keybinding {
    pub key: String,
    pub description: String,
    /// Also shown in the status bar hints.
    pub hint: bool,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            hint: false,
        }
    }

    pub fn hint(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            hint: true,
        }
    }
}

pub struct KeybindingSection {
    pub title: String,
    pub keybindings: Vec<Keybinding>,
}

impl KeybindingSection {
    pub fn new(title: impl Into<String>, keybindings: Vec<Keybinding>) -> Self {
        Self {
            title: title.into(),
            keybindings,
        }
    }
}

pub enum HelpEvent {
    Close,
}

pub struct HelpOverlay {
    sections: Vec<KeybindingSection>,
}

impl HelpOverlay {
    pub const fn new(sections: Vec<KeybindingSection>) -> Self {
        Self { sections }
    }
}

impl Component for HelpOverlay {
    type Output = HelpEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match key.code {
            KeyCode::Esc | KeyCode::Char('?' | 'q') => HelpEvent::Close.into(),
            _ => EventResult::Consumed,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(60), Constraint::Percentage(70));
        frame.render_widget(Clear, popup_area);

        let key_style = Style::default().fg(theme.peach).add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(theme.text);
        let section_style = Style::default()
            .fg(theme.subtext0)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line> = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!("── {} ──", section.title),
                section_style,
            )));
            for kb in &section.keybindings {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:>14}", kb.key), key_style),
                    Span::raw("  "),
                    Span::styled(kb.description.clone(), desc_style),
                ]));
            }
        }

        let block = Block::default()
            .title(" Help (press ? or Esc to close) ")
            .title_style(Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.base));

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

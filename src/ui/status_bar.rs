use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction};
use crate::ui::Keybinding;

const LOGO: &[&str] = &[
    r"    /\      ",
    r"   /  \  _  ",
    r"  /____\| | ",
    r"  |[]  || | ",
    r"  |  []|| | ",
    r" lazyrent   ",
];

/// Bottom panel: dataset info and the latest notice on the left, key hints
/// in the middle.
pub struct StatusBar {
    source: Option<String>,
    notice: Option<String>,
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            source: None,
            notice: None,
            resolver,
        }
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn render_with_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        breadcrumbs: &[String],
        local_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.surface1));

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let [info_area, hints_area, logo_area] = Layout::horizontal([
            Constraint::Length(42),
            Constraint::Min(20),
            Constraint::Length(13),
        ])
        .areas(inner_area);

        self.render_status_info(frame, info_area, theme, breadcrumbs);
        self.render_keybindings(frame, hints_area, theme, local_keybindings);
        Self::render_logo(frame, logo_area, theme);
    }

    fn render_status_info(&self, frame: &mut Frame, area: Rect, theme: &Theme, breadcrumbs: &[String]) {
        let w = area.width as usize;
        let label_style = Style::default().fg(theme.overlay1);
        let value_style = Style::default().fg(theme.text);

        let mut lines = vec![
            Line::from(Span::styled(
                truncate_str(&breadcrumbs.join(" › "), w),
                Style::default()
                    .fg(theme.lavender)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            status_line(
                "dataset",
                self.source.as_deref().unwrap_or("none"),
                w,
                label_style,
                value_style,
            ),
        ];
        if let Some(notice) = &self.notice {
            lines.push(status_line(
                "notice",
                notice,
                w,
                label_style,
                Style::default().fg(theme.green),
            ));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        local_keybindings: &[Keybinding],
    ) {
        let global_keybindings = self.global_keybindings();

        // Local hints first, then global ones.
        let hints: Vec<&Keybinding> = local_keybindings
            .iter()
            .filter(|kb| kb.hint)
            .chain(global_keybindings.iter().filter(|kb| kb.hint))
            .collect();

        if hints.is_empty() || area.height == 0 {
            return;
        }

        let max_key_w = hints.iter().map(|kb| kb.key.chars().count()).max().unwrap_or(1);
        let max_desc_w = hints
            .iter()
            .map(|kb| kb.description.chars().count())
            .max()
            .unwrap_or(1);
        // key + " │ " + description + gap
        let col_width = u16::try_from(max_key_w + 3 + max_desc_w + 2).unwrap_or(u16::MAX);
        let num_cols = (area.width / col_width).max(1) as usize;
        let num_rows = area.height as usize;

        let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
        for (i, kb) in hints.iter().enumerate() {
            let col_idx = i / num_rows;
            if col_idx >= num_cols {
                break;
            }
            columns[col_idx].push(Line::from(vec![
                Span::styled(
                    format!("{:>width$}", kb.key, width = max_key_w),
                    Style::default().fg(theme.peach),
                ),
                Span::styled(" │ ", Style::default().fg(theme.surface2)),
                Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0)),
            ]));
        }

        let col_areas = Layout::horizontal(vec![Constraint::Length(col_width); num_cols]).split(area);
        for (col_area, col_lines) in col_areas.iter().zip(columns) {
            frame.render_widget(Paragraph::new(col_lines), *col_area);
        }
    }

    fn render_logo(frame: &mut Frame, area: Rect, theme: &Theme) {
        let logo_lines: Vec<Line> = LOGO
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    *line,
                    Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        frame.render_widget(Paragraph::new(logo_lines), area);
    }

    /// Application-wide keybindings, also listed in the help overlay.
    pub fn global_keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::hint(r.display_global(GlobalAction::Help), "Help"),
            Keybinding::hint(r.display_global(GlobalAction::NextTab), "Next tab"),
            Keybinding::new(r.display_global(GlobalAction::PreviousTab), "Previous tab"),
            Keybinding::hint(r.display_global(GlobalAction::Reload), "Reload"),
            Keybinding::new(r.display_global(GlobalAction::Suspend), "Suspend"),
            Keybinding::hint(r.display_global(GlobalAction::Quit), "Quit"),
            Keybinding::new(r.display_nav(NavAction::Select), "Select"),
        ]
    }
}

/// `label value`, label right-aligned.
fn status_line<'a>(
    label: &'a str,
    value: &str,
    max_width: usize,
    label_style: Style,
    value_style: Style,
) -> Line<'a> {
    const LABEL_W: usize = 8;
    let available = max_width.saturating_sub(LABEL_W + 1);
    Line::from(vec![
        Span::styled(format!("{label:>LABEL_W$}"), label_style),
        Span::raw(" "),
        Span::styled(truncate_str(value, available), value_style),
    ])
}

/// Cut `s` to `max_width` characters, ending in "..." when shortened.
fn truncate_str(s: &str, max_width: usize) -> String {
    let len = s.chars().count();
    if len <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_width).collect()
    }
}

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use tracing::debug;

use crate::Theme;
use crate::config::{KeyResolver, NavAction, SearchAction, TableAction};
use crate::table::{
    self, Align, PaginationVariant, RowKey, TableDescriptor, TableOptions, TableView, ViewEvent,
    ViewState,
};
use crate::ui::{Component, EventResult, Keybinding, Result};

/// Page numbers shown at once in the pagination control.
const PAGE_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// The highlighted row was activated.
    Activated(RowKey),
}

/// Searchable, sortable, paginated table over a [`TableDescriptor`].
///
/// Search, sort and paging state is owned here and survives row
/// replacement through [`DataTable::set_table`].
pub struct DataTable {
    table: Arc<TableDescriptor>,
    options: TableOptions,
    state: ViewState,
    view: TableView,
    highlight: TableState,
    focused_column: usize,
    searching: bool,
    title: Option<String>,
    resolver: Arc<KeyResolver>,
}

impl DataTable {
    pub fn new(table: Arc<TableDescriptor>, options: TableOptions, resolver: Arc<KeyResolver>) -> Self {
        let state = ViewState::new(&options);
        let view = table::derive(&table, &options, &state);
        let mut highlight = TableState::default();
        if !view.rows.is_empty() {
            highlight.select(Some(0));
        }
        Self {
            table,
            options,
            state,
            view,
            highlight,
            focused_column: 0,
            searching: false,
            title: None,
            resolver,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    pub const fn view(&self) -> &TableView {
        &self.view
    }

    pub fn table(&self) -> &TableDescriptor {
        &self.table
    }

    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// Replace the rows, keeping query, sort and a clamped page.
    ///
    /// The highlight follows its row when it is still on the page.
    pub fn set_table(&mut self, table: Arc<TableDescriptor>) {
        let highlighted = self.highlighted_key();
        self.table = table;
        self.focused_column = self
            .focused_column
            .min(self.table.columns.len().saturating_sub(1));
        self.state
            .apply(ViewEvent::RowsReplaced, &self.table, &self.options);
        self.view = table::derive(&self.table, &self.options, &self.state);

        let position = highlighted.and_then(|key| self.view.position_of(&self.table, &key));
        match position {
            Some(position) => self.highlight.select(Some(position)),
            None => self.clamp_highlight(),
        }
        debug!(rows = self.table.rows.len(), page = self.view.page, "table rows replaced");
    }

    /// Apply a view event. Returns whether the visible state changed.
    pub fn dispatch(&mut self, event: ViewEvent) -> bool {
        let page_before = self.view.page;
        if !self.state.apply(event, &self.table, &self.options) {
            return false;
        }
        self.view = table::derive(&self.table, &self.options, &self.state);
        if self.view.page == page_before {
            self.clamp_highlight();
        } else {
            self.highlight
                .select((!self.view.rows.is_empty()).then_some(0));
        }
        true
    }

    pub fn highlighted_key(&self) -> Option<RowKey> {
        let position = self.highlight.selected()?;
        let index = *self.view.rows.get(position)?;
        self.table.row_key(index)
    }

    fn clamp_highlight(&mut self) {
        let len = self.view.rows.len();
        let selected = match self.highlight.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.highlight.select(selected);
    }

    fn move_highlight(&mut self, down: bool) {
        let len = self.view.rows.len();
        if len == 0 {
            return;
        }
        let next = match self.highlight.selected() {
            Some(i) if down => (i + 1).min(len - 1),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.highlight.select(Some(next));
    }

    fn focused_accessor(&self) -> Option<String> {
        self.table
            .columns
            .get(self.focused_column)
            .map(|c| c.accessor.clone())
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> EventResult<TableEvent> {
        if self.resolver.matches_search(&key, SearchAction::Exit) {
            self.searching = false;
            self.dispatch(ViewEvent::ClearQuery);
            return EventResult::Consumed;
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            self.searching = false;
            return EventResult::Consumed;
        }

        match key.code {
            KeyCode::Backspace => {
                self.dispatch(ViewEvent::PopChar);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(ViewEvent::PushChar(c));
            }
            _ => {}
        }
        // Every other key is swallowed while typing.
        EventResult::Consumed
    }

    fn table_action(&self, key: &KeyEvent) -> Option<TableAction> {
        [
            TableAction::NextPage,
            TableAction::PreviousPage,
            TableAction::FirstPage,
            TableAction::LastPage,
            TableAction::PageSizeUp,
            TableAction::PageSizeDown,
            TableAction::Sort,
            TableAction::ColumnLeft,
            TableAction::ColumnRight,
        ]
        .into_iter()
        .find(|action| self.resolver.matches_table(key, *action))
    }

    fn handle_table_action(&mut self, action: TableAction) -> EventResult<TableEvent> {
        let event = match action {
            TableAction::NextPage => ViewEvent::NextPage,
            TableAction::PreviousPage => ViewEvent::PreviousPage,
            TableAction::FirstPage => ViewEvent::FirstPage,
            TableAction::LastPage => ViewEvent::LastPage,
            TableAction::PageSizeUp => ViewEvent::NextPageSize,
            TableAction::PageSizeDown => ViewEvent::PreviousPageSize,
            TableAction::Sort => {
                if !self.options.is_sorted {
                    return EventResult::Ignored;
                }
                match self.focused_accessor() {
                    Some(accessor) => ViewEvent::ToggleSort(accessor),
                    None => return EventResult::Consumed,
                }
            }
            TableAction::ColumnLeft | TableAction::ColumnRight if !self.options.is_sorted => {
                return EventResult::Ignored;
            }
            TableAction::ColumnLeft => {
                self.focused_column = self.focused_column.saturating_sub(1);
                return EventResult::Consumed;
            }
            TableAction::ColumnRight => {
                let last = self.table.columns.len().saturating_sub(1);
                self.focused_column = (self.focused_column + 1).min(last);
                return EventResult::Consumed;
            }
        };
        self.dispatch(event);
        EventResult::Consumed
    }

    /// Keybindings shown in the status bar and help overlay.
    pub fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut bindings = vec![
            Keybinding::new(
                format!("{}/{}", r.display_nav(NavAction::Up), r.display_nav(NavAction::Down)),
                "Move",
            ),
            Keybinding::hint(r.display_table(TableAction::NextPage), "Next page"),
            Keybinding::hint(r.display_table(TableAction::PreviousPage), "Prev page"),
            Keybinding::new(r.display_table(TableAction::FirstPage), "First page"),
            Keybinding::new(r.display_table(TableAction::LastPage), "Last page"),
            Keybinding::hint(
                format!(
                    "{}/{}",
                    r.display_table(TableAction::PageSizeUp),
                    r.display_table(TableAction::PageSizeDown)
                ),
                "Page size",
            ),
        ];
        if self.options.is_sorted {
            bindings.push(Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_table(TableAction::ColumnLeft),
                    r.display_table(TableAction::ColumnRight)
                ),
                "Focus column",
            ));
            bindings.push(Keybinding::hint(r.display_table(TableAction::Sort), "Sort"));
        }
        if self.options.can_search {
            bindings.push(Keybinding::hint(r.display_search(SearchAction::Toggle), "Search"));
            bindings.push(Keybinding::new(r.display_search(SearchAction::Exit), "Clear search"));
        }
        bindings
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect, block: Block, theme: &Theme) {
        if self.view.is_empty() || self.view.has_no_matches() {
            let message = if self.view.is_empty() {
                "No data".to_string()
            } else {
                format!("No entries match \"{}\"", self.state.query)
            };
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let [_, line, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(inner);
            let paragraph = Paragraph::new(message)
                .style(Style::default().fg(theme.muted()))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, line);
            return;
        }

        let sort = self.state.sort.as_ref().filter(|_| self.options.is_sorted);
        let header_cells: Vec<Cell> = self
            .table
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let arrow = sort
                    .filter(|s| s.accessor == column.accessor)
                    .map(|s| format!(" {}", s.direction.arrow()))
                    .unwrap_or_default();
                let mut style = Style::default().fg(theme.header()).add_modifier(Modifier::BOLD);
                if self.options.is_sorted && i == self.focused_column {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                Cell::from(
                    Line::from(format!("{}{arrow}", column.header))
                        .alignment(alignment(column.align)),
                )
                .style(style)
            })
            .collect();
        let header = Row::new(header_cells)
            .height(1)
            .style(Style::default().bg(theme.surface0));

        let rows: Vec<Row> = self
            .view
            .rows
            .iter()
            .filter_map(|&i| self.table.rows.get(i))
            .map(|record| {
                let cells = self.table.columns.iter().map(|column| {
                    Cell::from(Line::from(column.display(record)).alignment(alignment(column.align)))
                });
                Row::new(cells).style(Style::default().fg(theme.text))
            })
            .collect();

        let widths = self.table.columns.iter().map(|c| Constraint::Fill(c.width.max(1)));

        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(widget, area, &mut self.highlight);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let accent = theme.accent(&self.options.pagination.color);
        let summary = self.view.summary.map_or_else(Line::default, |summary| {
            Line::styled(summary.to_string(), Style::default().fg(theme.subtext0))
        });

        let mut sizes = vec![Span::styled("Per page:", Style::default().fg(theme.subtext0))];
        for size in self.options.entries_per_page.allowed() {
            let style = if size == self.view.page_size {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted())
            };
            sizes.push(Span::styled(format!(" {size}"), style));
        }
        let sizes = Line::from(sizes);

        #[allow(clippy::cast_possible_truncation)]
        let [summary_area, pages_area, size_area] = Layout::horizontal([
            Constraint::Length(summary.width() as u16),
            Constraint::Fill(1),
            Constraint::Length(sizes.width() as u16),
        ])
        .spacing(1)
        .areas(area);

        frame.render_widget(Paragraph::new(summary), summary_area);
        frame.render_widget(
            Paragraph::new(self.pagination_line(accent, theme)).alignment(Alignment::Center),
            pages_area,
        );
        frame.render_widget(Paragraph::new(sizes), size_area);
    }

    fn pagination_line(&self, accent: Color, theme: &Theme) -> Line<'static> {
        let count = self.view.page_count;
        let current = self.view.page;
        if self.options.pagination.variant == PaginationVariant::Text {
            return Line::styled(
                format!("Page {} of {}", current + 1, count.max(1)),
                Style::default().fg(accent),
            );
        }

        let start = current
            .saturating_sub(PAGE_WINDOW / 2)
            .min(count.saturating_sub(PAGE_WINDOW));
        let end = (start + PAGE_WINDOW).min(count);
        let muted = Style::default().fg(theme.muted());

        let mut spans = vec![Span::styled("‹ ", muted)];
        if start > 0 {
            spans.push(Span::styled("… ", muted));
        }
        for page in start..end {
            let label = format!(" {} ", page + 1);
            let style = match self.options.pagination.variant {
                _ if page != current => muted,
                PaginationVariant::Contained => Style::default()
                    .fg(theme.base)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
                _ => Style::default().fg(accent).add_modifier(Modifier::BOLD),
            };
            spans.push(Span::styled(label, style));
        }
        if end < count {
            spans.push(Span::styled(" …", muted));
        }
        spans.push(Span::styled(" ›", muted));
        Line::from(spans)
    }

    fn render_search(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (text, style) = if self.searching {
            (format!("/{}_", self.state.query), Style::default().fg(theme.yellow))
        } else {
            (
                format!("/{} ({} matches)", self.state.query, self.view.filtered),
                Style::default().fg(theme.subtext0),
            )
        };
        frame.render_widget(Paragraph::new(text).style(style), area);
    }
}

const fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

impl Component for DataTable {
    type Output = TableEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.searching {
            return Ok(self.handle_search_key(key));
        }

        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.move_highlight(true);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::Up) {
            self.move_highlight(false);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            return Ok(self
                .highlighted_key()
                .map_or(EventResult::Ignored, |key| TableEvent::Activated(key).into()));
        }
        if self.options.can_search {
            if self.resolver.matches_search(&key, SearchAction::Toggle) {
                self.searching = true;
                return Ok(EventResult::Consumed);
            }
            if self.resolver.matches_search(&key, SearchAction::Exit) && !self.state.query.is_empty() {
                self.dispatch(ViewEvent::ClearQuery);
                return Ok(EventResult::Consumed);
            }
        }

        Ok(self
            .table_action(&key)
            .map_or(EventResult::Ignored, |action| self.handle_table_action(action)))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let show_search = self.options.can_search && (self.searching || !self.state.query.is_empty());
        let [body_area, footer_area, search_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(u16::from(show_search)),
        ])
        .areas(area);

        let borders = if self.options.no_end_border {
            Borders::TOP | Borders::LEFT | Borders::RIGHT
        } else {
            Borders::ALL
        };
        let mut block = Block::default()
            .borders(borders)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()));
        if let Some(title) = &self.title {
            block = block.title(format!(" {title} ")).title_style(
                Style::default()
                    .fg(theme.mauve)
                    .add_modifier(Modifier::BOLD),
            );
        }

        self.render_body(frame, body_area, block, theme);
        self.render_footer(frame, footer_area, theme);
        if show_search {
            self.render_search(frame, search_area, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, EntriesPerPage, SortDirection, SortSpec, Value};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    fn people(n: usize) -> Arc<TableDescriptor> {
        let rows = (1..=n)
            .map(|i| {
                table::Row::new()
                    .with("id", Value::id(i))
                    .with("name", format!("Person {i:02}"))
                    .with("age", 20 + i)
            })
            .collect();
        Arc::new(TableDescriptor::new(
            vec![
                Column::new("Name", "name").width(2),
                Column::new("Age", "age").align(Align::Right),
            ],
            rows,
        ))
    }

    fn data_table(n: usize) -> DataTable {
        DataTable::new(people(n), TableOptions::default(), Arc::new(KeyResolver::default()))
    }

    fn draw(table: &mut DataTable, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| table.render(frame, frame.area(), &theme))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_first_page_and_summary() {
        let mut table = data_table(12);
        let screen = draw(&mut table, 80, 16);
        assert!(screen.contains("Person 01"));
        assert!(screen.contains("Person 10"));
        assert!(!screen.contains("Person 11"));
        assert!(screen.contains("Showing 1 to 10 of 12 entries"));
    }

    #[test]
    fn test_empty_table_says_no_data() {
        let mut table = data_table(0);
        let screen = draw(&mut table, 60, 8);
        assert!(screen.contains("No data"));
        assert!(screen.contains("Showing 0 to 0 of 0 entries"));
    }

    #[test]
    fn test_search_narrows_and_resets_page() {
        let mut table = data_table(12);
        table.handle_key(ch('n')).unwrap();
        assert_eq!(table.view().page, 1);

        table.handle_key(ch('/')).unwrap();
        assert!(table.is_searching());
        for c in "person 1".chars() {
            table.handle_key(ch(c)).unwrap();
        }
        table.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(!table.is_searching());
        assert_eq!(table.state().query, "person 1");
        assert_eq!(table.view().page, 0);
        // Person 10, 11, 12
        assert_eq!(table.view().filtered, 3);

        let screen = draw(&mut table, 80, 16);
        assert!(screen.contains("/person 1 (3 matches)"));
    }

    #[test]
    fn test_no_matches_message() {
        let mut table = data_table(3);
        table.dispatch(ViewEvent::SetQuery("zzz".into()));
        let screen = draw(&mut table, 60, 10);
        assert!(screen.contains("No entries match \"zzz\""));
    }

    #[test]
    fn test_escape_clears_query() {
        let mut table = data_table(5);
        table.dispatch(ViewEvent::SetQuery("01".into()));
        assert_eq!(table.view().filtered, 1);
        let result = table.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(result.is_consumed());
        assert_eq!(table.view().filtered, 5);
    }

    #[test]
    fn test_sort_focused_column() {
        let mut table = data_table(3);
        table.handle_key(ch('l')).unwrap();
        table.handle_key(ch('s')).unwrap();
        assert_eq!(table.state().sort, Some(SortSpec::ascending("age")));
        table.handle_key(ch('s')).unwrap();
        assert_eq!(
            table.state().sort.as_ref().map(|s| s.direction),
            Some(SortDirection::Descending)
        );
        let screen = draw(&mut table, 60, 10);
        assert!(screen.contains("Age ▼"));
        let first = screen.find("Person 03").unwrap();
        let last = screen.find("Person 01").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_activate_highlighted_row() {
        let mut table = data_table(3);
        table.handle_key(ch('j')).unwrap();
        let result = table.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            result,
            EventResult::Event(TableEvent::Activated(RowKey::Id(ref id))) if id == "2"
        ));
    }

    #[test]
    fn test_page_size_keeps_position() {
        let mut table = data_table(12);
        table.handle_key(ch('n')).unwrap();
        table.handle_key(ch('-')).unwrap();
        assert_eq!(table.view().page_size, 5);
        assert_eq!(table.view().page, 2);
        let screen = draw(&mut table, 80, 16);
        assert!(screen.contains("Person 11"));
        assert!(screen.contains("Showing 11 to 12 of 12 entries"));
    }

    #[test]
    fn test_replacing_rows_clamps_page_and_keeps_query() {
        let mut table = data_table(25);
        table.handle_key(ch('G')).unwrap();
        assert_eq!(table.view().page, 2);

        table.set_table(people(12));
        assert_eq!(table.view().page, 1);

        table.dispatch(ViewEvent::SetQuery("Person".into()));
        table.set_table(people(4));
        assert_eq!(table.state().query, "Person");
        assert_eq!(table.view().filtered, 4);
    }

    #[test]
    fn test_highlight_follows_row_on_reload() {
        let mut table = data_table(5);
        table.handle_key(ch('j')).unwrap();
        table.handle_key(ch('j')).unwrap();
        assert_eq!(table.highlighted_key(), Some(RowKey::Id("3".into())));

        // One more row, reversed order.
        let reloaded = people(6);
        let mut rows = reloaded.rows.clone();
        rows.reverse();
        table.set_table(Arc::new(TableDescriptor::new(reloaded.columns.clone(), rows)));
        assert_eq!(table.highlighted_key(), Some(RowKey::Id("3".into())));
        assert_eq!(table.view().position_of(table.table(), &RowKey::Id("3".into())), Some(3));
    }

    #[test]
    fn test_search_disabled() {
        let options = TableOptions {
            can_search: false,
            ..TableOptions::default()
        };
        let mut table = DataTable::new(people(3), options, Arc::new(KeyResolver::default()));
        let result = table.handle_key(ch('/')).unwrap();
        assert!(!result.is_consumed());
        assert!(!table.is_searching());
    }

    #[test]
    fn test_unsortable_table_ignores_column_keys() {
        let options = TableOptions {
            is_sorted: false,
            ..TableOptions::default()
        };
        let mut table = DataTable::new(people(3), options, Arc::new(KeyResolver::default()));
        for k in [ch('l'), key(KeyCode::Right), ch('h'), ch('s')] {
            assert_eq!(table.handle_key(k).unwrap(), EventResult::Ignored);
        }
        assert_eq!(table.focused_column, 0);
        assert_eq!(table.state().sort, None);
    }

    #[test]
    fn test_no_end_border() {
        let options = TableOptions {
            no_end_border: true,
            entries_per_page: EntriesPerPage {
                default_value: 5,
                entries: vec![5],
            },
            ..TableOptions::default()
        };
        let mut table = DataTable::new(people(2), options, Arc::new(KeyResolver::default()));
        let screen = draw(&mut table, 40, 8);
        assert!(!screen.contains('╰'));
        assert!(screen.contains('╭'));
    }

    #[test]
    fn test_text_pagination() {
        let mut options = TableOptions::default();
        options.pagination.variant = PaginationVariant::Text;
        let mut table = DataTable::new(people(12), options, Arc::new(KeyResolver::default()));
        let screen = draw(&mut table, 90, 16);
        assert!(screen.contains("Page 1 of 2"));
    }
}

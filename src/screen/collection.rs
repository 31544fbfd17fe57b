use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::config::KeyResolver;
use crate::data::{Collection, Dataset, join};
use crate::screen::ScreenMsg;
use crate::table::{RowKey, TableOptions};
use crate::ui::{Component, DataTable, EventResult, Keybinding, Result, Screen, TableEvent};

/// Read-only table over one dataset collection.
pub struct CollectionScreen {
    collection: Collection,
    table: DataTable,
}

impl CollectionScreen {
    pub fn new(
        collection: Collection,
        dataset: &Dataset,
        options: TableOptions,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let table = DataTable::new(
            Arc::new(join::table_for(collection, dataset)),
            options,
            resolver,
        )
        .with_title(collection.title());
        Self { collection, table }
    }

    pub const fn collection(&self) -> Collection {
        self.collection
    }

    pub const fn table(&self) -> &DataTable {
        &self.table
    }

    /// Swap in freshly loaded rows. Search, sort and page survive.
    pub fn reload(&mut self, dataset: &Dataset) {
        self.table
            .set_table(Arc::new(join::table_for(self.collection, dataset)));
    }

    fn describe(&self, key: &RowKey) -> Option<String> {
        let table = self.table.table();
        let row = table
            .rows
            .iter()
            .enumerate()
            .find(|(i, row)| &row.key(*i) == key)
            .map(|(_, row)| row)?;
        let cells: Vec<String> = table
            .columns
            .iter()
            .filter(|c| !c.header.is_empty())
            .map(|c| format!("{}: {}", c.header, c.display(row)))
            .collect();
        Some(cells.join(", "))
    }
}

impl Screen for CollectionScreen {
    type Output = ScreenMsg;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.table.handle_key(key)? {
            EventResult::Event(TableEvent::Activated(row)) => self
                .describe(&row)
                .map_or(EventResult::Consumed, |text| ScreenMsg::Notice(text).into()),
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.table.render(frame, area, theme);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Browse".to_string(), self.collection.title().to_string()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        self.table.keybindings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::join::tests::dataset;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(screen: &mut CollectionScreen, code: KeyCode) -> EventResult<ScreenMsg> {
        screen
            .handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_activation_describes_row() {
        let data = dataset();
        let mut screen = CollectionScreen::new(
            Collection::Craftsmen,
            &data,
            TableOptions::default(),
            Arc::new(KeyResolver::default()),
        );
        press(&mut screen, KeyCode::Down);
        let result = press(&mut screen, KeyCode::Enter);
        let EventResult::Event(ScreenMsg::Notice(text)) = result else {
            panic!("expected a notice, got {result:?}");
        };
        assert!(text.starts_with("Name: Kemal Usta"));
        assert!(text.contains("Score: N/A"));
    }

    #[test]
    fn test_reload_keeps_query() {
        let mut data = dataset();
        let mut screen = CollectionScreen::new(
            Collection::Issues,
            &data,
            TableOptions::default(),
            Arc::new(KeyResolver::default()),
        );
        press(&mut screen, KeyCode::Char('/'));
        for c in "usta".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        assert_eq!(screen.table().view().filtered, 2);

        data.issues.truncate(1);
        screen.reload(&data);
        assert_eq!(screen.table().state().query, "usta");
        assert_eq!(screen.table().view().filtered, 1);
    }

    #[test]
    fn test_unhandled_keys_bubble_up() {
        let data = dataset();
        let mut screen = CollectionScreen::new(
            Collection::Apartments,
            &data,
            TableOptions::default(),
            Arc::new(KeyResolver::default()),
        );
        assert_eq!(press(&mut screen, KeyCode::Char('q')), EventResult::Ignored);
    }
}

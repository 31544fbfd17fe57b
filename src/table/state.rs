//! View state owned by a table instance and the reducer that moves it.

use tracing::trace;

use super::model::TableDescriptor;
use super::options::TableOptions;
use super::page;
use super::search;
use super::sort::SortSpec;

/// An interaction that changes the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SetQuery(String),
    PushChar(char),
    PopChar,
    ClearQuery,
    /// Header activated for the column with this accessor.
    ToggleSort(String),
    SetPageSize(usize),
    NextPageSize,
    PreviousPageSize,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    /// The caller replaced the table's rows.
    RowsReplaced,
}

/// Search, sort and paging state of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn new(options: &TableOptions) -> Self {
        Self {
            query: String::new(),
            sort: None,
            page: 0,
            page_size: options.entries_per_page.initial(),
        }
    }

    /// Apply `event`, returning whether anything changed.
    pub fn apply(
        &mut self,
        event: ViewEvent,
        table: &TableDescriptor,
        options: &TableOptions,
    ) -> bool {
        let before = self.clone();
        trace!(?event, "applying table view event");

        match event {
            ViewEvent::SetQuery(query) => self.set_query(query, options),
            ViewEvent::PushChar(c) => {
                let mut query = self.query.clone();
                query.push(c);
                self.set_query(query, options);
            }
            ViewEvent::PopChar => {
                let mut query = self.query.clone();
                query.pop();
                self.set_query(query, options);
            }
            ViewEvent::ClearQuery => self.set_query(String::new(), options),
            ViewEvent::ToggleSort(accessor) => {
                if options.is_sorted && table.column(&accessor).is_some() {
                    self.sort = SortSpec::cycle(self.sort.as_ref(), &accessor);
                }
            }
            ViewEvent::SetPageSize(size) => {
                self.set_page_size(options.entries_per_page.resolve(size), table);
            }
            ViewEvent::NextPageSize => {
                self.set_page_size(options.entries_per_page.next(self.page_size), table);
            }
            ViewEvent::PreviousPageSize => {
                self.set_page_size(options.entries_per_page.previous(self.page_size), table);
            }
            ViewEvent::NextPage => {
                self.page = page::clamp_page(
                    self.page.saturating_add(1),
                    self.filtered_len(table),
                    self.page_size,
                );
            }
            ViewEvent::PreviousPage => self.page = self.page.saturating_sub(1),
            ViewEvent::FirstPage => self.page = 0,
            ViewEvent::LastPage => {
                self.page = page::last_page(self.filtered_len(table), self.page_size);
            }
            ViewEvent::RowsReplaced => {
                self.page = page::clamp_page(self.page, self.filtered_len(table), self.page_size);
            }
        }

        *self != before
    }

    fn set_query(&mut self, query: String, options: &TableOptions) {
        if !options.can_search || query == self.query {
            return;
        }
        self.query = query;
        self.page = 0;
    }

    fn set_page_size(&mut self, size: usize, table: &TableDescriptor) {
        if size == self.page_size {
            return;
        }
        self.page = page::rescale_page(self.page, self.page_size, size, self.filtered_len(table));
        self.page_size = size;
    }

    fn filtered_len(&self, table: &TableDescriptor) -> usize {
        if self.query.is_empty() {
            table.rows.len()
        } else {
            search::filter(&table.rows, &table.columns, &self.query).len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::model::{Column, Row};
    use crate::table::options::EntriesPerPage;
    use crate::table::sort::SortDirection;

    fn table(n: usize) -> TableDescriptor {
        let rows = (1..=n)
            .map(|i| Row::new().with("id", i).with("name", format!("Daire {i}")))
            .collect();
        TableDescriptor::new(vec![Column::new("Name", "name")], rows)
    }

    fn options() -> TableOptions {
        TableOptions {
            entries_per_page: EntriesPerPage {
                default_value: 10,
                entries: vec![5, 10, 25],
            },
            ..TableOptions::default()
        }
    }

    #[test]
    fn test_query_change_resets_page() {
        let table = table(30);
        let options = options();
        let mut state = ViewState::new(&options);
        state.apply(ViewEvent::NextPage, &table, &options);
        state.apply(ViewEvent::NextPage, &table, &options);
        assert_eq!(state.page, 2);

        state.apply(ViewEvent::PushChar('1'), &table, &options);
        assert_eq!(state.query, "1");
        assert_eq!(state.page, 0);

        state.apply(ViewEvent::NextPage, &table, &options);
        assert!(state.apply(ViewEvent::SetQuery("zzz".into()), &table, &options));
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_same_query_is_noop() {
        let table = table(30);
        let options = options();
        let mut state = ViewState::new(&options);
        state.apply(ViewEvent::SetQuery("Daire".into()), &table, &options);
        state.apply(ViewEvent::NextPage, &table, &options);
        assert!(!state.apply(ViewEvent::SetQuery("Daire".into()), &table, &options));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_search_disabled() {
        let table = table(3);
        let options = TableOptions {
            can_search: false,
            ..options()
        };
        let mut state = ViewState::new(&options);
        assert!(!state.apply(ViewEvent::PushChar('x'), &table, &options));
        assert!(state.query.is_empty());
    }

    #[test]
    fn test_sort_keeps_page() {
        let table = table(30);
        let options = options();
        let mut state = ViewState::new(&options);
        state.apply(ViewEvent::NextPage, &table, &options);
        state.apply(ViewEvent::ToggleSort("name".into()), &table, &options);
        assert_eq!(state.page, 1);
        assert_eq!(
            state.sort.as_ref().map(|s| s.direction),
            Some(SortDirection::Ascending)
        );
        state.apply(ViewEvent::ToggleSort("name".into()), &table, &options);
        state.apply(ViewEvent::ToggleSort("name".into()), &table, &options);
        assert_eq!(state.sort, None);
    }

    #[test]
    fn test_sort_ignored_when_disabled_or_unknown() {
        let table = table(3);
        let options = options();
        let mut state = ViewState::new(&options);
        assert!(!state.apply(ViewEvent::ToggleSort("floor".into()), &table, &options));

        let unsorted = TableOptions {
            is_sorted: false,
            ..options
        };
        assert!(!state.apply(ViewEvent::ToggleSort("name".into()), &table, &unsorted));
    }

    #[test]
    fn test_page_bounds() {
        let table = table(12);
        let options = options();
        let mut state = ViewState::new(&options);
        state.apply(ViewEvent::PreviousPage, &table, &options);
        assert_eq!(state.page, 0);
        state.apply(ViewEvent::NextPage, &table, &options);
        state.apply(ViewEvent::NextPage, &table, &options);
        assert_eq!(state.page, 1);
        state.apply(ViewEvent::FirstPage, &table, &options);
        assert_eq!(state.page, 0);
        state.apply(ViewEvent::LastPage, &table, &options);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_page_size_change_keeps_position() {
        let table = table(12);
        let options = options();
        let mut state = ViewState::new(&options);
        assert_eq!(state.page_size, 10);
        state.apply(ViewEvent::NextPage, &table, &options);
        assert_eq!(state.page, 1);

        state.apply(ViewEvent::SetPageSize(5), &table, &options);
        assert_eq!(state.page_size, 5);
        assert_eq!(state.page, 2);

        state.apply(ViewEvent::SetPageSize(25), &table, &options);
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_invalid_page_size_falls_back() {
        let table = table(12);
        let options = options();
        let mut state = ViewState::new(&options);
        state.apply(ViewEvent::SetPageSize(5), &table, &options);
        state.apply(ViewEvent::SetPageSize(7), &table, &options);
        assert_eq!(state.page_size, 10);
    }

    #[test]
    fn test_page_size_cycle() {
        let table = table(12);
        let options = options();
        let mut state = ViewState::new(&options);
        state.apply(ViewEvent::NextPageSize, &table, &options);
        assert_eq!(state.page_size, 25);
        state.apply(ViewEvent::PreviousPageSize, &table, &options);
        state.apply(ViewEvent::PreviousPageSize, &table, &options);
        assert_eq!(state.page_size, 5);
    }

    #[test]
    fn test_rows_replaced_clamps_page() {
        let options = options();
        let mut state = ViewState::new(&options);
        let big = table(40);
        state.apply(ViewEvent::LastPage, &big, &options);
        assert_eq!(state.page, 3);

        let small = table(15);
        state.apply(ViewEvent::RowsReplaced, &small, &options);
        assert_eq!(state.page, 1);

        let empty = table(0);
        state.apply(ViewEvent::RowsReplaced, &empty, &options);
        assert_eq!(state.page, 0);
    }
}

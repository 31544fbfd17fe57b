use std::ops::Range;

use super::model::{RowKey, TableDescriptor};
use super::options::TableOptions;
use super::page::{self, PageSummary};
use super::search;
use super::sort;
use super::state::ViewState;

/// What a table shows for a given descriptor, configuration and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// Positions into the descriptor's rows, in display order.
    pub rows: Vec<usize>,
    /// Rows before filtering.
    pub total: usize,
    /// Rows after filtering.
    pub filtered: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub summary: Option<PageSummary>,
}

impl TableView {
    /// The descriptor holds no rows at all.
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Rows exist but none match the query.
    pub const fn has_no_matches(&self) -> bool {
        self.total > 0 && self.filtered == 0
    }

    pub fn keys(&self, table: &TableDescriptor) -> Vec<RowKey> {
        self.rows
            .iter()
            .filter_map(|&i| table.row_key(i))
            .collect()
    }

    /// Position on the current page of the row identified by `key`.
    pub fn position_of(&self, table: &TableDescriptor, key: &RowKey) -> Option<usize> {
        self.rows
            .iter()
            .position(|&i| table.row_key(i).as_ref() == Some(key))
    }
}

/// Filter, sort and slice `table` for `state`.
///
/// A page index beyond the last page is clamped here as well, so a stale
/// state never shows an empty page.
pub fn derive(table: &TableDescriptor, options: &TableOptions, state: &ViewState) -> TableView {
    let query = if options.can_search { state.query.as_str() } else { "" };
    let mut matching = search::filter(&table.rows, &table.columns, query);

    if let Some(spec) = state.sort.as_ref().filter(|_| options.is_sorted) {
        sort::sort_indices(&mut matching, &table.rows, spec);
    }

    let page_size = options.entries_per_page.resolve(state.page_size);
    let filtered = matching.len();
    let current = page::clamp_page(state.page, filtered, page_size);
    let range: Range<usize> = page::page_range(current, filtered, page_size);
    let summary = options
        .show_total_entries
        .then(|| PageSummary::new(&range, filtered));

    TableView {
        rows: matching[range].to_vec(),
        total: table.rows.len(),
        filtered,
        page: current,
        page_count: page::page_count(filtered, page_size),
        page_size,
        summary,
    }
}

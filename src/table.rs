//! Tabular data view.
//!
//! A table is described by a [`TableDescriptor`] (columns and rows) and a
//! set of [`TableOptions`]. The visible page is derived from those two and a
//! [`ViewState`] holding the search query, sort and page. Everything here is
//! synchronous and free of I/O; rendering lives in
//! [`crate::ui::DataTable`].

pub mod model;
pub mod options;
pub mod page;
pub mod search;
pub mod sort;
pub mod state;
pub mod view;

pub use model::{Align, Column, Row, RowKey, TableDescriptor, Value};
pub use options::{EntriesPerPage, PaginationStyle, PaginationVariant, TableOptions};
pub use page::PageSummary;
pub use sort::{SortDirection, SortSpec};
pub use state::{ViewEvent, ViewState};
pub use view::{TableView, derive};

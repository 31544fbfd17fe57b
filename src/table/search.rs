//! Search functionality for filtering rows.
//!
//! This module encapsulates the matching logic, allowing the underlying
//! implementation to be changed without affecting the table view.

use super::model::{Column, Row};

/// A case-insensitive substring matcher.
pub struct Matcher {
    needle: String,
}

impl Matcher {
    /// Create a matcher for `query`. An empty query matches everything.
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Check if `text` contains the query, ignoring case.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let matcher = Matcher::new("KAT");
    /// assert!(matcher.matches("3. kat, daire 12"));
    /// assert!(!matcher.matches("zemin"));
    /// ```
    pub fn matches(&self, text: &str) -> bool {
        self.is_empty() || text.to_lowercase().contains(&self.needle)
    }

    /// Check if any of the provided texts contain the query.
    pub fn matches_any<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> bool {
        self.is_empty() || texts.into_iter().any(|text| self.matches(text))
    }

    /// Check a row against every column's raw value.
    pub fn matches_row(&self, row: &Row, columns: &[Column]) -> bool {
        self.is_empty()
            || columns
                .iter()
                .any(|column| self.matches(&row.value(&column.accessor).to_string()))
    }
}

/// Indices of the rows matching `query`, in their original order.
pub fn filter(rows: &[Row], columns: &[Column], query: &str) -> Vec<usize> {
    let matcher = Matcher::new(query);
    rows.iter()
        .enumerate()
        .filter(|(_, row)| matcher.matches_row(row, columns))
        .map(|(i, _)| i)
        .collect()
}

//! Table configuration.
//!
//! Keys mirror the options callers pass to the table: `entriesPerPage`,
//! `canSearch`, `showTotalEntries`, `isSorted`, `noEndBorder` and
//! `pagination`. Every key is optional in the config file.

use serde::{Deserialize, Serialize};

/// Page-size selector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntriesPerPage {
    pub default_value: usize,
    pub entries: Vec<usize>,
}

impl Default for EntriesPerPage {
    fn default() -> Self {
        Self {
            default_value: 10,
            entries: vec![5, 10, 15, 20, 25],
        }
    }
}

impl EntriesPerPage {
    /// Allowed page sizes in configured order, without zeros or duplicates.
    ///
    /// Falls back to the default alone when no usable entry is configured.
    pub fn allowed(&self) -> Vec<usize> {
        let mut allowed: Vec<usize> = Vec::with_capacity(self.entries.len());
        for &size in &self.entries {
            if size > 0 && !allowed.contains(&size) {
                allowed.push(size);
            }
        }
        if allowed.is_empty() {
            allowed.push(self.default_value.max(1));
        }
        allowed
    }

    /// The page size to use initially.
    pub fn initial(&self) -> usize {
        self.resolve(self.default_value)
    }

    /// `requested` if it is allowed, otherwise the configured default (or
    /// the first allowed size when the default is not itself allowed).
    pub fn resolve(&self, requested: usize) -> usize {
        let allowed = self.allowed();
        if allowed.contains(&requested) {
            requested
        } else if allowed.contains(&self.default_value) {
            self.default_value
        } else {
            allowed[0]
        }
    }

    /// Next larger allowed size, staying on the largest.
    pub fn next(&self, current: usize) -> usize {
        let allowed = self.allowed();
        allowed
            .iter()
            .position(|&s| s == current)
            .and_then(|i| allowed.get(i + 1))
            .copied()
            .unwrap_or_else(|| self.resolve(current))
    }

    /// Next smaller allowed size, staying on the smallest.
    pub fn previous(&self, current: usize) -> usize {
        let allowed = self.allowed();
        allowed
            .iter()
            .position(|&s| s == current)
            .and_then(|i| i.checked_sub(1))
            .map_or_else(|| self.resolve(current), |i| allowed[i])
    }
}

/// Visual style of the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationVariant {
    #[default]
    Gradient,
    Contained,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationStyle {
    pub variant: PaginationVariant,
    /// Palette accent name, see [`crate::Theme::accent`].
    pub color: String,
}

impl Default for PaginationStyle {
    fn default() -> Self {
        Self {
            variant: PaginationVariant::Gradient,
            color: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct TableOptions {
    pub entries_per_page: EntriesPerPage,
    pub can_search: bool,
    pub show_total_entries: bool,
    pub is_sorted: bool,
    pub no_end_border: bool,
    pub pagination: PaginationStyle,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            entries_per_page: EntriesPerPage::default(),
            can_search: true,
            show_total_entries: true,
            is_sorted: true,
            no_end_border: false,
            pagination: PaginationStyle::default(),
        }
    }
}

impl TableOptions {
    /// Same options with a different initial page size.
    #[must_use]
    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.entries_per_page.default_value = size;
        self
    }
}

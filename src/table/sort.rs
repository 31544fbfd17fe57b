//! Single-column stable sorting.
//!
//! Ascending order is: numeric values (numerically), then every other value
//! by its string form (case-sensitive, lexicographic), then missing values.
//! Descending is the exact reverse. Equal keys keep their original relative
//! order in both directions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::model::{Row, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Column and direction the rows are sorted by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub accessor: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(accessor: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(accessor: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Next step of the header cycle for `accessor`:
    /// unsorted → ascending → descending → unsorted.
    ///
    /// Activating a different column starts it at ascending.
    pub fn cycle(current: Option<&Self>, accessor: &str) -> Option<Self> {
        match current {
            Some(spec) if spec.accessor == accessor => match spec.direction {
                SortDirection::Ascending => Some(Self::descending(accessor)),
                SortDirection::Descending => None,
            },
            _ => Some(Self::ascending(accessor)),
        }
    }
}

/// Precomputed comparison key for one cell.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
    Missing,
}

impl SortKey {
    fn of(value: &Value) -> Self {
        if value.is_missing() {
            return Self::Missing;
        }
        value
            .as_number()
            .map_or_else(|| Self::Text(value.to_string()), Self::Number)
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Missing => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Total order between two cell values in ascending direction.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    SortKey::of(a).compare(&SortKey::of(b))
}

/// Stable-sorts `indices` (positions into `rows`) by `spec`.
pub fn sort_indices(indices: &mut [usize], rows: &[Row], spec: &SortSpec) {
    let keys: Vec<SortKey> = rows
        .iter()
        .map(|row| SortKey::of(row.value(&spec.accessor)))
        .collect();
    indices.sort_by(|&a, &b| spec.direction.apply(keys[a].compare(&keys[b])));
}

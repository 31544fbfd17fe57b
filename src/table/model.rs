//! Declarative table model: cell values, columns, rows and the descriptor
//! that pairs them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Field consulted for row identity.
pub const ID_FIELD: &str = "id";

static MISSING: Value = Value::Missing;

/// A displayable cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Missing,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Backend-assigned identifier.
    Id(String),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn id(value: impl fmt::Display) -> Self {
        Self::Id(value.to_string())
    }

    /// Wraps an optional value, mapping `None` to [`Value::Missing`].
    pub fn optional<T: Into<Self>>(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric reading of the value, if it has one.
    ///
    /// Text that parses as a finite number counts as numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) | Self::Id(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Text(s) | Self::Id(s) => f.write_str(s),
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<usize> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Horizontal alignment of a column's header and cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Maps a cell value to the text shown for it.
pub type CellRenderer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Column descriptor.
#[derive(Clone)]
pub struct Column {
    pub header: String,
    pub accessor: String,
    pub width: u16,
    pub align: Align,
    renderer: Option<CellRenderer>,
}

impl Column {
    pub fn new(header: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            accessor: accessor.into(),
            width: 1,
            align: Align::Left,
            renderer: None,
        }
    }

    /// Relative width weight. Zero is treated as one.
    #[must_use]
    pub fn width(mut self, weight: u16) -> Self {
        self.width = weight.max(1);
        self
    }

    #[must_use]
    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Custom cell renderer. It also receives [`Value::Missing`] for rows
    /// lacking the accessor. Only the displayed text changes: search and
    /// sort still see the raw value.
    #[must_use]
    pub fn render(mut self, renderer: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Text shown for this column in `row`.
    pub fn display(&self, row: &Row) -> String {
        let value = row.value(&self.accessor);
        self.renderer
            .as_ref()
            .map_or_else(|| value.to_string(), |render| render(value))
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Identity of a row for rendering purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Id(String),
    Ordinal(usize),
}

/// A row record: field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Value under `field`, or [`Value::Missing`] when absent.
    pub fn value(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&MISSING)
    }

    /// Identity of this row when it sits at `ordinal` in its table.
    pub fn key(&self, ordinal: usize) -> RowKey {
        match self.get(ID_FIELD) {
            Some(value) if !value.is_missing() => RowKey::Id(value.to_string()),
            _ => RowKey::Ordinal(ordinal),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The `{ columns, rows }` pair describing what a table shows.
#[derive(Debug, Clone, Default)]
pub struct TableDescriptor {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl TableDescriptor {
    pub const fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn column(&self, accessor: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.accessor == accessor)
    }

    pub fn row_key(&self, index: usize) -> Option<RowKey> {
        self.rows.get(index).map(|row| row.key(index))
    }
}

//! Raw column values as either store hands them out.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A single column value before mapping.
///
/// SQLite only ever produces `Null`, `Integer`, `Real` and `Text` (plus
/// `Uuid` for 16-byte blobs); PostgreSQL produces the typed variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Uuid(Uuid),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short type label used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match *self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Uuid(_) => "uuid",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

/// One row of a table scan, in the order the store returned the columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    columns: Option<Arc<[String]>>,
    values: Vec<Value>,
}

impl RawRow {
    /// Row without column names; the mapper resolves fields by position.
    #[must_use]
    pub const fn positional(values: Vec<Value>) -> Self {
        Self { columns: None, values }
    }

    /// Row carrying the column names reported by the store. The names are
    /// shared by every row of the same scan.
    #[must_use]
    pub const fn named(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns: Some(columns), values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn column_names(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Position of a named column, if the row carries names.
    #[must_use]
    pub fn position_of(&self, column: &str) -> Option<usize> {
        self.columns.as_deref()?.iter().position(|name| name == column)
    }
}

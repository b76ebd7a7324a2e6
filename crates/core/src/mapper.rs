//! Raw row → typed record.
//!
//! A row is first resolved against the layout for its (kind, side) into a
//! [`FieldSet`], then the record type pulls each field through a typed
//! parser. Nothing here is mutated between rows.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::entity::{EntityKind, StoreSide};
use crate::error::MappingError;
use crate::normalize::{parse_date, parse_timestamp};
use crate::records::{Entity, Filmwork, Genre, GenreFilmwork, Person, PersonFilmWork, Record};
use crate::schema::{layout, Field};
use crate::value::{RawRow, Value};

/// Column values of one row, indexed by the field they feed.
#[derive(Debug)]
pub struct FieldSet<'r> {
    kind: EntityKind,
    values: [Option<&'r Value>; Field::COUNT],
}

impl<'r> FieldSet<'r> {
    fn new(kind: EntityKind) -> Self {
        Self { kind, values: [None; Field::COUNT] }
    }

    fn set(&mut self, field: Field, value: &'r Value) {
        if let Some(slot) = self.values.get_mut(field.index()) {
            *slot = Some(value);
        }
    }

    /// Value of a field, or `None` when the layout does not carry it.
    fn lookup(&self, field: Field) -> Option<&'r Value> {
        self.values.get(field.index()).copied().flatten()
    }

    fn require(&self, field: Field) -> Result<&'r Value, MappingError> {
        self.lookup(field).ok_or(MappingError::MissingField { kind: self.kind, field: field.as_str() })
    }

    /// Required fields: absent or null is an error.
    fn non_null(&self, field: Field) -> Result<&'r Value, MappingError> {
        match self.require(field)? {
            Value::Null => Err(MappingError::NullValue { kind: self.kind, field: field.as_str() }),
            value => Ok(value),
        }
    }

    /// Optional fields: absent, null and (for temporal columns) empty text
    /// all read as `None`.
    fn present(&self, field: Field) -> Option<&'r Value> {
        match self.lookup(field)? {
            Value::Null => None,
            Value::Text(s) if s.trim().is_empty() && is_temporal(field) => None,
            value => Some(value),
        }
    }

    fn invalid(&self, field: Field, value: &Value, reason: impl Into<String>) -> MappingError {
        MappingError::InvalidValue {
            kind: self.kind,
            field: field.as_str(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn uuid(&self, field: Field) -> Result<Uuid, MappingError> {
        let value = self.non_null(field)?;
        self.to_uuid(field, value)
    }

    pub fn text(&self, field: Field) -> Result<String, MappingError> {
        let value = self.non_null(field)?;
        self.to_text(field, value)
    }

    pub fn opt_text(&self, field: Field) -> Result<Option<String>, MappingError> {
        self.present(field).map(|value| self.to_text(field, value)).transpose()
    }

    pub fn opt_real(&self, field: Field) -> Result<Option<f64>, MappingError> {
        self.present(field)
            .map(|value| match value {
                Value::Real(v) => Ok(*v),
                Value::Integer(v) => Ok(integer_to_f64(*v)),
                Value::Text(s) => {
                    s.trim().parse::<f64>().map_err(|e| self.invalid(field, value, e.to_string()))
                },
                other => Err(self.invalid(field, other, "expected a number")),
            })
            .transpose()
    }

    pub fn opt_date(&self, field: Field) -> Result<Option<NaiveDate>, MappingError> {
        self.present(field)
            .map(|value| match value {
                Value::Date(d) => Ok(*d),
                Value::Timestamp(ts) => Ok(ts.date_naive()),
                Value::Text(s) => {
                    parse_date(s).ok_or_else(|| self.invalid(field, value, "expected YYYY-MM-DD"))
                },
                other => Err(self.invalid(field, other, "expected a date")),
            })
            .transpose()
    }

    pub fn opt_timestamp(&self, field: Field) -> Result<Option<DateTime<Utc>>, MappingError> {
        self.present(field)
            .map(|value| match value {
                Value::Timestamp(ts) => Ok(*ts),
                Value::Text(s) => parse_timestamp(s)
                    .ok_or_else(|| self.invalid(field, value, "unrecognised timestamp format")),
                other => Err(self.invalid(field, other, "expected a timestamp")),
            })
            .transpose()
    }

    /// Required text field parsed through `FromStr`.
    pub fn parsed<T>(&self, field: Field) -> Result<T, MappingError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.non_null(field)?;
        let text = self.to_text(field, value)?;
        text.parse().map_err(|e: T::Err| self.invalid(field, value, e.to_string()))
    }

    fn to_uuid(&self, field: Field, value: &Value) -> Result<Uuid, MappingError> {
        match value {
            Value::Uuid(id) => Ok(*id),
            Value::Text(s) => {
                Uuid::parse_str(s.trim()).map_err(|e| self.invalid(field, value, e.to_string()))
            },
            other => Err(self.invalid(field, other, "expected a uuid")),
        }
    }

    fn to_text(&self, field: Field, value: &Value) -> Result<String, MappingError> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Uuid(id) => Ok(id.to_string()),
            other => Err(self.invalid(field, other, format!("expected text, got {}", other.type_name()))),
        }
    }
}

#[allow(clippy::cast_precision_loss, reason = "ratings are small integers")]
fn integer_to_f64(v: i64) -> f64 {
    v as f64
}

const fn is_temporal(field: Field) -> bool {
    matches!(field, Field::Created | Field::Modified | Field::Updated | Field::CreationDate)
}

/// Pair every mapped column of the (kind, side) layout with its value.
///
/// The column count must match exactly. Rows that carry column names are
/// resolved by name, others by position.
fn resolve(row: &RawRow, kind: EntityKind, side: StoreSide) -> Result<FieldSet<'_>, MappingError> {
    let columns = layout(kind, side);
    let count_error =
        || MappingError::ColumnCount { kind, side, expected: columns.len(), actual: row.len() };
    if row.len() != columns.len() {
        return Err(count_error());
    }

    let named = row.column_names().is_some();
    let mut fields = FieldSet::new(kind);
    for (position, column) in columns.iter().enumerate() {
        let Some(field) = column.field else { continue };
        let index = if named {
            row.position_of(column.name).ok_or(MappingError::MissingColumn {
                kind,
                side,
                column: column.name,
            })?
        } else {
            position
        };
        fields.set(field, row.value(index).ok_or_else(count_error)?);
    }
    Ok(fields)
}

/// Map a row into the record type `E`.
///
/// # Errors
/// Returns a [`MappingError`] when the row does not fit the layout or a
/// value cannot be parsed.
pub fn map_entity<E: Entity>(row: &RawRow, side: StoreSide) -> Result<E, MappingError> {
    let fields = resolve(row, E::KIND, side)?;
    E::from_fields(&fields)
}

/// Map a row when the entity kind is only known at runtime.
///
/// # Errors
/// See [`map_entity`].
pub fn map_row(row: &RawRow, kind: EntityKind, side: StoreSide) -> Result<Record, MappingError> {
    Ok(match kind {
        EntityKind::Person => Record::Person(map_entity::<Person>(row, side)?),
        EntityKind::Genre => Record::Genre(map_entity::<Genre>(row, side)?),
        EntityKind::Filmwork => Record::Filmwork(map_entity::<Filmwork>(row, side)?),
        EntityKind::GenreFilmwork => Record::GenreFilmwork(map_entity::<GenreFilmwork>(row, side)?),
        EntityKind::PersonFilmWork => {
            Record::PersonFilmWork(map_entity::<PersonFilmWork>(row, side)?)
        },
    })
}

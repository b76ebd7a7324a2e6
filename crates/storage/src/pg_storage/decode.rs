//! `PgRow` → [`Value`] decoding keyed on the column's type name.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use movies_etl_core::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column as _, Row as _, TypeInfo as _};
use uuid::Uuid;

use crate::error::StorageError;

pub(super) fn decode_row(row: &PgRow, table: &str) -> Result<Vec<Value>, StorageError> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| decode_cell(row, idx, column.type_info().name(), column.name(), table))
        .collect()
}

fn decode_cell(
    row: &PgRow,
    idx: usize,
    type_name: &str,
    column: &str,
    table: &str,
) -> Result<Value, StorageError> {
    let value = match type_name {
        "UUID" => row.try_get::<Option<Uuid>, _>(idx)?.map(Value::Uuid),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(idx)?.map(Value::Text)
        },
        "TIMESTAMPTZ" => row.try_get::<Option<DateTime<Utc>>, _>(idx)?.map(Value::Timestamp),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(|naive| Value::Timestamp(naive.and_utc())),
        "DATE" => row.try_get::<Option<NaiveDate>, _>(idx)?.map(Value::Date),
        "FLOAT4" => row.try_get::<Option<f32>, _>(idx)?.map(|v| Value::Real(f64::from(v))),
        "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(Value::Real),
        "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(|v| Value::Integer(i64::from(v))),
        "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(|v| Value::Integer(i64::from(v))),
        "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Value::Integer),
        other => {
            return Err(StorageError::UnsupportedColumnType {
                table: table.to_owned(),
                column: column.to_owned(),
                type_name: other.to_owned(),
            });
        },
    };
    Ok(value.unwrap_or(Value::Null))
}

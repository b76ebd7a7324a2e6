//! Storage layer for movies-etl
//!
//! Read-only SQLite source, PostgreSQL target with a bulk loader, and the
//! paged reader that scans either of them.

pub mod error;
mod identifier;
mod pg_storage;
mod reader;
mod sqlite;
#[cfg(test)]
mod tests;
pub mod traits;

pub use error::StorageError;
pub use identifier::{qualified_name, quote_identifier, validate_identifier};
pub use pg_storage::{PgTarget, TargetRow, build_insert, rows_per_statement};
pub use reader::read_table;
pub use sqlite::SqliteSource;
pub use traits::{BulkSink, TableSource};

/// Saturating conversion for LIMIT/OFFSET binds.
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

//! Typed error enum for the storage layer.
//!
//! Callers can tell a referential failure from a connectivity failure from
//! a malformed source file without downcasting.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// SQL / connection / timeout failure on the PostgreSQL side.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A junction row referenced a parent id the target does not hold.
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("sqlite pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("blocking task failed: {0}")]
    Blocking(String),

    #[error("source database not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("invalid identifier {name:?}: {reason}")]
    InvalidIdentifier { name: String, reason: String },

    #[error("column {column} of {table} has unsupported type {type_name}")]
    UnsupportedColumnType { table: String, column: String, type_name: String },

    #[error("column {column} of {table} is not valid UTF-8")]
    InvalidText { table: String, column: String },
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying the pass).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
                | Self::Sqlite(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error { code: rusqlite::ErrorCode::DatabaseBusy, .. },
                    _,
                ))
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation(_))
    }
}

/// Custom `From<sqlx::Error>`, NOT blanket `#[from]`.
///
/// - SQLSTATE 23503 → `ForeignKeyViolation`
/// - Everything else → `Database`
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "23503") => {
                Self::ForeignKeyViolation(db_err.message().to_owned())
            },
            _ => Self::Database(err),
        }
    }
}

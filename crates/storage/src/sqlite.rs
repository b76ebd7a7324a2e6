//! Read-only `SQLite` source.
//!
//! rusqlite is synchronous; every query runs on the tokio blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use movies_etl_core::{RawRow, StoreSide, Value};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use rusqlite::types::ValueRef;
use uuid::Uuid;

use crate::error::StorageError;
use crate::identifier::quote_identifier;
use crate::traits::TableSource;
use crate::usize_to_i64;

type PooledConn = PooledConnection<SqliteConnectionManager>;

/// The legacy catalog file. Opened read-only; nothing here ever writes to it.
#[derive(Clone, Debug)]
pub struct SqliteSource {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl SqliteSource {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if !path.is_file() {
            return Err(StorageError::SourceNotFound(path.to_owned()));
        }
        let manager = SqliteConnectionManager::file(path).with_flags(
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        );
        let pool = Pool::builder().max_size(1).build(manager)?;
        tracing::info!(path = %path.display(), "SQLite source opened");
        Ok(Self { pool, path: path.to_owned() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<PooledConn, StorageError> {
        Ok(self.pool.get()?)
    }

    /// Synchronous page fetch, ordered by `rowid`.
    pub fn fetch_page_blocking(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawRow>, StorageError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT * FROM {} ORDER BY rowid LIMIT ?1 OFFSET ?2",
            quote_identifier(table)?
        );
        let mut stmt = conn.prepare(&sql)?;
        let columns: Arc<[String]> = stmt.column_names().into_iter().map(str::to_owned).collect();

        let mut rows = stmt.query(rusqlite::params![usize_to_i64(limit), usize_to_i64(offset)])?;
        let mut page = Vec::with_capacity(limit.min(1024));
        while let Some(row) = rows.next()? {
            let values = (0..columns.len())
                .map(|idx| decode_value(row, idx, table, &columns))
                .collect::<Result<Vec<_>, _>>()?;
            page.push(RawRow::named(Arc::clone(&columns), values));
        }
        Ok(page)
    }

    pub fn count_rows_blocking(&self, table: &str) -> Result<u64, StorageError> {
        let conn = self.conn()?;
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table)?);
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

/// Decode one cell into a [`Value`].
///
/// 16-byte blobs are taken as binary UUIDs; any other blob is rejected.
fn decode_value(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &str,
    columns: &[String],
) -> Result<Value, StorageError> {
    let column = || columns.get(idx).cloned().unwrap_or_default();
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::Text(text.to_owned()),
            Err(_) => {
                return Err(StorageError::InvalidText { table: table.to_owned(), column: column() });
            },
        },
        ValueRef::Blob(bytes) => match Uuid::from_slice(bytes) {
            Ok(id) => Value::Uuid(id),
            Err(_) => {
                return Err(StorageError::UnsupportedColumnType {
                    table: table.to_owned(),
                    column: column(),
                    type_name: "BLOB".to_owned(),
                });
            },
        },
    })
}

async fn blocking<F, T>(f: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Blocking(format!("spawn_blocking join error: {e}")))?
}

#[async_trait]
impl TableSource for SqliteSource {
    fn side(&self) -> StoreSide {
        StoreSide::Source
    }

    async fn fetch_page(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawRow>, StorageError> {
        let source = self.clone();
        let table = table.to_owned();
        blocking(move || source.fetch_page_blocking(&table, offset, limit)).await
    }

    async fn count_rows(&self, table: &str) -> Result<u64, StorageError> {
        let source = self.clone();
        let table = table.to_owned();
        blocking(move || source.count_rows_blocking(&table)).await
    }
}

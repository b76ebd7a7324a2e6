//! PostgreSQL target store using sqlx.
//!
//! Reads feed verification and `inspect`; writes go through the bulk
//! loader in [`insert`].

// Arithmetic in DB operations (pagination, counting) is bounded by DB limits
#![allow(
    clippy::arithmetic_side_effects,
    reason = "DB row counts and pagination are bounded by PostgreSQL limits"
)]

mod decode;
mod insert;

use std::str::FromStr as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use movies_etl_core::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS, PgEndpoint, RawRow, StoreSide,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Column as _, PgPool, Row as _};

use crate::error::StorageError;
use crate::identifier::{qualified_name, validate_identifier};
use crate::traits::TableSource;
use crate::usize_to_i64;

pub use insert::{TargetRow, build_insert, rows_per_statement};

#[derive(Clone, Debug)]
pub struct PgTarget {
    pool: PgPool,
    schema: String,
}

impl PgTarget {
    pub async fn connect(endpoint: &PgEndpoint, schema: &str) -> Result<Self, StorageError> {
        validate_identifier(schema)?;
        let options = match endpoint {
            PgEndpoint::Url(url) => PgConnectOptions::from_str(url)?,
            PgEndpoint::Parts { host, port, dbname, user, password } => PgConnectOptions::new()
                .host(host)
                .port(*port)
                .database(dbname)
                .username(user)
                .password(password),
        };
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect_with(options)
            .await?;
        tracing::info!(schema, "PostgreSQL target connected");
        Ok(Self { pool, schema: schema.to_owned() })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool, schema: &str) -> Result<Self, StorageError> {
        validate_identifier(schema)?;
        Ok(Self { pool, schema: schema.to_owned() })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub(crate) fn qualified(&self, table: &str) -> Result<String, StorageError> {
        qualified_name(&self.schema, table)
    }
}

#[async_trait]
impl TableSource for PgTarget {
    fn side(&self) -> StoreSide {
        StoreSide::Target
    }

    async fn fetch_page(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawRow>, StorageError> {
        let sql = format!("SELECT * FROM {} ORDER BY id LIMIT $1 OFFSET $2", self.qualified(table)?);
        let rows = sqlx::query(&sql)
            .bind(usize_to_i64(limit))
            .bind(usize_to_i64(offset))
            .fetch_all(&self.pool)
            .await?;

        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let columns: Arc<[String]> =
            first.columns().iter().map(|c| c.name().to_owned()).collect();
        rows.iter()
            .map(|row| {
                decode::decode_row(row, table)
                    .map(|values| RawRow::named(Arc::clone(&columns), values))
            })
            .collect()
    }

    async fn count_rows(&self, table: &str) -> Result<u64, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.qualified(table)?);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

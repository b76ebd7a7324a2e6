//! Shared constants for movies-etl.

/// Rows fetched per page by the paged reader.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Schema holding the target tables.
pub const DEFAULT_PG_SCHEMA: &str = "content";

/// Default location of the source database file.
pub const DEFAULT_SQLITE_PATH: &str = "db.sqlite";

/// PostgreSQL wire protocol limit on bind parameters in one statement.
pub const PG_MAX_BIND_PARAMS: usize = 65_535;

/// PostgreSQL maximum identifier length in bytes.
pub const PG_MAX_IDENTIFIER_LEN: usize = 63;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 2;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

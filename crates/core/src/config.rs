//! Runtime configuration resolved from the environment.

use std::fmt;
use std::path::PathBuf;

use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_PG_SCHEMA, DEFAULT_SQLITE_PATH};
use crate::env_config::{env_opt, env_or, env_parse_with_default, env_required};
use crate::error::ConfigError;
use crate::normalize::TimestampPrecision;

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub sqlite_path: PathBuf,
    pub pg_schema: String,
    pub page_size: usize,
    pub timestamp_precision: TimestampPrecision,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from(DEFAULT_SQLITE_PATH),
            pg_schema: DEFAULT_PG_SCHEMA.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            timestamp_precision: TimestampPrecision::default(),
        }
    }
}

impl EtlConfig {
    /// Read `SQLITE_PATH`, `PG_SCHEMA`, `ETL_PAGE_SIZE` and
    /// `ETL_TIMESTAMP_PRECISION`.
    ///
    /// # Errors
    /// Returns an error for a zero page size or an unknown precision.
    pub fn from_env() -> Result<Self, ConfigError> {
        let page_size = env_parse_with_default("ETL_PAGE_SIZE", DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "ETL_PAGE_SIZE",
                value: "0".to_owned(),
                reason: "page size must be positive".to_owned(),
            });
        }
        let timestamp_precision = match env_opt("ETL_TIMESTAMP_PRECISION") {
            Some(v) => v.parse()?,
            None => TimestampPrecision::default(),
        };
        Ok(Self {
            sqlite_path: PathBuf::from(env_or("SQLITE_PATH", DEFAULT_SQLITE_PATH)),
            pg_schema: env_or("PG_SCHEMA", DEFAULT_PG_SCHEMA),
            page_size,
            timestamp_precision,
        })
    }
}

/// Where the PostgreSQL target lives.
#[derive(Clone, PartialEq, Eq)]
pub enum PgEndpoint {
    Url(String),
    Parts { host: String, port: u16, dbname: String, user: String, password: String },
}

impl PgEndpoint {
    /// `DATABASE_URL` wins; otherwise the `DB_*` parts are used and
    /// `DB_PASSWORD` is mandatory.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] when neither a URL nor a password is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(url) = env_opt("DATABASE_URL") {
            return Ok(Self::Url(url));
        }
        Ok(Self::Parts {
            host: env_or("DB_HOST", "127.0.0.1"),
            port: env_parse_with_default("DB_PORT", 5432),
            dbname: env_or("DB_NAME", "movies_database"),
            user: env_or("DB_USER", "app"),
            password: env_required("DB_PASSWORD")?,
        })
    }
}

impl fmt::Debug for PgEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(_) => f.debug_tuple("Url").field(&"<redacted>").finish(),
            Self::Parts { host, port, dbname, user, .. } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("dbname", dbname)
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

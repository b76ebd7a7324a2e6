//! Typed error enum for the service layer.
//!
//! A pass fails either in a store or while turning a row into a record;
//! callers match on which instead of downcasting.

use movies_etl_core::MappingError;
use movies_etl_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Reading, writing or connecting failed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// A row did not fit its layout or held an unparseable value.
    #[error("mapping: {0}")]
    Mapping(#[from] MappingError),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying the pass).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Mapping(_) => false,
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_foreign_key_violation())
    }
}

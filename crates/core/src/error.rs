use thiserror::Error;

use crate::entity::{EntityKind, StoreSide};

/// A raw row could not be turned into a typed record.
///
/// Every variant is structural: the row is rejected whole and the load of
/// its entity kind is aborted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("{kind} row from {side} store has {actual} columns, expected {expected}")]
    ColumnCount { kind: EntityKind, side: StoreSide, expected: usize, actual: usize },

    #[error("{kind} row from {side} store has no column `{column}`")]
    MissingColumn { kind: EntityKind, side: StoreSide, column: &'static str },

    #[error("{kind} layout does not provide field `{field}`")]
    MissingField { kind: EntityKind, field: &'static str },

    #[error("{kind}.{field} is null")]
    NullValue { kind: EntityKind, field: &'static str },

    #[error("{kind}.{field}: cannot use {value:?}: {reason}")]
    InvalidValue { kind: EntityKind, field: &'static str, value: String, reason: String },
}

/// Configuration could not be resolved from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {name} {value:?}: {reason}")]
    Invalid { name: &'static str, value: String, reason: String },
}

//! Service layer for movies-etl
//!
//! The load pass and the verification pass, written against the storage
//! traits so either store can be swapped for an in-memory one.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Services hold store handles")]

mod error;
mod extract;
mod load_service;
#[cfg(test)]
mod tests;
mod verify_service;

pub use error::ServiceError;
pub use extract::read_entities;
pub use load_service::{KindLoad, LoadMode, LoadService, LoadSummary};
pub use verify_service::{
    ContentReport, CountReport, FieldDiff, KindVerification, RecordDiff, VerificationReport,
    Verifier,
};

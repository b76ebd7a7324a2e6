//! Post-load consistency checks between the source and the target.
//!
//! Mismatches are reported as data; only store and mapping failures are
//! errors.

use std::collections::HashMap;
use std::sync::Arc;

use movies_etl_core::{
    ComparableField, Entity, EntityKind, Filmwork, Genre, GenreFilmwork, Person, PersonFilmWork,
    TimestampPrecision,
};
use movies_etl_storage::TableSource;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::extract::read_entities;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountReport {
    pub kind: EntityKind,
    pub source: u64,
    pub target: u64,
}

impl CountReport {
    pub fn matches(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: &'static str,
    pub source: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDiff {
    pub id: Uuid,
    pub fields: Vec<FieldDiff>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentReport {
    pub kind: EntityKind,
    /// Source records that had a counterpart in the target.
    pub compared: usize,
    pub missing_in_target: Vec<Uuid>,
    pub unexpected_in_target: Vec<Uuid>,
    pub mismatched: Vec<RecordDiff>,
}

impl ContentReport {
    pub fn matches(&self) -> bool {
        self.missing_in_target.is_empty()
            && self.unexpected_in_target.is_empty()
            && self.mismatched.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindVerification {
    pub kind: EntityKind,
    pub counts: CountReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentReport>,
}

impl KindVerification {
    pub fn is_consistent(&self) -> bool {
        self.counts.matches() && self.content.as_ref().is_none_or(ContentReport::matches)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub precision: TimestampPrecision,
    pub kinds: Vec<KindVerification>,
}

impl VerificationReport {
    pub fn is_consistent(&self) -> bool {
        self.kinds.iter().all(KindVerification::is_consistent)
    }
}

/// Compare a field-by-field normalised view of both stores.
pub struct Verifier<S: ?Sized, T: ?Sized> {
    source: Arc<S>,
    target: Arc<T>,
    page_size: usize,
    precision: TimestampPrecision,
}

impl<S, T> Verifier<S, T>
where
    S: TableSource + ?Sized,
    T: TableSource + ?Sized,
{
    #[must_use]
    pub const fn new(
        source: Arc<S>,
        target: Arc<T>,
        page_size: usize,
        precision: TimestampPrecision,
    ) -> Self {
        Self { source, target, page_size, precision }
    }

    pub async fn count_report(&self, kind: EntityKind) -> Result<CountReport, ServiceError> {
        let source = self.source.count_rows(&self.source.table_name(kind)).await?;
        let target = self.target.count_rows(&self.target.table_name(kind)).await?;
        let report = CountReport { kind, source, target };
        if !report.matches() {
            tracing::warn!(%kind, source, target, "row counts differ");
        }
        Ok(report)
    }

    pub async fn count_matches(&self, kind: EntityKind) -> Result<bool, ServiceError> {
        Ok(self.count_report(kind).await?.matches())
    }

    pub async fn content_report(&self, kind: EntityKind) -> Result<ContentReport, ServiceError> {
        match kind {
            EntityKind::Person => self.compare::<Person>().await,
            EntityKind::Genre => self.compare::<Genre>().await,
            EntityKind::Filmwork => self.compare::<Filmwork>().await,
            EntityKind::GenreFilmwork => self.compare::<GenreFilmwork>().await,
            EntityKind::PersonFilmWork => self.compare::<PersonFilmWork>().await,
        }
    }

    pub async fn content_matches(&self, kind: EntityKind) -> Result<bool, ServiceError> {
        Ok(self.content_report(kind).await?.matches())
    }

    /// Counts for every kind, plus content when `include_content` is set.
    pub async fn verify_all(
        &self,
        include_content: bool,
    ) -> Result<VerificationReport, ServiceError> {
        let mut kinds = Vec::with_capacity(EntityKind::LOAD_ORDER.len());
        for kind in EntityKind::LOAD_ORDER {
            let counts = self.count_report(kind).await?;
            let content =
                if include_content { Some(self.content_report(kind).await?) } else { None };
            kinds.push(KindVerification { kind, counts, content });
        }
        let report = VerificationReport { precision: self.precision, kinds };
        if report.is_consistent() {
            tracing::info!(precision = %self.precision, include_content, "target matches source");
        } else {
            tracing::warn!(precision = %self.precision, include_content, "target differs from source");
        }
        Ok(report)
    }

    async fn compare<E: Entity>(&self) -> Result<ContentReport, ServiceError> {
        let source: Vec<E> = read_entities(&*self.source, self.page_size).await?;
        let target: Vec<E> = read_entities(&*self.target, self.page_size).await?;

        let mut target_by_id: HashMap<Uuid, Vec<ComparableField>> = target
            .iter()
            .map(|record| (record.id(), record.comparable_fields(self.precision)))
            .collect();

        let mut report = ContentReport {
            kind: E::KIND,
            compared: 0,
            missing_in_target: Vec::new(),
            unexpected_in_target: Vec::new(),
            mismatched: Vec::new(),
        };
        for record in &source {
            let Some(target_fields) = target_by_id.remove(&record.id()) else {
                report.missing_in_target.push(record.id());
                continue;
            };
            report.compared += 1;
            let fields = diff_fields(record.comparable_fields(self.precision), target_fields);
            if !fields.is_empty() {
                report.mismatched.push(RecordDiff { id: record.id(), fields });
            }
        }
        report.unexpected_in_target = target
            .iter()
            .map(Entity::id)
            .filter(|id| target_by_id.contains_key(id))
            .collect();

        if !report.matches() {
            tracing::warn!(
                kind = %E::KIND,
                missing = report.missing_in_target.len(),
                unexpected = report.unexpected_in_target.len(),
                mismatched = report.mismatched.len(),
                "content differs"
            );
        }
        Ok(report)
    }
}

/// Both sides come from the same `comparable_fields`, so names line up
/// position by position.
fn diff_fields(source: Vec<ComparableField>, target: Vec<ComparableField>) -> Vec<FieldDiff> {
    source
        .into_iter()
        .zip(target)
        .filter(|((_, s), (_, t))| s != t)
        .map(|((field, source), (_, target))| FieldDiff { field, source, target })
        .collect()
}

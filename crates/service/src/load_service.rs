use std::fmt;
use std::sync::Arc;

use movies_etl_core::{
    Batch, EntityKind, Filmwork, Genre, GenreFilmwork, Person, PersonFilmWork,
};
use movies_etl_storage::{BulkSink, TableSource};
use serde::Serialize;

use crate::error::ServiceError;
use crate::extract::read_entities;

/// Whether the target is emptied before loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Insert with conflict-skip; existing rows are left untouched.
    #[default]
    Merge,
    /// `TRUNCATE … CASCADE` every target table, then insert.
    FullRefresh,
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Merge => "merge",
            Self::FullRefresh => "full_refresh",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindLoad {
    pub kind: EntityKind,
    /// Records read and mapped from the source.
    pub read: usize,
    /// Rows the target actually accepted; the rest already existed.
    pub inserted: u64,
}

impl KindLoad {
    pub fn skipped(&self) -> u64 {
        u64::try_from(self.read).unwrap_or(u64::MAX).saturating_sub(self.inserted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub mode: LoadMode,
    pub kinds: Vec<KindLoad>,
}

impl LoadSummary {
    pub fn total_read(&self) -> usize {
        self.kinds.iter().map(|k| k.read).sum()
    }

    pub fn total_inserted(&self) -> u64 {
        self.kinds.iter().map(|k| k.inserted).sum()
    }
}

/// Moves every entity kind from `source` into `target`, parents first.
pub struct LoadService<S: ?Sized, T: ?Sized> {
    source: Arc<S>,
    target: Arc<T>,
    page_size: usize,
}

impl<S, T> LoadService<S, T>
where
    S: TableSource + ?Sized,
    T: BulkSink + ?Sized,
{
    #[must_use]
    pub const fn new(source: Arc<S>, target: Arc<T>, page_size: usize) -> Self {
        Self { source, target, page_size }
    }

    /// Run one load pass. Kinds are processed strictly in
    /// [`EntityKind::LOAD_ORDER`]; the first failure stops the pass and
    /// kinds already loaded stay loaded.
    pub async fn run(&self, mode: LoadMode) -> Result<LoadSummary, ServiceError> {
        tracing::info!(%mode, page_size = self.page_size, "load started");
        if mode == LoadMode::FullRefresh {
            self.target.truncate(&EntityKind::LOAD_ORDER).await?;
        }

        let mut kinds = Vec::with_capacity(EntityKind::LOAD_ORDER.len());
        for kind in EntityKind::LOAD_ORDER {
            let batch = self.extract(kind).await?;
            let read = batch.len();
            let inserted = self.target.load(&batch).await.inspect_err(|e| {
                tracing::error!(%kind, error = %e, "load failed");
            })?;
            tracing::info!(%kind, read, inserted, "entity kind loaded");
            kinds.push(KindLoad { kind, read, inserted });
        }

        let summary = LoadSummary { mode, kinds };
        tracing::info!(
            read = summary.total_read(),
            inserted = summary.total_inserted(),
            "load finished"
        );
        Ok(summary)
    }

    /// Read and map every source row of `kind`.
    pub async fn extract(&self, kind: EntityKind) -> Result<Batch, ServiceError> {
        let source = &*self.source;
        let page_size = self.page_size;
        Ok(match kind {
            EntityKind::Person => read_entities::<Person, _>(source, page_size).await?.into(),
            EntityKind::Genre => read_entities::<Genre, _>(source, page_size).await?.into(),
            EntityKind::Filmwork => read_entities::<Filmwork, _>(source, page_size).await?.into(),
            EntityKind::GenreFilmwork => {
                read_entities::<GenreFilmwork, _>(source, page_size).await?.into()
            },
            EntityKind::PersonFilmWork => {
                read_entities::<PersonFilmWork, _>(source, page_size).await?.into()
            },
        })
    }
}

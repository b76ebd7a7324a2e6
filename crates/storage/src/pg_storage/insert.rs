//! Bulk loader: multi-row `INSERT … ON CONFLICT (id) DO NOTHING`.
//!
//! Every value travels as a bound parameter. A kind's records go out as one
//! statement unless that would exceed the bind-parameter ceiling, in which
//! case they are chunked, all inside one transaction.

use async_trait::async_trait;
use movies_etl_core::{
    Batch, Entity, EntityKind, Filmwork, Genre, GenreFilmwork, PG_MAX_BIND_PARAMS, Person,
    PersonFilmWork,
};
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};

use super::PgTarget;
use crate::error::StorageError;
use crate::traits::BulkSink;

/// A record with a fixed target insert column list.
pub trait TargetRow: Entity {
    const COLUMNS: &'static [&'static str];

    /// Push one bind per entry of [`Self::COLUMNS`], in that order.
    fn push_binds(&self, row: &mut Separated<'_, '_, Postgres, &'static str>);
}

impl TargetRow for Person {
    const COLUMNS: &'static [&'static str] = &["id", "full_name", "created", "modified"];

    fn push_binds(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.full_name.clone())
            .push_bind(self.created)
            .push_bind(self.modified);
    }
}

impl TargetRow for Filmwork {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "creation_date",
        "rating",
        "type",
        "created",
        "modified",
    ];

    fn push_binds(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.title.clone())
            .push_bind(self.description.clone())
            .push_bind(self.creation_date)
            .push_bind(self.rating)
            .push_bind(self.film_type.as_str())
            .push_bind(self.created)
            .push_bind(self.modified);
    }
}

impl TargetRow for Genre {
    const COLUMNS: &'static [&'static str] = &["id", "name", "description"];

    fn push_binds(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id).push_bind(self.name.clone()).push_bind(self.description.clone());
    }
}

impl TargetRow for PersonFilmWork {
    const COLUMNS: &'static [&'static str] =
        &["id", "film_work_id", "person_id", "role", "created"];

    fn push_binds(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.film_work)
            .push_bind(self.person)
            .push_bind(self.role.clone())
            .push_bind(self.created);
    }
}

impl TargetRow for GenreFilmwork {
    const COLUMNS: &'static [&'static str] = &["id", "film_work_id", "genre_id", "created"];

    fn push_binds(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.film_work)
            .push_bind(self.genre)
            .push_bind(self.created);
    }
}

/// Rows that fit in one statement for a table of `columns` columns.
pub fn rows_per_statement(columns: usize) -> usize {
    PG_MAX_BIND_PARAMS.checked_div(columns).unwrap_or(PG_MAX_BIND_PARAMS).max(1)
}

/// Render the insert for `records` into an already quoted `qualified_table`.
pub fn build_insert<E: TargetRow>(
    qualified_table: &str,
    records: &[E],
) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::new(format!("INSERT INTO {qualified_table} ({}) ", E::COLUMNS.join(", ")));
    builder.push_values(records, |mut row, record| record.push_binds(&mut row));
    builder.push(" ON CONFLICT (id) DO NOTHING");
    builder
}

impl PgTarget {
    async fn insert_records<E: TargetRow>(&self, records: &[E]) -> Result<u64, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }
        let table = self.qualified(E::KIND.target_table())?;
        let chunk_size = rows_per_statement(E::COLUMNS.len());

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;
        for chunk in records.chunks(chunk_size) {
            let mut builder = build_insert(&table, chunk);
            let result = builder.build().execute(&mut *tx).await?;
            inserted = inserted.saturating_add(result.rows_affected());
        }
        tx.commit().await?;

        tracing::info!(
            kind = %E::KIND,
            submitted = records.len(),
            inserted,
            skipped = u64::try_from(records.len()).unwrap_or(u64::MAX).saturating_sub(inserted),
            "batch loaded"
        );
        Ok(inserted)
    }
}

#[async_trait]
impl BulkSink for PgTarget {
    async fn truncate(&self, kinds: &[EntityKind]) -> Result<(), StorageError> {
        if kinds.is_empty() {
            return Ok(());
        }
        let tables = kinds
            .iter()
            .map(|kind| self.qualified(kind.target_table()))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        sqlx::query(&format!("TRUNCATE {tables} CASCADE")).execute(&self.pool).await?;
        tracing::warn!(%tables, "target tables truncated");
        Ok(())
    }

    async fn load(&self, batch: &Batch) -> Result<u64, StorageError> {
        match batch {
            Batch::Person(records) => self.insert_records(records).await,
            Batch::Genre(records) => self.insert_records(records).await,
            Batch::Filmwork(records) => self.insert_records(records).await,
            Batch::GenreFilmwork(records) => self.insert_records(records).await,
            Batch::PersonFilmWork(records) => self.insert_records(records).await,
        }
    }
}

//! Store abstractions used by the load and verification passes.

use async_trait::async_trait;
use movies_etl_core::{Batch, EntityKind, RawRow, StoreSide};

use crate::error::StorageError;

/// A store whose tables can be scanned page by page.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Which column layouts this store's rows follow.
    fn side(&self) -> StoreSide;

    /// Table holding `kind` in this store.
    fn table_name(&self, kind: EntityKind) -> String {
        kind.table(self.side()).to_owned()
    }

    /// Up to `limit` rows starting at `offset`, in a stable scan order.
    async fn fetch_page(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawRow>, StorageError>;

    async fn count_rows(&self, table: &str) -> Result<u64, StorageError>;
}

/// A store that accepts bulk loads.
#[async_trait]
pub trait BulkSink: Send + Sync {
    /// Empty the tables of `kinds`, cascading to dependents. Destructive.
    async fn truncate(&self, kinds: &[EntityKind]) -> Result<(), StorageError>;

    /// Insert every record of the batch, skipping ids that already exist.
    /// Returns the number of rows actually inserted.
    async fn load(&self, batch: &Batch) -> Result<u64, StorageError>;
}

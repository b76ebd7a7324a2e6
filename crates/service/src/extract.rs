use futures_util::{TryStreamExt as _, pin_mut};
use movies_etl_core::{Entity, map_entity};
use movies_etl_storage::{TableSource, read_table};

use crate::error::ServiceError;

/// Scan the table holding `E` in `store` and map every row with the store's
/// own layout. The first bad row aborts the scan.
pub async fn read_entities<E, S>(store: &S, page_size: usize) -> Result<Vec<E>, ServiceError>
where
    E: Entity,
    S: TableSource + ?Sized,
{
    let table = store.table_name(E::KIND);
    let side = store.side();
    let rows = read_table(store, &table, page_size);
    pin_mut!(rows);

    let mut records = Vec::new();
    while let Some(row) = rows.try_next().await? {
        records.push(map_entity::<E>(&row, side)?);
    }
    tracing::debug!(kind = %E::KIND, %side, table = %table, records = records.len(), "table mapped");
    Ok(records)
}

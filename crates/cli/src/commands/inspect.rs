use std::sync::Arc;

use anyhow::Result;
use movies_etl_core::{EntityKind, EtlConfig, Record, StoreSide, map_row};
use movies_etl_storage::TableSource;

use super::{connect_target, open_source, print_json};

pub(crate) async fn run(
    config: &EtlConfig,
    kind: EntityKind,
    side: StoreSide,
    limit: usize,
) -> Result<()> {
    let store: Arc<dyn TableSource> = match side {
        StoreSide::Source => open_source(config)?,
        StoreSide::Target => connect_target(config).await?,
    };
    let table = store.table_name(kind);
    let rows = store.fetch_page(&table, 0, limit).await?;
    let records = rows
        .iter()
        .map(|row| map_row(row, kind, side))
        .collect::<Result<Vec<Record>, _>>()?;
    tracing::info!(%kind, %side, table = %table, shown = records.len(), "inspected");
    print_json(&records)
}

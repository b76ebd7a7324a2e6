//! `load`: one pass from SQLite into PostgreSQL.
//!
//! Idempotent in merge mode: rows whose id already exists are skipped, so a
//! failed run can simply be repeated.

use std::sync::Arc;

use anyhow::Result;
use movies_etl_core::EtlConfig;
use movies_etl_service::{LoadMode, LoadService, Verifier};

use super::{connect_target, ensure_consistent, open_source, print_json};

pub(crate) async fn run(config: &EtlConfig, truncate: bool, verify: bool) -> Result<()> {
    let target = connect_target(config).await?;
    let source = open_source(config)?;
    let mode = if truncate { LoadMode::FullRefresh } else { LoadMode::Merge };

    let summary = LoadService::new(Arc::clone(&source), Arc::clone(&target), config.page_size)
        .run(mode)
        .await?;
    print_json(&summary)?;

    if verify {
        let report = Verifier::new(source, target, config.page_size, config.timestamp_precision)
            .verify_all(false)
            .await?;
        print_json(&report)?;
        ensure_consistent(&report)?;
    }
    Ok(())
}

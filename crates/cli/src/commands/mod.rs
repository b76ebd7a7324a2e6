pub(crate) mod inspect;
pub(crate) mod load;
pub(crate) mod verify;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use movies_etl_core::{EtlConfig, PgEndpoint};
use movies_etl_service::VerificationReport;
use movies_etl_storage::{PgTarget, SqliteSource};

pub(crate) fn open_source(config: &EtlConfig) -> Result<Arc<SqliteSource>> {
    let source = SqliteSource::open(&config.sqlite_path)
        .with_context(|| format!("cannot open source {}", config.sqlite_path.display()))?;
    Ok(Arc::new(source))
}

pub(crate) async fn connect_target(config: &EtlConfig) -> Result<Arc<PgTarget>> {
    let endpoint = PgEndpoint::from_env()?;
    tracing::debug!(?endpoint, schema = %config.pg_schema, "connecting to target");
    let target = PgTarget::connect(&endpoint, &config.pg_schema)
        .await
        .context("cannot connect to the PostgreSQL target")?;
    Ok(Arc::new(target))
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn ensure_consistent(report: &VerificationReport) -> Result<()> {
    if report.is_consistent() {
        return Ok(());
    }
    let kinds: Vec<_> = report
        .kinds
        .iter()
        .filter(|k| !k.is_consistent())
        .map(|k| k.kind.to_string())
        .collect();
    anyhow::bail!("target differs from source for: {}", kinds.join(", "))
}

use anyhow::Result;
use movies_etl_core::EtlConfig;
use movies_etl_service::Verifier;

use super::{connect_target, ensure_consistent, open_source, print_json};

/// Print the report, then fail when anything differs.
pub(crate) async fn run(config: &EtlConfig, include_content: bool) -> Result<()> {
    let target = connect_target(config).await?;
    let source = open_source(config)?;

    let report = Verifier::new(source, target, config.page_size, config.timestamp_precision)
        .verify_all(include_content)
        .await?;
    print_json(&report)?;
    ensure_consistent(&report)
}

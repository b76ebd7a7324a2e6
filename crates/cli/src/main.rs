mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use movies_etl_core::{EntityKind, EtlConfig, StoreSide, TimestampPrecision};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "movies-etl", version)]
#[command(about = "Load the legacy SQLite movie catalog into PostgreSQL and verify it", long_about = None)]
struct Cli {
    /// Source SQLite file
    #[arg(long, global = true, env = "SQLITE_PATH")]
    sqlite_path: Option<PathBuf>,
    /// Schema holding the target tables (overrides PG_SCHEMA)
    #[arg(long, global = true)]
    schema: Option<String>,
    /// Rows fetched per page (overrides ETL_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy every table from SQLite into PostgreSQL, parents first
    Load {
        /// Empty the target tables before loading
        #[arg(long)]
        truncate: bool,
        /// Compare row counts once the load is done
        #[arg(long)]
        verify: bool,
    },
    /// Compare the target against the source
    Verify {
        /// Skip the field-by-field comparison
        #[arg(long)]
        counts_only: bool,
        /// Timestamp precision for comparison: seconds, millis or micros
        #[arg(long)]
        precision: Option<TimestampPrecision>,
    },
    /// Map the first rows of one table and print them as JSON
    Inspect {
        /// person, genre, filmwork, genre_filmwork or person_filmwork
        kind: EntityKind,
        #[arg(long, default_value = "source")]
        side: StoreSide,
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
}

impl Cli {
    fn config(&self) -> Result<EtlConfig> {
        let mut config = EtlConfig::from_env()?;
        if let Some(path) = &self.sqlite_path {
            config.sqlite_path.clone_from(path);
        }
        if let Some(schema) = &self.schema {
            config.pg_schema.clone_from(schema);
        }
        if let Some(page_size) = self.page_size {
            anyhow::ensure!(page_size > 0, "--page-size must be positive");
            config.page_size = page_size;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // before parsing, so clap's env fallbacks see .env values too
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = cli.config()?;

    match cli.command {
        Commands::Load { truncate, verify } => {
            commands::load::run(&config, truncate, verify).await?;
        },
        Commands::Verify { counts_only, precision } => {
            if let Some(precision) = precision {
                config.timestamp_precision = precision;
            }
            commands::verify::run(&config, !counts_only).await?;
        },
        Commands::Inspect { kind, side, limit } => {
            commands::inspect::run(&config, kind, side, limit).await?;
        },
    }

    Ok(())
}

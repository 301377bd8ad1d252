use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use geo_enricher::app::enrich_use_case::EnrichUseCase;
use geo_enricher::config::Config;
use geo_enricher::infra::nominatim_client::NominatimClient;
use geo_enricher::infra::pacer_adapter::FixedDelayPacer;
use geo_enricher::infra::progress_adapter::StdoutProgress;
use geo_enricher::observability::{init_logging, metrics};
use geo_enricher::pipeline::storage::{parse_column_list, Table};

const RULE: &str =
    "********************************************************************************************";

#[derive(Parser)]
#[command(name = "geo_enricher")]
#[command(about = "Adds coordinates to the rows of a CSV file using the Nominatim geocoding API")]
#[command(version)]
struct Cli {
    /// Path to source CSV file
    #[arg(short, long)]
    source: PathBuf,

    /// Path to result CSV file
    #[arg(short, long)]
    result: PathBuf,

    /// Comma-separated names of the three location columns, coarsest first (e.g. "Region,District,Town")
    #[arg(short, long)]
    columns: String,

    /// TOML configuration file (defaults to ./geo_enricher.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pause after each unmatched lookup, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(delay_ms) = cli.delay_ms {
        config.geocoder.delay_ms = delay_ms;
    }

    let _log_guard = init_logging(&config.logging);
    metrics::init(config.metrics.listen_addr.as_deref())?;
    info!(endpoint = %config.geocoder.endpoint, delay_ms = config.geocoder.delay_ms, "Configuration loaded");

    println!("{RULE}");
    println!("Processing file: {}", cli.source.display());

    let mut table = Table::read(&cli.source)
        .with_context(|| format!("Failed to read source table {}", cli.source.display()))?;
    let columns = parse_column_list(&cli.columns);

    let use_case = EnrichUseCase::new(
        Box::new(NominatimClient::new(&config.geocoder)?),
        Box::new(FixedDelayPacer::new(config.delay())),
        Box::new(StdoutProgress),
        config.policy.clone(),
    );
    let stats = use_case
        .enrich_table(&mut table, &columns)
        .await
        .context("Enrichment aborted, no result file written")?;

    table
        .write(&cli.result)
        .with_context(|| format!("Failed to write result table {}", cli.result.display()))?;

    println!("{RULE}");
    println!("📊 Rows processed: {}", stats.total_rows);
    println!("   Matched: {}", stats.matched_rows);
    println!("   Unmatched: {} ({} without location text)", stats.unmatched_rows, stats.empty_rows);
    println!("   Lookups: {}", stats.lookups);
    println!("Finished processing, results saved to file: {}", cli.result.display());
    Ok(())
}

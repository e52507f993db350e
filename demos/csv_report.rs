//! Command-line report over CSV sources
//!
//! Fetches every source given on the command line concurrently and prints
//! the age statistics, dispatch metrics and a summary per source.
//!
//! ```bash
//! cargo run --example csv_report -- ./people.csv https://example.com/more.csv
//! cargo run --example csv_report -- --json ./people.csv
//! RUST_LOG=csv_ingest=debug cargo run --example csv_report -- ./people.csv
//! ```

use csv_ingest::{Config, CsvProcessor, run_until_interrupted};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();

    let mut json = false;
    let mut sources = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            sources.push(arg);
        }
    }

    if sources.is_empty() {
        eprintln!("usage: csv_report [--json] <path-or-url>...");
        eprintln!("  e.g. csv_report ./data/file1.csv https://example.com/people.csv");
        return Ok(());
    }

    let processor = CsvProcessor::new(Config::default())?;

    // Ctrl+C aborts the whole run; no partial statistics are printed
    let report = run_until_interrupted(&processor, sources).await?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report);
    }

    Ok(())
}

//! # Weekly Discovery Example
//!
//! This example runs the full discovery pipeline for the trailing week:
//! build the exchange map, fetch the earnings calendar, filter it to
//! NYSE/NASDAQ, and pull one transcript per surviving symbol.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example discover_week
//! ```
//!
//! ## Prerequisites
//!
//! Set both provider keys:
//!
//! ```bash
//! export EARNWIRE_FMP_API_KEY=your_key_here
//! export EARNWIRE_NINJAS_API_KEY=your_key_here
//! ```

use std::sync::Arc;

use earnwire_core::{
    CalendarClient, DateWindow, ExchangeCache, ExchangeMapBuilder, JsonFetcher,
    NinjasTranscriptSource, Pipeline, ReqwestHttpClient, TranscriptSource,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fmp_key = std::env::var("EARNWIRE_FMP_API_KEY")?;
    let ninjas_key = std::env::var("EARNWIRE_NINJAS_API_KEY")?;

    // One retrying fetcher shared by every upstream client
    let fetcher = JsonFetcher::new(Arc::new(ReqwestHttpClient::new()));

    let map_builder = ExchangeMapBuilder::new(
        fetcher.clone(),
        ExchangeCache::at_default_path(),
        fmp_key.clone(),
    )?;
    let calendar = CalendarClient::new(fetcher.clone(), fmp_key)?;
    let transcripts: Arc<dyn TranscriptSource> =
        Arc::new(NinjasTranscriptSource::new(fetcher, ninjas_key)?);

    // Discover the trailing week on the default NYSE/NASDAQ universe
    println!("📡 Discovering the last week of earnings...");
    let pipeline = Pipeline::new(map_builder, calendar, transcripts);
    let report = pipeline.run(DateWindow::last_week()).await?;

    println!("✅ Window: {}", report.summary.window);
    println!("📅 Calendar events: {}", report.summary.raw_events);
    println!("🏷️ Kept after filtering: {}", report.summary.filter.kept());
    println!("🔁 Unique symbols: {}", report.summary.unique_symbols);
    println!(
        "📜 Transcripts: {} fetched, {} missing, {} failed",
        report.summary.tallies.fetched,
        report.summary.tallies.not_found,
        report.summary.tallies.failed,
    );

    for transcript in &report.transcripts {
        println!(
            "  {} {}: {} chars",
            transcript.symbol,
            transcript.period,
            transcript.chars()
        );
    }

    Ok(())
}

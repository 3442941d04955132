//! CLI argument definitions for Earnwire.
//!
//! This module contains the command-line interface structure using Clap.
//! The CLI drives the earnings acquisition pipeline, from calendar
//! windows and exchange-map maintenance through transcript retrieval.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `discover` | Run the full pipeline: calendar, filter, transcripts |
//! | `calendar` | Fetch the raw earnings calendar for a window |
//! | `exchanges` | Build or refresh the symbol-to-exchange map |
//! | `transcript` | Fetch a single earnings-call transcript |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//!
//! # Examples
//!
//! ```bash
//! # Discover last week's earnings on NYSE/NASDAQ
//! earnwire discover
//!
//! # Explicit window with transcripts written to disk
//! earnwire discover --from 2026-02-01 --to 2026-02-07 --out transcripts/
//!
//! # Rebuild the exchange map, ignoring the cache
//! earnwire exchanges --refresh
//!
//! # One transcript, strict mode for CI/CD
//! earnwire transcript AAPL --date 2026-02-25 --strict
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use earnwire_core::ProviderId;

/// 📡 Earnwire - Earnings calendar and transcript acquisition CLI
///
/// Fetch earnings calendars, filter them against a cached symbol-to-exchange
/// map, and pull call transcripts from API Ninjas or Financial Modeling Prep.
#[derive(Debug, Parser)]
#[command(
    name = "earnwire",
    author,
    version,
    about = "Earnings calendar and transcript acquisition CLI",
    long_about = "Earnwire acquires earnings data from remote providers and reconciles it into \
structured JSON. Features include:\n\
\n\
  • Earnings calendar windows with numeric normalization\n\
  • Exchange filtering backed by a cached reference snapshot\n\
  • Transcript retrieval from API Ninjas or Financial Modeling Prep\n\
  • Structured JSON envelopes with request metadata\n\
\n\
Use 'earnwire <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - json: Single JSON object (default)
    /// - table: ASCII table format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    ///
    /// Useful for CI/CD pipelines that need strict validation.
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Transcript provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderSelector {
    /// API Ninjas transcript endpoint.
    Ninjas,
    /// Financial Modeling Prep transcript endpoint.
    Fmp,
}

impl ProviderSelector {
    pub const fn provider_id(self) -> ProviderId {
        match self {
            Self::Ninjas => ProviderId::Ninjas,
            Self::Fmp => ProviderId::Fmp,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🗞️ Run the full discovery pipeline for a date window.
    ///
    /// Fetches the earnings calendar, filters it to the target exchanges,
    /// deduplicates symbols, and pulls one transcript per symbol.
    ///
    /// # Examples
    ///
    ///   earnwire discover
    ///   earnwire discover --days 3 --provider fmp
    ///   earnwire discover --from 2026-02-01 --to 2026-02-07 --out transcripts/
    Discover(DiscoverArgs),

    /// 📅 Fetch the raw earnings calendar for a window.
    ///
    /// Returns normalized calendar events without exchange filtering
    /// or transcript retrieval.
    ///
    /// # Examples
    ///
    ///   earnwire calendar
    ///   earnwire calendar --from 2026-02-01 --to 2026-02-07 --pretty
    Calendar(CalendarArgs),

    /// 🗺️ Build or refresh the symbol-to-exchange map.
    ///
    /// Loads the map from the on-disk cache when fresh, otherwise rebuilds
    /// it from the reference snapshot and rewrites the cache.
    ///
    /// # Examples
    ///
    ///   earnwire exchanges
    ///   earnwire exchanges --refresh
    Exchanges(ExchangesArgs),

    /// 📜 Fetch a single earnings-call transcript.
    ///
    /// The fiscal period is derived from the call date. A missing
    /// transcript is reported in the envelope, not as a process failure.
    ///
    /// # Examples
    ///
    ///   earnwire transcript AAPL --date 2026-02-25
    ///   earnwire transcript MSFT --date 2026-01-29 --provider fmp
    Transcript(TranscriptArgs),
}

/// Date window shared by `discover` and `calendar`.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Window start date (YYYY-MM-DD, inclusive).
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Window end date (YYYY-MM-DD, inclusive).
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Trailing window length in days, ending today (UTC).
    #[arg(long, default_value_t = 7, conflicts_with_all = ["from", "to"])]
    pub days: u16,
}

/// Arguments for the `discover` command.
#[derive(Debug, Args)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Transcript provider.
    #[arg(long, value_enum, default_value_t = ProviderSelector::Ninjas)]
    pub provider: ProviderSelector,

    /// Comma-separated exchange codes to keep.
    #[arg(long, value_delimiter = ',', default_value = "NYSE,NASDAQ")]
    pub exchanges: Vec<String>,

    /// Keep events whose symbol is absent from the exchange map.
    #[arg(long, default_value_t = false)]
    pub keep_unknown: bool,

    /// Directory to write one JSON file per fetched transcript.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Exchange map cache file location.
    #[arg(long, value_name = "FILE", default_value = earnwire_core::DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,
}

/// Arguments for the `calendar` command.
#[derive(Debug, Args)]
pub struct CalendarArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

/// Arguments for the `exchanges` command.
#[derive(Debug, Args)]
pub struct ExchangesArgs {
    /// Skip the cache read and rebuild from the reference snapshot.
    #[arg(long, default_value_t = false)]
    pub refresh: bool,

    /// Exchange map cache file location.
    #[arg(long, value_name = "FILE", default_value = earnwire_core::DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,
}

/// Arguments for the `transcript` command.
#[derive(Debug, Args)]
pub struct TranscriptArgs {
    /// Ticker symbol (e.g., AAPL).
    pub symbol: String,

    /// Earnings call date (YYYY-MM-DD).
    #[arg(long)]
    pub date: String,

    /// Transcript provider.
    #[arg(long, value_enum, default_value_t = ProviderSelector::Ninjas)]
    pub provider: ProviderSelector,
}

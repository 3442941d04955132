//! Core contracts for earnwire.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The resilient JSON fetcher and its retry policy
//! - The cached symbol-to-exchange reference map and filter
//! - Transcript source traits/providers and the discovery pipeline
//! - Response envelope and structured errors

pub mod calendar;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod exchange_cache;
pub mod exchange_map;
pub mod fetcher;
pub mod filter;
pub mod http_client;
pub mod pipeline;
pub mod providers;
pub mod retry;
pub mod throttle;

pub use calendar::CalendarClient;
pub use domain::{
    format_iso_date, parse_iso_date, DateWindow, EarningsEvent, FiscalPeriod, Symbol, Transcript,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{
    CalendarError, ExchangeMapError, FetchError, PipelineError, TranscriptError, ValidationError,
};
pub use exchange_cache::{
    CacheEntry, CacheOutcome, CacheRecord, ExchangeCache, MissReason, DEFAULT_CACHE_PATH,
};
pub use exchange_map::{ExchangeMap, ExchangeMapBuilder, MapOrigin};
pub use fetcher::{redact_credentials, JsonFetcher};
pub use filter::{ExchangeFilter, FilterStats, DEFAULT_TARGET_EXCHANGES};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use pipeline::{DiscoveryReport, Pipeline, RunSummary, SymbolTallies};
pub use providers::{FmpTranscriptSource, NinjasTranscriptSource, ProviderId, TranscriptSource};
pub use retry::RetryPolicy;
pub use throttle::PacingGate;

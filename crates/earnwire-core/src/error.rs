use thiserror::Error;

use crate::domain::{FiscalPeriod, Symbol};
use crate::providers::ProviderId;

/// Validation and contract errors exposed by `earnwire-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid calendar date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("window end {to} is before window start {from}")]
    WindowEndsBeforeStart { from: String, to: String },

    #[error("fiscal quarter must be 1 through 4: {value}")]
    InvalidQuarter { value: u8 },
    #[error("invalid provider '{value}', expected one of ninjas, fmp")]
    InvalidProvider { value: String },

    #[error("credential for '{provider}' is missing or empty")]
    EmptyCredential { provider: &'static str },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Classified failure of a single resilient JSON fetch.
///
/// Every `url` field holds the request URL with credential query
/// parameters already redacted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {message} ({url})")]
    Transport { url: String, message: String },

    #[error("retries exhausted after {attempts} attempts: {message} ({url})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("upstream returned status {status} ({url})")]
    Status { url: String, status: u16 },

    #[error("upstream returned a non-JSON body ({url})")]
    NonJson { url: String },

    #[error("upstream error envelope: {message} ({url})")]
    ErrorEnvelope { url: String, message: String },
}

/// Failures while building the symbol-to-exchange reference map.
#[derive(Debug, Error)]
pub enum ExchangeMapError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("reference snapshot is not a list")]
    NotAList,

    #[error("reference snapshot is empty")]
    EmptySnapshot,

    #[error("reference snapshot produced zero usable entries from {records} records")]
    ZeroEntries { records: usize },
}

/// Failures while fetching the earnings calendar window.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("calendar response is not a list")]
    NotAList,
}

/// Failures while fetching a single earnings-call transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// No document exists upstream for this symbol and period. Callers
    /// treat this as an expected, countable outcome.
    #[error("no transcript from {provider} for {symbol} {period}")]
    NotFound {
        provider: ProviderId,
        symbol: Symbol,
        period: FiscalPeriod,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("unexpected transcript payload from {provider}: {detail}")]
    UnexpectedShape {
        provider: ProviderId,
        detail: String,
    },
}

/// Fatal failures of a discovery run. Per-symbol transcript errors are
/// counted by the pipeline instead of surfacing here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("exchange map unavailable: {0}")]
    ExchangeMap(#[from] ExchangeMapError),

    #[error("calendar unavailable: {0}")]
    Calendar(#[from] CalendarError),
}

//! Financial Modeling Prep transcript source.
//!
//! The endpoint returns a list whose first element carries the full
//! document under `content`. Error envelopes on HTTP 200 are surfaced
//! by the shared fetcher before this module reads the payload.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::domain::{FiscalPeriod, Symbol, Transcript};
use crate::error::{FetchError, TranscriptError, ValidationError};
use crate::fetcher::JsonFetcher;
use crate::http_client::HttpRequest;
use crate::providers::{ProviderId, TranscriptSource};

const TRANSCRIPT_URL: &str = "https://financialmodelingprep.com/api/v3/earning_call_transcript";

pub struct FmpTranscriptSource {
    fetcher: JsonFetcher,
    api_key: String,
}

impl std::fmt::Debug for FmpTranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmpTranscriptSource")
            .field("api_key", &"REDACTED")
            .finish_non_exhaustive()
    }
}

impl FmpTranscriptSource {
    /// Fails before any I/O when the credential is blank.
    pub fn new(fetcher: JsonFetcher, api_key: impl Into<String>) -> Result<Self, ValidationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ValidationError::EmptyCredential { provider: "fmp" });
        }
        Ok(Self { fetcher, api_key })
    }
}

impl TranscriptSource for FmpTranscriptSource {
    fn provider(&self) -> ProviderId {
        ProviderId::Fmp
    }

    fn fetch_transcript<'a>(
        &'a self,
        symbol: &'a Symbol,
        call_date: time::Date,
    ) -> Pin<Box<dyn Future<Output = Result<Transcript, TranscriptError>> + Send + 'a>> {
        Box::pin(async move {
            let period = FiscalPeriod::from_call_date(call_date);
            let url = format!(
                "{TRANSCRIPT_URL}/{}?year={}&quarter={}&apikey={}",
                urlencoding::encode(symbol.as_str()),
                period.year(),
                period.quarter(),
                urlencoding::encode(&self.api_key),
            );

            let payload = match self.fetcher.fetch_json(HttpRequest::get(url)).await {
                Ok(payload) => payload,
                Err(FetchError::Status { status: 404, .. }) => {
                    return Err(not_found(symbol, period));
                }
                Err(error) => return Err(error.into()),
            };

            let items = payload.as_array().ok_or_else(|| {
                TranscriptError::UnexpectedShape {
                    provider: ProviderId::Fmp,
                    detail: String::from("expected a list of transcripts"),
                }
            })?;
            let Some(first) = items.first() else {
                return Err(not_found(symbol, period));
            };

            let text = first
                .get("content")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty());
            match text {
                Some(text) => Ok(Transcript {
                    symbol: symbol.clone(),
                    call_date,
                    period,
                    text: text.to_owned(),
                    raw: first.clone(),
                }),
                None => Err(not_found(symbol, period)),
            }
        })
    }
}

fn not_found(symbol: &Symbol, period: FiscalPeriod) -> TranscriptError {
    TranscriptError::NotFound {
        provider: ProviderId::Fmp,
        symbol: symbol.clone(),
        period,
    }
}

//! API Ninjas transcript source.
//!
//! The endpoint returns one of two shapes depending on account tier: a
//! flat `transcript` text field, or a structured `transcript_split`
//! list of speaker turns. The structured form is flattened into one
//! document by joining `"speaker: text"` lines with a blank line
//! between turns.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{FiscalPeriod, Symbol, Transcript};
use crate::error::{FetchError, TranscriptError, ValidationError};
use crate::fetcher::JsonFetcher;
use crate::http_client::{HttpAuth, HttpRequest};
use crate::providers::{ProviderId, TranscriptSource};

const TRANSCRIPT_URL: &str = "https://api.api-ninjas.com/v1/earningstranscript";

pub struct NinjasTranscriptSource {
    fetcher: JsonFetcher,
    api_key: String,
}

impl NinjasTranscriptSource {
    /// Fails before any I/O when the credential is blank.
    pub fn new(fetcher: JsonFetcher, api_key: impl Into<String>) -> Result<Self, ValidationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ValidationError::EmptyCredential { provider: "ninjas" });
        }
        Ok(Self { fetcher, api_key })
    }
}

impl TranscriptSource for NinjasTranscriptSource {
    fn provider(&self) -> ProviderId {
        ProviderId::Ninjas
    }

    fn fetch_transcript<'a>(
        &'a self,
        symbol: &'a Symbol,
        call_date: time::Date,
    ) -> Pin<Box<dyn Future<Output = Result<Transcript, TranscriptError>> + Send + 'a>> {
        Box::pin(async move {
            let period = FiscalPeriod::from_call_date(call_date);
            let url = format!(
                "{TRANSCRIPT_URL}?ticker={}&year={}&quarter={}",
                urlencoding::encode(symbol.as_str()),
                period.year(),
                period.quarter(),
            );
            let request = HttpRequest::get(url).with_auth(&HttpAuth::Header {
                name: String::from("X-Api-Key"),
                value: self.api_key.clone(),
            });

            let payload = match self.fetcher.fetch_json(request).await {
                Ok(payload) => payload,
                Err(FetchError::Status { status: 404, .. }) => {
                    return Err(not_found(symbol, period));
                }
                Err(error) => return Err(error.into()),
            };

            // Some tiers wrap the document in a single-element list.
            let document = match payload {
                Value::Array(items) => match items.into_iter().next() {
                    Some(item) => item,
                    None => return Err(not_found(symbol, period)),
                },
                other => other,
            };

            match extract_text(&document)? {
                Some(text) => Ok(Transcript {
                    symbol: symbol.clone(),
                    call_date,
                    period,
                    text,
                    raw: document,
                }),
                None => Err(not_found(symbol, period)),
            }
        })
    }
}

fn not_found(symbol: &Symbol, period: FiscalPeriod) -> TranscriptError {
    TranscriptError::NotFound {
        provider: ProviderId::Ninjas,
        symbol: symbol.clone(),
        period,
    }
}

#[derive(Debug, Deserialize)]
struct SpeakerTurn {
    #[serde(default)]
    speaker: String,
    #[serde(default)]
    text: String,
}

/// Pull the document text out of a response object, preferring the
/// structured speaker turns over the flat field. `None` means the
/// response is well-formed but carries no usable text.
fn extract_text(document: &Value) -> Result<Option<String>, TranscriptError> {
    let object = document.as_object().ok_or_else(|| {
        TranscriptError::UnexpectedShape {
            provider: ProviderId::Ninjas,
            detail: String::from("expected a transcript object"),
        }
    })?;

    if let Some(split) = object.get("transcript_split").filter(|v| !v.is_null()) {
        let turns: Vec<SpeakerTurn> =
            serde_json::from_value(split.clone()).map_err(|error| {
                TranscriptError::UnexpectedShape {
                    provider: ProviderId::Ninjas,
                    detail: format!("transcript_split is not a speaker-turn list: {error}"),
                }
            })?;
        let joined = join_speaker_turns(&turns);
        if !joined.is_empty() {
            return Ok(Some(joined));
        }
    }

    let flat = object
        .get("transcript")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty());
    Ok(flat.map(str::to_owned))
}

fn join_speaker_turns(turns: &[SpeakerTurn]) -> String {
    turns
        .iter()
        .filter(|turn| !turn.text.trim().is_empty())
        .map(|turn| {
            let speaker = turn.speaker.trim();
            let speaker = if speaker.is_empty() { "Unknown" } else { speaker };
            format!("{speaker}: {}", turn.text.trim())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

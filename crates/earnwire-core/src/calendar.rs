//! Windowed earnings-calendar acquisition.
//!
//! One upstream call per window, inclusive bounds, no pagination.
//! Records that lack a usable symbol or report date are skipped with a
//! warning; everything else is normalized into `EarningsEvent` with the
//! original record preserved verbatim.

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{format_iso_date, parse_iso_date, DateWindow, EarningsEvent, Symbol};
use crate::error::{CalendarError, ValidationError};
use crate::fetcher::JsonFetcher;
use crate::http_client::HttpRequest;

const CALENDAR_URL: &str = "https://financialmodelingprep.com/api/v3/earning_calendar";

/// Client for the windowed earnings-calendar endpoint.
#[derive(Clone)]
pub struct CalendarClient {
    fetcher: JsonFetcher,
    api_key: String,
}

impl CalendarClient {
    /// Fails before any I/O when the credential is blank.
    pub fn new(fetcher: JsonFetcher, api_key: impl Into<String>) -> Result<Self, ValidationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ValidationError::EmptyCredential { provider: "fmp" });
        }
        Ok(Self { fetcher, api_key })
    }

    /// Fetch every earnings event reported inside the window.
    pub async fn fetch(&self, window: &DateWindow) -> Result<Vec<EarningsEvent>, CalendarError> {
        let url = format!(
            "{CALENDAR_URL}?from={}&to={}&apikey={}",
            format_iso_date(window.from_date()),
            format_iso_date(window.to_date()),
            urlencoding::encode(&self.api_key),
        );
        let payload = self.fetcher.fetch_json(HttpRequest::get(url)).await?;
        let records = payload.as_array().ok_or(CalendarError::NotAList)?;

        let mut events = Vec::with_capacity(records.len());
        let mut skipped = 0usize;
        for record in records {
            match normalize_event(record) {
                Some(event) => events.push(event),
                None => {
                    skipped += 1;
                    warn!(
                        symbol = record.get("symbol").and_then(serde_json::Value::as_str).unwrap_or(""),
                        date = record.get("date").and_then(serde_json::Value::as_str).unwrap_or(""),
                        "calendar record missing usable symbol or date; skipped"
                    );
                }
            }
        }

        info!(
            window = %window,
            events = events.len(),
            skipped,
            "earnings calendar fetched"
        );
        Ok(events)
    }
}

fn normalize_event(record: &Value) -> Option<EarningsEvent> {
    let symbol = record
        .get("symbol")
        .and_then(Value::as_str)
        .and_then(|text| Symbol::parse(text).ok())?;
    let report_date = record
        .get("date")
        .and_then(Value::as_str)
        .and_then(|text| parse_iso_date(text).ok())?;

    Some(EarningsEvent {
        symbol,
        report_date,
        eps_actual: finite_number(record.get("eps")),
        eps_estimated: finite_number(record.get("epsEstimated")),
        revenue_actual: finite_number(record.get("revenue")),
        revenue_estimated: finite_number(record.get("revenueEstimated")),
        raw: record.clone(),
    })
}

/// Coerce an upstream field to a finite number or nothing. Numeric
/// strings are accepted; NaN, infinities, empty strings, and other
/// shapes all collapse to `None`.
fn finite_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

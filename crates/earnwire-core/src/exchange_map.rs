//! Symbol-to-exchange lookup table built from a bulk reference snapshot.
//!
//! The builder reads the disk cache first and only touches the network on
//! a miss. Snapshot records carry the exchange code under one of three
//! field names depending on upstream schema vintage; resolution follows a
//! fixed priority order and skips records with no usable value.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ExchangeMapError, ValidationError};
use crate::exchange_cache::{CacheEntry, CacheOutcome, CacheRecord, ExchangeCache};
use crate::fetcher::JsonFetcher;
use crate::http_client::HttpRequest;

const SNAPSHOT_URL: &str = "https://financialmodelingprep.com/api/v3/stock/list";

/// Exchange-code field names, highest priority first.
const EXCHANGE_FIELDS: [&str; 3] = ["exchangeShortName", "exchange_short_name", "exchange"];

/// Where a built map came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapOrigin {
    Cache,
    Snapshot,
}

/// Uppercase symbol to uppercase exchange short code.
#[derive(Debug, Clone, Default)]
pub struct ExchangeMap {
    entries: HashMap<String, String>,
}

impl ExchangeMap {
    /// Exchange short code for a symbol, if the snapshot listed it.
    pub fn exchange_for(&self, symbol: &str) -> Option<&str> {
        self.entries
            .get(symbol.trim().to_ascii_uppercase().as_str())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate (symbol, exchange) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(symbol, exchange)| (symbol.as_str(), exchange.as_str()))
    }

    pub(crate) fn from_cache_entries(entries: Vec<CacheEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| {
                (
                    entry.symbol.to_ascii_uppercase(),
                    entry.exchange.to_ascii_uppercase(),
                )
            })
            .collect();
        Self { entries }
    }

    fn to_cache_entries(&self) -> Vec<CacheEntry> {
        let mut entries = self
            .entries
            .iter()
            .map(|(symbol, exchange)| CacheEntry {
                symbol: symbol.clone(),
                exchange: exchange.clone(),
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        entries
    }
}

/// Cache-first builder for the exchange map.
#[derive(Clone)]
pub struct ExchangeMapBuilder {
    fetcher: JsonFetcher,
    cache: ExchangeCache,
    api_key: String,
}

impl std::fmt::Debug for ExchangeMapBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeMapBuilder")
            .field("cache", &self.cache)
            .field("api_key", &"REDACTED")
            .finish_non_exhaustive()
    }
}

impl ExchangeMapBuilder {
    /// Fails before any I/O when the credential is blank.
    pub fn new(
        fetcher: JsonFetcher,
        cache: ExchangeCache,
        api_key: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ValidationError::EmptyCredential { provider: "fmp" });
        }
        Ok(Self {
            fetcher,
            cache,
            api_key,
        })
    }

    /// Return the cached map when fresh, otherwise rebuild from the
    /// upstream snapshot and persist the result.
    pub async fn build(&self) -> Result<(ExchangeMap, MapOrigin), ExchangeMapError> {
        match self.cache.load() {
            CacheOutcome::Fresh(record) => {
                let map = ExchangeMap::from_cache_entries(record.entries);
                info!(entries = map.len(), "exchange map served from cache");
                Ok((map, MapOrigin::Cache))
            }
            CacheOutcome::Miss(reason) => {
                info!(%reason, "exchange map cache miss; rebuilding from snapshot");
                Ok((self.rebuild().await?, MapOrigin::Snapshot))
            }
        }
    }

    /// Rebuild from the network unconditionally, ignoring any cached state.
    pub async fn rebuild(&self) -> Result<ExchangeMap, ExchangeMapError> {
        let url = format!("{SNAPSHOT_URL}?apikey={}", urlencoding::encode(&self.api_key));
        let payload = self.fetcher.fetch_json(HttpRequest::get(url)).await?;

        let map = resolve_snapshot(&payload)?;
        info!(entries = map.len(), "exchange map built from snapshot");

        self.cache.save(&CacheRecord {
            built_at: time::OffsetDateTime::now_utc().unix_timestamp(),
            entries: map.to_cache_entries(),
        });

        Ok(map)
    }
}

/// Extract the symbol-to-exchange pairs from a snapshot payload.
///
/// A non-list payload and an empty list fail outright; records without a
/// usable symbol or exchange code are skipped. An empty result after a
/// non-empty payload means none of the known field names matched, which
/// is reported distinctly from an empty upstream snapshot.
fn resolve_snapshot(payload: &Value) -> Result<ExchangeMap, ExchangeMapError> {
    let records = payload.as_array().ok_or(ExchangeMapError::NotAList)?;
    if records.is_empty() {
        return Err(ExchangeMapError::EmptySnapshot);
    }

    let mut entries = HashMap::with_capacity(records.len());
    let mut skipped = 0usize;
    for record in records {
        match resolve_record(record) {
            Some((symbol, exchange)) => {
                entries.insert(symbol, exchange);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            skipped,
            total = records.len(),
            "snapshot records without usable symbol or exchange"
        );
    }
    if entries.is_empty() {
        return Err(ExchangeMapError::ZeroEntries {
            records: records.len(),
        });
    }

    Ok(ExchangeMap { entries })
}

fn resolve_record(record: &Value) -> Option<(String, String)> {
    let symbol = non_empty_str(record.get("symbol")?)?;
    let exchange = EXCHANGE_FIELDS
        .iter()
        .find_map(|field| record.get(*field).and_then(non_empty_str))?;
    Some((symbol.to_ascii_uppercase(), exchange.to_ascii_uppercase()))
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|text| !text.is_empty())
}

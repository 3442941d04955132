//! Discovery run orchestration.
//!
//! The exchange map and the calendar window are acquired concurrently;
//! either failure aborts the run before any per-symbol work. Surviving
//! events are filtered to the target universe and deduplicated by symbol
//! (earliest report date wins), then walked sequentially through the
//! pacing gate. Per-symbol failures are tallied, never fatal.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::calendar::CalendarClient;
use crate::domain::{format_iso_date, DateWindow, EarningsEvent, Symbol, Transcript};
use crate::error::{PipelineError, TranscriptError};
use crate::exchange_map::ExchangeMapBuilder;
use crate::filter::{ExchangeFilter, FilterStats};
use crate::providers::TranscriptSource;
use crate::throttle::PacingGate;

/// Per-symbol outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTallies {
    pub fetched: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl SymbolTallies {
    pub const fn total(&self) -> usize {
        self.fetched + self.not_found + self.failed
    }
}

/// What one discovery run saw and did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub window: DateWindow,
    pub raw_events: usize,
    pub filter: FilterStats,
    pub unique_symbols: usize,
    pub tallies: SymbolTallies,
}

/// Full result of a discovery run: the summary plus the surviving
/// events and every transcript that was fetched.
#[derive(Debug, Serialize)]
pub struct DiscoveryReport {
    pub summary: RunSummary,
    pub events: Vec<EarningsEvent>,
    pub transcripts: Vec<Transcript>,
}

/// Composes the acquisition stages into one run.
pub struct Pipeline {
    map_builder: ExchangeMapBuilder,
    calendar: CalendarClient,
    transcripts: Arc<dyn TranscriptSource>,
    filter: ExchangeFilter,
    gate: PacingGate,
}

impl Pipeline {
    pub fn new(
        map_builder: ExchangeMapBuilder,
        calendar: CalendarClient,
        transcripts: Arc<dyn TranscriptSource>,
    ) -> Self {
        Self {
            map_builder,
            calendar,
            transcripts,
            filter: ExchangeFilter::default(),
            gate: PacingGate::default(),
        }
    }

    pub fn with_filter(mut self, filter: ExchangeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_pacing(mut self, gate: PacingGate) -> Self {
        self.gate = gate;
        self
    }

    pub async fn run(&self, window: DateWindow) -> Result<DiscoveryReport, PipelineError> {
        info!(window = %window, provider = %self.transcripts.provider(), "discovery run started");

        let (map, events) = tokio::join!(self.map_builder.build(), self.calendar.fetch(&window));
        let (map, _) = map?;
        let events = events?;
        let raw_events = events.len();

        let (filtered, filter_stats) = self.filter.apply(events, &map);
        let events = dedup_earliest(filtered);
        info!(unique_symbols = events.len(), "events deduplicated by symbol");

        let mut tallies = SymbolTallies::default();
        let mut transcripts = Vec::new();
        for event in &events {
            self.gate.acquire().await;
            match self
                .transcripts
                .fetch_transcript(&event.symbol, event.report_date)
                .await
            {
                Ok(transcript) => {
                    info!(
                        symbol = %event.symbol,
                        date = %format_iso_date(event.report_date),
                        chars = transcript.chars(),
                        "transcript fetched"
                    );
                    tallies.fetched += 1;
                    transcripts.push(transcript);
                }
                Err(TranscriptError::NotFound {
                    provider,
                    symbol,
                    period,
                }) => {
                    info!(%provider, %symbol, %period, "no transcript available");
                    tallies.not_found += 1;
                }
                Err(error) => {
                    warn!(symbol = %event.symbol, %error, "transcript fetch failed");
                    tallies.failed += 1;
                }
            }
        }

        info!(
            fetched = tallies.fetched,
            not_found = tallies.not_found,
            failed = tallies.failed,
            total = tallies.total(),
            "discovery run finished"
        );

        Ok(DiscoveryReport {
            summary: RunSummary {
                window,
                raw_events,
                filter: filter_stats,
                unique_symbols: events.len(),
                tallies,
            },
            events,
            transcripts,
        })
    }
}

/// One event per symbol, keeping the earliest report date. Output is
/// ordered by symbol.
pub fn dedup_earliest(events: Vec<EarningsEvent>) -> Vec<EarningsEvent> {
    let mut unique: BTreeMap<Symbol, EarningsEvent> = BTreeMap::new();
    for event in events {
        match unique.entry(event.symbol.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(event);
            }
            Entry::Occupied(mut slot) => {
                if event.report_date < slot.get().report_date {
                    slot.insert(event);
                }
            }
        }
    }
    unique.into_values().collect()
}

//! Exchange-universe filter reconciling calendar events against the
//! reference map. Pure and synchronous; the only side effect is one
//! aggregate count log per application.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::domain::EarningsEvent;
use crate::exchange_map::ExchangeMap;

/// Exchange universe kept when no override is supplied.
pub const DEFAULT_TARGET_EXCHANGES: [&str; 2] = ["NYSE", "NASDAQ"];

/// Keeps events whose symbol resolves to a target exchange.
///
/// Events absent from the map are dropped unless `keep_unknown` is set
/// (a diagnostic mode); events that resolve to a non-target exchange are
/// dropped regardless.
#[derive(Debug, Clone)]
pub struct ExchangeFilter {
    targets: BTreeSet<String>,
    keep_unknown: bool,
}

/// Aggregate outcome counts for one filter application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub kept_target: usize,
    pub kept_unknown: usize,
    pub dropped: usize,
}

impl FilterStats {
    pub const fn kept(&self) -> usize {
        self.kept_target + self.kept_unknown
    }
}

impl Default for ExchangeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_EXCHANGES, false)
    }
}

impl ExchangeFilter {
    pub fn new(
        targets: impl IntoIterator<Item = impl Into<String>>,
        keep_unknown: bool,
    ) -> Self {
        let targets = targets
            .into_iter()
            .map(|target| target.into().trim().to_ascii_uppercase())
            .filter(|target| !target.is_empty())
            .collect();
        Self {
            targets,
            keep_unknown,
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }

    pub fn apply(
        &self,
        events: Vec<EarningsEvent>,
        map: &ExchangeMap,
    ) -> (Vec<EarningsEvent>, FilterStats) {
        let mut stats = FilterStats::default();
        let kept = events
            .into_iter()
            .filter(|event| match map.exchange_for(event.symbol.as_str()) {
                Some(exchange) if self.targets.contains(exchange) => {
                    stats.kept_target += 1;
                    true
                }
                Some(_) => {
                    stats.dropped += 1;
                    false
                }
                None if self.keep_unknown => {
                    stats.kept_unknown += 1;
                    true
                }
                None => {
                    stats.dropped += 1;
                    false
                }
            })
            .collect();

        info!(
            kept_target = stats.kept_target,
            kept_unknown = stats.kept_unknown,
            dropped = stats.dropped,
            "exchange filter applied"
        );
        (kept, stats)
    }
}

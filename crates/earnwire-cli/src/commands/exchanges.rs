use std::collections::BTreeMap;

use serde::Serialize;

use earnwire_core::{ExchangeCache, ExchangeMapBuilder, MapOrigin, ProviderId};

use crate::cli::ExchangesArgs;
use crate::error::CliError;

use super::{fetcher, require_env, CommandResult, FMP_KEY_VAR};

#[derive(Debug, Serialize)]
struct ExchangesResponseData {
    cache_path: String,
    origin: MapOrigin,
    entries: usize,
    venues: BTreeMap<String, usize>,
}

pub async fn run(args: &ExchangesArgs) -> Result<CommandResult, CliError> {
    let cache = ExchangeCache::new(args.cache_path.clone());
    let builder = ExchangeMapBuilder::new(fetcher(), cache, require_env(FMP_KEY_VAR)?)?;

    let (map, origin) = if args.refresh {
        (builder.rebuild().await?, MapOrigin::Snapshot)
    } else {
        builder.build().await?
    };

    let mut venues: BTreeMap<String, usize> = BTreeMap::new();
    for (_, exchange) in map.iter() {
        *venues.entry(exchange.to_string()).or_insert(0) += 1;
    }

    let data = serde_json::to_value(ExchangesResponseData {
        cache_path: args.cache_path.display().to_string(),
        origin,
        entries: map.len(),
        venues,
    })?;

    Ok(CommandResult::ok(data, vec![ProviderId::Fmp]).with_cache_hit(origin == MapOrigin::Cache))
}

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use earnwire_core::{
    format_iso_date, CalendarClient, ExchangeCache, ExchangeFilter, ExchangeMapBuilder,
    FmpTranscriptSource, NinjasTranscriptSource, Pipeline, ProviderId, Transcript,
    TranscriptSource,
};

use crate::cli::{DiscoverArgs, ProviderSelector};
use crate::error::CliError;

use super::{fetcher, require_env, resolve_window, CommandResult, FMP_KEY_VAR, NINJAS_KEY_VAR};

pub async fn run(args: &DiscoverArgs) -> Result<CommandResult, CliError> {
    let window = resolve_window(&args.window)?;
    let fmp_key = require_env(FMP_KEY_VAR)?;
    let fetcher = fetcher();

    let cache = ExchangeCache::new(args.cache_path.clone());
    let map_builder = ExchangeMapBuilder::new(fetcher.clone(), cache, fmp_key.clone())?;
    let calendar = CalendarClient::new(fetcher.clone(), fmp_key.clone())?;

    let provider = args.provider.provider_id();
    let transcripts: Arc<dyn TranscriptSource> = match args.provider {
        ProviderSelector::Ninjas => Arc::new(NinjasTranscriptSource::new(
            fetcher,
            require_env(NINJAS_KEY_VAR)?,
        )?),
        ProviderSelector::Fmp => Arc::new(FmpTranscriptSource::new(fetcher, fmp_key)?),
    };

    let filter = ExchangeFilter::new(args.exchanges.iter().cloned(), args.keep_unknown);
    let pipeline = Pipeline::new(map_builder, calendar, transcripts).with_filter(filter);

    let report = pipeline.run(window).await?;

    if let Some(dir) = &args.out {
        let written = write_transcripts(dir, &report.transcripts)?;
        info!(files = written, dir = %dir.display(), "transcripts written");
    }

    let mut result = CommandResult::ok(serde_json::to_value(&report)?, source_chain(provider));

    if report.summary.tallies.failed > 0 {
        result = result.with_warning(format!(
            "{} transcript fetches failed; see logs for details",
            report.summary.tallies.failed
        ));
    }

    Ok(result)
}

/// One pretty-printed JSON file per transcript, named `SYMBOL_DATE.json`.
fn write_transcripts(dir: &Path, transcripts: &[Transcript]) -> Result<usize, CliError> {
    fs::create_dir_all(dir)?;

    for transcript in transcripts {
        let name = format!(
            "{}_{}.json",
            transcript.symbol,
            format_iso_date(transcript.call_date)
        );
        let payload = serde_json::to_string_pretty(transcript)?;
        fs::write(dir.join(name), payload)?;
    }

    Ok(transcripts.len())
}

fn source_chain(provider: ProviderId) -> Vec<ProviderId> {
    if provider == ProviderId::Fmp {
        vec![ProviderId::Fmp]
    } else {
        vec![ProviderId::Fmp, provider]
    }
}

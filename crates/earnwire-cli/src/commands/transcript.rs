use std::sync::Arc;

use serde_json::Value;

use earnwire_core::{
    parse_iso_date, EnvelopeError, FmpTranscriptSource, NinjasTranscriptSource, Symbol,
    TranscriptError, TranscriptSource,
};

use crate::cli::{ProviderSelector, TranscriptArgs};
use crate::error::CliError;

use super::{fetcher, require_env, CommandResult, FMP_KEY_VAR, NINJAS_KEY_VAR};

pub async fn run(args: &TranscriptArgs) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let date = parse_iso_date(&args.date)?;

    let provider = args.provider.provider_id();
    let source: Arc<dyn TranscriptSource> = match args.provider {
        ProviderSelector::Ninjas => Arc::new(NinjasTranscriptSource::new(
            fetcher(),
            require_env(NINJAS_KEY_VAR)?,
        )?),
        ProviderSelector::Fmp => Arc::new(FmpTranscriptSource::new(
            fetcher(),
            require_env(FMP_KEY_VAR)?,
        )?),
    };

    match source.fetch_transcript(&symbol, date).await {
        Ok(transcript) => Ok(CommandResult::ok(
            serde_json::to_value(&transcript)?,
            vec![provider],
        )),
        // A missing document is an envelope-level outcome, not a process
        // failure.
        Err(error @ TranscriptError::NotFound { .. }) => {
            let envelope_error = EnvelopeError::new("transcript.not_found", error.to_string())?
                .with_source(provider)
                .with_retryable(false);

            Ok(CommandResult::ok(Value::Null, vec![provider])
                .with_errors(vec![envelope_error]))
        }
        Err(error) => Err(CliError::from(error)),
    }
}

mod calendar;
mod discover;
mod exchanges;
mod transcript;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use uuid::Uuid;

use earnwire_core::{
    parse_iso_date, DateWindow, Envelope, EnvelopeError, EnvelopeMeta, JsonFetcher, ProviderId,
    ReqwestHttpClient,
};

use crate::cli::{Cli, Command, WindowArgs};
use crate::error::CliError;

/// Environment variable carrying the Financial Modeling Prep key.
pub const FMP_KEY_VAR: &str = "EARNWIRE_FMP_API_KEY";
/// Environment variable carrying the API Ninjas key.
pub const NINJAS_KEY_VAR: &str = "EARNWIRE_NINJAS_API_KEY";

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub cache_hit: bool,
    pub source_chain: Vec<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            cache_hit: false,
            source_chain,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Discover(args) => discover::run(args).await?,
        Command::Calendar(args) => calendar::run(args).await?,
        Command::Exchanges(args) => exchanges::run(args).await?,
        Command::Transcript(args) => transcript::run(args).await?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        cache_hit,
        source_chain,
    } = command_result;

    let latency_ms = started.elapsed().as_millis().try_into().unwrap_or(u64::MAX);

    let mut meta = EnvelopeMeta::new(
        Uuid::new_v4().to_string(),
        "v1.0.0",
        source_chain,
        latency_ms,
        cache_hit,
    )?;

    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn fetcher() -> JsonFetcher {
    JsonFetcher::new(Arc::new(ReqwestHttpClient::new()))
}

fn require_env(var: &'static str) -> Result<String, CliError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CliError::MissingCredential { var }),
    }
}

fn resolve_window(args: &WindowArgs) -> Result<DateWindow, CliError> {
    match (&args.from, &args.to) {
        (Some(from), Some(to)) => {
            let from = parse_iso_date(from)?;
            let to = parse_iso_date(to)?;
            DateWindow::new(from, to).map_err(CliError::from)
        }
        _ => Ok(DateWindow::trailing(args.days)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_args(from: Option<&str>, to: Option<&str>, days: u16) -> WindowArgs {
        WindowArgs {
            from: from.map(String::from),
            to: to.map(String::from),
            days,
        }
    }

    #[test]
    fn resolves_explicit_window() {
        let args = window_args(Some("2026-02-01"), Some("2026-02-07"), 7);

        let window = resolve_window(&args).unwrap();

        assert_eq!(window.to_string(), "2026-02-01..2026-02-07");
    }

    #[test]
    fn rejects_reversed_window() {
        let args = window_args(Some("2026-02-07"), Some("2026-02-01"), 7);

        let error = resolve_window(&args).unwrap_err();

        assert!(matches!(error, CliError::Validation(_)));
    }

    #[test]
    fn rejects_malformed_date() {
        let args = window_args(Some("02/01/2026"), Some("2026-02-07"), 7);

        assert!(resolve_window(&args).is_err());
    }

    #[test]
    fn falls_back_to_trailing_days() {
        let args = window_args(None, None, 3);

        let window = resolve_window(&args).unwrap();

        assert_eq!((window.to_date() - window.from_date()).whole_days(), 3);
    }
}

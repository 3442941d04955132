use serde::Serialize;

use earnwire_core::{CalendarClient, DateWindow, EarningsEvent, ProviderId};

use crate::cli::CalendarArgs;
use crate::error::CliError;

use super::{fetcher, require_env, resolve_window, CommandResult, FMP_KEY_VAR};

#[derive(Debug, Serialize)]
struct CalendarResponseData {
    window: DateWindow,
    events: Vec<EarningsEvent>,
}

pub async fn run(args: &CalendarArgs) -> Result<CommandResult, CliError> {
    let window = resolve_window(&args.window)?;
    let client = CalendarClient::new(fetcher(), require_env(FMP_KEY_VAR)?)?;

    let events = client.fetch(&window).await?;

    let data = serde_json::to_value(CalendarResponseData { window, events })?;

    Ok(CommandResult::ok(data, vec![ProviderId::Fmp]))
}

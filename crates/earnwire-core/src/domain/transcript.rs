use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use super::date::iso;
use super::{FiscalPeriod, Symbol};

/// One fetched earnings-call document.
///
/// Providers never construct this with empty `text`; an absent or empty
/// document is reported as a typed not-found condition instead. `raw`
/// keeps the provider payload verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub symbol: Symbol,
    #[serde(with = "iso")]
    pub call_date: Date,
    pub period: FiscalPeriod,
    pub text: String,
    #[serde(default)]
    pub raw: Value,
}

impl Transcript {
    /// Character count of the flattened document, for summaries.
    pub fn chars(&self) -> usize {
        self.text.chars().count()
    }
}

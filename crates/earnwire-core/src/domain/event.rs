use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use super::date::iso;
use super::Symbol;

/// One normalized earnings-calendar entry.
///
/// `symbol` and `report_date` are always valid by construction; records
/// missing either are discarded upstream. Numeric fields are finite or
/// absent, never NaN or infinite. `raw` keeps the upstream record
/// verbatim for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsEvent {
    pub symbol: Symbol,
    #[serde(with = "iso")]
    pub report_date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps_actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps_estimated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_estimated: Option<f64>,
    #[serde(default)]
    pub raw: Value,
}

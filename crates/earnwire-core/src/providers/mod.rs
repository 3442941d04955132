//! Transcript source capability and its provider implementations.
//!
//! Both providers yield the same `Transcript` shape and the same typed
//! not-found condition, so callers can swap them at construction time
//! without changing anything downstream.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::{Symbol, Transcript};
use crate::error::{TranscriptError, ValidationError};

mod fmp;
mod ninjas;

pub use fmp::FmpTranscriptSource;
pub use ninjas::NinjasTranscriptSource;

/// Canonical provider identifiers used in errors and run metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Ninjas,
    Fmp,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::Ninjas, Self::Fmp];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ninjas => "ninjas",
            Self::Fmp => "fmp",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ninjas" => Ok(Self::Ninjas),
            "fmp" => Ok(Self::Fmp),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}

/// Per-symbol document fetch capability.
///
/// Implementations derive the fiscal period from the call date with the
/// shared `FiscalPeriod::from_call_date` heuristic and surface a missing
/// document as `TranscriptError::NotFound` rather than a generic failure.
pub trait TranscriptSource: Send + Sync {
    fn provider(&self) -> ProviderId;

    fn fetch_transcript<'a>(
        &'a self,
        symbol: &'a Symbol,
        call_date: Date,
    ) -> Pin<Box<dyn Future<Output = Result<Transcript, TranscriptError>> + Send + 'a>>;
}

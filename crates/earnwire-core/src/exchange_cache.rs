//! Disk-backed cache for the symbol-to-exchange reference snapshot.
//!
//! Misses are routine control flow, not errors: every miss reason is
//! logged distinctly and collapses to the same caller outcome, a rebuild
//! from the upstream snapshot. Saving is best-effort; a failed write
//! never fails the run.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Default cache location, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "data/exchange_map.json";

/// Entries older than this are rebuilt.
const MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

/// One persisted symbol-to-exchange pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub symbol: String,
    pub exchange: String,
}

/// The persisted cache document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Build time as unix seconds.
    #[serde(rename = "builtAt")]
    pub built_at: i64,
    pub entries: Vec<CacheEntry>,
}

/// Result of a cache read.
#[derive(Debug)]
pub enum CacheOutcome {
    Fresh(CacheRecord),
    Miss(MissReason),
}

/// Why a cache read produced no usable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    Absent,
    Unreadable,
    Corrupt,
    Stale,
}

impl MissReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Unreadable => "unreadable",
            Self::Corrupt => "corrupt",
            Self::Stale => "stale",
        }
    }
}

impl Display for MissReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reader/writer for the on-disk reference cache.
///
/// Single-writer per run; cross-process races are benign because the
/// whole document is serialized to a string before one write call.
#[derive(Debug, Clone)]
pub struct ExchangeCache {
    path: PathBuf,
}

impl ExchangeCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_path() -> Self {
        Self::new(DEFAULT_CACHE_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache, classifying every failure as a miss reason.
    pub fn load(&self) -> CacheOutcome {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "exchange cache file absent");
            return CacheOutcome::Miss(MissReason::Absent);
        }

        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "exchange cache unreadable");
                return CacheOutcome::Miss(MissReason::Unreadable);
            }
        };

        let record: CacheRecord = match serde_json::from_str(&body) {
            Ok(record) => record,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "exchange cache corrupt");
                return CacheOutcome::Miss(MissReason::Corrupt);
            }
        };

        let age = OffsetDateTime::now_utc().unix_timestamp() - record.built_at;
        if age > MAX_AGE_SECONDS {
            debug!(
                path = %self.path.display(),
                age_seconds = age,
                "exchange cache stale"
            );
            return CacheOutcome::Miss(MissReason::Stale);
        }

        debug!(
            path = %self.path.display(),
            entries = record.entries.len(),
            age_seconds = age,
            "exchange cache fresh"
        );
        CacheOutcome::Fresh(record)
    }

    /// Persist a freshly built record. Failures are logged and swallowed;
    /// the in-memory result remains usable either way.
    pub fn save(&self, record: &CacheRecord) {
        let body = match serde_json::to_string(record) {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, "exchange cache serialization failed; skipping save");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(error) = fs::create_dir_all(parent) {
                    warn!(path = %parent.display(), %error, "exchange cache directory creation failed; skipping save");
                    return;
                }
            }
        }

        if let Err(error) = fs::write(&self.path, body) {
            warn!(path = %self.path.display(), %error, "exchange cache write failed");
        }
    }
}

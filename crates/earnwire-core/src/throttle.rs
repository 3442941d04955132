//! Per-minute pacing gate for the sequential document-fetch loop.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default transcript-fetch pace.
pub const DEFAULT_PER_MINUTE: u32 = 60;

/// Awaitable per-minute quota acquired before each document fetch.
///
/// Callers wait for a permit instead of receiving an error; the gate
/// never fails a request, it only spaces them out.
#[derive(Clone)]
pub struct PacingGate {
    limiter: Arc<DirectRateLimiter>,
}

impl PacingGate {
    /// Gate allowing `limit` permits per minute. A zero limit is clamped
    /// to one rather than rejected.
    pub fn per_minute(limit: u32) -> Self {
        let limit = NonZeroU32::new(limit.max(1)).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(limit))),
        }
    }

    /// Wait until the next permit is available.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// Non-blocking permit probe.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for PacingGate {
    fn default() -> Self {
        Self::per_minute(DEFAULT_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_budget_matches_the_per_minute_limit() {
        let gate = PacingGate::per_minute(2);

        assert!(gate.try_acquire());
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let gate = PacingGate::per_minute(0);

        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
    }

    #[tokio::test]
    async fn acquire_completes_immediately_while_budget_remains() {
        let gate = PacingGate::per_minute(10);

        gate.acquire().await;
        gate.acquire().await;
    }
}

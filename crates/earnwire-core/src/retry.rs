//! Retry policy for transient upstream failures.

use std::time::Duration;

/// Bounded retry with exponential backoff and multiplicative jitter.
///
/// `max_attempts` counts the initial request, so the default of 3 means
/// one initial attempt plus two retries. Backoff doubles from
/// `base_delay` and the slept delay is scaled by a factor drawn
/// uniformly from [0.8, 1.2].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Statuses that indicate a transient upstream condition. Every other
    /// non-success status fails without retry.
    pub const fn should_retry_status(status: u16) -> bool {
        matches!(status, 429 | 503)
    }

    /// Backoff before the given retry (0-based: 0 precedes the second
    /// attempt).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let millis = self.base_delay.as_millis() as f64 * 2f64.powi(retry as i32);
        let factor = if self.jitter {
            0.8 + fastrand::f64() * 0.4
        } else {
            1.0
        };
        Duration::from_millis((millis * factor) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_allows_one_initial_attempt_and_two_retries() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert!(policy.jitter);
    }

    #[test]
    fn only_throttled_and_unavailable_statuses_retry() {
        assert!(RetryPolicy::should_retry_status(429));
        assert!(RetryPolicy::should_retry_status(503));

        assert!(!RetryPolicy::should_retry_status(400));
        assert!(!RetryPolicy::should_retry_status(401));
        assert!(!RetryPolicy::should_retry_status(404));
        assert!(!RetryPolicy::should_retry_status(500));
        assert!(!RetryPolicy::should_retry_status(502));
        assert!(!RetryPolicy::should_retry_status(504));
    }

    #[test]
    fn backoff_doubles_without_jitter() {
        let policy = RetryPolicy {
            jitter: false,
            ..RetryPolicy::default()
        };

        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2_000));
    }

    #[test]
    fn jitter_stays_within_twenty_percent_of_the_base() {
        let policy = RetryPolicy::default();

        for _ in 0..50 {
            let first = policy.delay_for(0).as_millis() as f64;
            let second = policy.delay_for(1).as_millis() as f64;

            assert!((400.0..600.0).contains(&first), "first={first}");
            assert!((800.0..1200.0).contains(&second), "second={second}");
        }
    }
}

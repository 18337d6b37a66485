use std::time::Duration;

use crate::contract::ValidationError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(840);

/// Schedule for waiting on a remote query job.
///
/// A multiplier of `1.0` polls at a fixed cadence. With neither
/// `max_attempts` nor `max_wait` set the wait is unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub backoff_multiplier: f64,
    pub max_interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_POLL_INTERVAL,
            backoff_multiplier: 1.0,
            max_interval: DEFAULT_MAX_POLL_INTERVAL,
            max_attempts: None,
            max_wait: Some(DEFAULT_MAX_WAIT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollLimit {
    Attempts,
    Elapsed,
}

impl PollPolicy {
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            initial_interval: interval,
            backoff_multiplier: 1.0,
            max_interval: interval,
            max_attempts: None,
            max_wait: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.initial_interval.is_zero() {
            return Err(ValidationError::new("poll interval must be positive"));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(ValidationError::new(
                "poll backoff multiplier must be at least 1.0",
            ));
        }
        if self.max_interval < self.initial_interval {
            return Err(ValidationError::new(
                "max poll interval cannot be below the initial interval",
            ));
        }
        if let Some(0) = self.max_attempts {
            return Err(ValidationError::new(
                "max poll attempts must be a positive integer",
            ));
        }
        Ok(())
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.max_wait.is_none()
    }

    /// Delay before poll number `attempt` (zero based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let scaled = self.initial_interval.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        let capped = scaled.min(self.max_interval.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_interval)
    }

    /// Checked after each poll that returned a non-terminal state.
    pub fn limit_reached(&self, attempts: u32, elapsed: Duration) -> Option<PollLimit> {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return Some(PollLimit::Attempts);
        }
        if self.max_wait.is_some_and(|max| elapsed >= max) {
            return Some(PollLimit::Elapsed);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_keeps_fixed_two_second_cadence() {
        let policy = PollPolicy::default();
        assert!(policy.validate().is_ok());
        for attempt in [0, 1, 5, 100] {
            assert_eq!(policy.delay_for_attempt(attempt), Duration::from_secs(2));
        }
        assert!(!policy.is_unbounded());
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let policy = PollPolicy {
            initial_interval: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_interval: Duration::from_secs(10),
            max_attempts: None,
            max_wait: None,
        };

        let delays: Vec<u64> = (0..6)
            .map(|attempt| policy.delay_for_attempt(attempt).as_secs())
            .collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 10, 10]);
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn limits_trigger_on_attempts_or_elapsed() {
        let policy = PollPolicy {
            max_attempts: Some(3),
            max_wait: Some(Duration::from_secs(60)),
            ..PollPolicy::default()
        };

        assert_eq!(policy.limit_reached(2, Duration::from_secs(4)), None);
        assert_eq!(
            policy.limit_reached(3, Duration::from_secs(6)),
            Some(PollLimit::Attempts)
        );
        assert_eq!(
            policy.limit_reached(1, Duration::from_secs(60)),
            Some(PollLimit::Elapsed)
        );
    }

    #[test]
    fn unbounded_policy_never_reports_a_limit() {
        let policy = PollPolicy::unbounded(Duration::from_secs(2));
        assert!(policy.is_unbounded());
        assert_eq!(
            policy.limit_reached(u32::MAX, Duration::from_secs(u64::MAX / 2)),
            None
        );
    }

    #[test]
    fn rejects_invalid_policies() {
        let zero_interval = PollPolicy {
            initial_interval: Duration::ZERO,
            ..PollPolicy::default()
        };
        assert!(zero_interval.validate().is_err());

        let shrinking = PollPolicy {
            backoff_multiplier: 0.5,
            ..PollPolicy::default()
        };
        assert!(shrinking.validate().is_err());

        let zero_attempts = PollPolicy {
            max_attempts: Some(0),
            ..PollPolicy::default()
        };
        assert!(zero_attempts.validate().is_err());
    }
}

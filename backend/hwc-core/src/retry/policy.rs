use crate::error::RetryPolicyError;

use std::time::Duration;

use backoff::backoff::Backoff;
use rand::Rng;

/// How the base delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    Fixed,
    Linear,
    Exponential,
}

/// Attempt budget and delay schedule.
///
/// The computed delay is clamped to `max_delay` before jitter is added, so a
/// single wait never exceeds `max_delay * (1 + jitter)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total executions, including the first one.
    pub max_attempts: u32,
    pub strategy: BackoffStrategy,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Growth factor for [`BackoffStrategy::Exponential`].
    pub multiplier: f64,
    /// Fraction of the delay added at random, in `[0, 1]`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            strategy: BackoffStrategy::Exponential,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// More attempts, shorter waits.
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 5,
            strategy: BackoffStrategy::Exponential,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 1.5,
            jitter: 0.1,
        }
    }

    /// Run once, never wait.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            strategy: BackoffStrategy::Fixed,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
            jitter: 0.0,
        }
    }

    /// # Errors
    ///
    /// Returns [`RetryPolicyError::InvalidPolicy`] describing the first violated bound.
    pub fn validate(&self) -> Result<(), RetryPolicyError> {
        if self.max_attempts < 1 {
            return Err(RetryPolicyError::invalid(
                "max_attempts must be at least 1, no attempts permitted",
            ));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(RetryPolicyError::invalid(format!(
                "jitter must be within [0, 1], got {}",
                self.jitter
            )));
        }
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(RetryPolicyError::invalid(format!(
                "multiplier must be a positive finite number, got {}",
                self.multiplier
            )));
        }
        if self.base_delay > self.max_delay {
            return Err(RetryPolicyError::invalid(format!(
                "base_delay {:?} exceeds max_delay {:?}",
                self.base_delay, self.max_delay
            )));
        }
        Ok(())
    }

    /// Delay before the retry that follows failed attempt `attempt` (1-based),
    /// clamped to `max_delay`, without jitter.
    pub fn base_delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_secs_f64();
        let raw = match self.strategy {
            BackoffStrategy::Fixed => base,
            BackoffStrategy::Linear => base * f64::from(attempt),
            BackoffStrategy::Exponential => {
                let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
                base * self.multiplier.powi(exponent)
            }
        };

        // Clamp in f64 first; `Duration::from_secs_f64` panics on overflow or NaN.
        let max = self.max_delay.as_secs_f64();
        if raw.is_nan() || raw >= max {
            self.max_delay
        } else {
            Duration::from_secs_f64(raw.max(0.0))
        }
    }

    /// [`Self::base_delay_for`] plus up to `jitter * delay` of random extra wait.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self.base_delay_for(attempt);
        if self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }
        let extra = rand::thread_rng().r#gen::<f64>() * delay.as_secs_f64() * self.jitter;
        delay + Duration::from_secs_f64(extra)
    }

    /// Delay schedule for one `execute` call.
    pub fn backoff(&self) -> PolicyBackoff {
        PolicyBackoff {
            policy: self.clone(),
            attempt: 0,
        }
    }
}

/// Yields `max_attempts - 1` delays, then `None`.
#[derive(Debug, Clone)]
pub struct PolicyBackoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl PolicyBackoff {
    /// Failed attempts seen so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

impl Backoff for PolicyBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt = self.attempt.saturating_add(1);
        if self.attempt >= self.policy.max_attempts {
            return None;
        }
        Some(self.policy.delay_for(self.attempt))
    }

    fn reset(&mut self) {
        self.attempt = 0;
    }
}

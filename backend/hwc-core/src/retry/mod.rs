//! Retrying execution of fallible async operations.
//!
//! # Result shape
//! - Success on any attempt: `Ok(value)`
//! - Non-retryable error: [`RetryError::Failed`] with the error untouched
//! - Single-attempt policy failing: also [`RetryError::Failed`]
//! - Budget used up: [`RetryError::Exhausted`] wrapping the last error
//! - Token cancelled: [`RetryError::Cancelled`]

pub mod policy;

pub use policy::{BackoffStrategy, PolicyBackoff, RetryPolicy};

use crate::error::{CloudError, RetryError, RetryPolicyError};

use std::future::Future;

use backoff::backoff::Backoff;
use log::{debug, info, warn};
use tokio::time::sleep as TokioSleep;
use tokio_util::sync::CancellationToken;

/// Whether a failed attempt is worth repeating.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for CloudError {
    fn is_retryable(&self) -> bool {
        CloudError::is_retryable(self)
    }
}

#[derive(Debug, Clone)]
pub struct RetryEngine {
    policy: RetryPolicy,
}

impl Default for RetryEngine {
    fn default() -> Self {
        Self {
            policy: RetryPolicy::default(),
        }
    }
}

impl RetryEngine {
    /// # Errors
    ///
    /// Returns [`RetryPolicyError`] if the policy fails [`RetryPolicy::validate`].
    pub fn new(policy: RetryPolicy) -> Result<Self, RetryPolicyError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds, fails permanently, the attempt budget
    /// runs out, or `cancel` fires.
    ///
    /// Attempts are strictly sequential. Cancellation is checked before every
    /// attempt and interrupts any wait in progress; an attempt already running
    /// is left to finish.
    pub async fn execute<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut backoff = self.policy.backoff();
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                debug!("Retry cancelled before attempt {}", attempt + 1);
                return Err(RetryError::cancelled(attempt));
            }

            attempt += 1;
            debug!("Attempt {attempt}/{}", self.policy.max_attempts);

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("Operation succeeded on attempt {attempt}");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                debug!("Attempt {attempt} failed with non-retryable error: {error}");
                return Err(RetryError::Failed(error));
            }

            match backoff.next_backoff() {
                Some(delay) => {
                    warn!("Attempt {attempt} failed: {error}, retrying in {delay:?}");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            debug!("Retry cancelled while waiting after attempt {attempt}");
                            return Err(RetryError::cancelled(attempt));
                        }
                        _ = TokioSleep(delay) => {}
                    }
                }
                None if self.policy.max_attempts == 1 => {
                    return Err(RetryError::Failed(error));
                }
                None => {
                    warn!("Giving up after {attempt} attempts: {error}");
                    return Err(RetryError::exhausted(attempt, error));
                }
            }
        }
    }
}

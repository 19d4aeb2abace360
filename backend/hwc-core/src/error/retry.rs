use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Outcome of a failed [`crate::RetryEngine::execute`] call.
#[derive(Debug, ThisError)]
pub enum RetryError<E> {
    /// The operation's own error, unwrapped: either it was not retryable or the
    /// policy only allows a single attempt.
    #[error(transparent)]
    Failed(E),

    #[error("Retries Exhausted: gave up after {attempts} attempts, last error: {source} {location}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: E,
        location: ErrorLocation,
    },

    #[error("Retry Cancelled after {attempts} attempts {location}")]
    Cancelled {
        attempts: u32,
        location: ErrorLocation,
    },
}

impl<E> RetryError<E> {
    #[track_caller]
    pub fn exhausted(attempts: u32, source: E) -> Self {
        RetryError::Exhausted {
            attempts,
            source,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn cancelled(attempts: u32) -> Self {
        RetryError::Cancelled {
            attempts,
            location: ErrorLocation::caller(),
        }
    }

    /// The underlying operation error, if there is one.
    pub fn inner(&self) -> Option<&E> {
        match self {
            RetryError::Failed(error) => Some(error),
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Cancelled { .. } => None,
        }
    }

    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::Failed(error) => Some(error),
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Cancelled { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }
}

#[derive(Debug, ThisError)]
pub enum RetryPolicyError {
    #[error("Invalid Retry Policy: {reason} {location}")]
    InvalidPolicy {
        reason: String,
        location: ErrorLocation,
    },
}

impl RetryPolicyError {
    #[track_caller]
    pub fn invalid(reason: impl Into<String>) -> Self {
        RetryPolicyError::InvalidPolicy {
            reason: reason.into(),
            location: ErrorLocation::caller(),
        }
    }
}

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ProjectIdError {
    /// `init_with_config` was never called on this resolver.
    #[error("Project Id Resolver Not Initialized {location}")]
    NotInitialized { location: ErrorLocation },
}

impl ProjectIdError {
    #[track_caller]
    pub fn not_initialized() -> Self {
        ProjectIdError::NotInitialized {
            location: ErrorLocation::caller(),
        }
    }
}

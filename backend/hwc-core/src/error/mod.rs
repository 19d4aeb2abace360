pub mod cloud;
pub mod config;
pub mod project_id;
pub mod retry;

pub use cloud::{CloudError, ErrorKind};
pub use config::ConfigError;
pub use project_id::ProjectIdError;
pub use retry::{RetryError, RetryPolicyError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    ProjectId(#[from] ProjectIdError),

    #[error(transparent)]
    RetryPolicy(#[from] RetryPolicyError),

    #[error(transparent)]
    Retry(#[from] RetryError<CloudError>),
}

pub mod classify;
pub mod config;
pub mod error;
pub mod project_id;
pub mod retry;
pub mod signing;

#[cfg(test)]
mod tests;

pub use classify::ErrorClassifier;
pub use config::{Credentials, EffectiveConfig, OutputFormat, ProfileLayer};
pub use config::resolver::CredentialResolver;
pub use error::{CloudError, CoreError, ErrorKind};
pub use project_id::ProjectIdResolver;
pub use retry::{RetryEngine, RetryPolicy, Retryable};
pub use signing::Signer;

pub const DEFAULT_REGION: &str = "cn-north-1";
/// Enterprise project id meaning "default tenant scope" (not the same as unset).
pub const DEFAULT_ENTERPRISE_PROJECT_ID: &str = "0";

pub const CONFIG_DIR_NAME: &str = ".hwcctl";
pub const CONFIG_FILE_NAME: &str = "config";

pub const IAM_ENDPOINT: &str = "https://iam.myhuaweicloud.com";
pub const IAM_PROJECTS_PATH: &str = "/v3/projects";
pub const IAM_PROJECTS_URL: &str = const_format::concatcp!(IAM_ENDPOINT, IAM_PROJECTS_PATH);
pub const IAM_SERVICE_NAME: &str = "iam";

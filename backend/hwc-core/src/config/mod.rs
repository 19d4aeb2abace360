//! Credentials and operational settings.
//!
//! Every field is resolved independently through the layers
//! (override > environment > profile file > default), see [`resolver`].

pub mod env;
pub mod paths;
pub mod profile;
pub mod resolver;

pub use profile::{ProfileFile, ProfileLayer};

use crate::error::ConfigError;
use crate::retry::RetryPolicy;

use common::RedactedSecret;

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

/// Resolved cloud credentials. An empty string means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: RedactedSecret,
    pub region: String,
    pub domain_id: String,
    pub project_id: String,
    pub enterprise_project_id: String,
}

impl Credentials {
    /// Access key, secret key and domain id are all present, so the IAM
    /// project list can be queried.
    pub fn can_query_iam(&self) -> bool {
        !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
            && !self.domain_id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
    Text,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table
    }
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "yaml" => Some(OutputFormat::Yaml),
            "text" => Some(OutputFormat::Text),
            _ => None,
        }
    }

    /// Unknown names degrade to the default with a warning.
    pub(crate) fn from_name_or_default(name: Option<&str>) -> Self {
        match name {
            None => OutputFormat::default(),
            Some(name) => OutputFormat::from_name(name).unwrap_or_else(|| {
                warn!("Unknown output format '{name}', using {}", OutputFormat::default());
                OutputFormat::default()
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials merged with operational settings. Built once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub credentials: Credentials,
    pub max_retries: u32,
    pub enable_retry: bool,
    pub output_format: OutputFormat,
}

impl EffectiveConfig {
    /// Access key, secret key and region must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first missing field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials.access_key_id.is_empty() {
            return Err(ConfigError::validation("access key must not be empty"));
        }
        if self.credentials.secret_access_key.is_empty() {
            return Err(ConfigError::validation("secret key must not be empty"));
        }
        if self.credentials.region.is_empty() {
            return Err(ConfigError::validation("region must not be empty"));
        }
        Ok(())
    }

    /// Retry policy implied by `enable_retry` / `max_retries`.
    ///
    /// `max_retries` counts retries, so the attempt budget is one more.
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.enable_retry && self.max_retries > 0 {
            RetryPolicy {
                max_attempts: self.max_retries.saturating_add(1),
                ..RetryPolicy::default()
            }
        } else {
            RetryPolicy::single_attempt()
        }
    }
}

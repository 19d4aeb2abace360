//! Masked summary of the effective configuration.

use crate::error::HwcctlError;

use hwc_core::config::paths::ConfigPath;
use hwc_core::{EffectiveConfig, OutputFormat};

use common::{ErrorLocation, RedactedSecret};

use std::panic::Location;

use serde::Serialize;

const UNSET: &str = "(unset)";

/// What `hwcctl` prints. Keys are masked; nothing here is secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub config_path: String,
    pub config_source: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub domain_id: String,
    pub project_id: String,
    pub enterprise_project_id: String,
    pub output: String,
    pub retry: String,
}

impl Summary {
    pub fn new(config: &EffectiveConfig, config_path: &ConfigPath, project_id: String) -> Self {
        let credentials = &config.credentials;
        let retry = if config.enable_retry && config.max_retries > 0 {
            format!("enabled ({} retries)", config.max_retries)
        } else {
            "disabled".to_string()
        };

        Self {
            config_path: config_path.path.display().to_string(),
            config_source: config_path.source.to_string(),
            access_key_id: RedactedSecret::new(credentials.access_key_id.as_str()).masked(),
            secret_access_key: credentials.secret_access_key.masked(),
            region: credentials.region.clone(),
            domain_id: credentials.domain_id.clone(),
            project_id,
            enterprise_project_id: credentials.enterprise_project_id.clone(),
            output: config.output_format.to_string(),
            retry,
        }
    }

    fn fields(&self) -> [(&'static str, &str); 10] {
        [
            ("config_path", self.config_path.as_str()),
            ("config_source", self.config_source.as_str()),
            ("access_key_id", self.access_key_id.as_str()),
            ("secret_access_key", self.secret_access_key.as_str()),
            ("region", self.region.as_str()),
            ("domain_id", self.domain_id.as_str()),
            ("project_id", self.project_id.as_str()),
            ("enterprise_project_id", self.enterprise_project_id.as_str()),
            ("output", self.output.as_str()),
            ("retry", self.retry.as_str()),
        ]
    }

    /// # Errors
    ///
    /// Returns [`HwcctlError::Hwcctl`] if JSON encoding fails.
    pub fn render(&self, format: OutputFormat) -> Result<String, HwcctlError> {
        let fields = self.fields();

        let text = match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| HwcctlError::Hwcctl {
                    message: format!("Failed to encode summary: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                })?
            }
            OutputFormat::Yaml => fields
                .iter()
                // A JSON string literal is a valid YAML double-quoted scalar
                .map(|(key, value)| {
                    let quoted = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".into());
                    format!("{key}: {quoted}")
                })
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Text => fields
                .iter()
                .map(|(key, value)| format!("{key}={}", shown(value)))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Table => {
                let width = fields.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
                let mut lines = vec![format!("{:<width$}  VALUE", "KEY")];
                lines.extend(
                    fields
                        .iter()
                        .map(|(key, value)| format!("{key:<width$}  {}", shown(value))),
                );
                lines.join("\n")
            }
        };

        Ok(text)
    }
}

fn shown(value: &str) -> &str {
    if value.is_empty() { UNSET } else { value }
}

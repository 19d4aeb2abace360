//! Layered configuration resolution.
//!
//! Precedence per field (highest wins):
//! explicit overrides > environment > profile file > built-in defaults.
//!
//! A field missing from a higher layer falls through to the next one without
//! affecting any other field.

use super::paths::resolve_config_path;
use super::{Credentials, EffectiveConfig, OutputFormat, ProfileLayer};
use crate::error::ConfigError;
use crate::project_id::ProjectIdResolver;
use crate::{DEFAULT_ENTERPRISE_PROJECT_ID, DEFAULT_REGION};

use common::RedactedSecret;

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

/// Produces [`EffectiveConfig`] values and (re)initialises the project-id resolver
/// it was constructed with.
#[derive(Clone)]
pub struct CredentialResolver {
    project_ids: Arc<ProjectIdResolver>,
}

impl Default for CredentialResolver {
    /// Resolver bound to the process-wide [`ProjectIdResolver::global`].
    fn default() -> Self {
        Self::new(Arc::clone(ProjectIdResolver::global()))
    }
}

impl CredentialResolver {
    pub fn new(project_ids: Arc<ProjectIdResolver>) -> Self {
        Self { project_ids }
    }

    pub fn project_ids(&self) -> &Arc<ProjectIdResolver> {
        &self.project_ids
    }

    /// Merge the three layers into one configuration.
    ///
    /// Never fails. As a side effect the bound [`ProjectIdResolver`] is
    /// re-initialised with the result, dropping any cached project id.
    pub fn resolve(
        &self,
        file: &ProfileLayer,
        env: &ProfileLayer,
        overrides: &ProfileLayer,
    ) -> EffectiveConfig {
        let config = merge_layers(&[overrides, env, file]);

        debug!(
            "Resolved configuration: region={}, domain_id set={}, project_id set={}, retry={}/{}",
            config.credentials.region,
            !config.credentials.domain_id.is_empty(),
            !config.credentials.project_id.is_empty(),
            config.enable_retry,
            config.max_retries
        );

        self.project_ids.init_with_config(&config);
        config
    }

    /// Resolve from the profile file and process environment, then validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when access key, secret key or
    /// region is missing after all layers are applied. File problems are not errors.
    pub fn load(
        &self,
        config_path: Option<&Path>,
        overrides: &ProfileLayer,
    ) -> Result<EffectiveConfig, ConfigError> {
        let config_path = resolve_config_path(config_path);
        info!(
            "Reading profile from {} ({})",
            config_path.path.display(),
            config_path.source
        );

        let file = ProfileLayer::from_file(&config_path.path);
        let env = ProfileLayer::from_env();

        let config = self.resolve(&file, &env, overrides);
        config.validate()?;
        Ok(config)
    }
}

/// Merge layers ordered from highest to lowest precedence, then apply defaults.
pub fn merge_layers(layers: &[&ProfileLayer]) -> EffectiveConfig {
    let text = |field: fn(&ProfileLayer) -> &Option<String>| -> Option<String> {
        layers
            .iter()
            .filter_map(|layer| field(layer).as_deref())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    };

    let secret: RedactedSecret = layers
        .iter()
        .filter_map(|layer| layer.secret_access_key.as_ref())
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_default();

    let credentials = Credentials {
        access_key_id: text(|l| &l.access_key_id).unwrap_or_default(),
        secret_access_key: secret,
        region: text(|l| &l.region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
        domain_id: text(|l| &l.domain_id).unwrap_or_default(),
        project_id: text(|l| &l.project_id).unwrap_or_default(),
        enterprise_project_id: text(|l| &l.enterprise_project_id)
            .unwrap_or_else(|| DEFAULT_ENTERPRISE_PROJECT_ID.to_string()),
    };

    let output = text(|l| &l.output);

    EffectiveConfig {
        credentials,
        max_retries: layers
            .iter()
            .find_map(|layer| layer.max_retries)
            .unwrap_or(0),
        enable_retry: layers
            .iter()
            .find_map(|layer| layer.enable_retry)
            .unwrap_or(false),
        output_format: OutputFormat::from_name_or_default(output.as_deref()),
    }
}

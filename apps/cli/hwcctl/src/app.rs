//! One `hwcctl` invocation: resolve configuration, then the project id.

use crate::args::CliArgs;
use crate::error::HwcctlError;
use crate::summary::Summary;

use hwc_core::config::paths::resolve_config_path;
use hwc_core::{CredentialResolver, OutputFormat};

use log::info;

#[derive(Debug)]
pub struct Outcome {
    pub summary: Summary,
    pub output_format: OutputFormat,
}

/// # Errors
///
/// Returns [`HwcctlError::Config`] when required credentials are missing and
/// [`HwcctlError::ProjectId`] if the resolver was not initialised.
pub async fn run(args: &CliArgs, resolver: &CredentialResolver) -> Result<Outcome, HwcctlError> {
    let config_path = resolve_config_path(args.config_path.as_deref());
    let config = resolver.load(Some(&config_path.path), &args.overrides())?;

    let project_ids = resolver.project_ids();
    let project_id = if args.refresh {
        project_ids.refresh_project_id().await?
    } else {
        project_ids.project_id().await?
    };
    info!(
        "Using project {project_id} in region {}",
        config.credentials.region
    );

    Ok(Outcome {
        summary: Summary::new(&config, &config_path, project_id),
        output_format: config.output_format,
    })
}

//! Command line flags.
//!
//! Credential flags become the highest-precedence configuration layer.

use crate::error::HwcctlError;

use hwc_core::ProfileLayer;

use common::RedactedSecret;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "hwcctl")]
#[command(about = "Resolve Huawei Cloud credentials and the project id for a region", long_about = None)]
pub struct CliArgs {
    /// Profile file (defaults to HWCCTL_CONFIG, then ~/.hwcctl/config)
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// Access key id
    #[arg(long, value_name = "AK", allow_hyphen_values = true)]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long, value_name = "SK", allow_hyphen_values = true)]
    pub secret_key: Option<RedactedSecret>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long, value_name = "ID")]
    pub domain_id: Option<String>,

    #[arg(long, value_name = "ID")]
    pub project_id: Option<String>,

    /// Output format: table, json, yaml or text
    #[arg(long, value_name = "FORMAT")]
    pub output: Option<String>,

    /// Bypass any cached project id and resolve again.
    #[arg(long)]
    pub refresh: bool,
}

impl CliArgs {
    /// The flags as a configuration layer.
    pub fn overrides(&self) -> ProfileLayer {
        ProfileLayer {
            access_key_id: self.access_key.clone(),
            secret_access_key: self.secret_key.clone(),
            region: self.region.clone(),
            domain_id: self.domain_id.clone(),
            project_id: self.project_id.clone(),
            output: self.output.clone(),
            ..ProfileLayer::default()
        }
    }

    pub fn wants_json(&self) -> bool {
        self.output
            .as_deref()
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }
}

/// Rejected command lines become [`HwcctlError::Usage`] so `--output json` can report them.
impl From<clap::Error> for HwcctlError {
    #[track_caller]
    fn from(error: clap::Error) -> Self {
        HwcctlError::usage(error.to_string().trim_end())
    }
}

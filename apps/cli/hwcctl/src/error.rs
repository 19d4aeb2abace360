use hwc_core::error::{ConfigError, ProjectIdError};

use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors reported by the command line front end.
///
/// Serializable so that `--output json` can print them as structured data.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum HwcctlError {
    /// Error from this app (logger, output)
    #[error("Hwcctl Error: {message} {location}")]
    Hwcctl {
        message: String,
        location: ErrorLocation,
    },

    /// Bad command line
    #[error("Usage Error: {message} {location}")]
    Usage {
        message: String,
        location: ErrorLocation,
    },

    /// Configuration could not be resolved or is incomplete
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    #[error("Project Id Error: {message} {location}")]
    ProjectId {
        message: String,
        location: ErrorLocation,
    },
}

impl HwcctlError {
    #[track_caller]
    pub fn usage(message: impl Into<String>) -> Self {
        HwcctlError::Usage {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Process exit code: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            HwcctlError::Usage { .. } => 2,
            _ => 1,
        }
    }
}

impl From<ConfigError> for HwcctlError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        HwcctlError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ProjectIdError> for HwcctlError {
    #[track_caller]
    fn from(error: ProjectIdError) -> Self {
        HwcctlError::ProjectId {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

//! Location of the persisted profile file.
//!
//! Lookup order:
//! 1. Explicit path passed by the caller (e.g. a `--config` flag)
//! 2. HWCCTL_CONFIG environment variable
//! 3. `~/.hwcctl/config` via the `dirs` crate
//! 4. `./.hwcctl/config` when no home directory can be determined

use crate::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

use std::env;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

pub const CONFIG_PATH_ENV: &str = "HWCCTL_CONFIG";

/// Resolved profile file location.
#[derive(Debug, Clone)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub source: PathSource,
}

/// How the path was determined (for logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Explicit,
    /// Set via HWCCTL_CONFIG.
    EnvVar,
    HomeDir,
    /// No home directory; relative to the working directory.
    WorkingDirFallback,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSource::Explicit => write!(f, "explicit path"),
            PathSource::EnvVar => write!(f, "{CONFIG_PATH_ENV}"),
            PathSource::HomeDir => write!(f, "home directory"),
            PathSource::WorkingDirFallback => write!(f, "working directory fallback"),
        }
    }
}

/// Determine where the profile file lives. Never fails; the file itself may not exist.
pub fn resolve_config_path(explicit: Option<&Path>) -> ConfigPath {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        debug!("Using explicit config path: {:?}", path);
        return ConfigPath {
            path: path.to_path_buf(),
            source: PathSource::Explicit,
        };
    }

    if let Ok(custom) = env::var(CONFIG_PATH_ENV) {
        if !custom.is_empty() {
            info!("Using {CONFIG_PATH_ENV} override: {custom}");
            return ConfigPath {
                path: PathBuf::from(custom),
                source: PathSource::EnvVar,
            };
        }
    }

    if let Some(home) = dirs::home_dir() {
        return ConfigPath {
            path: home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
            source: PathSource::HomeDir,
        };
    }

    let path = PathBuf::from(".").join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    warn!("Cannot determine home directory, using {:?}", path);
    ConfigPath {
        path,
        source: PathSource::WorkingDirFallback,
    }
}

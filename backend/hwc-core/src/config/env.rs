//! Environment variable layer.
//!
//! Only the credential fields can be set from the environment; output and
//! retry settings come from the profile file or explicit overrides.

use super::ProfileLayer;

use common::RedactedSecret;

use std::env;
use std::path::PathBuf;

use log::{debug, info, warn};

pub const ENV_ACCESS_KEY: &str = "HUAWEICLOUD_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "HUAWEICLOUD_SECRET_KEY";
pub const ENV_REGION: &str = "HUAWEICLOUD_REGION";
pub const ENV_DOMAIN_ID: &str = "HUAWEICLOUD_DOMAIN_ID";
pub const ENV_PROJECT_ID: &str = "HUAWEICLOUD_PROJECT_ID";
pub const ENV_ENTERPRISE_PROJECT_ID: &str = "HUAWEICLOUD_ENTERPRISE_PROJECT_ID";

impl ProfileLayer {
    /// Layer built from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| match env::var(name) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                warn!("Env var {name} contains invalid unicode, ignoring");
                None
            }
        })
    }

    /// Layer built from an arbitrary variable lookup. Empty values are dropped.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            let value = lookup(name).filter(|v| !v.is_empty());
            if value.is_some() {
                debug!("Found {name} in environment");
            }
            value
        };

        Self {
            access_key_id: read(ENV_ACCESS_KEY),
            secret_access_key: read(ENV_SECRET_KEY).map(RedactedSecret::new),
            region: read(ENV_REGION),
            domain_id: read(ENV_DOMAIN_ID),
            project_id: read(ENV_PROJECT_ID),
            enterprise_project_id: read(ENV_ENTERPRISE_PROJECT_ID),
            ..Self::default()
        }
    }
}

/// Result of attempting to load a .env file.
#[derive(Debug)]
pub struct EnvLoadResult {
    /// Path to loaded .env file, if found.
    pub path: Option<PathBuf>,
    pub loaded: bool,
}

/// Load `.env` from the working directory, then from next to the executable.
///
/// Missing files are not an error; variables already set are not overwritten.
pub fn load_dotenv() -> EnvLoadResult {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return EnvLoadResult {
            path: Some(path),
            loaded: true,
        };
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let env_path = exe_dir.join(".env");
            if env_path.exists() {
                match dotenvy::from_path(&env_path) {
                    Ok(_) => {
                        info!("Loaded .env from: {:?}", env_path);
                        return EnvLoadResult {
                            path: Some(env_path),
                            loaded: true,
                        };
                    }
                    Err(e) => {
                        warn!("Failed to parse .env at {:?}: {}", env_path, e);
                    }
                }
            }
        }
    }

    debug!("No .env file found");
    EnvLoadResult {
        path: None,
        loaded: false,
    }
}

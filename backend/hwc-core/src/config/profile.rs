use crate::error::config::ConfigError;

use common::{ErrorLocation, RedactedSecret};

use std::panic::Location;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

// ============================================
// PARTIAL LAYER
// ============================================

/// One source's contribution to the effective configuration.
///
/// Used for the profile file, the environment and explicit overrides alike.
/// `None` and `Some("")` both mean "this source says nothing about the field".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "secret_field")]
    pub secret_access_key: Option<RedactedSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_retry: Option<bool>,
}

impl ProfileLayer {
    /// Read the `[default]` profile from `path`.
    ///
    /// A missing, unreadable or malformed file contributes an empty layer.
    pub fn from_file(path: &Path) -> Self {
        match ProfileFile::load(path) {
            Ok(Some(file)) => file.default,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Ignoring profile file, using an empty layer: {e}");
                Self::default()
            }
        }
    }

    pub fn with_access_key_id(mut self, value: impl Into<String>) -> Self {
        self.access_key_id = Some(value.into());
        self
    }

    pub fn with_secret_access_key(mut self, value: impl Into<String>) -> Self {
        self.secret_access_key = Some(RedactedSecret::new(value));
        self
    }

    pub fn with_region(mut self, value: impl Into<String>) -> Self {
        self.region = Some(value.into());
        self
    }

    pub fn with_domain_id(mut self, value: impl Into<String>) -> Self {
        self.domain_id = Some(value.into());
        self
    }

    pub fn with_project_id(mut self, value: impl Into<String>) -> Self {
        self.project_id = Some(value.into());
        self
    }

    pub fn with_enterprise_project_id(mut self, value: impl Into<String>) -> Self {
        self.enterprise_project_id = Some(value.into());
        self
    }

    pub fn with_output(mut self, value: impl Into<String>) -> Self {
        self.output = Some(value.into());
        self
    }

    pub fn with_retry(mut self, enable_retry: bool, max_retries: u32) -> Self {
        self.enable_retry = Some(enable_retry);
        self.max_retries = Some(max_retries);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================
// PROFILE FILE
// ============================================

/// On-disk layout: a TOML document with a single `[default]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub default: ProfileLayer,
}

impl ProfileFile {
    /// Load the profile file.
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the file does not exist.
    /// Returns `Err(ConfigError)` if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            debug!("Profile file not found at {}", path.display());
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ProfileFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!("Profile loaded from {}", path.display());
        Ok(Some(file))
    }

    /// Save the profile using temp file + rename, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - Directory creation fails
    /// - Serialization fails
    /// - Write or rename fails
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| ConfigError::WriteError {
                location: ErrorLocation::from(Location::caller()),
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        let mut temp_name = path.as_os_str().to_os_string();
        temp_name.push(".tmp");
        let temp_path = std::path::PathBuf::from(temp_name);

        write_private(&temp_path, contents.as_bytes()).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        info!("Profile saved to {}", path.display());
        Ok(())
    }
}

/// Write `contents` to a file only the owner can read, before any byte lands on disk.
///
/// A leftover file from an interrupted save is narrowed to 0600 before being truncated.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.set_len(0)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

/// Serde bridge for the secret: `RedactedSecret` refuses to serialize on its own.
mod secret_field {
    use common::RedactedSecret;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<RedactedSecret>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(secret) => serializer.serialize_str(secret.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RedactedSecret>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.map(RedactedSecret::new))
    }
}

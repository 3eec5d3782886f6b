use crate::config::{ProfileConfig, FALLBACK_PROFILE_NAME};
use crate::domain::ports::ProfileStore;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "rig-relay";
const CONFIG_FILE_NAME: &str = "config.json";

/// The on-disk profile collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub default_profile: String,
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            default_profile: FALLBACK_PROFILE_NAME.to_string(),
            profiles: BTreeMap::new(),
        }
    }
}

impl ProfileStore for ConfigFile {
    fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(name)
    }

    fn default_profile_name(&self) -> Option<&str> {
        Some(self.default_profile.as_str()).filter(|name| !name.is_empty())
    }
}

impl ConfigFile {
    pub fn save_profile(&mut self, name: &str, config: ProfileConfig) -> Result<()> {
        validation::validate_non_empty_string("profile name", name)?;
        self.profiles.insert(name.to_string(), config);
        Ok(())
    }

    pub fn set_default_profile(&mut self, name: &str) -> Result<()> {
        if !self.profiles.contains_key(name) {
            return Err(RelayError::UnknownProfileError {
                name: name.to_string(),
            });
        }
        self.default_profile = name.to_string();
        Ok(())
    }
}

/// `<platform config dir>/rig-relay/config.json`.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
        .ok_or_else(|| RelayError::ConfigError {
            message: "Could not determine the configuration directory for this platform"
                .to_string(),
        })
}

/// Reads and writes a [`ConfigFile`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file. A missing file is an empty collection, not an error.
    pub fn load(&self) -> Result<ConfigFile> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ConfigFile::default()),
            Err(e) => return Err(RelayError::IoError(e)),
        };
        let file = serde_json::from_slice(&data).map_err(|e| RelayError::ConfigError {
            message: format!(
                "failed to parse configuration file {}: {}",
                self.path.display(),
                e
            ),
        })?;
        Ok(file)
    }

    pub fn save(&self, file: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(file)?;
        fs::write(&self.path, data)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

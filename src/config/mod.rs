#[cfg(feature = "cli")]
pub mod cli;
pub mod profile_store;
pub mod resolver;

use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";
pub const FALLBACK_PROFILE_NAME: &str = "default";

/// Which radio control daemon to read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// flrig, XML-RPC over HTTP.
    Flrig,
    /// rigctld, line-oriented TCP.
    Hamlib,
}

impl FromStr for DataSource {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flrig" => Ok(Self::Flrig),
            "hamlib" => Ok(Self::Hamlib),
            _ => Err(RelayError::InvalidConfigValueError {
                field: "data_source".to_string(),
                value: s.to_string(),
                reason: "Must be 'flrig' or 'hamlib'".to_string(),
            }),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flrig => f.write_str("flrig"),
            Self::Hamlib => f.write_str("hamlib"),
        }
    }
}

/// One persisted profile. Keys missing from a stored record take the
/// built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub wavelog_url: String,
    pub wavelog_key: String,
    pub radio_name: String,
    pub flrig_host: String,
    pub flrig_port: u16,
    pub hamlib_host: String,
    pub hamlib_port: u16,
    pub interval: String,
    pub data_source: String,
    pub log_level: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            wavelog_url: "http://localhost/index.php".to_string(),
            wavelog_key: PLACEHOLDER_API_KEY.to_string(),
            radio_name: "RIG".to_string(),
            flrig_host: "127.0.0.1".to_string(),
            flrig_port: 12345,
            hamlib_host: "127.0.0.1".to_string(),
            hamlib_port: 4532,
            interval: "1s".to_string(),
            data_source: "flrig".to_string(),
            log_level: "error".to_string(),
        }
    }
}

impl Validate for ProfileConfig {
    fn validate(&self) -> Result<()> {
        if self.wavelog_key.trim().is_empty() || self.wavelog_key == PLACEHOLDER_API_KEY {
            return Err(RelayError::MissingConfigError {
                field: "wavelog_key".to_string(),
            });
        }
        if self.wavelog_url.trim().is_empty() {
            return Err(RelayError::MissingConfigError {
                field: "wavelog_url".to_string(),
            });
        }
        validation::validate_url("wavelog_url", &self.wavelog_url)?;
        self.data_source.parse::<DataSource>()?;
        validation::parse_interval("interval", &self.interval)?;
        Ok(())
    }
}

/// Settings supplied explicitly for this run. `None` means "not supplied",
/// even when a supplied value would equal the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub profile: Option<String>,
    pub wavelog_url: Option<String>,
    pub wavelog_key: Option<String>,
    pub radio_name: Option<String>,
    pub flrig_host: Option<String>,
    pub flrig_port: Option<u16>,
    pub hamlib_host: Option<String>,
    pub hamlib_port: Option<u16>,
    pub interval: Option<String>,
    pub data_source: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    pub fn apply_to(&self, config: &mut ProfileConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut config.wavelog_url, &self.wavelog_url);
        set(&mut config.wavelog_key, &self.wavelog_key);
        set(&mut config.radio_name, &self.radio_name);
        set(&mut config.flrig_host, &self.flrig_host);
        set(&mut config.flrig_port, &self.flrig_port);
        set(&mut config.hamlib_host, &self.hamlib_host);
        set(&mut config.hamlib_port, &self.hamlib_port);
        set(&mut config.interval, &self.interval);
        set(&mut config.data_source, &self.data_source);
        set(&mut config.log_level, &self.log_level);
    }
}

/// Settings for one run, resolved once before polling starts.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub profile_name: String,
    pub wavelog_url: String,
    pub wavelog_key: String,
    pub radio_name: String,
    pub data_source: DataSource,
    pub flrig_host: String,
    pub flrig_port: u16,
    pub hamlib_host: String,
    pub hamlib_port: u16,
    pub interval: Duration,
    pub log_level: Level,
}

impl EffectiveConfig {
    pub fn from_profile(profile_name: &str, config: &ProfileConfig) -> Result<Self> {
        config.validate()?;

        let (log_level, _) = crate::utils::logger::parse_log_level(&config.log_level);

        Ok(Self {
            profile_name: profile_name.to_string(),
            wavelog_url: config.wavelog_url.clone(),
            wavelog_key: config.wavelog_key.clone(),
            radio_name: config.radio_name.clone(),
            data_source: config.data_source.parse()?,
            flrig_host: config.flrig_host.clone(),
            flrig_port: config.flrig_port,
            hamlib_host: config.hamlib_host.clone(),
            hamlib_port: config.hamlib_port,
            interval: validation::parse_interval("interval", &config.interval)?,
            log_level,
        })
    }

    /// Host and port of the selected daemon.
    pub fn source_address(&self) -> (&str, u16) {
        match self.data_source {
            DataSource::Flrig => (&self.flrig_host, self.flrig_port),
            DataSource::Hamlib => (&self.hamlib_host, self.hamlib_port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_parsing() {
        assert_eq!("flrig".parse::<DataSource>().unwrap(), DataSource::Flrig);
        assert_eq!("HAMLIB".parse::<DataSource>().unwrap(), DataSource::Hamlib);
        assert!("omnirig".parse::<DataSource>().is_err());
    }

    #[test]
    fn test_stored_record_fills_missing_keys_from_defaults() {
        let record: ProfileConfig =
            serde_json::from_str(r#"{"wavelog_key": "abc123", "flrig_port": 12346}"#).unwrap();

        assert_eq!(record.wavelog_key, "abc123");
        assert_eq!(record.flrig_port, 12346);
        assert_eq!(record.radio_name, "RIG");
        assert_eq!(record.hamlib_port, 4532);
    }

    #[test]
    fn test_overrides_only_touch_supplied_fields() {
        let mut config = ProfileConfig {
            wavelog_key: "from-profile".to_string(),
            ..ProfileConfig::default()
        };
        let overrides = ConfigOverrides {
            radio_name: Some("IC-7300".to_string()),
            hamlib_port: Some(4533),
            ..ConfigOverrides::default()
        };

        overrides.apply_to(&mut config);

        assert_eq!(config.radio_name, "IC-7300");
        assert_eq!(config.hamlib_port, 4533);
        assert_eq!(config.wavelog_key, "from-profile");
        assert_eq!(config.flrig_port, 12345);
    }

    #[test]
    fn test_placeholder_key_fails_validation() {
        let err = ProfileConfig::default().validate().unwrap_err();
        assert!(matches!(err, RelayError::MissingConfigError { ref field } if field == "wavelog_key"));
    }

    #[test]
    fn test_effective_config_source_address() {
        let config = ProfileConfig {
            wavelog_key: "abc".to_string(),
            data_source: "hamlib".to_string(),
            ..ProfileConfig::default()
        };
        let effective = EffectiveConfig::from_profile("shack", &config).unwrap();

        assert_eq!(effective.source_address(), ("127.0.0.1", 4532));
        assert_eq!(effective.interval, Duration::from_secs(1));
        assert_eq!(effective.log_level, Level::ERROR);
    }
}

use crate::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Command line of the `rig-relay` binary. Every setting flag is optional so
/// that "not passed" can be told apart from "passed the default value".
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "rig-relay")]
#[command(version)]
#[command(about = "Forwards flrig / rigctld radio status to Wavelog")]
pub struct CliArgs {
    /// Select a named configuration profile to run (overrides the stored default)
    #[arg(long)]
    pub profile: Option<String>,

    /// Save the current settings to the named profile and exit
    #[arg(long, value_name = "NAME")]
    pub save_profile: Option<String>,

    /// Make the named profile the default and exit
    #[arg(long, value_name = "NAME")]
    pub set_default_profile: Option<String>,

    /// Path of the profile store (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wavelog base URL, e.g. https://log.example.com/index.php
    #[arg(long)]
    pub wavelog_url: Option<String>,

    /// Wavelog API key
    #[arg(long)]
    pub wavelog_key: Option<String>,

    /// Name of the radio as shown in Wavelog (e.g. FT-891)
    #[arg(long)]
    pub radio_name: Option<String>,

    /// flrig XML-RPC host address
    #[arg(long)]
    pub flrig_host: Option<String>,

    /// flrig XML-RPC port
    #[arg(long)]
    pub flrig_port: Option<u16>,

    /// rigctld host address
    #[arg(long)]
    pub hamlib_host: Option<String>,

    /// rigctld port
    #[arg(long)]
    pub hamlib_port: Option<u16>,

    /// Polling interval (e.g. 1s, 1500ms)
    #[arg(long)]
    pub interval: Option<String>,

    /// Data source: 'flrig' or 'hamlib'
    #[arg(long)]
    pub data_source: Option<String>,

    /// Logging level: 'debug', 'info', 'warn' or 'error'
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            profile: self.profile.clone(),
            wavelog_url: self.wavelog_url.clone(),
            wavelog_key: self.wavelog_key.clone(),
            radio_name: self.radio_name.clone(),
            flrig_host: self.flrig_host.clone(),
            flrig_port: self.flrig_port,
            hamlib_host: self.hamlib_host.clone(),
            hamlib_port: self.hamlib_port,
            interval: self.interval.clone(),
            data_source: self.data_source.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_flags_stay_unset() {
        let args = CliArgs::parse_from(["rig-relay", "--radio-name", "RIG"]);
        let overrides = args.overrides();

        assert_eq!(overrides.radio_name.as_deref(), Some("RIG"));
        assert_eq!(overrides.wavelog_key, None);
        assert_eq!(overrides.flrig_port, None);
    }

    #[test]
    fn test_profile_commands() {
        let args = CliArgs::parse_from([
            "rig-relay",
            "--save-profile",
            "portable",
            "--data-source",
            "hamlib",
            "--hamlib-port",
            "4533",
        ]);

        assert_eq!(args.save_profile.as_deref(), Some("portable"));
        assert_eq!(args.overrides().hamlib_port, Some(4533));
        assert_eq!(args.overrides().data_source.as_deref(), Some("hamlib"));
    }

    #[test]
    fn test_rejects_out_of_range_port() {
        assert!(CliArgs::try_parse_from(["rig-relay", "--flrig-port", "70000"]).is_err());
    }
}

// Adapters layer: concrete implementations for the external systems
// (radio control daemons, the Wavelog HTTP API).

pub mod flrig;
pub mod hamlib;
pub mod wavelog;
pub mod xmlrpc;

use crate::config::{DataSource, EffectiveConfig};
use crate::domain::ports::RadioSource;
use crate::utils::error::{RelayError, Result};

pub use flrig::FlrigSource;
pub use hamlib::HamlibSource;
pub use wavelog::WavelogForwarder;

/// Builds the radio source selected by the configuration.
pub fn build_source(config: &EffectiveConfig) -> Box<dyn RadioSource> {
    let (host, port) = config.source_address();
    match config.data_source {
        DataSource::Flrig => Box::new(FlrigSource::new(host, port)),
        DataSource::Hamlib => Box::new(HamlibSource::new(host, port)),
    }
}

/// Parses a daemon-reported frequency in Hz. Anything that is not a finite,
/// non-negative number is a protocol violation.
pub(crate) fn parse_frequency(what: &str, text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(hz) if hz.is_finite() && hz >= 0.0 => Ok(hz),
        _ => Err(RelayError::protocol(format!(
            "failed to parse {} '{}'",
            what, text
        ))),
    }
}

/// Keeps a power reading only if it is a finite number. NaN would make two
/// otherwise identical snapshots compare unequal.
pub(crate) fn finite_power(reading: Option<f64>) -> Option<f64> {
    reading.filter(|power| power.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frequency() {
        assert_eq!(parse_frequency("f", "14074000").unwrap(), 14_074_000.0);
        assert_eq!(parse_frequency("f", " 7074000.5\n").unwrap(), 7_074_000.5);
        assert!(parse_frequency("f", "abc").is_err());
        assert!(parse_frequency("f", "NaN").is_err());
        assert!(parse_frequency("f", "-1").is_err());
        assert!(parse_frequency("f", "").is_err());
    }

    #[test]
    fn test_finite_power() {
        assert_eq!(finite_power(Some(47.5)), Some(47.5));
        assert_eq!(finite_power(Some(0.0)), Some(0.0));
        assert_eq!(finite_power(Some(f64::NAN)), None);
        assert_eq!(finite_power(Some(f64::INFINITY)), None);
        assert_eq!(finite_power(None), None);
    }
}

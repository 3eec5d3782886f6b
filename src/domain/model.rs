use serde::{Deserialize, Serialize};

/// One fully-populated observation of the radio.
///
/// Snapshots are compared by plain structural equality, floating point
/// frequencies included.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RigSnapshot {
    /// VFO-A frequency in Hz.
    pub freq_a: f64,
    /// VFO-B frequency in Hz.
    pub freq_b: f64,
    pub mode_a: String,
    pub mode_b: String,
    /// Transmit on VFO-B, receive on VFO-A.
    pub split: bool,
    /// Raw power reading: watts from flrig, percent from rigctld.
    pub power: f64,
}

impl RigSnapshot {
    /// A snapshot where VFO-B mirrors VFO-A and split is off.
    pub fn single_vfo(freq: f64, mode: impl Into<String>, power: f64) -> Self {
        let mode = mode.into();
        Self {
            freq_a: freq,
            freq_b: freq,
            mode_a: mode.clone(),
            mode_b: mode,
            split: false,
            power,
        }
    }
}

/// Request body of `POST {base_url}/api/radio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioPayload {
    pub key: String,
    pub radio: String,
    pub power: f64,
    pub frequency: u64,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub frequency_rx: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode_rx: Option<String>,
}

impl RadioPayload {
    /// Maps a snapshot onto the Wavelog contract. With split engaged VFO-B is
    /// the transmit side and VFO-A is reported as the receive side.
    pub fn from_snapshot(api_key: &str, radio_name: &str, snapshot: &RigSnapshot) -> Self {
        let mut payload = Self {
            key: api_key.to_string(),
            radio: radio_name.to_string(),
            power: snapshot.power,
            frequency: whole_hz(snapshot.freq_a),
            mode: snapshot.mode_a.clone(),
            frequency_rx: None,
            mode_rx: None,
        };

        if snapshot.split {
            payload.frequency = whole_hz(snapshot.freq_b);
            payload.mode = snapshot.mode_b.clone();
            payload.frequency_rx = Some(whole_hz(snapshot.freq_a));
            payload.mode_rx = Some(snapshot.mode_a.clone());
        }

        payload
    }
}

// Fractional Hz is dropped here and nowhere earlier.
fn whole_hz(freq: f64) -> u64 {
    freq.trunc() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_off_mapping() {
        let snapshot = RigSnapshot::single_vfo(14_074_000.0, "DATA", 50.0);
        let payload = RadioPayload::from_snapshot("abc", "FT-891", &snapshot);

        assert_eq!(payload.frequency, 14_074_000);
        assert_eq!(payload.mode, "DATA");
        assert_eq!(payload.frequency_rx, None);
        assert_eq!(payload.mode_rx, None);

        let body = serde_json::to_value(&payload).unwrap();
        assert!(body.get("frequency_rx").is_none());
        assert!(body.get("mode_rx").is_none());
    }

    #[test]
    fn test_split_on_mapping() {
        let snapshot = RigSnapshot {
            freq_a: 14_076_000.0,
            freq_b: 14_074_000.0,
            mode_a: "DATA".to_string(),
            mode_b: "DATA".to_string(),
            split: true,
            power: 10.0,
        };
        let payload = RadioPayload::from_snapshot("abc", "FT-891", &snapshot);

        assert_eq!(payload.frequency, 14_074_000);
        assert_eq!(payload.mode, "DATA");
        assert_eq!(payload.frequency_rx, Some(14_076_000));
        assert_eq!(payload.mode_rx.as_deref(), Some("DATA"));
    }

    #[test]
    fn test_fractional_hz_truncated() {
        let snapshot = RigSnapshot::single_vfo(7_074_000.9, "USB", 0.0);
        let payload = RadioPayload::from_snapshot("abc", "RIG", &snapshot);
        assert_eq!(payload.frequency, 7_074_000);
    }

    #[test]
    fn test_power_passed_through() {
        let snapshot = RigSnapshot::single_vfo(7_074_000.0, "USB", 37.5);
        let payload = RadioPayload::from_snapshot("abc", "RIG", &snapshot);
        assert_eq!(payload.power, 37.5);
        assert_eq!(payload.key, "abc");
        assert_eq!(payload.radio, "RIG");
    }
}

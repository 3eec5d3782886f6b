use crate::adapters::xmlrpc::XmlRpcClient;
use crate::adapters::{finite_power, parse_frequency};
use crate::domain::model::RigSnapshot;
use crate::domain::ports::RadioSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads rig state from flrig over XML-RPC.
#[derive(Debug, Clone)]
pub struct FlrigSource {
    host: String,
    port: u16,
}

impl FlrigSource {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

#[async_trait]
impl RadioSource for FlrigSource {
    async fn get_data(&self) -> Result<RigSnapshot> {
        let client = XmlRpcClient::new(&self.host, self.port, CONNECT_TIMEOUT, CALL_TIMEOUT)?;

        let vfo_a = client.call("rig.get_vfo").await?.as_text();
        let freq_a = parse_frequency("rig.get_vfo", &vfo_a)?;

        let mode_a = client.call("rig.get_mode").await?.as_text();

        let power = match client.call("rig.get_power").await {
            Ok(value) => finite_power(value.as_f64()).unwrap_or_else(|| {
                debug!("rig.get_power returned non-numeric '{}'. Sending 0 power.", value.as_text());
                0.0
            }),
            Err(e) => {
                debug!("call failed to rig.get_power (flrig): {}. Sending 0 power.", e);
                0.0
            }
        };

        let split = match client.call("rig.get_split").await {
            Ok(value) => value.as_i64().unwrap_or(0) != 0,
            Err(e) => {
                warn!("call failed to rig.get_split (flrig): {}. Sending split=0.", e);
                false
            }
        };

        let freq_b = match client.call("rig.get_vfoB").await {
            Ok(value) => {
                let vfo_b = value.as_text();
                parse_frequency("rig.get_vfoB", &vfo_b).unwrap_or_else(|e| {
                    warn!("{}. Sending VFO-A frequency {}.", e, vfo_a);
                    freq_a
                })
            }
            Err(e) => {
                debug!("call failed to rig.get_vfoB (flrig): {}. Sending VFO-A {}.", e, vfo_a);
                freq_a
            }
        };

        let mode_b = match client.call("rig.get_modeB").await {
            Ok(value) => value.as_text(),
            Err(e) => {
                debug!("call failed to rig.get_modeB (flrig): {}. Sending VFO-A mode.", e);
                mode_a.clone()
            }
        };

        let snapshot = RigSnapshot {
            freq_a,
            freq_b,
            mode_a,
            mode_b,
            split,
            power,
        };
        debug!("Got data {:?}", snapshot);
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        format!("flrig at {}:{}", self.host, self.port)
    }
}

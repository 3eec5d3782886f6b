use crate::config::EffectiveConfig;
use crate::domain::model::{RadioPayload, RigSnapshot};
use crate::domain::ports::StatusSink;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts rig state to Wavelog's `/api/radio` endpoint.
pub struct WavelogForwarder {
    client: Client,
    endpoint: String,
    api_key: String,
    radio_name: String,
}

impl WavelogForwarder {
    pub fn new(base_url: &str, api_key: &str, radio_name: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/radio", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            radio_name: radio_name.to_string(),
        })
    }

    pub fn from_config(config: &EffectiveConfig) -> Result<Self> {
        Self::new(&config.wavelog_url, &config.wavelog_key, &config.radio_name)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn payload(&self, snapshot: &RigSnapshot) -> RadioPayload {
        RadioPayload::from_snapshot(&self.api_key, &self.radio_name, snapshot)
    }
}

#[async_trait]
impl StatusSink for WavelogForwarder {
    async fn forward(&self, snapshot: &RigSnapshot) -> Result<()> {
        let payload = self.payload(snapshot);
        info!(
            "Sending to {}: frequency={} mode={} power={}",
            self.endpoint, payload.frequency, payload.mode, payload.power
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::DeliveryError {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Wavelog accepted update ({})", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let forwarder = WavelogForwarder::new("https://log.example.com/index.php/", "k", "RIG").unwrap();
        assert_eq!(forwarder.endpoint(), "https://log.example.com/index.php/api/radio");

        let forwarder = WavelogForwarder::new("http://localhost", "k", "RIG").unwrap();
        assert_eq!(forwarder.endpoint(), "http://localhost/api/radio");
    }

    #[test]
    fn test_payload_uses_configured_identity() {
        let forwarder = WavelogForwarder::new("http://localhost", "secret", "FT-891").unwrap();
        let payload = forwarder.payload(&RigSnapshot::single_vfo(14_074_000.0, "DATA", 5.0));

        assert_eq!(payload.key, "secret");
        assert_eq!(payload.radio, "FT-891");
    }
}

use crate::adapters::{finite_power, parse_frequency};
use crate::domain::model::RigSnapshot;
use crate::domain::ports::RadioSource;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const READ_TIMEOUT: Duration = Duration::from_secs(3);

/// Reads rig state from rigctld over its line-oriented TCP protocol.
///
/// Only `f`, `m` and `P` are queried: split is always reported off and VFO-B
/// mirrors VFO-A.
#[derive(Debug, Clone)]
pub struct HamlibSource {
    host: String,
    port: u16,
}

impl HamlibSource {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    async fn connect(&self) -> Result<TcpStream> {
        let addr = format!("{}:{}", self.host, self.port);
        match timeout(CONNECT_TIMEOUT, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(RelayError::from_radio_io(
                &format!("hamlib connection error ({})", addr),
                e,
            )),
            Err(_) => Err(RelayError::connection(format!(
                "hamlib connection to {} timed out after {:?}",
                addr, CONNECT_TIMEOUT
            ))),
        }
    }
}

/// One command/response exchange over an open rigctld connection.
struct Session {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Session {
    fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    async fn query(&mut self, command: &str) -> Result<String> {
        self.writer
            .write_all(format!("{}\n", command).as_bytes())
            .await
            .map_err(|e| {
                RelayError::from_radio_io(&format!("failed to send '{}' command to hamlib", command), e)
            })?;
        self.writer.flush().await.map_err(|e| {
            RelayError::from_radio_io(&format!("failed to send '{}' command to hamlib", command), e)
        })?;

        let mut line = String::new();
        let read = match timeout(READ_TIMEOUT, self.reader.read_line(&mut line)).await {
            Ok(result) => result.map_err(|e| {
                if e.kind() == std::io::ErrorKind::InvalidData {
                    // read_line rejects replies that are not UTF-8.
                    RelayError::protocol(format!(
                        "malformed '{}' response from hamlib: {}",
                        command, e
                    ))
                } else {
                    RelayError::from_radio_io(
                        &format!("failed to read '{}' response from hamlib", command),
                        e,
                    )
                }
            })?,
            Err(_) => {
                return Err(RelayError::connection(format!(
                    "timed out waiting for '{}' response from hamlib",
                    command
                )))
            }
        };
        if read == 0 {
            return Err(RelayError::connection(format!(
                "hamlib closed the connection before answering '{}'",
                command
            )));
        }

        let line = line.trim_end_matches(['\r', '\n']).to_string();
        check_rprt(command, &line)?;
        Ok(line)
    }
}

/// rigctld answers a failed command with `RPRT <negative code>`.
fn check_rprt(command: &str, line: &str) -> Result<()> {
    if let Some(code) = line.trim().strip_prefix("RPRT ") {
        if code.trim() != "0" {
            return Err(RelayError::protocol(format!(
                "hamlib rejected '{}' command: RPRT {}",
                command,
                code.trim()
            )));
        }
    }
    Ok(())
}

/// First whitespace-separated token of an `m` response such as `USB 2400`.
pub fn parse_mode_line(line: &str) -> Result<String> {
    line.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| {
            RelayError::protocol(format!("invalid mode response format from hamlib: '{}'", line))
        })
}

#[async_trait]
impl RadioSource for HamlibSource {
    async fn get_data(&self) -> Result<RigSnapshot> {
        let mut session = Session::new(self.connect().await?);

        let freq_line = session.query("f").await?;
        let freq = parse_frequency("hamlib frequency", &freq_line)?;

        let mode_line = session.query("m").await?;
        let mode = parse_mode_line(&mode_line)?;

        // Reported as a 0-100 percentage and forwarded unconverted.
        let power = match session.query("P").await {
            Ok(line) => match finite_power(line.trim().parse().ok()) {
                Some(percent) => percent,
                None => {
                    warn!("Failed to parse power '{}'. Sending 0 W.", line);
                    0.0
                }
            },
            Err(e) => {
                warn!("Failed to read power from hamlib: {}. Sending 0 W.", e);
                0.0
            }
        };

        let snapshot = RigSnapshot::single_vfo(freq, mode, power);
        debug!("Got data {:?}", snapshot);
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        format!("Hamlib rigctld at {}:{}", self.host, self.port)
    }
}

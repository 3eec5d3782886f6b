use std::io::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Connection unavailable: {message}")]
    ConnectionUnavailable { message: String },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Transport error: {message}")]
    TransportError { message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Remote service returned non-200 status code: {status}. Body: {body}")]
    DeliveryError { status: u16, body: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Profile '{name}' does not exist in the configuration file")]
    UnknownProfileError { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Protocol,
    Io,
    Delivery,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RelayError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionUnavailable {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Wraps an I/O error raised while talking to a radio daemon, promoting
    /// "nobody is listening" conditions to [`RelayError::ConnectionUnavailable`].
    pub fn from_radio_io(context: &str, err: std::io::Error) -> Self {
        if is_connection_kind(err.kind()) {
            Self::connection(format!("{}: {}", context, err))
        } else {
            Self::IoError(std::io::Error::new(
                err.kind(),
                format!("{}: {}", context, err),
            ))
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConnectionUnavailable { .. } => ErrorCategory::Connection,
            Self::ProtocolError { .. } => ErrorCategory::Protocol,
            Self::IoError(e) if is_connection_kind(e.kind()) => ErrorCategory::Connection,
            Self::IoError(_) | Self::TransportError { .. } => ErrorCategory::Io,
            Self::HttpError(_) | Self::DeliveryError { .. } => ErrorCategory::Delivery,
            Self::SerializationError(_) => ErrorCategory::Protocol,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::UnknownProfileError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Connection => ErrorSeverity::Low,
            ErrorCategory::Io | ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Protocol => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn is_connection_unavailable(&self) -> bool {
        self.category() == ErrorCategory::Connection
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::UnknownProfileError { name } => {
                format!("Profile '{}' does not exist", name)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Connection => {
                "Make sure flrig or rigctld is running and listening on the configured host and port"
            }
            ErrorCategory::Protocol => {
                "Check that the radio control daemon version is compatible"
            }
            ErrorCategory::Io => "Check network connectivity and file permissions",
            ErrorCategory::Delivery => "Check the Wavelog URL and API key",
            ErrorCategory::Configuration => match self {
                Self::UnknownProfileError { .. } => {
                    "Create the profile first with --save-profile <name>"
                }
                _ => "Set the value via command-line flags or save it to a profile with --save-profile",
            },
        }
    }
}

fn is_connection_kind(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::AddrNotAvailable
            | ErrorKind::TimedOut
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
    )
}

pub type Result<T> = std::result::Result<T, RelayError>;

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{build_source, FlrigSource, HamlibSource, WavelogForwarder};
pub use config::profile_store::{ConfigFile, JsonProfileStore};
pub use config::resolver::ConfigResolver;
pub use config::{ConfigOverrides, DataSource, EffectiveConfig, ProfileConfig};
pub use crate::core::{gate::GateDecision, poll_loop::CycleOutcome, poll_loop::PollLoop};
pub use domain::model::{RadioPayload, RigSnapshot};
pub use utils::error::{RelayError, Result};

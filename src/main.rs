use clap::Parser;
use rig_relay::config::profile_store::default_config_path;
use rig_relay::domain::ports::RadioSource;
use rig_relay::utils::logger;
use rig_relay::{
    build_source, CliArgs, ConfigFile, ConfigResolver, JsonProfileStore, PollLoop, RelayError,
    WavelogForwarder,
};

fn exit_with(e: &RelayError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config_path = match args.config.clone() {
        Some(path) => path,
        None => default_config_path().unwrap_or_else(|e| exit_with(&e)),
    };
    let store = JsonProfileStore::new(config_path);

    // Reported once logging is up; a broken file still lets us run on flags.
    let (mut config_file, load_error) = match store.load() {
        Ok(file) => (file, None),
        Err(e) => (ConfigFile::default(), Some(e)),
    };

    if let Some(name) = args.set_default_profile.as_deref() {
        if let Err(e) = config_file.set_default_profile(name) {
            exit_with(&e);
        }
        if let Err(e) = store.save(&config_file) {
            exit_with(&e);
        }
        println!("Default profile successfully set to '{}'.", name);
        return Ok(());
    }

    let merged = ConfigResolver::merge(&config_file, &args.overrides());

    if let Some(name) = args.save_profile.as_deref() {
        if let Err(e) = config_file.save_profile(name, merged.config.clone()) {
            exit_with(&e);
        }
        if let Err(e) = store.save(&config_file) {
            exit_with(&e);
        }
        println!(
            "Configuration saved successfully to profile '{}' in {}",
            name,
            store.path().display()
        );
        return Ok(());
    }

    let (level, invalid_level) = logger::parse_log_level(&merged.config.log_level);
    logger::init_cli_logger(level);

    if invalid_level {
        tracing::error!(
            "Invalid log level '{}'. Defaulting to 'error'.",
            merged.config.log_level
        );
    }
    if let Some(e) = load_error {
        tracing::warn!(
            "Configuration file found but failed to load ({}). Starting with defaults. Error: {}",
            store.path().display(),
            e
        );
    }
    if !merged.from_store {
        tracing::debug!("No stored profile named '{}'; using defaults and flags", merged.name);
    }

    let config = match ConfigResolver::validate(&merged) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            exit_with(&e);
        }
    };

    let source = build_source(&config);
    tracing::info!("Using {} (Profile: {})", source.describe(), config.profile_name);

    let forwarder = match WavelogForwarder::from_config(&config) {
        Ok(forwarder) => forwarder,
        Err(e) => {
            tracing::error!("❌ Failed to set up the Wavelog client: {}", e);
            exit_with(&e);
        }
    };

    PollLoop::new(source, forwarder, config.interval).run().await;

    Ok(())
}

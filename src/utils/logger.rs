use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Parses a configured log level. Unknown values fall back to `ERROR`;
/// the second element reports whether the fallback was taken.
pub fn parse_log_level(value: &str) -> (Level, bool) {
    match value.trim().parse::<Level>() {
        Ok(level) => (level, false),
        Err(_) => (Level::ERROR, true),
    }
}

pub fn init_cli_logger(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("rig_relay={}", level.as_str().to_lowercase()))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), (Level::DEBUG, false));
        assert_eq!(parse_log_level("WARN"), (Level::WARN, false));
        assert_eq!(parse_log_level("chatty"), (Level::ERROR, true));
    }
}

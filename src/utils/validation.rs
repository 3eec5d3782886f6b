use crate::utils::error::{RelayError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

static INTERVAL_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?|\.\d+)(ns|us|µs|ms|s|m|h)").expect("interval pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RelayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Rejects names that would be invisible once stored, e.g. `"  "`.
pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    match value.trim() {
        "" => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("{} cannot be blank", field_name),
        }),
        _ => Ok(()),
    }
}

/// Parses a polling interval such as `1s`, `1500ms`, `1.5s` or `1m30s`.
pub fn parse_interval(field_name: &str, value: &str) -> Result<Duration> {
    let invalid = |reason: &str| RelayError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let text = value.trim();
    if text.is_empty() {
        return Err(invalid("Interval cannot be empty"));
    }

    let mut total_nanos: u128 = 0;
    let mut consumed = 0;
    for caps in INTERVAL_PART.captures_iter(text) {
        let whole = caps.get(0).ok_or_else(|| invalid("Invalid interval"))?;
        if whole.start() != consumed {
            return Err(invalid("Expected a duration like 1s, 1500ms or 1m30s"));
        }
        consumed = whole.end();

        let unit_nanos: u128 = match &caps[2] {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60_000_000_000,
            "h" => 3_600_000_000_000,
            _ => return Err(invalid("Unknown interval unit")),
        };
        let (whole_part, fraction) = caps[1].split_once('.').unwrap_or((&caps[1], ""));
        let whole_part: u128 = if whole_part.is_empty() {
            0
        } else {
            whole_part
                .parse()
                .map_err(|_| invalid("Invalid number in interval"))?
        };
        let mut nanos = whole_part
            .checked_mul(unit_nanos)
            .ok_or_else(|| invalid("Interval out of range"))?;
        if !fraction.is_empty() {
            let digits: u128 = fraction
                .parse()
                .map_err(|_| invalid("Invalid number in interval"))?;
            let scale = 10u128
                .checked_pow(fraction.len() as u32)
                .ok_or_else(|| invalid("Too many decimal places in interval"))?;
            nanos += digits
                .checked_mul(unit_nanos)
                .ok_or_else(|| invalid("Too many decimal places in interval"))?
                / scale;
        }
        total_nanos = total_nanos
            .checked_add(nanos)
            .ok_or_else(|| invalid("Interval out of range"))?;
    }

    if consumed != text.len() {
        return Err(invalid("Expected a duration like 1s, 1500ms or 1m30s"));
    }
    if total_nanos == 0 {
        return Err(invalid("Interval must be greater than zero"));
    }
    let secs = u64::try_from(total_nanos / 1_000_000_000)
        .map_err(|_| invalid("Interval out of range"))?;
    Ok(Duration::new(secs, (total_nanos % 1_000_000_000) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("wavelog_url", "https://log.example.com/index.php").is_ok());
        assert!(validate_url("wavelog_url", "http://localhost/index.php").is_ok());
        assert!(validate_url("wavelog_url", "").is_err());
        assert!(validate_url("wavelog_url", "not a url").is_err());
        assert!(validate_url("wavelog_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("profile name", "portable").is_ok());
        assert!(validate_non_empty_string("profile name", "   ").is_err());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("interval", "1s").unwrap(), Duration::from_secs(1));
        assert_eq!(
            parse_interval("interval", "1500ms").unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            parse_interval("interval", "1m30s").unwrap(),
            Duration::from_secs(90)
        );
        assert_eq!(
            parse_interval("interval", "2.5s").unwrap(),
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn test_parse_interval_rejects_garbage() {
        assert!(parse_interval("interval", "").is_err());
        assert!(parse_interval("interval", "10").is_err());
        assert!(parse_interval("interval", "fast").is_err());
        assert!(parse_interval("interval", "1s and more").is_err());
        assert!(parse_interval("interval", "0s").is_err());
    }
}

//! Just enough XML-RPC to call parameterless methods and read back a scalar.

use crate::utils::error::{RelayError, Result};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;

static FAULT_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<name>\s*faultString\s*</name>\s*<value>\s*(?:<string>)?(.*?)(?:</string>)?\s*</value>")
        .expect("fault pattern is valid")
});

static PARAM_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<params>\s*<param>\s*<value>(.*?)</value>\s*</param>")
        .expect("param pattern is valid")
});

static TYPED_SCALAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*<(i4|i8|int|double|boolean|string)>(.*)</(?:i4|i8|int|double|boolean|string)>\s*$")
        .expect("scalar pattern is valid")
});

static EMPTY_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<string\s*/>\s*$").expect("empty string pattern is valid"));

/// A scalar XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlRpcValue {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
}

impl XmlRpcValue {
    pub fn as_text(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Bool(v) => u8::from(*v).to_string(),
            Self::Str(v) => v.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Self::Str(v) => v.trim().parse().ok(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Double(v) => Some(v.trunc() as i64),
            Self::Bool(v) => Some(i64::from(*v)),
            Self::Str(v) => v.trim().parse().ok(),
        }
    }
}

pub fn encode_call(method: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodCall><methodName>{}</methodName><params></params></methodCall>\n",
        escape(method)
    )
}

/// Decodes a `<methodResponse>` document into its single scalar value.
pub fn decode_response(method: &str, body: &str) -> Result<XmlRpcValue> {
    if body.contains("<fault>") {
        let reason = FAULT_STRING
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| unescape(m.as_str().trim()))
            .unwrap_or_else(|| "unknown fault".to_string());
        return Err(RelayError::protocol(format!(
            "{} returned fault: {}",
            method, reason
        )));
    }

    let inner = PARAM_VALUE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            RelayError::protocol(format!("{} returned a response without a value", method))
        })?;

    if EMPTY_STRING.is_match(inner) {
        return Ok(XmlRpcValue::Str(String::new()));
    }

    let Some(caps) = TYPED_SCALAR.captures(inner) else {
        if inner.contains('<') {
            return Err(RelayError::protocol(format!(
                "{} returned an unsupported value: {}",
                method,
                inner.trim()
            )));
        }
        // Untyped values are strings.
        return Ok(XmlRpcValue::Str(unescape(inner)));
    };

    let text = unescape(&caps[2]);
    let bad_value =
        || RelayError::protocol(format!("{} returned malformed {}: '{}'", method, &caps[1], text));

    match &caps[1] {
        "i4" | "i8" | "int" => text
            .trim()
            .parse()
            .map(XmlRpcValue::Int)
            .map_err(|_| bad_value()),
        "double" => text
            .trim()
            .parse()
            .map(XmlRpcValue::Double)
            .map_err(|_| bad_value()),
        "boolean" => match text.trim() {
            "1" => Ok(XmlRpcValue::Bool(true)),
            "0" => Ok(XmlRpcValue::Bool(false)),
            _ => Err(bad_value()),
        },
        _ => Ok(XmlRpcValue::Str(text)),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// XML-RPC client bound to one endpoint. Cheap to build; the flrig reader
/// builds one per read so no connection outlives it.
pub struct XmlRpcClient {
    client: Client,
    endpoint: String,
}

impl XmlRpcClient {
    pub fn new(host: &str, port: u16, connect_timeout: Duration, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| RelayError::TransportError {
                message: format!("failed to build XML-RPC client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: format!("http://{}:{}/", host, port),
        })
    }

    pub async fn call(&self, method: &str) -> Result<XmlRpcValue> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml")
            .body(encode_call(method))
            .send()
            .await
            .map_err(|e| transport_error(method, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(method, e))?;

        if !status.is_success() {
            return Err(RelayError::protocol(format!(
                "{} returned HTTP status {}",
                method,
                status.as_u16()
            )));
        }

        decode_response(method, &body)
    }
}

fn transport_error(method: &str, err: reqwest::Error) -> RelayError {
    if err.is_connect() || err.is_timeout() {
        RelayError::connection(format!("call failed to {}: {}", method, err))
    } else {
        RelayError::TransportError {
            message: format!("call failed to {}: {}", method, err),
        }
    }
}

//! Turning a transport result into the Riap result envelope.

use riap_domain::error::Error;
use serde_json::{json, Map, Value};

use crate::transport::TransportResponse;

/// Terminal state of a single call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// HTTP 200 with a JSON body, delivered as-is.
    Success(Value),
    /// Any status other than 200.
    HttpError(u16),
    /// HTTP 200 but the body was not JSON.
    ParseError(String),
    /// No status was obtained at all.
    NetworkError(String),
}

impl Outcome {
    pub fn from_transport(res: Result<TransportResponse, Error>) -> Self {
        match res {
            Ok(TransportResponse { status: 200, body }) => {
                match serde_json::from_str::<Value>(&body) {
                    Ok(parsed) => Outcome::Success(parsed),
                    Err(e) => Outcome::ParseError(e.to_string()),
                }
            }
            Ok(TransportResponse { status, .. }) => Outcome::HttpError(status),
            Err(e) => Outcome::NetworkError(e.to_string()),
        }
    }

    /// HTTP status for tracing; 0 when none was obtained.
    pub fn http_status(&self) -> u16 {
        match self {
            Outcome::Success(_) | Outcome::ParseError(_) => 200,
            Outcome::HttpError(status) => *status,
            Outcome::NetworkError(_) => 0,
        }
    }

    /// The value handed to `on_response`.
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Success(v) => v,
            Outcome::HttpError(status) => json!([status, format!("HTTP error {status}")]),
            Outcome::ParseError(msg) => json!([500, format!("Can't parse JSON: {msg}")]),
            Outcome::NetworkError(msg) => json!([0, format!("Network error: {msg}")]),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Typed envelope view
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Read-only view over a `[status, message, result, meta]` envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct RiapResponse {
    pub status: i64,
    pub message: Option<String>,
    pub result: Option<Value>,
    pub meta: Option<Map<String, Value>>,
}

impl RiapResponse {
    /// `None` unless `value` is an array whose first element is an integer.
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        let status = items.first()?.as_i64()?;
        Some(Self {
            status,
            message: items.get(1).and_then(Value::as_str).map(str::to_owned),
            result: items.get(2).cloned(),
            meta: items.get(3).and_then(Value::as_object).cloned(),
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

//! Per-call data: the Riap protocol request and the call options.
//!
//! Both are built fresh for every request and dropped once the response
//! has been delivered.

use std::fmt;

use riap_domain::config::ClientConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Protocol request
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A Riap request: protocol field name → value.
///
/// Always carries `action` and `ua`; everything else (`args`, `uri`,
/// `fmt`, custom fields) comes from the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolRequest(Map<String, Value>);

impl ProtocolRequest {
    /// Build `{action, ua} ∪ extra_fields`.
    ///
    /// Extra fields are merged last, so an `action` or `ua` entry in
    /// `extra_fields` replaces the one passed in.
    pub fn new(action: &str, ua: &str, extra_fields: Map<String, Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("action".into(), Value::String(action.to_owned()));
        fields.insert("ua".into(), Value::String(ua.to_owned()));

        for (key, value) in extra_fields {
            if let Some(previous) = fields.get(&key) {
                tracing::debug!(field = %key, %previous, "extra field overrides default");
            }
            fields.insert(key, value);
        }
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All fields, in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The effective action, if it is still a string after the merge.
    pub fn action(&self) -> Option<&str> {
        self.0.get("action").and_then(Value::as_str)
    }

    /// The call arguments; an empty object when `args` is absent.
    pub fn args(&self) -> Value {
        self.0
            .get("args")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Call options
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Single-shot completion receiving the Riap result envelope.
pub type ResponseCallback = Box<dyn FnOnce(Value) + Send + 'static>;

/// Options for one Riap call.
///
/// `retries` and `retry_delay` are accepted but never acted on: each call
/// issues exactly one HTTP request.
#[derive(Deserialize)]
pub struct CallOptions {
    #[serde(default = "d_retries")]
    pub retries: u32,
    /// Seconds.
    #[serde(default = "d_retry_delay")]
    pub retry_delay: u64,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(skip)]
    pub on_response: Option<ResponseCallback>,
}

fn d_retries() -> u32 {
    2
}
fn d_retry_delay() -> u64 {
    3
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            retries: d_retries(),
            retry_delay: d_retry_delay(),
            user: None,
            password: None,
            on_response: None,
        }
    }
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take retry settings and credentials from the client configuration.
    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self {
            retries: cfg.retries,
            retry_delay: cfg.retry_delay,
            user: cfg.user.clone(),
            password: cfg.password.clone(),
            on_response: None,
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_retries(mut self, retries: u32, retry_delay: u64) -> Self {
        self.retries = retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn on_response(mut self, f: impl FnOnce(Value) + Send + 'static) -> Self {
        self.on_response = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("retries", &self.retries)
            .field("retry_delay", &self.retry_delay)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("on_response", &self.on_response.is_some())
            .finish()
    }
}

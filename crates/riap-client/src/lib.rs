//! `riap-client` — Riap-over-HTTP client.
//!
//! A Riap call is an HTTP POST: protocol fields travel as `x-riap-*`
//! headers, the `args` field is the JSON body, and the response is a JSON
//! envelope `[status, message, result, meta]`.
//!
//! Each call sends exactly one request. `retries` and `retry_delay` are
//! accepted in [`CallOptions`] but nothing is ever retried.
//!
//! # Results
//!
//! | Situation                    | Delivered value                           |
//! |------------------------------|-------------------------------------------|
//! | HTTP 200, JSON body          | the parsed body, unchanged                |
//! | HTTP 200, body is not JSON   | `[500, "Can't parse JSON: <error>"]`      |
//! | any other HTTP status        | `[status, "HTTP error <status>"]`         |
//! | no HTTP status at all        | `[0, "Network error: <error>"]`           |
//!
//! # Quick start
//!
//! ```rust,no_run
//! use riap_client::{http_request, CallOptions};
//! use serde_json::{json, Map};
//!
//! # async fn example() -> riap_domain::error::Result<()> {
//! let mut extra = Map::new();
//! extra.insert("args".into(), json!({"n": 3}));
//!
//! http_request(
//!     "call",
//!     "https://example.com/api/Foo/bar",
//!     extra,
//!     CallOptions::new()
//!         .with_credentials("admin", "blah")
//!         .on_response(|res| println!("{res}")),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod headers;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use client::RiapClient;
pub use headers::{is_reserved_field, project_headers, HeaderSet};
pub use request::{Credentials, OutgoingRequest};
pub use response::{Outcome, RiapResponse};
pub use transport::{from_reqwest, ReqwestTransport, Transport, TransportResponse};
pub use types::{CallOptions, ProtocolRequest, ResponseCallback};

use riap_domain::config::ClientConfig;
use riap_domain::error::Result;
use serde_json::{Map, Value};

/// Send one Riap request with a default client and return immediately.
///
/// The result is handed to `copts.on_response` once the call completes.
/// Must be called from inside a Tokio runtime.
pub fn http_request(
    action: &str,
    url: &str,
    extra_fields: Map<String, Value>,
    copts: CallOptions,
) -> Result<()> {
    RiapClient::new(&ClientConfig::default())?.http_request(action, url, extra_fields, copts)
}

/// Send one Riap request with a default client and await the result.
pub async fn request(
    action: &str,
    url: &str,
    extra_fields: Map<String, Value>,
    copts: CallOptions,
) -> Result<Value> {
    RiapClient::new(&ClientConfig::default())?
        .request(action, url, extra_fields, copts)
        .await
}

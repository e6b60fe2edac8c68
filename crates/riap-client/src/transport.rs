//! The HTTP seam: [`Transport`] and its `reqwest` implementation.
//!
//! `ReqwestTransport` sends exactly one POST per call. It keeps no idle
//! connections around between calls and has no timeout unless one is
//! configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use riap_domain::config::ClientConfig;
use riap_domain::error::{Error, Result};

use crate::request::OutgoingRequest;

/// What came back from the server, once a status line was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one marshaled request and returns the raw response.
///
/// Implementations may talk to a real server or act as a test double.
/// An `Err` means no HTTP status was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: &OutgoingRequest) -> Result<TransportResponse>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// reqwest
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let timeout = cfg.timeout_ms.map(Duration::from_millis);
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self { http, timeout })
    }

    /// The configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, req: &OutgoingRequest) -> Result<TransportResponse> {
        let mut rb = self
            .http
            .post(&req.url)
            .headers(req.header_map()?)
            .body(req.body.clone());

        if let Some(ref creds) = req.credentials {
            rb = rb.basic_auth(&creds.user, creds.password.as_ref());
        }

        let resp = rb.send().await.map_err(from_reqwest)?;
        let status = resp.status();

        let body = if status.is_success() {
            resp.text().await.map_err(from_reqwest)?
        } else {
            // Only the status matters for failures.
            resp.text().await.unwrap_or_default()
        };

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

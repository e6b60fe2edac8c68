//! [`RiapClient`]: marshal, send once, deliver the result.

use std::sync::Arc;
use std::time::Instant;

use riap_domain::config::ClientConfig;
use riap_domain::error::{Error, Result};
use riap_domain::trace::TraceEvent;
use serde_json::{Map, Value};

use crate::request::OutgoingRequest;
use crate::response::Outcome;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CallOptions, ResponseCallback};

/// A stateless Riap-over-HTTP client handle.
///
/// Holds only the transport and the `ua` value; every call builds its own
/// request and nothing is carried from one call to the next. Cheap to
/// clone.
#[derive(Clone)]
pub struct RiapClient {
    transport: Arc<dyn Transport>,
    user_agent: String,
}

impl RiapClient {
    /// Build a client backed by `reqwest`.
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(cfg)?;
        Ok(Self::with_transport(Arc::new(transport), cfg.user_agent.clone()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            user_agent: user_agent.into(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Issue the request on the current Tokio runtime and return at once.
    ///
    /// The result reaches `copts.on_response` exactly once, on a runtime
    /// worker. `Err` means nothing was sent: there is no runtime, or the
    /// request can not be expressed as HTTP.
    pub fn http_request(
        &self,
        action: &str,
        url: &str,
        extra_fields: Map<String, Value>,
        mut copts: CallOptions,
    ) -> Result<()> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Config(format!("no Tokio runtime to send on: {e}")))?;

        let req = self.prepare(action, url, extra_fields, &copts)?;
        let on_response = copts.on_response.take();
        let transport = Arc::clone(&self.transport);

        handle.spawn(async move {
            let result = execute(transport.as_ref(), &req).await;
            deliver(on_response, result);
        });
        Ok(())
    }

    /// Like [`http_request`](Self::http_request), but resolves to the
    /// result as well. `on_response`, when set, still fires once.
    pub async fn request(
        &self,
        action: &str,
        url: &str,
        extra_fields: Map<String, Value>,
        mut copts: CallOptions,
    ) -> Result<Value> {
        let req = self.prepare(action, url, extra_fields, &copts)?;
        let result = execute(self.transport.as_ref(), &req).await;
        if let Some(cb) = copts.on_response.take() {
            cb(result.clone());
        }
        Ok(result)
    }

    // ── Riap actions ─────────────────────────────────────────────────

    /// `call`: run the function at `url` with `args` as the body.
    pub async fn call(&self, url: &str, args: Map<String, Value>) -> Result<Value> {
        let mut extra = Map::new();
        extra.insert("args".into(), Value::Object(args));
        self.request("call", url, extra, CallOptions::default()).await
    }

    /// `meta`: Rinci metadata of the entity.
    pub async fn meta(&self, url: &str) -> Result<Value> {
        self.action_only("meta", url).await
    }

    /// `info`: type and URI of the entity.
    pub async fn info(&self, url: &str) -> Result<Value> {
        self.action_only("info", url).await
    }

    /// `list`: children of a package entity.
    pub async fn list(&self, url: &str) -> Result<Value> {
        self.action_only("list", url).await
    }

    /// `child_metas`: metadata of every child.
    pub async fn child_metas(&self, url: &str) -> Result<Value> {
        self.action_only("child_metas", url).await
    }

    /// `actions`: actions the entity supports.
    pub async fn actions(&self, url: &str) -> Result<Value> {
        self.action_only("actions", url).await
    }

    async fn action_only(&self, action: &str, url: &str) -> Result<Value> {
        self.request(action, url, Map::new(), CallOptions::default())
            .await
    }

    fn prepare(
        &self,
        action: &str,
        url: &str,
        extra_fields: Map<String, Value>,
        copts: &CallOptions,
    ) -> Result<OutgoingRequest> {
        if copts.retries > 0 {
            tracing::trace!(
                retries = copts.retries,
                retry_delay = copts.retry_delay,
                "retry options ignored; sending once"
            );
        }
        OutgoingRequest::build(action, url, &self.user_agent, extra_fields, copts)
    }
}

impl std::fmt::Debug for RiapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiapClient")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Send once and settle: `idle -> sent -> terminal`.
async fn execute(transport: &dyn Transport, req: &OutgoingRequest) -> Value {
    let start = Instant::now();
    let outcome = Outcome::from_transport(transport.send(req).await);
    let duration_ms = start.elapsed().as_millis() as u64;

    TraceEvent::RiapCall {
        action: req.action().to_owned(),
        url: req.url.clone(),
        status: outcome.http_status(),
        duration_ms,
    }
    .emit();

    match &outcome {
        Outcome::Success(_) => {
            tracing::debug!(url = %req.url, action = req.action(), "riap response received")
        }
        Outcome::HttpError(status) => {
            tracing::warn!(url = %req.url, status, "riap request failed with HTTP error")
        }
        Outcome::ParseError(e) => {
            tracing::warn!(url = %req.url, error = %e, "riap response is not JSON")
        }
        Outcome::NetworkError(e) => {
            tracing::warn!(url = %req.url, error = %e, "riap request got no response")
        }
    }

    outcome.into_value()
}

fn deliver(on_response: Option<ResponseCallback>, result: Value) {
    match on_response {
        Some(cb) => cb(result),
        None => tracing::warn!(%result, "no on_response callback; dropping riap result"),
    }
}

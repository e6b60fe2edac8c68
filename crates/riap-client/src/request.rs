//! Marshaling of one Riap call into a ready-to-send HTTP request.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use riap_domain::error::{Error, Result};
use serde_json::{Map, Value};

use crate::headers::{project_headers, HeaderSet};
use crate::types::{CallOptions, ProtocolRequest};

/// HTTP Basic credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: Option<String>,
}

/// A fully marshaled Riap-over-HTTP POST.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub url: String,
    pub riap: ProtocolRequest,
    pub headers: HeaderSet,
    pub body: String,
    pub credentials: Option<Credentials>,
}

impl OutgoingRequest {
    /// Marshal `action` plus `extra_fields` for delivery to `url`.
    ///
    /// Fails only when the result could not be expressed as HTTP: a field
    /// name or value that is not a legal header.
    pub fn build(
        action: &str,
        url: &str,
        ua: &str,
        extra_fields: Map<String, Value>,
        copts: &CallOptions,
    ) -> Result<Self> {
        let riap = ProtocolRequest::new(action, ua, extra_fields);
        let mut headers = project_headers(&riap);

        let body = serde_json::to_string(&riap.args())?;
        headers.insert("content-length".into(), body.len().to_string());

        let credentials = copts.user.as_ref().map(|user| Credentials {
            user: user.clone(),
            password: copts.password.clone(),
        });

        let req = Self {
            url: url.to_owned(),
            riap,
            headers,
            body,
            credentials,
        };
        req.header_map()?;

        tracing::debug!(
            url = %req.url,
            action = req.action(),
            headers = req.headers.len(),
            body_len = req.body.len(),
            basic_auth = req.credentials.is_some(),
            "marshaled riap request"
        );
        Ok(req)
    }

    /// The effective action name (after any override by extra fields).
    pub fn action(&self) -> &str {
        self.riap.action().unwrap_or_default()
    }

    /// The header set as a typed `HeaderMap`.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let invalid = |e: &dyn std::fmt::Display| Error::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(&e))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(&e))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

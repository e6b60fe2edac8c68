use serde::Serialize;

/// Structured trace events emitted across all Riap crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    RiapCall {
        action: String,
        url: String,
        /// HTTP status, or 0 when no status was obtained.
        status: u16,
        duration_ms: u64,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "riap_event");
    }
}

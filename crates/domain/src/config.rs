use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults for missing keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "using default config");
                Self::default()
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Riap client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Client identifier sent as the `ua` protocol field.
pub const DEFAULT_USER_AGENT: &str = "riap-client";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Value of the `ua` protocol field (`x-riap-ua` header).
    #[serde(default = "d_user_agent")]
    pub user_agent: String,

    /// Accepted for compatibility; requests are never retried.
    #[serde(default = "d_2")]
    pub retries: u32,

    /// Seconds between retries. Accepted for compatibility; unused.
    #[serde(default = "d_3")]
    pub retry_delay: u64,

    /// HTTP Basic username.
    #[serde(default)]
    pub user: Option<String>,

    /// HTTP Basic password, paired with `user`.
    #[serde(default)]
    pub password: Option<String>,

    /// Overall request timeout. Absent means requests may wait forever.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: d_user_agent(),
            retries: 2,
            retry_delay: 3,
            user: None,
            password: None,
            timeout_ms: None,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn d_2() -> u32 {
    2
}
fn d_3() -> u64 {
    3
}

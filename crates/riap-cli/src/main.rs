//! `riap` — command-line Riap::HTTP client.
//!
//! Usage:
//!   riap call https://example.com/api/Math/add --args '{"a":2,"b":4}'
//!   riap meta https://example.com/api/Math/ --user admin --password blah
//!
//! Log output goes to stderr and is controlled by `RUST_LOG`.

mod cli;

use clap::Parser;
use riap_client::{CallOptions, RiapClient, RiapResponse};
use riap_domain::config::Config;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    cli.apply_overrides(&mut config.client);
    tracing::debug!(
        config_path = %cli.config,
        user_agent = %config.client.user_agent,
        timeout_ms = ?config.client.timeout_ms,
        "configuration loaded"
    );

    let extra = cli.extra_fields()?;
    let client = RiapClient::new(&config.client)?;
    let copts = CallOptions::from_config(&config.client);

    let result = client.request(&cli.action, &cli.url, extra, copts).await?;

    if !print_result(&result, cli.raw)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Print the result; returns whether it counts as success.
fn print_result(result: &Value, raw: bool) -> anyhow::Result<bool> {
    let envelope = RiapResponse::from_value(result);

    if raw {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if let Some(ref res) = envelope {
        println!("{} {}", res.status, res.message.as_deref().unwrap_or(""));
        if let Some(ref payload) = res.result {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(result)?);
    }

    // A body that is not an envelope was still a 200 with valid JSON.
    Ok(envelope.map_or(true, |res| res.is_success()))
}

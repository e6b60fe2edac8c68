use anyhow::{bail, Context};
use clap::Parser;
use riap_domain::config::ClientConfig;
use serde_json::{Map, Value};

/// riap — send a single Riap request over HTTP and print the result.
#[derive(Debug, Parser)]
#[command(name = "riap", version, about)]
pub struct Cli {
    /// Riap action (call, meta, info, list, child_metas, actions, ...).
    pub action: String,

    /// Riap::HTTP server endpoint.
    pub url: String,

    /// Call arguments as a JSON object; becomes the request body.
    #[arg(long)]
    pub args: Option<String>,

    /// Extra protocol field sent as a plain string (repeatable).
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Extra protocol field whose value is parsed as JSON (repeatable).
    #[arg(long = "json-field", value_name = "KEY=JSON")]
    pub json_fields: Vec<String>,

    /// HTTP Basic username (overrides config).
    #[arg(long)]
    pub user: Option<String>,

    /// HTTP Basic password (overrides config).
    #[arg(long)]
    pub password: Option<String>,

    /// Print the raw result envelope as JSON.
    #[arg(long)]
    pub raw: bool,

    /// Config file.
    #[arg(long, default_value = "riap.toml")]
    pub config: String,
}

impl Cli {
    /// Protocol fields from `--args`, `--field` and `--json-field`.
    pub fn extra_fields(&self) -> anyhow::Result<Map<String, Value>> {
        let mut extra = Map::new();

        for raw in &self.fields {
            let (key, value) = split_pair(raw)?;
            extra.insert(key.to_owned(), Value::String(value.to_owned()));
        }
        for raw in &self.json_fields {
            let (key, value) = split_pair(raw)?;
            let parsed: Value = serde_json::from_str(value)
                .with_context(|| format!("--json-field {key}: invalid JSON"))?;
            extra.insert(key.to_owned(), parsed);
        }

        if let Some(ref args) = self.args {
            let parsed: Value = serde_json::from_str(args).context("--args: invalid JSON")?;
            if !parsed.is_object() {
                bail!("--args must be a JSON object");
            }
            extra.insert("args".into(), parsed);
        }
        Ok(extra)
    }

    /// Apply command-line credential overrides onto the loaded config.
    pub fn apply_overrides(&self, cfg: &mut ClientConfig) {
        if let Some(ref user) = self.user {
            cfg.user = Some(user.clone());
        }
        if let Some(ref password) = self.password {
            cfg.password = Some(password.clone());
        }
    }
}

fn split_pair(raw: &str) -> anyhow::Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("expected KEY=VALUE, got {raw:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("riap").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn positional_action_and_url() {
        let cli = parse(&["meta", "http://localhost:5000/api/"]);
        assert_eq!(cli.action, "meta");
        assert_eq!(cli.url, "http://localhost:5000/api/");
        assert_eq!(cli.config, "riap.toml");
        assert!(cli.extra_fields().unwrap().is_empty());
    }

    #[test]
    fn fields_and_args_become_protocol_fields() {
        let cli = parse(&[
            "call",
            "http://x/api/",
            "--args",
            r#"{"n": 3}"#,
            "--field",
            "uri=/Foo/bar",
            "--json-field",
            "detail=true",
        ]);
        let extra = cli.extra_fields().unwrap();
        assert_eq!(extra["args"], json!({"n": 3}));
        assert_eq!(extra["uri"], json!("/Foo/bar"));
        assert_eq!(extra["detail"], json!(true));
    }

    #[test]
    fn field_value_may_contain_equals() {
        let cli = parse(&["call", "http://x/api/", "--field", "q=a=b"]);
        assert_eq!(cli.extra_fields().unwrap()["q"], json!("a=b"));
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        let cli = parse(&["call", "http://x/api/", "--field", "novalue"]);
        assert!(cli.extra_fields().is_err());

        let cli = parse(&["call", "http://x/api/", "--args", "[1,2]"]);
        assert!(cli.extra_fields().is_err());

        let cli = parse(&["call", "http://x/api/", "--json-field", "x={oops"]);
        assert!(cli.extra_fields().is_err());
    }

    #[test]
    fn credential_overrides() {
        let cli = parse(&["call", "http://x/api/", "--user", "admin", "--password", "blah"]);
        let mut cfg = ClientConfig::default();
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.user.as_deref(), Some("admin"));
        assert_eq!(cfg.password.as_deref(), Some("blah"));
    }
}

//! Projection of Riap protocol fields onto `x-riap-*` HTTP headers.
//!
//! Every non-reserved field becomes `x-riap-<key>`. Strings and numbers
//! travel as plain text; any other value is JSON-encoded and the header
//! name gets a `-j-` suffix so the server knows to decode it.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::ProtocolRequest;

/// Lower-cased header name → header value.
pub type HeaderSet = BTreeMap<String, String>;

pub const HEADER_PREFIX: &str = "x-riap-";
pub const JSON_SUFFIX: &str = "-j-";

/// Fields routed elsewhere (body, fixed format) or private to the caller.
const RESERVED_FIELDS: [&str; 4] = ["args", "fmt", "loglevel", "marklog"];

/// `true` for fields that must never be projected onto a header.
pub fn is_reserved_field(key: &str) -> bool {
    key.starts_with('_') || RESERVED_FIELDS.contains(&key)
}

/// Header name and value for a single protocol field.
pub fn project_field(key: &str, value: &Value) -> (String, String) {
    let name = format!("{HEADER_PREFIX}{}", key.to_ascii_lowercase());
    match value {
        Value::String(s) => (name, s.clone()),
        Value::Number(n) => (name, n.to_string()),
        other => (format!("{name}{JSON_SUFFIX}"), other.to_string()),
    }
}

/// Build the header set for a request, minus `content-length` which
/// depends on the serialized body.
pub fn project_headers(req: &ProtocolRequest) -> HeaderSet {
    let mut headers: HeaderSet = req
        .fields()
        .filter(|(key, _)| !is_reserved_field(key))
        .map(|(key, value)| project_field(key, value))
        .collect();

    headers.insert(format!("{HEADER_PREFIX}fmt"), "json".into());
    headers.insert("content-type".into(), "application/json".into());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn request(extra: Value) -> ProtocolRequest {
        let extra: Map<String, Value> = extra.as_object().cloned().unwrap_or_default();
        ProtocolRequest::new("call", "riap-client", extra)
    }

    #[test]
    fn reserved_fields() {
        for key in ["args", "fmt", "loglevel", "marklog", "_note", "_"] {
            assert!(is_reserved_field(key), "{key} should be reserved");
        }
        for key in ["uri", "action", "argsx", "my_fmt", "v"] {
            assert!(!is_reserved_field(key), "{key} should be projected");
        }
    }

    #[test]
    fn scalars_are_sent_plain() {
        assert_eq!(
            project_field("uri", &json!("/Foo/bar")),
            ("x-riap-uri".into(), "/Foo/bar".into())
        );
        assert_eq!(project_field("v", &json!(1.1)), ("x-riap-v".into(), "1.1".into()));
        assert_eq!(project_field("n", &json!(42)), ("x-riap-n".into(), "42".into()));
    }

    #[test]
    fn non_scalars_are_json_encoded() {
        assert_eq!(
            project_field("detail", &json!(true)),
            ("x-riap-detail-j-".into(), "true".into())
        );
        assert_eq!(
            project_field("x", &Value::Null),
            ("x-riap-x-j-".into(), "null".into())
        );
        assert_eq!(
            project_field("tags", &json!(["a", 1])),
            ("x-riap-tags-j-".into(), r#"["a",1]"#.into())
        );
        assert_eq!(
            project_field("opts", &json!({"k": "v"})),
            ("x-riap-opts-j-".into(), r#"{"k":"v"}"#.into())
        );
    }

    #[test]
    fn every_plain_field_becomes_a_header() {
        let headers = project_headers(&request(json!({"uri": "/api/", "v": 1.1})));
        assert_eq!(headers["x-riap-action"], "call");
        assert_eq!(headers["x-riap-ua"], "riap-client");
        assert_eq!(headers["x-riap-uri"], "/api/");
        assert_eq!(headers["x-riap-v"], "1.1");
    }

    #[test]
    fn reserved_fields_never_projected() {
        let headers = project_headers(&request(json!({
            "args": {"a": 1},
            "loglevel": 6,
            "marklog": true,
            "_secret": "x",
        })));
        let riap: Vec<&String> = headers.keys().filter(|k| k.starts_with(HEADER_PREFIX)).collect();
        assert_eq!(riap, ["x-riap-action", "x-riap-fmt", "x-riap-ua"]);
    }

    #[test]
    fn fmt_is_always_json() {
        let headers = project_headers(&request(json!({"fmt": "yaml"})));
        assert_eq!(headers["x-riap-fmt"], "json");
        assert!(!headers.contains_key("x-riap-fmt-j-"));
    }

    #[test]
    fn content_type_is_json() {
        let headers = project_headers(&request(json!({})));
        assert_eq!(headers["content-type"], "application/json");
    }

    #[test]
    fn header_names_are_lower_cased() {
        let headers = project_headers(&request(json!({"Uri": "/x/"})));
        assert_eq!(headers["x-riap-uri"], "/x/");
    }
}

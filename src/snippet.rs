//! Code snippets for the current request
//!
//! Three renderers: cURL, browser `fetch`, and Node with axios. They are pure
//! and deterministic. Only raw-mode bodies appear in a snippet; multipart,
//! binary and the other modes render without a body.

use std::fmt;

use crate::body::BodyConfig;
use crate::models::{HttpMethod, KeyValues};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnippetKind {
    #[default]
    Curl,
    Fetch,
    Node,
}

impl SnippetKind {
    pub const ALL: [SnippetKind; 3] = [SnippetKind::Curl, SnippetKind::Fetch, SnippetKind::Node];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetKind::Curl => "curl",
            SnippetKind::Fetch => "fetch",
            SnippetKind::Node => "node",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SnippetKind::Curl => "cURL",
            SnippetKind::Fetch => "JavaScript Fetch",
            SnippetKind::Node => "Node Axios",
        }
    }

    pub fn parse(s: &str) -> Option<SnippetKind> {
        let s = s.trim().to_lowercase();
        SnippetKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for SnippetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Render a snippet of the given kind. An empty endpoint renders nothing.
pub fn render(
    kind: SnippetKind,
    endpoint: &str,
    method: HttpMethod,
    headers: &KeyValues,
    body: &BodyConfig,
) -> String {
    match kind {
        SnippetKind::Curl => to_curl(endpoint, method, headers, body),
        SnippetKind::Fetch => to_fetch(endpoint, method, headers, body),
        SnippetKind::Node => to_node(endpoint, method, headers, body),
    }
}

/// Format request as cURL command
pub fn to_curl(endpoint: &str, method: HttpMethod, headers: &KeyValues, body: &BodyConfig) -> String {
    if endpoint.is_empty() {
        return String::new();
    }

    let mut parts = vec![format!("curl -X {} \\\n  \"{}\"", method, endpoint)];

    for (key, value) in headers.non_empty().iter() {
        parts.push(format!("  -H \"{}: {}\"", key, value));
    }

    if let Some(raw) = body.raw_text() {
        parts.push(format!("  --data '{}'", raw.replace('\'', "'\\''")));
    }

    parts.join(" \\\n")
}

pub fn to_fetch(endpoint: &str, method: HttpMethod, headers: &KeyValues, body: &BodyConfig) -> String {
    if endpoint.is_empty() {
        return String::new();
    }

    let headers = headers.non_empty();
    let mut lines = Vec::new();
    lines.push(format!("fetch(\"{}\", {{", endpoint));
    lines.push(format!("  method: \"{}\",", method));
    if !headers.is_empty() {
        lines.push(format!("  headers: {},", indent_tail(&headers_json(&headers), "  ")));
    }
    if let Some(raw) = body.raw_text() {
        lines.push(format!("  body: {},", json_string(raw)));
    }
    lines.push("})".to_string());
    lines.push("  .then((response) => response.json())".to_string());
    lines.push("  .then((data) => console.log(data))".to_string());
    lines.push("  .catch((error) => console.error(error))".to_string());
    lines.join("\n")
}

pub fn to_node(endpoint: &str, method: HttpMethod, headers: &KeyValues, body: &BodyConfig) -> String {
    if endpoint.is_empty() {
        return String::new();
    }

    let headers = headers.non_empty();
    let mut lines = vec![
        "import axios from 'axios'".to_string(),
        String::new(),
        "async function run() {".to_string(),
        "  try {".to_string(),
        "    const response = await axios({".to_string(),
        format!("      method: '{}',", method.as_str().to_lowercase()),
        format!("      url: '{}',", endpoint),
    ];
    if !headers.is_empty() {
        lines.push(format!("      headers: {},", indent_tail(&headers_json(&headers), "      ")));
    }
    if let Some(raw) = body.raw_text() {
        lines.push(format!("      data: {},", json_string(raw)));
    }
    lines.extend(
        [
            "    })",
            "    console.log(response.data)",
            "  } catch (error) {",
            "    console.error(error)",
            "  }",
            "}",
            "",
            "run()",
        ]
        .map(String::from),
    );
    lines.join("\n")
}

/// Pretty JSON object literal of the headers, in insertion order
fn headers_json(headers: &KeyValues) -> String {
    let map: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    serde_json::to_string_pretty(&map).unwrap_or_else(|_| String::from("{}"))
}

fn json_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Prefix every line but the first with `indent`
fn indent_tail(text: &str, indent: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyMode, FormField, RawLanguage};
    use crate::curl;

    fn json_headers() -> KeyValues {
        [("Content-Type", "application/json"), ("X-Empty", "")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_curl_snippet() {
        let body = BodyConfig::with_raw(RawLanguage::Json, r#"{"name":"a"}"#);
        let snippet = to_curl("https://api.example.com/users", HttpMethod::POST, &json_headers(), &body);
        assert_eq!(
            snippet,
            "curl -X POST \\\n  \"https://api.example.com/users\" \\\n  -H \"Content-Type: application/json\" \\\n  --data '{\"name\":\"a\"}'"
        );
    }

    #[test]
    fn test_curl_snippet_escapes_single_quotes() {
        let body = BodyConfig::with_raw(RawLanguage::Text, "it's");
        let snippet = to_curl("https://x.io", HttpMethod::PUT, &KeyValues::new(), &body);
        assert!(snippet.ends_with("--data 'it'\\''s'"));
    }

    #[test]
    fn test_non_raw_modes_render_without_body() {
        let mut body = BodyConfig::with_form_data(vec![FormField::text("a", "1")]);
        let curl = to_curl("https://x.io", HttpMethod::POST, &KeyValues::new(), &body);
        assert_eq!(curl, "curl -X POST \\\n  \"https://x.io\"");

        body.raw.content = "hidden".into();
        body.set_mode(BodyMode::Graphql);
        assert!(!to_fetch("https://x.io", HttpMethod::POST, &KeyValues::new(), &body).contains("body:"));
        assert!(!to_node("https://x.io", HttpMethod::POST, &KeyValues::new(), &body).contains("data:"));
    }

    #[test]
    fn test_empty_endpoint_renders_nothing() {
        for kind in SnippetKind::ALL {
            assert!(render(kind, "", HttpMethod::GET, &KeyValues::new(), &BodyConfig::default()).is_empty());
        }
    }

    #[test]
    fn test_fetch_snippet() {
        let body = BodyConfig::with_raw(RawLanguage::Json, r#"{"name":"a"}"#);
        let snippet = to_fetch("https://api.example.com/users", HttpMethod::POST, &json_headers(), &body);
        let expected = [
            r#"fetch("https://api.example.com/users", {"#,
            r#"  method: "POST","#,
            r#"  headers: {"#,
            r#"    "Content-Type": "application/json""#,
            r#"  },"#,
            r#"  body: "{\"name\":\"a\"}","#,
            r#"})"#,
            r#"  .then((response) => response.json())"#,
            r#"  .then((data) => console.log(data))"#,
            r#"  .catch((error) => console.error(error))"#,
        ]
        .join("\n");
        assert_eq!(snippet, expected);
    }

    #[test]
    fn test_node_snippet() {
        let snippet = to_node("https://x.io/items", HttpMethod::DELETE, &KeyValues::new(), &BodyConfig::default());
        let expected = [
            "import axios from 'axios'",
            "",
            "async function run() {",
            "  try {",
            "    const response = await axios({",
            "      method: 'delete',",
            "      url: 'https://x.io/items',",
            "    })",
            "    console.log(response.data)",
            "  } catch (error) {",
            "    console.error(error)",
            "  }",
            "}",
            "",
            "run()",
        ]
        .join("\n");
        assert_eq!(snippet, expected);
    }

    #[test]
    fn test_node_snippet_headers_and_data() {
        let body = BodyConfig::with_raw(RawLanguage::Text, "hello");
        let snippet = to_node("https://x.io", HttpMethod::POST, &json_headers(), &body);
        assert!(snippet.contains("      headers: {\n        \"Content-Type\": \"application/json\"\n      },"));
        assert!(snippet.contains("      data: \"hello\","));
        assert!(!snippet.contains("X-Empty"));
    }

    #[test]
    fn test_curl_snippet_decodes_back() {
        let headers: KeyValues = [("Content-Type", "application/json"), ("Accept", "*/*")]
            .into_iter()
            .collect();
        let body = BodyConfig::with_raw(RawLanguage::Json, r#"{"name":"a","tags":[1,2]}"#);
        let snippet = to_curl("https://api.example.com/users", HttpMethod::PATCH, &headers, &body);

        let parsed = curl::decode(&snippet).unwrap();
        assert_eq!(parsed.method, HttpMethod::PATCH);
        assert_eq!(parsed.url, "https://api.example.com/users");
        assert_eq!(parsed.headers, headers);
        assert_eq!(parsed.body.raw_text(), Some(r#"{"name":"a","tags":[1,2]}"#));
    }
}

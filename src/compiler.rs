//! Request compiler
//!
//! Turns a [`RequestDefinition`] plus the live edit buffers into a
//! [`CompiledRequest`]: resolved URL, outgoing headers and a serialized body.
//! Content-Type negotiation per body mode happens here; the transport only
//! adds what it must (the multipart boundary).

use url::Url;

use crate::body::{Attachment, BodyConfig, BodyMode, FieldType};
use crate::error::{ConsoleError, Result};
use crate::models::{EditBuffers, HttpMethod, KeyValues, RequestDefinition};

const CONTENT_TYPE: &str = "Content-Type";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const APPLICATION_JSON: &str = "application/json";

/// A concrete outbound call, ready for a transport
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledRequest {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: KeyValues,
    pub body: Option<CompiledBody>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CompiledBody {
    Text(String),
    /// Multipart parts; the transport chooses the boundary
    Multipart(Vec<MultipartPart>),
    Bytes(Attachment),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MultipartPart {
    pub name: String,
    pub value: PartValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PartValue {
    Text(String),
    File(Attachment),
}

/// Compile `definition` with the live edits applied.
///
/// An endpoint that is blank after trimming fails with
/// [`ConsoleError::InvalidEndpoint`] before anything else is looked at.
pub fn compile(
    definition: &RequestDefinition,
    live: &EditBuffers,
    origin: &Url,
) -> Result<CompiledRequest> {
    let endpoint = definition.endpoint.trim();
    if endpoint.is_empty() {
        return Err(ConsoleError::InvalidEndpoint);
    }

    let mut url = resolve_url(endpoint, origin)?;
    apply_params(&mut url, &live.params);

    let method = definition.method;
    let mut headers = live.headers.non_empty();

    let body = if method.has_body() {
        serialize_body(&live.body, &mut headers)
    } else {
        None
    };

    Ok(CompiledRequest {
        url,
        method,
        headers,
        body,
    })
}

/// Absolute `http(s)://` endpoints are used as-is; anything else is joined onto `origin`
pub fn resolve_url(endpoint: &str, origin: &Url) -> Result<Url> {
    let lower = endpoint.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Url::parse(endpoint)?)
    } else {
        Ok(origin.join(endpoint)?)
    }
}

/// Set every non-empty live param on the URL, replacing same-named query params
fn apply_params(url: &mut Url, params: &KeyValues) {
    let overrides = params.non_empty();
    if overrides.is_empty() {
        return;
    }

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for (key, value) in overrides.iter() {
        match pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                pairs[first].1 = value.to_string();
                let mut index = 0;
                pairs.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => pairs.push((key.to_string(), value.to_string())),
        }
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

fn serialize_body(body: &BodyConfig, headers: &mut KeyValues) -> Option<CompiledBody> {
    match body.mode {
        BodyMode::None => None,
        BodyMode::Raw => {
            let raw = &body.raw;
            if !headers.contains_ignore_case(CONTENT_TYPE) {
                headers.set_ignore_case(CONTENT_TYPE, raw.language.content_type());
            }
            Some(CompiledBody::Text(raw.content.clone()))
        }
        BodyMode::FormData => {
            headers.remove_ignore_case(CONTENT_TYPE);
            let parts = body
                .form_data
                .iter()
                .filter(|field| !field.key.is_empty())
                .filter_map(|field| {
                    let value = match field.field_type {
                        FieldType::Text => PartValue::Text(field.value.clone()),
                        FieldType::File => PartValue::File(field.file.clone()?),
                    };
                    Some(MultipartPart {
                        name: field.key.clone(),
                        value,
                    })
                })
                .collect();
            Some(CompiledBody::Multipart(parts))
        }
        BodyMode::UrlEncoded => {
            headers.set_ignore_case(CONTENT_TYPE, FORM_URLENCODED);
            let encoded = body
                .url_encoded
                .iter()
                .filter(|pair| !pair.key.is_empty())
                .map(|pair| {
                    format!(
                        "{}={}",
                        encode_component(&pair.key),
                        encode_component(&pair.value)
                    )
                })
                .collect::<Vec<_>>()
                .join("&");
            Some(CompiledBody::Text(encoded))
        }
        BodyMode::Binary => {
            headers.remove_ignore_case(CONTENT_TYPE);
            body.binary.file.clone().map(CompiledBody::Bytes)
        }
        BodyMode::Graphql => {
            headers.set_ignore_case(CONTENT_TYPE, APPLICATION_JSON);
            let graphql = &body.graphql;
            let variables = match serde_json::from_str::<serde_json::Value>(&graphql.variables) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!(error = %e, "GraphQL variables are not JSON, sending them as a string");
                    serde_json::Value::String(graphql.variables.clone())
                }
            };
            let payload = serde_json::json!({
                "query": graphql.query,
                "variables": variables,
            });
            Some(CompiledBody::Text(payload.to_string()))
        }
    }
}

/// Percent-encode a form component, leaving `!'()*` as browsers do
fn encode_component(text: &str) -> String {
    urlencoding::encode(text)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{FormField, KvPair, RawLanguage};

    fn origin() -> Url {
        Url::parse("http://localhost:5173").unwrap()
    }

    fn definition(method: HttpMethod, endpoint: &str) -> RequestDefinition {
        RequestDefinition {
            method,
            endpoint: endpoint.to_string(),
            ..RequestDefinition::default()
        }
    }

    fn live_with_body(body: BodyConfig) -> EditBuffers {
        EditBuffers {
            body,
            ..EditBuffers::default()
        }
    }

    fn text_body(compiled: &CompiledRequest) -> &str {
        match &compiled.body {
            Some(CompiledBody::Text(text)) => text,
            other => panic!("expected text body, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_endpoint_is_invalid() {
        let result = compile(&definition(HttpMethod::GET, "   "), &EditBuffers::default(), &origin());
        assert!(matches!(result, Err(ConsoleError::InvalidEndpoint)));
    }

    #[test]
    fn test_relative_endpoint_resolves_against_origin() {
        let compiled = compile(&definition(HttpMethod::GET, "/api/users"), &EditBuffers::default(), &origin()).unwrap();
        assert_eq!(compiled.url.as_str(), "http://localhost:5173/api/users");

        let compiled = compile(&definition(HttpMethod::GET, " HTTPS://api.example.com/x "), &EditBuffers::default(), &origin()).unwrap();
        assert_eq!(compiled.url.as_str(), "https://api.example.com/x");
    }

    #[test]
    fn test_params_override_endpoint_query() {
        let live = EditBuffers {
            params: [("page", "2"), ("limit", ""), ("sort", "name")].into_iter().collect(),
            ..EditBuffers::default()
        };
        let compiled = compile(
            &definition(HttpMethod::GET, "https://x.io/items?page=1&limit=5&page=9"),
            &live,
            &origin(),
        )
        .unwrap();
        assert_eq!(compiled.url.as_str(), "https://x.io/items?page=2&limit=5&sort=name");
    }

    #[test]
    fn test_empty_header_values_are_omitted() {
        let live = EditBuffers {
            headers: [("X-Test", ""), ("X-Keep", "v")].into_iter().collect(),
            ..EditBuffers::default()
        };
        let compiled = compile(&definition(HttpMethod::GET, "https://x.io"), &live, &origin()).unwrap();
        assert_eq!(compiled.headers.iter().collect::<Vec<_>>(), vec![("X-Keep", "v")]);
    }

    #[test]
    fn test_raw_keeps_existing_content_type() {
        let mut live = live_with_body(BodyConfig::with_raw(RawLanguage::Json, "# hi"));
        live.headers.insert("content-type", "text/markdown");

        let compiled = compile(&definition(HttpMethod::POST, "https://x.io"), &live, &origin()).unwrap();
        assert_eq!(compiled.headers.get_ignore_case("Content-Type"), Some("text/markdown"));
        assert_eq!(compiled.headers.len(), 1);
        assert_eq!(text_body(&compiled), "# hi");
    }

    #[test]
    fn test_raw_sets_content_type_from_language() {
        for (language, expected) in [
            (RawLanguage::Json, "application/json"),
            (RawLanguage::Text, "text/plain"),
            (RawLanguage::Xml, "application/xml"),
            (RawLanguage::Html, "text/html"),
        ] {
            let live = live_with_body(BodyConfig::with_raw(language, "x"));
            let compiled = compile(&definition(HttpMethod::PUT, "https://x.io"), &live, &origin()).unwrap();
            assert_eq!(compiled.headers.get("Content-Type"), Some(expected));
        }
    }

    #[test]
    fn test_urlencoded_drops_empty_keys_keeps_empty_values() {
        let body = BodyConfig::with_url_encoded(vec![
            KvPair::new("a", "1"),
            KvPair::new("b", ""),
            KvPair::new("", "x"),
        ]);
        let mut live = live_with_body(body);
        live.headers.insert("content-type", "text/plain");

        let compiled = compile(&definition(HttpMethod::POST, "https://x.io"), &live, &origin()).unwrap();
        assert_eq!(text_body(&compiled), "a=1&b=");
        assert_eq!(
            compiled.headers.get("content-type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_urlencoded_percent_encodes_components() {
        let live = live_with_body(BodyConfig::with_url_encoded(vec![KvPair::new("full name", "Jane & Co")]));
        let compiled = compile(&definition(HttpMethod::POST, "https://x.io"), &live, &origin()).unwrap();
        assert_eq!(text_body(&compiled), "full%20name=Jane%20%26%20Co");
    }

    #[test]
    fn test_urlencoded_keeps_unreserved_marks() {
        let live = live_with_body(BodyConfig::with_url_encoded(vec![KvPair::new("a(b)", "it's!*~")]));
        let compiled = compile(&definition(HttpMethod::POST, "https://x.io"), &live, &origin()).unwrap();
        assert_eq!(text_body(&compiled), "a(b)=it's!*~");
    }

    #[test]
    fn test_get_and_head_never_carry_a_body() {
        let mut body = BodyConfig::with_raw(RawLanguage::Json, "{}");
        body.graphql.query = "{ me }".into();
        body.binary.file = Some(Attachment::new("a.bin", vec![1]));
        body.push_form_field(FormField::text("a", "1"));
        body.push_url_encoded(KvPair::new("a", "1"));

        for method in [HttpMethod::GET, HttpMethod::HEAD] {
            for mode in BodyMode::ALL {
                let mut live = live_with_body(body.clone());
                live.body.set_mode(mode);
                let compiled = compile(&definition(method, "https://x.io"), &live, &origin()).unwrap();
                assert_eq!(compiled.body, None, "{} with {}", method, mode);
                assert!(!compiled.headers.contains_ignore_case("Content-Type"));
            }
        }
    }

    #[test]
    fn test_form_data_removes_content_type_and_skips_unattached_files() {
        let attachment = Attachment::new("avatar.png", vec![0x89, 0x50]);
        let mut detached = FormField::file("missing", attachment.clone());
        detached.file = None;
        let body = BodyConfig::with_form_data(vec![
            FormField::text("name", "Jane"),
            FormField::text("", "ignored"),
            FormField::file("avatar", attachment.clone()),
            detached,
        ]);
        let mut live = live_with_body(body);
        live.headers.insert("Content-Type", "application/json");

        let compiled = compile(&definition(HttpMethod::POST, "https://x.io"), &live, &origin()).unwrap();
        assert!(!compiled.headers.contains_ignore_case("content-type"));
        assert_eq!(
            compiled.body,
            Some(CompiledBody::Multipart(vec![
                MultipartPart { name: "name".into(), value: PartValue::Text("Jane".into()) },
                MultipartPart { name: "avatar".into(), value: PartValue::File(attachment) },
            ]))
        );
    }

    #[test]
    fn test_binary_without_attachment_has_no_body() {
        let mut body = BodyConfig::default();
        body.set_mode(BodyMode::Binary);
        let mut live = live_with_body(body);
        live.headers.insert("Content-Type", "application/octet-stream");

        let compiled = compile(&definition(HttpMethod::PUT, "https://x.io"), &live, &origin()).unwrap();
        assert_eq!(compiled.body, None);
        assert!(compiled.headers.is_empty());

        live.body.binary.file = Some(Attachment::new("blob", vec![1, 2, 3]));
        let compiled = compile(&definition(HttpMethod::PUT, "https://x.io"), &live, &origin()).unwrap();
        assert!(matches!(compiled.body, Some(CompiledBody::Bytes(ref a)) if a.bytes() == [1, 2, 3]));
    }

    #[test]
    fn test_graphql_payload() {
        let mut body = BodyConfig::default();
        body.set_mode(BodyMode::Graphql);
        body.graphql.query = "query($id: ID!) { user(id: $id) { name } }".into();
        body.graphql.variables = r#"{"id": "42"}"#.into();
        let mut live = live_with_body(body);
        live.headers.insert("content-type", "text/plain");

        let compiled = compile(&definition(HttpMethod::POST, "/graphql"), &live, &origin()).unwrap();
        assert_eq!(compiled.headers.get("content-type"), Some("application/json"));
        let payload: serde_json::Value = serde_json::from_str(text_body(&compiled)).unwrap();
        assert_eq!(payload["query"], "query($id: ID!) { user(id: $id) { name } }");
        assert_eq!(payload["variables"], serde_json::json!({"id": "42"}));
    }

    #[test]
    fn test_graphql_invalid_variables_fall_back_to_string() {
        let mut body = BodyConfig::default();
        body.set_mode(BodyMode::Graphql);
        body.graphql.query = "{ me }".into();
        body.graphql.variables = "{not json".into();

        let compiled = compile(&definition(HttpMethod::POST, "/graphql"), &live_with_body(body), &origin()).unwrap();
        let payload: serde_json::Value = serde_json::from_str(text_body(&compiled)).unwrap();
        assert_eq!(payload["variables"], serde_json::Value::String("{not json".into()));
    }

    #[test]
    fn test_none_mode_leaves_headers_untouched() {
        let mut live = EditBuffers::default();
        live.headers.insert("Content-Type", "application/json");
        let compiled = compile(&definition(HttpMethod::DELETE, "https://x.io/1"), &live, &origin()).unwrap();
        assert_eq!(compiled.body, None);
        assert_eq!(compiled.headers.get("Content-Type"), Some("application/json"));
    }
}

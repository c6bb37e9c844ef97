//! cURL command import
//!
//! Only a documented subset of curl is understood: `-X`, a double-quoted URL,
//! `-H "name: value"`, `-F "key=value"`, `--data-urlencode`, and the raw data
//! flags (`--data-raw`, `--data-binary`, `--data`, `-d`) with a single- or
//! double-quoted payload. Each piece is extracted by its own rule, so a command
//! missing one of them still yields the rest.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::body::{BodyConfig, FormField, KvPair, RawLanguage};
use crate::models::{HttpMethod, KeyValues};

/// Structured request recovered from a cURL command
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedCurl {
    pub method: HttpMethod,
    /// Empty when no double-quoted URL was found; such a result must not be applied
    pub url: String,
    pub headers: KeyValues,
    pub params: KeyValues,
    /// Exactly one mode is populated; the others hold defaults
    pub body: BodyConfig,
}

/// Cheap pre-check: does the text start with the `curl ` token?
pub fn looks_like_command(text: &str) -> bool {
    text.trim()
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("curl "))
}

/// Decode a cURL command, or `None` if the text is not one
pub fn decode(input: &str) -> Option<ParsedCurl> {
    if !looks_like_command(input) {
        return None;
    }

    let command = join_continuations(input);
    let method = extract_method(&command);
    let url = extract_url(&command);
    let headers = extract_headers(&command);
    let params = extract_params(&url);
    let body = infer_body(&command, &headers);

    tracing::debug!(method = %method, url = %url, mode = %body.mode, "Decoded cURL command");

    Some(ParsedCurl {
        method,
        url,
        headers,
        params,
        body,
    })
}

/// Name for a definition imported from `url`: `<METHOD> <path>`, or the
/// host when the path is `/`. Unparsable URLs are used verbatim.
pub fn infer_name(method: HttpMethod, url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let target = match parsed.path() {
                "/" => parsed.host_str().unwrap_or("/"),
                path => path,
            };
            format!("{} {}", method, target)
        }
        Err(_) => url.to_string(),
    }
}

fn method_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|\s)-X\s+(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\b").unwrap()
    })
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)curl\s+(?:-X?\s*(?:GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)?\s*)?"([^"]+)""#,
        )
        .unwrap()
    })
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)(?:^|\s)-H\s+"([^"]*)""#).unwrap())
}

fn form_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)(?:^|\s)-F\s+"([^"]*)""#).unwrap())
}

fn urlencode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"--data-urlencode\s+(?:'([^']*)'|"([^"]*)")"#).unwrap())
}

fn raw_data_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?:^|\s)(?:--data-raw|--data-binary|--data|-d)\s+(?:'([^']*)'|"([^"]*)")"#)
            .unwrap()
    })
}

/// Fold shell line continuations into plain spaces
fn join_continuations(input: &str) -> String {
    input.replace("\\\r\n", " ").replace("\\\n", " ")
}

/// Text of whichever alternative group matched
fn either_group(caps: &regex::Captures<'_>) -> Option<String> {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn extract_method(command: &str) -> HttpMethod {
    method_regex()
        .captures(command)
        .and_then(|caps| HttpMethod::parse(&caps[1]))
        .unwrap_or(HttpMethod::GET)
}

fn extract_url(command: &str) -> String {
    url_regex()
        .captures(command)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

fn extract_headers(command: &str) -> KeyValues {
    let mut headers = KeyValues::new();
    for caps in header_regex().captures_iter(command) {
        let line = &caps[1];
        let (name, value) = line.split_once(':').unwrap_or((line, ""));
        let name = name.trim();
        if !name.is_empty() {
            headers.insert(name, value.trim());
        }
    }
    headers
}

/// Query parameters of `url`; a malformed URL has none
fn extract_params(url: &str) -> KeyValues {
    match Url::parse(url) {
        Ok(parsed) => parsed.query_pairs().collect(),
        Err(_) => KeyValues::new(),
    }
}

fn extract_form_fields(command: &str) -> Vec<FormField> {
    form_regex()
        .captures_iter(command)
        .filter_map(|caps| {
            let (key, value) = caps[1].split_once('=')?;
            let key = key.trim();
            (!key.is_empty()).then(|| FormField::text(key, value.trim()))
        })
        .collect()
}

fn extract_urlencoded_pairs(command: &str) -> Vec<String> {
    urlencode_regex()
        .captures_iter(command)
        .filter_map(|caps| either_group(&caps))
        .filter(|pair| !pair.is_empty())
        .collect()
}

fn extract_raw_payload(command: &str) -> Option<String> {
    raw_data_regex()
        .captures(command)
        .and_then(|caps| either_group(&caps))
}

/// Split `a=1&b=2` into percent-decoded pairs; later duplicates win
fn parse_query_string(input: &str) -> Vec<KvPair> {
    let decode = |s: &str| {
        urlencoding::decode(s)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| s.to_string())
    };

    let mut pairs = KeyValues::new();
    for part in input.split('&') {
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        let key = key.trim();
        if !key.is_empty() {
            pairs.insert(decode(key), decode(value.trim()));
        }
    }
    pairs.iter().map(|(k, v)| KvPair::new(k, v)).collect()
}

/// Pick the body mode by fixed priority: form-data, urlencoded, raw, none.
/// A higher-priority match wins even when lower-priority flags are present.
fn infer_body(command: &str, headers: &KeyValues) -> BodyConfig {
    let form_fields = extract_form_fields(command);
    if !form_fields.is_empty() {
        return BodyConfig::with_form_data(form_fields);
    }

    let content_type = headers
        .get_ignore_case("content-type")
        .unwrap_or("")
        .to_lowercase();
    let urlencoded_pairs = extract_urlencoded_pairs(command);
    let raw_payload = extract_raw_payload(command);

    if !urlencoded_pairs.is_empty() || content_type.contains("application/x-www-form-urlencoded") {
        let rows = if urlencoded_pairs.is_empty() {
            parse_query_string(raw_payload.as_deref().unwrap_or(""))
        } else {
            urlencoded_pairs
                .iter()
                .map(|pair| {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    KvPair::new(key.trim(), value.trim())
                })
                .collect()
        };
        return BodyConfig::with_url_encoded(rows);
    }

    match raw_payload.filter(|payload| !payload.is_empty()) {
        Some(payload) => {
            let language = if content_type.contains("application/json") {
                RawLanguage::Json
            } else {
                RawLanguage::Text
            };
            BodyConfig::with_raw(language, payload)
        }
        None => BodyConfig::default(),
    }
}

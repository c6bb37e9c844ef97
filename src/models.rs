use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::body::BodyConfig;
use crate::constants::INVALID_ENDPOINT_MESSAGE;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
        HttpMethod::HEAD,
        HttpMethod::OPTIONS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    /// Case-insensitive lookup of one of the seven supported methods
    pub fn parse(s: &str) -> Option<HttpMethod> {
        let upper = s.trim().to_uppercase();
        HttpMethod::ALL.into_iter().find(|m| m.as_str() == upper)
    }

    pub fn next(&self) -> HttpMethod {
        match self {
            HttpMethod::GET => HttpMethod::POST,
            HttpMethod::POST => HttpMethod::PUT,
            HttpMethod::PUT => HttpMethod::PATCH,
            HttpMethod::PATCH => HttpMethod::DELETE,
            HttpMethod::DELETE => HttpMethod::HEAD,
            HttpMethod::HEAD => HttpMethod::OPTIONS,
            HttpMethod::OPTIONS => HttpMethod::GET,
        }
    }

    /// GET and HEAD never carry a request body
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::GET | HttpMethod::HEAD)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HttpMethod::parse(&value).ok_or_else(|| format!("Unknown HTTP method: {}", value))
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::HEAD => reqwest::Method::HEAD,
            HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        }
    }
}

/// Ordered string map with unique keys, used for headers and query params.
///
/// Persisted as a plain mapping; scalar values of any type are read back as text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyValues(Vec<(String, String)>);

impl KeyValues {
    pub fn new() -> Self {
        KeyValues(Vec::new())
    }

    /// Insert or overwrite an exact key. An overwritten key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_ignore_case(&self, key: &str) -> bool {
        self.get_ignore_case(key).is_some()
    }

    /// Overwrite the first case-insensitive match, or append `key` as given
    pub fn set_ignore_case(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    /// Remove every case-insensitive match of `key`
    pub fn remove_ignore_case(&mut self, key: &str) {
        self.0.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy of the entries whose value is non-empty
    pub fn non_empty(&self) -> KeyValues {
        self.iter().filter(|(_, v)| !v.is_empty()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut kv = KeyValues::new();
        for (k, v) in iter {
            kv.insert(k, v);
        }
        kv
    }
}

impl Serialize for KeyValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeyValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyValuesVisitor;

        impl<'de> Visitor<'de> for KeyValuesVisitor {
            type Value = KeyValues;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<KeyValues, A::Error> {
                let mut kv = KeyValues::new();
                while let Some((key, value)) = access.next_entry::<String, ScalarText>()? {
                    kv.insert(key, value.0);
                }
                Ok(kv)
            }

            fn visit_unit<E: de::Error>(self) -> Result<KeyValues, E> {
                Ok(KeyValues::new())
            }
        }

        deserializer.deserialize_map(KeyValuesVisitor)
    }
}

/// Any scalar coerced to text; null becomes the empty string
struct ScalarText(String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = ScalarText;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number, boolean or null")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<ScalarText, E> {
                Ok(ScalarText(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<ScalarText, E> {
                Ok(ScalarText(String::new()))
            }

            fn visit_none<E: de::Error>(self) -> Result<ScalarText, E> {
                Ok(ScalarText(String::new()))
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<ScalarText, D::Error> {
                ScalarText::deserialize(d)
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A named API request as kept by the collection store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// URL template, absolute or relative to the configured origin
    pub endpoint: String,
    pub method: HttpMethod,
    #[serde(rename = "isEnabled", alias = "enabled")]
    pub enabled: bool,
    pub headers: KeyValues,
    pub params: KeyValues,
    pub body: BodyConfig,
}

impl Default for RequestDefinition {
    fn default() -> Self {
        RequestDefinition {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            endpoint: String::new(),
            method: HttpMethod::GET,
            enabled: true,
            headers: KeyValues::new(),
            params: KeyValues::new(),
            body: BodyConfig::default(),
        }
    }
}

/// Live, possibly unsaved edits of a definition's headers, params and body
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditBuffers {
    pub headers: KeyValues,
    pub params: KeyValues,
    pub body: BodyConfig,
}

impl EditBuffers {
    pub fn from_definition(definition: &RequestDefinition) -> Self {
        let mut body = definition.body.clone();
        body.ensure_placeholders();
        EditBuffers {
            headers: definition.headers.clone(),
            params: definition.params.clone(),
            body,
        }
    }
}

/// Listing filter on the enabled flag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Enabled,
    Disabled,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<StatusFilter> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Some(StatusFilter::All),
            "enabled" => Some(StatusFilter::Enabled),
            "disabled" => Some(StatusFilter::Disabled),
            _ => None,
        }
    }

    pub fn matches(&self, definition: &RequestDefinition) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Enabled => definition.enabled,
            StatusFilter::Disabled => !definition.enabled,
        }
    }
}

/// Status of a request attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseStatus {
    Code(u16),
    InvalidEndpoint,
    NetworkError,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Code(code) => write!(f, "{}", code),
            ResponseStatus::InvalidEndpoint => f.write_str("INVALID_ENDPOINT"),
            ResponseStatus::NetworkError => f.write_str("NETWORK_ERROR"),
        }
    }
}

/// Response payload: JSON when the text parses, the text itself otherwise
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// An empty body becomes JSON `null`
    pub fn from_text(text: String) -> Self {
        if text.is_empty() {
            return ResponseBody::Json(serde_json::Value::Null);
        }
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(json) => ResponseBody::Json(json),
            Err(_) => ResponseBody::Text(text),
        }
    }

    pub fn pretty(&self) -> String {
        match self {
            ResponseBody::Json(json) => {
                serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
            }
            ResponseBody::Text(text) => text.clone(),
        }
    }
}

/// Outcome of one request attempt
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseInfo {
    pub status: ResponseStatus,
    pub ok: bool,
    pub body: ResponseBody,
    pub url: String,
    pub duration_ms: u64,
}

impl ResponseInfo {
    pub fn invalid_endpoint() -> Self {
        ResponseInfo {
            status: ResponseStatus::InvalidEndpoint,
            ok: false,
            body: ResponseBody::Text(INVALID_ENDPOINT_MESSAGE.to_string()),
            url: String::new(),
            duration_ms: 0,
        }
    }

    pub fn network_error(message: impl Into<String>, url: impl Into<String>, duration_ms: u64) -> Self {
        ResponseInfo {
            status: ResponseStatus::NetworkError,
            ok: false,
            body: ResponseBody::Text(message.into()),
            url: url.into(),
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!(HttpMethod::parse("options"), Some(HttpMethod::OPTIONS));
        assert_eq!(HttpMethod::parse(" Patch "), Some(HttpMethod::PATCH));
        assert_eq!(HttpMethod::parse("TRACE"), None);
        assert!(!HttpMethod::HEAD.has_body());
        assert!(HttpMethod::DELETE.has_body());
    }

    #[test]
    fn test_insert_last_wins_keeps_position() {
        let mut kv = KeyValues::new();
        kv.insert("Accept", "text/html");
        kv.insert("X-Id", "1");
        kv.insert("Accept", "application/json");

        let entries: Vec<_> = kv.iter().collect();
        assert_eq!(entries, vec![("Accept", "application/json"), ("X-Id", "1")]);
    }

    #[test]
    fn test_set_ignore_case_overwrites_first_match() {
        let mut kv: KeyValues = [("content-type", "text/markdown")].into_iter().collect();
        kv.set_ignore_case("Content-Type", "application/json");
        assert_eq!(kv.len(), 1);
        assert_eq!(kv.get("content-type"), Some("application/json"));

        kv.set_ignore_case("Accept", "*/*");
        assert_eq!(kv.get("Accept"), Some("*/*"));
    }

    #[test]
    fn test_remove_ignore_case_removes_all() {
        let mut kv: KeyValues = [("Content-Type", "a"), ("X", "1"), ("content-type", "b")]
            .into_iter()
            .collect();
        kv.remove_ignore_case("CONTENT-TYPE");
        assert_eq!(kv.iter().collect::<Vec<_>>(), vec![("X", "1")]);
    }

    #[test]
    fn test_key_values_coerce_scalars() {
        let kv: KeyValues =
            serde_json::from_str(r#"{"page": 2, "debug": true, "q": null, "name": "x"}"#).unwrap();
        assert_eq!(kv.get("page"), Some("2"));
        assert_eq!(kv.get("debug"), Some("true"));
        assert_eq!(kv.get("q"), Some(""));
        assert_eq!(kv.get("name"), Some("x"));
        assert_eq!(kv.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["page", "debug", "q", "name"]);
    }

    #[test]
    fn test_definition_reads_enabled_flag_and_defaults() {
        let def: RequestDefinition = serde_json::from_str(
            r#"{"name":"Users","endpoint":"/users","method":"post","isEnabled":false}"#,
        )
        .unwrap();
        assert_eq!(def.method, HttpMethod::POST);
        assert!(!def.enabled);
        assert_eq!(def.body, BodyConfig::default());
    }

    #[test]
    fn test_response_body_from_text() {
        assert_eq!(ResponseBody::from_text(String::new()), ResponseBody::Json(serde_json::Value::Null));
        assert_eq!(
            ResponseBody::from_text("not json".into()),
            ResponseBody::Text("not json".into())
        );
        assert!(matches!(ResponseBody::from_text(r#"{"a":1}"#.into()), ResponseBody::Json(_)));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ResponseStatus::Code(404).to_string(), "404");
        assert_eq!(ResponseStatus::InvalidEndpoint.to_string(), "INVALID_ENDPOINT");
        assert_eq!(ResponseStatus::NetworkError.to_string(), "NETWORK_ERROR");
    }
}

//! Request body model
//!
//! A [`BodyConfig`] keeps the data of every body mode at once and only tags
//! one of them as active, so switching modes in the editor never loses what
//! was typed under another mode. Anything producing wire artifacts must go
//! through the mode-guarded accessors.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Active body encoding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BodyMode {
    #[default]
    None,
    Raw,
    FormData,
    UrlEncoded,
    Binary,
    Graphql,
}

impl BodyMode {
    pub const ALL: [BodyMode; 6] = [
        BodyMode::None,
        BodyMode::FormData,
        BodyMode::Raw,
        BodyMode::Binary,
        BodyMode::UrlEncoded,
        BodyMode::Graphql,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyMode::None => "none",
            BodyMode::Raw => "raw",
            BodyMode::FormData => "form-data",
            BodyMode::UrlEncoded => "urlencoded",
            BodyMode::Binary => "binary",
            BodyMode::Graphql => "graphql",
        }
    }

    /// Human-facing label used by the console
    pub fn label(&self) -> &'static str {
        match self {
            BodyMode::UrlEncoded => "x-www-form-urlencoded",
            BodyMode::Graphql => "GraphQL",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for BodyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for BodyMode {
    fn from(value: String) -> Self {
        normalize_mode(&value)
    }
}

impl From<BodyMode> for String {
    fn from(mode: BodyMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Map any user or persisted spelling of a body mode onto [`BodyMode`].
///
/// Case-insensitive and total: unknown input becomes [`BodyMode::None`].
pub fn normalize_mode(raw: &str) -> BodyMode {
    match raw.trim().to_lowercase().as_str() {
        "raw" => BodyMode::Raw,
        "formdata" | "form-data" => BodyMode::FormData,
        "x-www-form-urlencoded" | "urlencoded" => BodyMode::UrlEncoded,
        "binary" => BodyMode::Binary,
        "graphql" => BodyMode::Graphql,
        _ => BodyMode::None,
    }
}

/// Syntax of a raw body, which also decides its default Content-Type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RawLanguage {
    #[default]
    Json,
    Text,
    Xml,
    Html,
}

impl RawLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RawLanguage::Json => "json",
            RawLanguage::Text => "text",
            RawLanguage::Xml => "xml",
            RawLanguage::Html => "html",
        }
    }

    pub fn parse(s: &str) -> Option<RawLanguage> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(RawLanguage::Json),
            "text" => Some(RawLanguage::Text),
            "xml" => Some(RawLanguage::Xml),
            "html" => Some(RawLanguage::Html),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            RawLanguage::Json => "application/json",
            RawLanguage::Text => "text/plain",
            RawLanguage::Xml => "application/xml",
            RawLanguage::Html => "text/html",
        }
    }
}

impl From<String> for RawLanguage {
    fn from(value: String) -> Self {
        RawLanguage::parse(&value).unwrap_or_default()
    }
}

impl From<RawLanguage> for String {
    fn from(language: RawLanguage) -> Self {
        language.as_str().to_string()
    }
}

/// Opaque handle to file content picked by the user.
///
/// Cheap to clone; never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    data: Arc<[u8]>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Attachment {
            file_name: file_name.into(),
            data: Arc::from(data.into()),
        }
    }

    /// Read a file from disk into an attachment named after its final path component
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Attachment::new(file_name, data))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("len", &self.data.len())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    File,
}

/// One multipart row. File rows carry an [`Attachment`] instead of text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormField {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip)]
    pub file: Option<Attachment>,
}

impl FormField {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        FormField {
            key: key.into(),
            value: value.into(),
            field_type: FieldType::Text,
            file: None,
        }
    }

    pub fn file(key: impl Into<String>, attachment: Attachment) -> Self {
        FormField {
            key: key.into(),
            value: attachment.file_name().to_string(),
            field_type: FieldType::File,
            file: Some(attachment),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvPair {
    pub key: String,
    pub value: String,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KvPair {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBody {
    pub language: RawLanguage,
    pub content: String,
}

impl RawBody {
    /// Parse error of JSON content. Blank content and non-JSON languages have none.
    pub fn json_error(&self) -> Option<String> {
        if self.language != RawLanguage::Json || self.content.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<serde_json::Value>(&self.content)
            .err()
            .map(|e| e.to_string())
    }

    /// Re-indent JSON content with two spaces
    pub fn beautify(&mut self) -> Result<(), serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(&self.content)?;
        self.content = serde_json::to_string_pretty(&value)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BinaryBody {
    pub file_name: String,
    #[serde(skip)]
    pub file: Option<Attachment>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphqlBody {
    pub query: String,
    /// JSON text, parsed leniently when the request is compiled
    pub variables: String,
}

impl Default for GraphqlBody {
    fn default() -> Self {
        GraphqlBody {
            query: String::new(),
            variables: String::from("{}"),
        }
    }
}

/// Canonical body of a request definition.
///
/// Persisted shapes missing any field deserialize with that field taken from
/// [`BodyConfig::default`]. The flat shape with `raw` as plain text next to a
/// `rawLanguage` key is accepted too.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PersistedBody")]
pub struct BodyConfig {
    pub mode: BodyMode,
    pub raw: RawBody,
    pub form_data: Vec<FormField>,
    pub url_encoded: Vec<KvPair>,
    pub binary: BinaryBody,
    pub graphql: GraphqlBody,
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig {
            mode: BodyMode::None,
            raw: RawBody::default(),
            form_data: vec![FormField::default()],
            url_encoded: vec![KvPair::default()],
            binary: BinaryBody::default(),
            graphql: GraphqlBody::default(),
        }
    }
}

/// Raw body as persisted: either the structured form or bare content
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedRaw {
    Content(String),
    Body(RawBody),
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PersistedBody {
    mode: BodyMode,
    raw: Option<PersistedRaw>,
    raw_language: Option<RawLanguage>,
    form_data: Option<Vec<FormField>>,
    url_encoded: Option<Vec<KvPair>>,
    binary: Option<BinaryBody>,
    graphql: Option<GraphqlBody>,
}

impl From<PersistedBody> for BodyConfig {
    fn from(persisted: PersistedBody) -> Self {
        let defaults = BodyConfig::default();
        let mut raw = match persisted.raw {
            Some(PersistedRaw::Body(raw)) => raw,
            Some(PersistedRaw::Content(content)) => RawBody {
                content,
                ..RawBody::default()
            },
            None => defaults.raw,
        };
        if let Some(language) = persisted.raw_language {
            raw.language = language;
        }

        BodyConfig {
            mode: persisted.mode,
            raw,
            form_data: persisted.form_data.unwrap_or(defaults.form_data),
            url_encoded: persisted.url_encoded.unwrap_or(defaults.url_encoded),
            binary: persisted.binary.unwrap_or(defaults.binary),
            graphql: persisted.graphql.unwrap_or(defaults.graphql),
        }
    }
}

impl BodyConfig {
    pub fn with_raw(language: RawLanguage, content: impl Into<String>) -> Self {
        BodyConfig {
            mode: BodyMode::Raw,
            raw: RawBody {
                language,
                content: content.into(),
            },
            ..BodyConfig::default()
        }
    }

    pub fn with_form_data(fields: Vec<FormField>) -> Self {
        let mut body = BodyConfig {
            mode: BodyMode::FormData,
            form_data: fields,
            ..BodyConfig::default()
        };
        body.ensure_placeholders();
        body
    }

    pub fn with_url_encoded(pairs: Vec<KvPair>) -> Self {
        let mut body = BodyConfig {
            mode: BodyMode::UrlEncoded,
            url_encoded: pairs,
            ..BodyConfig::default()
        };
        body.ensure_placeholders();
        body
    }

    /// Switch the active mode. Data of every mode is kept.
    pub fn set_mode(&mut self, mode: BodyMode) {
        self.mode = mode;
    }

    pub fn raw(&self) -> Option<&RawBody> {
        (self.mode == BodyMode::Raw).then_some(&self.raw)
    }

    pub fn form_data(&self) -> Option<&[FormField]> {
        (self.mode == BodyMode::FormData).then_some(self.form_data.as_slice())
    }

    pub fn url_encoded(&self) -> Option<&[KvPair]> {
        (self.mode == BodyMode::UrlEncoded).then_some(self.url_encoded.as_slice())
    }

    pub fn binary(&self) -> Option<&BinaryBody> {
        (self.mode == BodyMode::Binary).then_some(&self.binary)
    }

    pub fn graphql(&self) -> Option<&GraphqlBody> {
        (self.mode == BodyMode::Graphql).then_some(&self.graphql)
    }

    /// Non-empty raw content, when raw mode is active
    pub fn raw_text(&self) -> Option<&str> {
        self.raw()
            .map(|raw| raw.content.as_str())
            .filter(|content| !content.is_empty())
    }

    /// Editable row lists must never be empty
    pub fn ensure_placeholders(&mut self) {
        if self.form_data.is_empty() {
            self.form_data.push(FormField::default());
        }
        if self.url_encoded.is_empty() {
            self.url_encoded.push(KvPair::default());
        }
    }

    /// Fill a form-data row: the first placeholder row is reused, else appended
    pub fn push_form_field(&mut self, field: FormField) {
        match self.form_data.iter_mut().find(|f| f.key.is_empty() && f.value.is_empty()) {
            Some(slot) => *slot = field,
            None => self.form_data.push(field),
        }
    }

    pub fn push_url_encoded(&mut self, pair: KvPair) {
        match self.url_encoded.iter_mut().find(|p| p.key.is_empty() && p.value.is_empty()) {
            Some(slot) => *slot = pair,
            None => self.url_encoded.push(pair),
        }
    }
}

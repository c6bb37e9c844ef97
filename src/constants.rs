//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Origin used to resolve endpoints that carry no scheme
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Quiet period before a typed cURL command is decoded
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Whole-request timeout for the HTTP transport
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Directory under the home directory holding settings and collections
pub const CONFIG_DIR_NAME: &str = ".consolex";

pub const COLLECTIONS_FILE: &str = "collections.yaml";
pub const SETTINGS_FILE: &str = "settings.yaml";
pub const LOG_FILE: &str = "consolex.log";

/// Body text of an `INVALID_ENDPOINT` outcome
pub const INVALID_ENDPOINT_MESSAGE: &str = "Endpoint cannot be empty.";

/// Notice shown after a typed cURL command has been applied
pub const CURL_APPLIED_NOTICE: &str = "Loaded fields from detected cURL command.";

/// Application name
pub const APP_NAME: &str = "consolex";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

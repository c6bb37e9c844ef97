//! # consolex
//!
//! An interactive API request console: define named requests, import them
//! from cURL commands, send them, and export them as code snippets.
//!
//! ## Features
//! - HTTP methods: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS
//! - Body modes: raw, form-data, x-www-form-urlencoded, binary, GraphQL
//! - Debounced cURL import from the endpoint field
//! - cURL, JavaScript fetch and Node axios snippets
//! - Saved request collections
//!
//! ## Architecture
//! Actor-based with channels:
//! - Console driver - line input and printing
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod body;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod curl;
pub mod debounce;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod snippet;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use body::{normalize_mode, BodyConfig, BodyMode};
pub use compiler::{compile, CompiledRequest};
pub use config::Settings;
pub use curl::{decode, looks_like_command, ParsedCurl};
pub use error::{ConsoleError, Result};
pub use messages::{NetworkCommand, NetworkResponse, RenderEvent, UiEvent};
pub use models::{EditBuffers, HttpMethod, KeyValues, RequestDefinition, ResponseInfo};
pub use network::{execute_request, HttpTransport, NetworkActor, Transport};
pub use snippet::SnippetKind;
pub use storage::CollectionStore;

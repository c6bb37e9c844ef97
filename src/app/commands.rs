//! Command handlers - business logic for processing UI events

use std::path::Path;

use crate::app::AppState;
use crate::body::{Attachment, BodyMode, FormField, KvPair, RawLanguage};
use crate::constants::CURL_APPLIED_NOTICE;
use crate::curl::{self, ParsedCurl};
use crate::messages::{NetworkCommand, NetworkResponse, RenderEvent};
use crate::models::{HttpMethod, RequestDefinition, StatusFilter};
use crate::snippet::{self, SnippetKind};

impl AppState {
    // ========================
    // Collection
    // ========================

    pub fn list(&mut self, filter: StatusFilter) {
        let definitions = self.storage.list_filtered(filter);
        self.emit(RenderEvent::Listing(definitions));
    }

    pub fn select(&mut self, id: &str) {
        match self.storage.get(id).cloned() {
            Some(definition) => {
                self.load_definition(definition, false);
                let event = self.to_render_event();
                self.emit(event);
            }
            None => self.error(format!("No request with id '{}'", id)),
        }
    }

    pub fn show(&mut self) {
        let event = self.to_render_event();
        self.emit(event);
    }

    pub fn new_request(&mut self) {
        self.load_definition(RequestDefinition::default(), true);
        self.notice("Started a new request.");
    }

    pub fn save(&mut self) {
        let mut definition = self.merged_definition();
        definition.name = definition.name.trim().to_string();
        definition.description = definition.description.trim().to_string();
        definition.endpoint = definition.endpoint.trim().to_string();

        if definition.name.is_empty() || definition.endpoint.is_empty() {
            self.error("Name and endpoint are required.");
            return;
        }

        let result = if self.is_new {
            self.storage.create(definition)
        } else {
            let id = self.draft.id.clone();
            self.storage.update(&id, definition)
        };

        match result {
            Ok(saved) => {
                self.notice(format!("Saved '{}' as {}", saved.name, saved.id));
                self.draft = saved;
                self.is_new = false;
            }
            Err(e) => self.error(format!("Could not save: {}", e)),
        }
    }

    pub fn delete_current(&mut self) {
        if self.is_new {
            self.error("The current request has not been saved.");
            return;
        }
        let id = self.draft.id.clone();
        match self.storage.delete(&id) {
            Ok(true) => {
                self.load_definition(RequestDefinition::default(), true);
                self.notice(format!("Deleted {}", id));
            }
            Ok(false) => self.error(format!("No request with id '{}'", id)),
            Err(e) => self.error(format!("Could not delete: {}", e)),
        }
    }

    // ========================
    // Request fields
    // ========================

    /// Set the endpoint text. Returns whether it looks like a cURL command to decode.
    pub fn set_endpoint(&mut self, text: String) -> bool {
        let is_command = curl::looks_like_command(&text);
        self.draft.endpoint = text;
        self.is_parsing_curl = is_command;
        if is_command {
            self.notice("Detecting cURL command...");
        }
        is_command
    }

    /// Decode the debounced endpoint text and apply it when it is a usable command
    pub fn apply_curl_input(&mut self, text: &str) {
        self.is_parsing_curl = false;
        match curl::decode(text) {
            Some(parsed) if !parsed.url.is_empty() => self.apply_parsed_curl(parsed),
            _ => self.error("Could not read a URL from the cURL command."),
        }
    }

    /// Overwrite the editor from a decoded command. The name is only filled in when empty.
    pub fn apply_parsed_curl(&mut self, parsed: ParsedCurl) {
        if self.draft.name.trim().is_empty() {
            self.draft.name = curl::infer_name(parsed.method, &parsed.url);
        }
        self.draft.endpoint = parsed.url;
        self.draft.method = parsed.method;
        self.live.headers = parsed.headers;
        self.live.params = parsed.params;
        self.live.body = parsed.body;
        self.live.body.ensure_placeholders();

        self.notice(CURL_APPLIED_NOTICE);
        let event = self.to_render_event();
        self.emit(event);
    }

    pub fn set_method(&mut self, method: HttpMethod) {
        if !self.is_loading {
            self.draft.method = method;
        }
    }

    pub fn cycle_method(&mut self) {
        if !self.is_loading {
            self.draft.method = self.draft.method.next();
            self.notice(format!("Method: {}", self.draft.method));
        }
    }

    pub fn rename(&mut self, name: String) {
        self.draft.name = name;
    }

    pub fn describe(&mut self, description: String) {
        self.draft.description = description;
    }

    pub fn toggle_enabled(&mut self) {
        self.draft.enabled = !self.draft.enabled;
        let state = if self.draft.enabled { "enabled" } else { "disabled" };
        self.notice(format!("Request {}.", state));
    }

    pub fn set_header(&mut self, key: &str, value: String) {
        self.live.headers.set_ignore_case(key, value);
    }

    pub fn set_param(&mut self, key: &str, value: String) {
        self.live.params.insert(key, value);
    }

    // ========================
    // Body
    // ========================

    pub fn set_body_mode(&mut self, mode: BodyMode) {
        self.live.body.set_mode(mode);
        self.notice(format!("Body mode: {}", mode.label()));
    }

    pub fn set_raw(&mut self, content: String) {
        self.live.body.raw.content = content;
        self.warn_invalid_json();
    }

    pub fn set_raw_language(&mut self, language: RawLanguage) {
        self.live.body.raw.language = language;
        self.warn_invalid_json();
    }

    /// Pretty-print the raw JSON body in place
    pub fn beautify_raw(&mut self) {
        if self.live.body.mode != BodyMode::Raw || self.live.body.raw.language != RawLanguage::Json {
            self.error("Beautify applies to raw JSON bodies only.");
            return;
        }
        match self.live.body.raw.beautify() {
            Ok(()) => {
                let event = self.to_render_event();
                self.emit(event);
            }
            Err(e) => self.error(format!("Invalid JSON: {}", e)),
        }
    }

    fn warn_invalid_json(&mut self) {
        if self.live.body.mode != BodyMode::Raw {
            return;
        }
        if let Some(e) = self.live.body.raw.json_error() {
            self.error(format!("Invalid JSON: {}", e));
        }
    }

    pub fn add_form_field(&mut self, key: String, value: String) {
        self.live.body.push_form_field(FormField::text(key, value));
    }

    pub fn add_form_file(&mut self, key: String, path: &Path) {
        match Attachment::from_path(path) {
            Ok(attachment) => self.live.body.push_form_field(FormField::file(key, attachment)),
            Err(e) => self.error(format!("Could not read {}: {}", path.display(), e)),
        }
    }

    pub fn add_url_encoded(&mut self, key: String, value: String) {
        self.live.body.push_url_encoded(KvPair::new(key, value));
    }

    pub fn set_graphql_query(&mut self, query: String) {
        self.live.body.graphql.query = query;
    }

    pub fn set_graphql_variables(&mut self, variables: String) {
        self.live.body.graphql.variables = variables;
    }

    pub fn attach_binary(&mut self, path: &Path) {
        match Attachment::from_path(path) {
            Ok(attachment) => {
                self.notice(format!("Attached {} ({} bytes)", attachment.file_name(), attachment.len()));
                self.live.body.binary.file_name = attachment.file_name().to_string();
                self.live.body.binary.file = Some(attachment);
            }
            Err(e) => self.error(format!("Could not read {}: {}", path.display(), e)),
        }
    }

    // ========================
    // Request execution
    // ========================

    /// Build the command for a new attempt, unless one is pending or the request is disabled
    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        if !self.draft.enabled {
            self.error("This request is disabled.");
            return None;
        }

        let id = self.next_id();
        self.is_loading = true;
        self.pending_request_id = Some(id);
        self.response = None;
        self.emit(RenderEvent::Loading {
            url: self.draft.endpoint.trim().to_string(),
        });

        tracing::info!(id, method = %self.draft.method, endpoint = %self.draft.endpoint, "Sending request");

        Some(NetworkCommand::ExecuteRequest {
            id,
            definition: self.draft.clone(),
            live: self.live.clone(),
            origin: self.origin.clone(),
        })
    }

    pub fn cancel_request(&mut self) -> Option<NetworkCommand> {
        let id = self.pending_request_id.take()?;
        self.is_loading = false;
        self.notice("Request cancelled.");
        Some(NetworkCommand::CancelRequest(id))
    }

    /// Record an outcome. Outcomes of anything but the pending attempt are dropped.
    pub fn handle_response(&mut self, response: NetworkResponse) {
        if self.pending_request_id != Some(response.id()) {
            tracing::debug!(id = response.id(), "Ignoring stale network response");
            return;
        }

        match response {
            NetworkResponse::Completed { id, response } => {
                tracing::info!(id, status = %response.status, duration_ms = response.duration_ms, "Request finished");
                self.pending_request_id = None;
                self.is_loading = false;
                self.emit(RenderEvent::Response(response.clone()));
                self.response = Some(response);
            }
            NetworkResponse::Cancelled { .. } => {
                self.pending_request_id = None;
                self.is_loading = false;
            }
        }
    }

    // ========================
    // Snippets
    // ========================

    pub fn snippet(&mut self, kind: SnippetKind) {
        let text = snippet::render(
            kind,
            self.draft.endpoint.trim(),
            self.draft.method,
            &self.live.headers,
            &self.live.body,
        );
        if text.is_empty() {
            self.error("Set an endpoint to generate a snippet.");
            return;
        }
        self.emit(RenderEvent::Snippet { kind, text });
    }
}

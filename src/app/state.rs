//! Application state - the request being edited, the pending attempt, and pending output

use url::Url;

use crate::config::Settings;
use crate::messages::RenderEvent;
use crate::models::{EditBuffers, RequestDefinition, ResponseInfo};
use crate::storage::CollectionStore;

/// Main application state - pure data, no network I/O
pub struct AppState {
    pub settings: Settings,
    /// Base for endpoints without a scheme
    pub origin: Url,

    // Request being edited
    pub draft: RequestDefinition,
    pub live: EditBuffers,
    /// Not yet saved to the store
    pub is_new: bool,

    // Request attempt
    pub response: Option<ResponseInfo>,
    pub is_loading: bool,
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,

    // cURL detection
    pub is_parsing_curl: bool,

    // Storage (persisted data)
    pub storage: CollectionStore,

    outbox: Vec<RenderEvent>,
}

impl AppState {
    pub fn new(settings: Settings, origin: Url, storage: CollectionStore) -> Self {
        let draft = RequestDefinition::default();
        let live = EditBuffers::from_definition(&draft);
        AppState {
            settings,
            origin,
            draft,
            live,
            is_new: true,
            response: None,
            is_loading: false,
            next_request_id: 1,
            pending_request_id: None,
            is_parsing_curl: false,
            storage,
            outbox: Vec::new(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Queue output for the console
    pub fn emit(&mut self, event: RenderEvent) {
        self.outbox.push(event);
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.emit(RenderEvent::Notice(message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.emit(RenderEvent::Error(message.into()));
    }

    /// Drain queued output
    pub fn take_renders(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Snapshot of the definition being edited
    pub fn to_render_event(&self) -> RenderEvent {
        RenderEvent::Definition {
            definition: self.draft.clone(),
            live: self.live.clone(),
            is_new: self.is_new,
        }
    }

    /// Load `definition` into the editor, resetting live buffers and the last response
    pub fn load_definition(&mut self, definition: RequestDefinition, is_new: bool) {
        self.live = EditBuffers::from_definition(&definition);
        self.draft = definition;
        self.is_new = is_new;
        self.response = None;
        self.is_parsing_curl = false;
    }

    /// The draft with the live buffers folded in, as it would be saved
    pub fn merged_definition(&self) -> RequestDefinition {
        RequestDefinition {
            headers: self.live.headers.clone(),
            params: self.live.params.clone(),
            body: self.live.body.clone(),
            ..self.draft.clone()
        }
    }
}

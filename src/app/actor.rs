//! App actor - message loop processing UI events, network responses and debounced input

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Settings;
use crate::debounce::{Debounced, Debouncer};
use crate::messages::{NetworkCommand, NetworkResponse, RenderEvent, UiEvent};
use crate::storage::CollectionStore;
use url::Url;

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderEvent>,
    curl_debouncer: Debouncer<String>,
    curl_rx: mpsc::UnboundedReceiver<Debounced<String>>,
}

impl AppActor {
    pub fn new(
        settings: Settings,
        origin: Url,
        storage: CollectionStore,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderEvent>,
    ) -> Self {
        let (curl_tx, curl_rx) = mpsc::unbounded_channel();
        let curl_debouncer = Debouncer::new(settings.debounce(), curl_tx);
        AppActor {
            state: AppState::new(settings, origin, storage),
            network_tx,
            render_tx,
            curl_debouncer,
            curl_rx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        self.curl_debouncer.cancel();
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                }
                Some(debounced) = self.curl_rx.recv() => {
                    if let Some(text) = self.curl_debouncer.accept(debounced) {
                        self.state.apply_curl_input(&text);
                    }
                }
                else => break,
            }
            self.flush();
        }
        self.flush();
    }

    fn flush(&mut self) {
        for event in self.state.take_renders() {
            let _ = self.render_tx.send(event);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Collection
            UiEvent::List(filter) => self.state.list(filter),
            UiEvent::Select(id) => {
                self.curl_debouncer.cancel();
                self.state.select(&id);
            }
            UiEvent::Show => self.state.show(),
            UiEvent::New => {
                self.curl_debouncer.cancel();
                self.state.new_request();
            }
            UiEvent::Save => self.state.save(),
            UiEvent::Delete => self.state.delete_current(),

            // Request fields
            UiEvent::Endpoint(text) => {
                self.curl_debouncer.cancel();
                if self.state.set_endpoint(text.clone()) {
                    self.curl_debouncer.schedule(text);
                }
            }
            UiEvent::Method(method) => self.state.set_method(method),
            UiEvent::CycleMethod => self.state.cycle_method(),
            UiEvent::Rename(name) => self.state.rename(name),
            UiEvent::Describe(description) => self.state.describe(description),
            UiEvent::ToggleEnabled => self.state.toggle_enabled(),
            UiEvent::Header { key, value } => self.state.set_header(&key, value),
            UiEvent::Param { key, value } => self.state.set_param(&key, value),

            // Body
            UiEvent::Mode(mode) => self.state.set_body_mode(mode),
            UiEvent::Raw(content) => self.state.set_raw(content),
            UiEvent::Language(language) => self.state.set_raw_language(language),
            UiEvent::Beautify => self.state.beautify_raw(),
            UiEvent::Form { key, value } => self.state.add_form_field(key, value),
            UiEvent::FormFile { key, path } => self.state.add_form_file(key, &path),
            UiEvent::UrlEncoded { key, value } => self.state.add_url_encoded(key, value),
            UiEvent::GraphqlQuery(query) => self.state.set_graphql_query(query),
            UiEvent::GraphqlVariables(variables) => self.state.set_graphql_variables(variables),
            UiEvent::Attach(path) => self.state.attach_binary(&path),

            // Request actions
            UiEvent::SendRequest => {
                if let Some(cmd) = self.state.prepare_request() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::CancelRequest => {
                if let Some(cmd) = self.state.cancel_request() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::Snippet(kind) => self.state.snippet(kind),

            // System
            UiEvent::Help => self.state.emit(RenderEvent::Help),
            UiEvent::Quit => return true,
        }

        false
    }
}

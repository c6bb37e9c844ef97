//! Network actor - runs request attempts in the Tokio runtime

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{execute_request, Transport};

/// Tracks an in-flight request for cancellation
struct ActiveRequest {
    cancel_tx: oneshot::Sender<()>,
}

/// Network actor that executes request commands
pub struct NetworkActor<T: Transport> {
    transport: Arc<T>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<u64>,
    cancel_handles: HashMap<u64, ActiveRequest>,
}

impl<T: Transport> NetworkActor<T> {
    pub fn new(transport: T, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            transport: Arc::new(transport),
            response_tx,
            active_requests: JoinSet::new(),
            cancel_handles: HashMap::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::ExecuteRequest { id, definition, live, origin }) => {
                            let (cancel_tx, mut cancel_rx) = oneshot::channel();
                            self.cancel_handles.insert(id, ActiveRequest { cancel_tx });

                            let response_tx = self.response_tx.clone();
                            let transport = Arc::clone(&self.transport);

                            self.active_requests.spawn(async move {
                                tracing::info!(id, endpoint = %definition.endpoint, method = %definition.method, "Executing request");
                                tokio::select! {
                                    biased;

                                    _ = &mut cancel_rx => {
                                        tracing::info!(id, "Request abandoned");
                                    }
                                    response = execute_request(transport.as_ref(), &definition, &live, &origin) => {
                                        tracing::info!(id, status = %response.status, duration_ms = response.duration_ms, "Request completed");
                                        let _ = response_tx.send(NetworkResponse::Completed { id, response });
                                    }
                                }
                                id
                            });
                        }

                        Some(NetworkCommand::CancelRequest(id)) => {
                            if let Some(active) = self.cancel_handles.remove(&id) {
                                tracing::info!(id, "Cancelling request");
                                let _ = active.cancel_tx.send(());
                                let _ = self.response_tx.send(NetworkResponse::Cancelled { id });
                            }
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            for (_, active) in self.cancel_handles.drain() {
                                let _ = active.cancel_tx.send(());
                            }
                            break;
                        }
                    }
                }

                Some(result) = self.active_requests.join_next() => {
                    if let Ok(id) = result {
                        self.cancel_handles.remove(&id);
                    }
                }
            }
        }
    }
}

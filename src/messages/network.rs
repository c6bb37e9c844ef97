//! Network messages - communication between App and Network layers

use url::Url;

use crate::models::{EditBuffers, RequestDefinition, ResponseInfo};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Compile and send a request attempt
    ExecuteRequest {
        id: u64,
        definition: RequestDefinition,
        live: EditBuffers,
        origin: Url,
    },
    /// Abandon a pending attempt; no outcome is reported for it
    CancelRequest(u64),
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Completed { id: u64, response: ResponseInfo },
    Cancelled { id: u64 },
}

impl NetworkResponse {
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
            NetworkResponse::Cancelled { id } => *id,
        }
    }
}

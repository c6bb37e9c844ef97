//! Network layer - request dispatch through a pluggable transport
//!
//! The Network actor receives send/cancel commands and reports outcomes back.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::{execute_request, HttpTransport, Transport, TransportResponse};

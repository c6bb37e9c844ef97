//! Render events - output sent from App layer to the console driver

use crate::models::{EditBuffers, RequestDefinition, ResponseInfo};
use crate::snippet::SnippetKind;

/// Something the console should print
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Listing(Vec<RequestDefinition>),
    /// The definition being edited, with its live buffers
    Definition {
        definition: RequestDefinition,
        live: EditBuffers,
        is_new: bool,
    },
    Loading { url: String },
    Response(ResponseInfo),
    Snippet { kind: SnippetKind, text: String },
    Notice(String),
    Error(String),
    Help,
}

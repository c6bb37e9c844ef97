//! App layer - central state management and command processing
//!
//! The App actor receives UI events, network responses and debounced
//! endpoint input, updates state, and emits network commands and render events.

pub mod state;
pub mod actor;
pub mod commands;

pub use state::AppState;
pub use actor::AppActor;

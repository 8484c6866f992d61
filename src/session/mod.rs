//! Conversation sessions and the controller that drives them.

mod choices;
pub mod controller;
mod field_update;
pub mod messages;
pub mod registry;
pub mod state;

pub use controller::{ConversationController, Route};
pub use registry::{SessionHandle, SessionRegistry};
pub use state::{CompletionPass, Session, WaitingFor};

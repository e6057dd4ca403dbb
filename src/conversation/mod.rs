//! Conversation state machine and presentation boundary
//!
//! Inbound events (free text during collection, selection labels once the
//! chart is ready) go through the [`ConversationEngine`]; every event yields
//! a [`Reply`] and never an error -- failures become fixed retry messages
//! with the session state left untouched. The [`ConversationHandle`] wraps
//! the engine in an actor task so events are processed strictly one at a
//! time.

mod engine;
mod handle;
pub mod views;

pub use engine::ConversationEngine;
pub use handle::ConversationHandle;

use serde::{Deserialize, Serialize};

/// One inbound user event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// First contact; answered with the introduction
    Greet,
    /// Start (or re-prompt) the collection sequence
    Begin,
    /// Free text during the collection states
    Text(String),
    /// A selection label, normally sent from `ChartReady`
    Select(String),
    /// Unconditional return to `AwaitingDate`, discarding everything
    Reset,
}

/// Outbound reply: display text plus the currently selectable labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub options: Vec<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

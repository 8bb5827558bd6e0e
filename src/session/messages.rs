//! Session actor message types.

use tokio::sync::{mpsc, oneshot};

use crate::game::entities::{CardId, CardKind};
use crate::game::{GameEvent, SessionView};

/// Messages that can be sent to a [`SessionActor`](super::SessionActor)
#[derive(Debug)]
pub enum SessionMessage {
    /// Reset and begin a session; legal at any time
    Start {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Toggle a card selection
    SelectCard {
        card_id: CardId,
        kind: CardKind,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Get a read-only snapshot of the session
    GetView {
        response: oneshot::Sender<SessionView>,
    },

    /// Subscribe to state change notifications and game events
    Subscribe {
        sender: mpsc::Sender<SessionNotification>,
    },

    /// Tear the session down, cancelling all pending timers
    Close {
        response: oneshot::Sender<SessionResponse>,
    },
}

/// Notification pushed to subscribers. Delivery is best-effort: a full or
/// closed subscriber channel never affects game state.
#[derive(Debug, Clone)]
pub enum SessionNotification {
    /// Something about the visible session state changed; re-fetch the view
    StateChanged,
    /// A game event fired (sound cue, notification, popup, terminal)
    Event(GameEvent),
}

/// Response from session commands
#[derive(Debug, Clone)]
pub enum SessionResponse {
    /// Command accepted (possibly a no-op under the game rules)
    Success,

    /// Command could not be delivered or processed
    Error(String),
}

impl SessionResponse {
    /// Check if response is success
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, SessionResponse::Success)
    }

    /// Get error message if response is error
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionResponse::Error(msg) => Some(msg),
            SessionResponse::Success => None,
        }
    }
}

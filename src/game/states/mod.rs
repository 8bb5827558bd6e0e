//! Session phase definitions for the matching-game FSM.
//!
//! Each variant represents a specific point in the session lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::entities::CardId;

/// Current state of a session, including any per-state data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// Fresh session, nothing drawn yet. Only `start` does anything here.
    Idle,
    /// Board is live and selections are accepted.
    Playing,
    /// A completed selection pair is being evaluated; further input is
    /// rejected until the evaluation's timer stages settle.
    Verifying { image: CardId, word: CardId },
    /// Terminal until the next `start`.
    Finished { win: bool },
}

impl SessionState {
    /// The flat phase tag for views and logging.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self {
            Self::Idle => SessionPhase::Idle,
            Self::Playing => SessionPhase::Playing,
            Self::Verifying { .. } => SessionPhase::Verifying,
            Self::Finished { .. } => SessionPhase::Finished,
        }
    }
}

/// Data-free phase tag exposed to the view layer.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Playing,
    Verifying,
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Verifying => "verifying",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

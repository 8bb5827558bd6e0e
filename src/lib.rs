//! # Picture Match
//!
//! A picture/word matching game engine built around a small finite state
//! machine (FSM) with explicit, cancellable timer stages.
//!
//! The player picks one image card and one word card per turn; the engine
//! verifies whether they name the same item, awards score, sequences the
//! animation-related transitions, replaces matched pairs from a finite item
//! pool, and decides win or loss under a one-second countdown.
//!
//! ## Architecture
//!
//! A session moves through four phases:
//!
//! - **Idle**: created but not started
//! - **Playing**: board live, selections accepted
//! - **Verifying**: a completed pair is being evaluated, input rejected
//! - **Finished**: terminal win or loss, until the next start
//!
//! Every deferred effect (error clearing, pair replacement, win
//! declaration, popup expiry, countdown ticks) is a named stage in a
//! single logical-time queue, so the core stays synchronous and
//! deterministic. The [`session`] module hosts a core instance behind a
//! tokio actor that supplies wall-clock time and fans events out to
//! subscribers.
//!
//! ## Core Modules
//!
//! - [`game`]: session state machine, entities, pool and timer stages
//! - [`session`]: async actor hosting for a view layer
//!
//! ## Example
//!
//! ```
//! use picture_match::{GameConfig, MatchSession};
//!
//! let mut session = MatchSession::new(GameConfig::default()).expect("valid config");
//! session.start();
//! assert_eq!(session.time_remaining(), 60);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    ConfigError, CountdownPolicy, GameConfig, GameEvent, MatchSession, SessionPhase, SessionView,
    constants,
    entities::{self, Card, CardId, CardKind, Item, ItemId, Selection, SoundCue},
};

/// Async actor hosting for sessions.
pub mod session;
pub use session::{SessionActor, SessionHandle, SessionMessage, SessionResponse};

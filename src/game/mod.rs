//! Matching game engine - core FSM and game logic.
//!
//! This module provides the foundational game implementation including:
//! - The four-state session machine and its commands
//! - Item pool bookkeeping and pair replacement
//! - Named timer stages for animation-sequenced transitions
//! - Event generation and view snapshots

pub mod constants;
pub mod entities;
pub mod pool;
pub mod state_machine;
pub mod states;
pub mod timers;

pub use pool::ItemPool;
pub use state_machine::{
    ConfigError, CountdownPolicy, GameConfig, GameEvent, MatchSession, SessionView,
};
pub use states::{SessionPhase, SessionState};
pub use timers::{TimerId, TimerQueue, TimerStage};

//! Session hosting with an async actor model.
//!
//! This module implements:
//! - SessionActor: async actor owning and clocking a single game session
//! - Message-based communication with tokio channels
//! - Best-effort event fan-out to subscribers
//!
//! ## Architecture
//!
//! Each session runs in its own tokio task with an mpsc message inbox.
//! The actor sleeps until the session's next pending timer stage and
//! feeds real elapsed time into the synchronous core, so the core itself
//! never touches the wall clock.
//!
//! ## Example
//!
//! ```no_run
//! use picture_match::GameConfig;
//! use picture_match::session::{SessionActor, SessionMessage};
//! use tokio::sync::oneshot;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, handle) = SessionActor::new(GameConfig::default()).expect("valid config");
//!     tokio::spawn(actor.run());
//!
//!     let (tx, rx) = oneshot::channel();
//!     handle.send(SessionMessage::Start { response: tx }).await.unwrap();
//!     rx.await.unwrap();
//! }
//! ```

pub mod actor;
pub mod messages;

pub use actor::{SessionActor, SessionHandle, SessionId};
pub use messages::{SessionMessage, SessionNotification, SessionResponse};

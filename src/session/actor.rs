//! Session actor implementation with async message handling.

use super::messages::{SessionMessage, SessionNotification, SessionResponse};
use crate::game::{ConfigError, GameConfig, MatchSession};
use tokio::{
    sync::mpsc,
    time::{Duration, Instant, sleep},
};
use uuid::Uuid;

/// Type alias for actor-level session identifiers.
pub type SessionId = Uuid;

/// How long an idle actor sleeps between inbox checks when the session
/// has no timer stage in flight.
const IDLE_WAIT: Duration = Duration::from_millis(500);

/// Session actor handle for sending messages
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    session_id: SessionId,
}

impl SessionHandle {
    /// Create a new session handle
    #[must_use]
    pub fn new(sender: mpsc::Sender<SessionMessage>, session_id: SessionId) -> Self {
        Self { sender, session_id }
    }

    /// Get session ID
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Session is closed".to_string())
    }
}

/// Session actor owning a single game session.
///
/// The actor is the session's clock and scheduler: it sleeps until the
/// next pending timer stage, feeds real elapsed time into the core, and
/// fans drained events out to subscribers. All access to the session
/// funnels through the inbox, one message at a time.
pub struct SessionActor {
    /// Session ID
    id: SessionId,

    /// Game session state (FSM)
    session: MatchSession,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Subscribers for state change notifications and game events
    subscribers: Vec<mpsc::Sender<SessionNotification>>,

    /// Is session closed
    is_closed: bool,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Arguments
    ///
    /// * `config` - Game configuration
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(config: GameConfig) -> Result<(Self, SessionHandle), ConfigError> {
        let (sender, inbox) = mpsc::channel(100);
        let session = MatchSession::new(config)?;
        let id = Uuid::new_v4();

        let actor = Self {
            id,
            session,
            inbox,
            subscribers: Vec::new(),
            is_closed: false,
        };
        let handle = SessionHandle::new(sender, id);

        Ok((actor, handle))
    }

    /// Run the session actor event loop
    pub async fn run(mut self) {
        log::info!("session {} starting", self.id);

        let mut last = Instant::now();
        loop {
            let wait = self.session.time_until_next_event().unwrap_or(IDLE_WAIT);

            tokio::select! {
                // Handle incoming messages
                maybe_message = self.inbox.recv() => {
                    self.catch_up(&mut last);
                    match maybe_message {
                        Some(message) => {
                            let changed = self.handle_message(message);
                            self.publish(changed);
                        }
                        // All handles dropped; session torn down
                        None => break,
                    }

                    if self.is_closed {
                        break;
                    }
                }

                // Fire due timer stages
                _ = sleep(wait) => {
                    let fired = self.catch_up(&mut last);
                    self.publish(fired > 0);
                }
            }
        }

        log::info!("session {} closed", self.id);
    }

    /// Feed real elapsed time into the core, firing due stages
    fn catch_up(&mut self, last: &mut Instant) -> usize {
        let now = Instant::now();
        let fired = self.session.advance(now.duration_since(*last));
        *last = now;
        fired
    }

    /// Handle a session message. Returns whether visible state may have
    /// changed.
    fn handle_message(&mut self, message: SessionMessage) -> bool {
        match message {
            SessionMessage::Start { response } => {
                self.session.start();
                let _ = response.send(SessionResponse::Success);
                true
            }

            SessionMessage::SelectCard {
                card_id,
                kind,
                response,
            } => {
                self.session.select_card(card_id, kind);
                let _ = response.send(SessionResponse::Success);
                true
            }

            SessionMessage::GetView { response } => {
                let _ = response.send(self.session.view());
                false
            }

            SessionMessage::Subscribe { sender } => {
                self.subscribers.push(sender);
                log::debug!("subscriber added to session {}", self.id);
                false
            }

            SessionMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(SessionResponse::Success);
                true
            }
        }
    }

    /// Forward drained game events and a state-change marker to all
    /// subscribers, best-effort
    fn publish(&mut self, state_changed: bool) {
        let events = self.session.drain_events();
        if !state_changed && events.is_empty() {
            return;
        }
        for event in events {
            self.notify(SessionNotification::Event(event));
        }
        if state_changed {
            self.notify(SessionNotification::StateChanged);
        }
    }

    /// Broadcast one notification to all subscribers
    fn notify(&mut self, notification: SessionNotification) {
        self.subscribers
            .retain(|sender| match sender.try_send(notification.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // Keep subscriber but drop this notification
                    log::warn!("subscriber channel full, dropping notification");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("subscriber disconnected, removing");
                    false
                }
            });
    }
}

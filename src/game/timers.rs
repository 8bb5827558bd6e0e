//! Deferred transition scheduling.
//!
//! Every delayed effect in a session is a named stage in one cancellable
//! queue, driven by a logical millisecond clock. Stages carry ids, not
//! indices or captured state: whoever fires a stage re-reads the session
//! by id lookup, so a stage whose target has vanished is a silent no-op.

use std::time::Duration;

use super::entities::{CardId, ItemId, PopupId};

/// Type alias for pending-timer handles.
pub type TimerId = u64;

/// The named deferred transitions a session can have in flight.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerStage {
    /// Repeating one-second countdown decrement.
    CountdownTick,
    /// Swap a matched pair for a fresh one, keyed by the matched item.
    BeginReplacement { item: ItemId },
    /// Close the verifying window after a correct match.
    ReturnToPlaying,
    /// Clear the entering animation flag on a freshly inserted pair.
    ClearEntering { image: CardId, word: CardId },
    /// Declare the win once the board has stayed fully matched.
    DeclareWin,
    /// Clear error flags and selection after a mismatch.
    ClearError { image: CardId, word: CardId },
    /// Remove an expired floating score popup.
    ExpirePopup { popup: PopupId },
}

#[derive(Clone, Copy, Debug)]
struct PendingTimer {
    id: TimerId,
    due_ms: u64,
    stage: TimerStage,
}

/// Pending timer stages ordered by due time, insertion order breaking
/// ties. The queue owns the session's logical clock.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: TimerId,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule a stage `delay` after the current logical time.
    pub fn schedule(&mut self, delay: Duration, stage: TimerStage) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            due_ms: self.now_ms + delay.as_millis() as u64,
            stage,
        });
        id
    }

    /// Drop every pending stage. Used on session reset and teardown so
    /// stale callbacks never touch a superseded session.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Drop pending stages matching a predicate.
    pub fn cancel_where(&mut self, pred: impl Fn(&TimerStage) -> bool) {
        self.pending.retain(|timer| !pred(&timer.stage));
    }

    /// Whether any pending stage matches a predicate.
    #[must_use]
    pub fn is_scheduled(&self, pred: impl Fn(&TimerStage) -> bool) -> bool {
        self.pending.iter().any(|timer| pred(&timer.stage))
    }

    /// Time until the earliest pending stage, or `None` when idle.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        let due = self.pending.iter().map(|timer| timer.due_ms).min()?;
        Some(Duration::from_millis(due.saturating_sub(self.now_ms)))
    }

    /// Remove and return the earliest stage due at or before `target_ms`,
    /// moving the clock to its due time. Stages scheduled while one fires
    /// land relative to that due time, preserving relative ordering.
    pub fn pop_due(&mut self, target_ms: u64) -> Option<TimerStage> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= target_ms)
            .min_by_key(|(_, timer)| (timer.due_ms, timer.id))
            .map(|(idx, _)| idx)?;
        let timer = self.pending.swap_remove(idx);
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(timer.stage)
    }

    /// Move the clock to `target_ms` once everything due has fired.
    pub fn settle(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }
}

//! Matching game session state machine.
//!
//! This module contains the core FSM logic: the session controller, its
//! configuration, and the event stream it produces for collaborators.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::constants::{
    COUNTDOWN_TICK, DEFAULT_PAIR_COUNT, DEFAULT_TIMER_LENGTH_SECS, DEFAULT_TITLE,
    ENTERING_CLEAR_DELAY, ERROR_CLEAR_DELAY, MATCH_SCORE, POPUP_EXPIRE_DELAY,
    REPLACEMENT_START_DELAY, RETURN_TO_PLAYING_DELAY, WIN_DECLARE_DELAY,
};
use super::entities::{
    Card, CardId, CardKind, Item, ItemId, PopupId, ScorePopup, Selection, SoundCue, Transition,
    default_item_pool,
};
use super::pool::ItemPool;
use super::states::{SessionPhase, SessionState};
use super::timers::{TimerQueue, TimerStage};

/// Errors a session configuration can be rejected with
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ConfigError {
    #[error("item pool must not be empty")]
    EmptyItemPool,
    #[error("pair count must be greater than zero")]
    ZeroPairCount,
    #[error("timer length must be greater than zero")]
    ZeroTimerLength,
    #[error("item id {0} appears more than once in the pool")]
    DuplicateItemId(ItemId),
}

/// Events that occur during gameplay, drained by the hosting layer and
/// forwarded to collaborators (audio, notifications) best-effort.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    /// Fire-and-forget audio request.
    Cue(SoundCue),
    /// A floating score popup appeared.
    PopupSpawned(ScorePopup),
    /// A floating score popup reached the end of its lifetime.
    PopupExpired(PopupId),
    /// A correct match landed.
    Matched { word: String },
    /// A mismatched pair was picked.
    Mismatched,
    /// Every item was matched before the clock ran out.
    Won,
    /// The countdown reached zero.
    TimeExpired,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Cue(cue) => format!("play {cue} cue"),
            Self::PopupSpawned(popup) => format!("+{}", popup.amount),
            Self::PopupExpired(_) => "popup expired".to_string(),
            Self::Matched { word } => format!("Correct! {word} matched"),
            Self::Mismatched => "Try again!".to_string(),
            Self::Won => "all pairs matched".to_string(),
            Self::TimeExpired => "time's up".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// Whether the one-second countdown keeps decrementing while a selection
/// pair is being verified.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPolicy {
    /// Keep ticking through the brief verifying window.
    #[default]
    RunDuringVerifying,
    /// Suppress decrements while verifying; the tick grid itself keeps
    /// running so no tick is ever counted twice.
    PauseDuringVerifying,
}

impl fmt::Display for CountdownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::RunDuringVerifying => "run",
            Self::PauseDuringVerifying => "pause",
        };
        write!(f, "{repr}")
    }
}

/// Session configuration settings
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameConfig {
    pub item_pool: Vec<Item>,
    pub pair_count: usize,
    pub timer_length_secs: u32,
    pub title: String,
    pub countdown_policy: CountdownPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            item_pool: default_item_pool(),
            pair_count: DEFAULT_PAIR_COUNT,
            timer_length_secs: DEFAULT_TIMER_LENGTH_SECS,
            title: DEFAULT_TITLE.to_string(),
            countdown_policy: CountdownPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_pool.is_empty() {
            return Err(ConfigError::EmptyItemPool);
        }
        if self.pair_count == 0 {
            return Err(ConfigError::ZeroPairCount);
        }
        if self.timer_length_secs == 0 {
            return Err(ConfigError::ZeroTimerLength);
        }
        let mut seen = std::collections::HashSet::with_capacity(self.item_pool.len());
        for item in &self.item_pool {
            if !seen.insert(item.id) {
                return Err(ConfigError::DuplicateItemId(item.id));
            }
        }
        Ok(())
    }
}

/// Read-only snapshot of a session for the view layer.
#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub title: String,
    pub score: u32,
    pub time_remaining: u32,
    pub matched_pairs: usize,
    pub pair_count: usize,
    pub total_items: usize,
    pub image_cards: Vec<Card>,
    pub word_cards: Vec<Card>,
    pub selection: Selection,
    pub is_win: bool,
    pub popups: Vec<ScorePopup>,
}

/// A matching game session with all the data and logic to run it
/// end-to-end.
///
/// The controller is synchronous and single-owner: commands (`start`,
/// `select_card`) and `advance` are the only mutation points, so every
/// state change is atomic with respect to the others. Deferred effects
/// live in one cancellable [`TimerQueue`] of named stages.
#[derive(Debug)]
pub struct MatchSession {
    config: GameConfig,
    rng: StdRng,
    state: SessionState,
    score: u32,
    time_remaining: u32,
    matched_pairs: usize,
    pool: ItemPool,
    image_cards: Vec<Card>,
    word_cards: Vec<Card>,
    selection: Selection,
    popups: Vec<ScorePopup>,
    events: VecDeque<GameEvent>,
    timers: TimerQueue,
    card_id_seq: CardId,
    popup_id_seq: PopupId,
}

impl MatchSession {
    /// Create an idle session from a validated configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a session with a fixed seed. Deterministic draws and
    /// shuffles, for tests and replays.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = ItemPool::new(config.item_pool.clone());
        let time_remaining = config.timer_length_secs;
        Ok(Self {
            config,
            rng,
            state: SessionState::Idle,
            score: 0,
            time_remaining,
            matched_pairs: 0,
            pool,
            image_cards: Vec::new(),
            word_cards: Vec::new(),
            selection: Selection::default(),
            popups: Vec::new(),
            events: VecDeque::new(),
            timers: TimerQueue::new(),
            card_id_seq: 0,
            popup_id_seq: 0,
        })
    }

    /// Reset everything and begin play. Legal from any state; any session
    /// in progress is superseded and its pending timers cancelled.
    pub fn start(&mut self) {
        self.timers.cancel_all();
        self.pool.reset();
        self.score = 0;
        self.matched_pairs = 0;
        self.time_remaining = self.config.timer_length_secs;
        self.selection.clear();
        self.popups.clear();
        self.events.clear();

        let drawn = self.pool.draw_initial(self.config.pair_count, &mut self.rng);
        self.image_cards = self.build_cards(&drawn, CardKind::Image);
        self.word_cards = self.build_cards(&drawn, CardKind::Word);
        self.image_cards.shuffle(&mut self.rng);
        self.word_cards.shuffle(&mut self.rng);

        self.state = SessionState::Playing;
        self.timers.schedule(COUNTDOWN_TICK, TimerStage::CountdownTick);
        info!(
            "session started: {} pairs on the board, {} items in the pool, {}s on the clock",
            self.image_cards.len(),
            self.pool.len(),
            self.time_remaining
        );
    }

    /// Toggle a card in or out of the current selection. Ignored unless
    /// the session is accepting input and the card exists and is
    /// unmatched; a completed image/word pair triggers synchronous match
    /// evaluation.
    pub fn select_card(&mut self, card_id: CardId, kind: CardKind) {
        if self.state.phase() != SessionPhase::Playing {
            debug!("select {kind} {card_id} ignored: session is {}", self.state.phase());
            return;
        }
        let Some(matched) = self
            .cards(kind)
            .iter()
            .find(|card| card.id == card_id)
            .map(|card| card.matched)
        else {
            debug!("select {kind} {card_id} ignored: no such card");
            return;
        };
        if matched {
            debug!("select {kind} {card_id} ignored: already matched");
            return;
        }

        self.events.push_back(GameEvent::Cue(SoundCue::Select));

        let slot = self.selection.slot_mut(kind);
        if *slot == Some(card_id) {
            *slot = None;
            return;
        }
        *slot = Some(card_id);

        if let (Some(image), Some(word)) = (self.selection.image, self.selection.word) {
            self.state = SessionState::Verifying { image, word };
            self.evaluate_match(image, word);
        }
    }

    /// Move the logical clock forward, firing every timer stage that
    /// comes due, in due order. Returns how many stages fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let target = self.timers.now_ms() + elapsed.as_millis() as u64;
        let mut fired = 0;
        while let Some(stage) = self.timers.pop_due(target) {
            self.fire(stage);
            fired += 1;
        }
        self.timers.settle(target);
        fired
    }

    /// How long until the next pending timer stage, or `None` when the
    /// session has nothing in flight.
    #[must_use]
    pub fn time_until_next_event(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Read-only snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.state.phase(),
            title: self.config.title.clone(),
            score: self.score,
            time_remaining: self.time_remaining,
            matched_pairs: self.matched_pairs,
            pair_count: self.config.pair_count.min(self.pool.len()),
            total_items: self.pool.len(),
            image_cards: self.image_cards.clone(),
            word_cards: self.word_cards.clone(),
            selection: self.selection,
            is_win: matches!(self.state, SessionState::Finished { win: true }),
            popups: self.popups.clone(),
        }
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    #[must_use]
    pub fn is_win(&self) -> bool {
        matches!(self.state, SessionState::Finished { win: true })
    }

    fn build_cards(&mut self, items: &[Item], kind: CardKind) -> Vec<Card> {
        items
            .iter()
            .map(|item| {
                let id = self.next_card_id();
                Card::new(id, item, kind)
            })
            .collect()
    }

    fn next_card_id(&mut self) -> CardId {
        let id = self.card_id_seq;
        self.card_id_seq += 1;
        id
    }

    fn cards(&self, kind: CardKind) -> &[Card] {
        match kind {
            CardKind::Image => &self.image_cards,
            CardKind::Word => &self.word_cards,
        }
    }

    /// Compare the selected pair by item id and commit the outcome.
    fn evaluate_match(&mut self, image: CardId, word: CardId) {
        let image_item = self
            .image_cards
            .iter()
            .find(|card| card.id == image)
            .map(|card| card.item_id);
        let word_card = self
            .word_cards
            .iter()
            .find(|card| card.id == word)
            .map(|card| (card.item_id, card.content.clone()));

        let (Some(image_item), Some((word_item, word_text))) = (image_item, word_card) else {
            // One of the pair vanished under us; abort with no effects.
            debug!("match evaluation aborted: selected card vanished");
            self.selection.clear();
            self.state = SessionState::Playing;
            return;
        };

        if image_item == word_item {
            self.commit_match(image, word, image_item, word_text);
        } else {
            self.commit_mismatch(image, word);
        }
    }

    fn commit_match(&mut self, image: CardId, word: CardId, item: ItemId, word_text: String) {
        self.score += MATCH_SCORE;
        self.matched_pairs += 1;
        for card in self
            .image_cards
            .iter_mut()
            .filter(|card| card.id == image)
            .chain(self.word_cards.iter_mut().filter(|card| card.id == word))
        {
            card.matched = true;
            card.transition = Transition::Leaving;
        }
        self.selection.clear();

        self.events.push_back(GameEvent::Cue(SoundCue::Match));
        self.events.push_back(GameEvent::Matched {
            word: word_text.clone(),
        });
        self.spawn_popup(MATCH_SCORE);

        self.timers
            .schedule(REPLACEMENT_START_DELAY, TimerStage::BeginReplacement { item });
        self.timers
            .schedule(RETURN_TO_PLAYING_DELAY, TimerStage::ReturnToPlaying);

        info!(
            "matched {word_text}: score {}, {} pairs down",
            self.score, self.matched_pairs
        );
        self.reevaluate_win();
    }

    fn commit_mismatch(&mut self, image: CardId, word: CardId) {
        for card in self
            .image_cards
            .iter_mut()
            .filter(|card| card.id == image)
            .chain(self.word_cards.iter_mut().filter(|card| card.id == word))
        {
            card.errored = true;
        }
        self.events.push_back(GameEvent::Cue(SoundCue::Error));
        self.events.push_back(GameEvent::Mismatched);
        self.timers
            .schedule(ERROR_CLEAR_DELAY, TimerStage::ClearError { image, word });
    }

    fn spawn_popup(&mut self, amount: u32) {
        let popup = ScorePopup {
            id: self.popup_id_seq,
            amount,
        };
        self.popup_id_seq += 1;
        self.popups.push(popup);
        self.events.push_back(GameEvent::PopupSpawned(popup));
        self.timers
            .schedule(POPUP_EXPIRE_DELAY, TimerStage::ExpirePopup { popup: popup.id });
    }

    fn fire(&mut self, stage: TimerStage) {
        match stage {
            TimerStage::CountdownTick => self.countdown_tick(),
            TimerStage::BeginReplacement { item } => self.begin_replacement(item),
            TimerStage::ReturnToPlaying => {
                if matches!(self.state, SessionState::Verifying { .. }) {
                    self.state = SessionState::Playing;
                }
            }
            TimerStage::ClearEntering { image, word } => {
                for card in self
                    .image_cards
                    .iter_mut()
                    .filter(|card| card.id == image)
                    .chain(self.word_cards.iter_mut().filter(|card| card.id == word))
                {
                    card.transition = Transition::Steady;
                }
            }
            TimerStage::DeclareWin => {
                if !matches!(self.state, SessionState::Finished { .. }) {
                    self.finish(true);
                }
            }
            TimerStage::ClearError { image, word } => {
                for card in self
                    .image_cards
                    .iter_mut()
                    .filter(|card| card.id == image)
                    .chain(self.word_cards.iter_mut().filter(|card| card.id == word))
                {
                    card.errored = false;
                }
                self.selection.clear();
                if matches!(self.state, SessionState::Verifying { .. }) {
                    self.state = SessionState::Playing;
                }
            }
            TimerStage::ExpirePopup { popup } => {
                self.popups.retain(|p| p.id != popup);
                self.events.push_back(GameEvent::PopupExpired(popup));
            }
        }
        self.reevaluate_win();
    }

    fn countdown_tick(&mut self) {
        match self.state {
            SessionState::Playing | SessionState::Verifying { .. } => {
                let suppressed = matches!(self.state, SessionState::Verifying { .. })
                    && self.config.countdown_policy == CountdownPolicy::PauseDuringVerifying;
                if !suppressed {
                    self.time_remaining = self.time_remaining.saturating_sub(1);
                    if self.time_remaining == 0 {
                        // First to a terminal state wins; a pending win
                        // declaration no-ops after this.
                        self.finish(false);
                        return;
                    }
                }
                self.timers.schedule(COUNTDOWN_TICK, TimerStage::CountdownTick);
            }
            SessionState::Idle | SessionState::Finished { .. } => {}
        }
    }

    /// Swap the matched pair for a fresh item, then reshuffle positions
    /// in both sequences. Targets are re-read by item id when the stage
    /// fires; a pair that is already gone is a silent no-op.
    fn begin_replacement(&mut self, item: ItemId) {
        let image_slot = self
            .image_cards
            .iter()
            .position(|card| card.item_id == item && card.matched);
        let word_slot = self
            .word_cards
            .iter()
            .position(|card| card.item_id == item && card.matched);

        if let (Some(image_slot), Some(word_slot)) = (image_slot, word_slot) {
            if let Some(fresh) = self.pool.draw_replacement(&mut self.rng) {
                let image_id = self.next_card_id();
                let word_id = self.next_card_id();
                self.image_cards[image_slot] = Card::entering(image_id, &fresh, CardKind::Image);
                self.word_cards[word_slot] = Card::entering(word_id, &fresh, CardKind::Word);
                self.timers.schedule(
                    ENTERING_CLEAR_DELAY,
                    TimerStage::ClearEntering {
                        image: image_id,
                        word: word_id,
                    },
                );
                debug!("item {item} replaced by item {}", fresh.id);
            } else {
                // Pool exhausted: the matched pair stays put and settles.
                self.image_cards[image_slot].transition = Transition::Steady;
                self.word_cards[word_slot].transition = Transition::Steady;
                debug!("pool exhausted, item {item} not replaced");
            }
        } else {
            debug!("replacement for item {item} skipped: cards already gone");
        }

        // Position shuffle only; no card fields change.
        self.image_cards.shuffle(&mut self.rng);
        self.word_cards.shuffle(&mut self.rng);
    }

    /// Win detection lives here, not in the click handler: re-checked
    /// after every mutation so it holds no matter which stage completed
    /// the board.
    fn reevaluate_win(&mut self) {
        match self.state {
            SessionState::Playing | SessionState::Verifying { .. } => {}
            SessionState::Idle | SessionState::Finished { .. } => return,
        }
        if !self.pool.all_used() {
            return;
        }
        if !self.image_cards.iter().all(|card| card.matched)
            || !self.word_cards.iter().all(|card| card.matched)
        {
            return;
        }
        if self
            .timers
            .is_scheduled(|stage| matches!(stage, TimerStage::DeclareWin))
        {
            return;
        }
        self.timers.schedule(WIN_DECLARE_DELAY, TimerStage::DeclareWin);
    }

    fn finish(&mut self, win: bool) {
        self.timers
            .cancel_where(|stage| matches!(stage, TimerStage::CountdownTick));
        self.state = SessionState::Finished { win };
        self.events.push_back(if win {
            GameEvent::Won
        } else {
            GameEvent::TimeExpired
        });
        info!(
            "session finished: {}, score {}, {} pairs matched",
            if win { "win" } else { "loss" },
            self.score,
            self.matched_pairs
        );
    }
}

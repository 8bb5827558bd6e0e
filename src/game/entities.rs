use serde::{Deserialize, Serialize};
use std::fmt;

/// Type alias for source-pool item identifiers.
pub type ItemId = u32;

/// Type alias for per-session card identifiers. Card ids come from a
/// monotonic counter owned by the session and are never reused, even for
/// matches landing within the same millisecond.
pub type CardId = u64;

/// Type alias for floating score popup identifiers.
pub type PopupId = u64;

/// An entry in the immutable source pool: a picture (emoji) and the word
/// naming it. Items are drawn into play and never mutated.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub emoji: String,
    pub word: String,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, emoji: &str, word: &str) -> Self {
        Self {
            id,
            emoji: emoji.to_string(),
            word: word.to_string(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji, self.word)
    }
}

/// Which of the two parallel card sequences a card belongs to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Image,
    Word,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Image => "image",
            Self::Word => "word",
        };
        write!(f, "{repr}")
    }
}

/// Display-layer animation state of a card. Transitions are cleared by
/// explicit timer stages, never by render cycles.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    Steady,
    Leaving,
    Entering,
}

/// A single in-play card. Every field is set at construction; none are
/// inferred at read time.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub item_id: ItemId,
    pub kind: CardKind,
    pub content: String,
    pub matched: bool,
    pub errored: bool,
    pub transition: Transition,
}

impl Card {
    /// Build a settled card for an item.
    #[must_use]
    pub fn new(id: CardId, item: &Item, kind: CardKind) -> Self {
        Self::with_transition(id, item, kind, Transition::Steady)
    }

    /// Build a replacement card that starts in its entering animation.
    #[must_use]
    pub fn entering(id: CardId, item: &Item, kind: CardKind) -> Self {
        Self::with_transition(id, item, kind, Transition::Entering)
    }

    fn with_transition(id: CardId, item: &Item, kind: CardKind, transition: Transition) -> Self {
        let content = match kind {
            CardKind::Image => item.emoji.clone(),
            CardKind::Word => item.word.clone(),
        };
        Self {
            id,
            item_id: item.id,
            kind,
            content,
            matched: false,
            errored: false,
            transition,
        }
    }
}

/// The player's current picks, at most one card per kind. A matched card
/// id never appears here.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Selection {
    pub image: Option<CardId>,
    pub word: Option<CardId>,
}

impl Selection {
    /// Both a picture and a word are picked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.image.is_some() && self.word.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The selection slot for a card kind.
    pub fn slot_mut(&mut self, kind: CardKind) -> &mut Option<CardId> {
        match kind {
            CardKind::Image => &mut self.image,
            CardKind::Word => &mut self.word,
        }
    }
}

/// A transient "+50" style popup. Spawned on a correct match and removed
/// by its expiry timer stage.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScorePopup {
    pub id: PopupId,
    pub amount: u32,
}

/// Fire-and-forget audio requests for the sound collaborator. Playback
/// failure never feeds back into game state.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Select,
    Match,
    Error,
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Select => "select",
            Self::Match => "match",
            Self::Error => "error",
        };
        write!(f, "{repr}")
    }
}

/// The stock pool of twenty emoji/word pairs.
#[must_use]
pub fn default_item_pool() -> Vec<Item> {
    [
        (1, "\u{1F34E}", "Apple"),
        (2, "\u{26BD}", "Ball"),
        (3, "\u{1F697}", "Car"),
        (4, "\u{1F436}", "Dog"),
        (5, "\u{1F31E}", "Sun"),
        (6, "\u{1F370}", "Cake"),
        (7, "\u{2708}\u{FE0F}", "Plane"),
        (8, "\u{1F4DA}", "Books"),
        (9, "\u{1F33A}", "Flower"),
        (10, "\u{1F3B8}", "Guitar"),
        (11, "\u{1F3E0}", "House"),
        (12, "\u{1F355}", "Pizza"),
        (13, "\u{1F308}", "Rainbow"),
        (14, "\u{2B50}", "Star"),
        (15, "\u{1F30A}", "Wave"),
        (16, "\u{1F3A8}", "Art"),
        (17, "\u{1F525}", "Fire"),
        (18, "\u{1F48E}", "Diamond"),
        (19, "\u{1F3AD}", "Theater"),
        (20, "\u{1F680}", "Rocket"),
    ]
    .into_iter()
    .map(|(id, emoji, word)| Item::new(id, emoji, word))
    .collect()
}

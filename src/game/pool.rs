//! Source pool bookkeeping: which items exist and which have ever been
//! drawn into play.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;

use super::entities::{Item, ItemId};

/// The finite item pool backing a session. The used set grows
/// monotonically until the next reset; an item is never drawn twice.
#[derive(Clone, Debug)]
pub struct ItemPool {
    items: Vec<Item>,
    used: HashSet<ItemId>,
}

impl ItemPool {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        let used = HashSet::with_capacity(items.len());
        Self { items, used }
    }

    /// Total number of items in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item ids that have ever entered play this session.
    #[must_use]
    pub fn used(&self) -> &HashSet<ItemId> {
        &self.used
    }

    /// Whether every pool item has been drawn at least once.
    #[must_use]
    pub fn all_used(&self) -> bool {
        self.used.len() == self.items.len()
    }

    /// Forget all draws. Called when a session restarts.
    pub fn reset(&mut self) {
        self.used.clear();
    }

    /// Draw a random subset of `count` items (capped at the pool size) and
    /// mark them used.
    pub fn draw_initial(&mut self, count: usize, rng: &mut impl Rng) -> Vec<Item> {
        let mut drawn = self.items.clone();
        drawn.shuffle(rng);
        drawn.truncate(count.min(self.items.len()));
        for item in &drawn {
            self.used.insert(item.id);
        }
        drawn
    }

    /// Draw one unused item uniformly at random, or `None` once the pool
    /// is exhausted. Exhaustion is the expected end-of-session path, not
    /// an error.
    pub fn draw_replacement(&mut self, rng: &mut impl Rng) -> Option<Item> {
        let available: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| !self.used.contains(&item.id))
            .collect();
        let item = (*available.choose(rng)?).clone();
        self.used.insert(item.id);
        Some(item)
    }
}

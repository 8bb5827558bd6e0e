/// Property-based tests for the session controller using proptest
///
/// These tests verify that the structural invariants of a session hold
/// across randomly generated interleavings of commands and clock
/// advances.
use picture_match::{CardKind, GameConfig, MatchSession};
use proptest::prelude::*;
use std::time::Duration;

#[derive(Clone, Debug)]
enum Op {
    Start,
    Select { index: usize, image: bool },
    Advance { ms: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Start),
        5 => (0usize..16, any::<bool>()).prop_map(|(index, image)| Op::Select { index, image }),
        5 => (0u64..1500).prop_map(|ms| Op::Advance { ms }),
    ]
}

fn small_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.item_pool.truncate(8);
    config.pair_count = 4;
    config.timer_length_secs = 30;
    config
}

fn sorted_items(cards: &[picture_match::Card]) -> Vec<picture_match::ItemId> {
    let mut items: Vec<_> = cards.iter().map(|card| card.item_id).collect();
    items.sort_unstable();
    items
}

proptest! {
    #[test]
    fn test_invariants_hold_under_random_play(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut session = MatchSession::seeded(small_config(), seed).expect("valid config");
        session.start();

        let mut prev_score = 0u32;
        let mut prev_pairs = 0usize;
        let mut prev_time = 30u32;

        for op in ops {
            match op {
                Op::Start => {
                    session.start();
                    prev_score = 0;
                    prev_pairs = 0;
                    prev_time = 30;
                }
                Op::Select { index, image } => {
                    let view = session.view();
                    let cards = if image { &view.image_cards } else { &view.word_cards };
                    if !cards.is_empty() {
                        let card_id = cards[index % cards.len()].id;
                        let kind = if image { CardKind::Image } else { CardKind::Word };
                        session.select_card(card_id, kind);
                    }
                }
                Op::Advance { ms } => {
                    session.advance(Duration::from_millis(ms));
                }
            }

            let view = session.view();

            // The two sequences always describe the same item multiset.
            prop_assert_eq!(view.image_cards.len(), view.word_cards.len());
            prop_assert_eq!(
                sorted_items(&view.image_cards),
                sorted_items(&view.word_cards)
            );

            // A selection slot only ever holds a live, unmatched card.
            for (slot, cards) in [
                (view.selection.image, &view.image_cards),
                (view.selection.word, &view.word_cards),
            ] {
                if let Some(card_id) = slot {
                    let card = cards.iter().find(|card| card.id == card_id);
                    prop_assert!(
                        card.is_some_and(|card| !card.matched),
                        "selection holds card {card_id} which is missing or matched"
                    );
                }
            }

            // Score moves in lockstep with matched pairs, monotonically.
            prop_assert_eq!(view.score, 50 * view.matched_pairs as u32);
            prop_assert!(view.score >= prev_score);
            prop_assert!(view.matched_pairs >= prev_pairs);
            prop_assert!(view.time_remaining <= prev_time);

            prev_score = view.score;
            prev_pairs = view.matched_pairs;
            prev_time = view.time_remaining;
        }
    }

    #[test]
    fn test_toggle_returns_to_prior_state(seed in any::<u64>(), index in 0usize..16) {
        let mut session = MatchSession::seeded(small_config(), seed).expect("valid config");
        session.start();

        let view = session.view();
        let card_id = view.image_cards[index % view.image_cards.len()].id;
        let before = view.selection;

        session.select_card(card_id, CardKind::Image);
        session.select_card(card_id, CardKind::Image);

        prop_assert_eq!(session.view().selection, before);
    }
}

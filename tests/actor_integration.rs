//! Session actor integration tests.
//!
//! Drives a hosted session over its message inbox with real timers.

use picture_match::session::{
    SessionActor, SessionHandle, SessionMessage, SessionNotification,
};
use picture_match::{CardKind, ConfigError, GameConfig, GameEvent, SessionPhase, SessionView, SoundCue};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, sleep};

async fn get_view(handle: &SessionHandle) -> SessionView {
    let (tx, rx) = oneshot::channel();
    handle
        .send(SessionMessage::GetView { response: tx })
        .await
        .expect("actor alive");
    rx.await.expect("view delivered")
}

#[tokio::test]
async fn test_actor_runs_a_match_end_to_end() {
    let (actor, handle) = SessionActor::new(GameConfig::default()).expect("valid config");
    tokio::spawn(actor.run());

    let (event_tx, mut event_rx) = mpsc::channel(64);
    handle
        .send(SessionMessage::Subscribe { sender: event_tx })
        .await
        .unwrap();

    let (tx, rx) = oneshot::channel();
    handle
        .send(SessionMessage::Start { response: tx })
        .await
        .unwrap();
    assert!(rx.await.unwrap().is_success());

    let view = get_view(&handle).await;
    assert_eq!(view.phase, SessionPhase::Playing);
    assert_eq!(view.image_cards.len(), 5);
    assert_eq!(view.time_remaining, 60);

    // Pick a correct pair off the live board.
    let image = view.image_cards.first().expect("board dealt").clone();
    let word = view
        .word_cards
        .iter()
        .find(|card| card.item_id == image.item_id)
        .expect("word partner exists")
        .clone();

    for (card_id, kind) in [(image.id, CardKind::Image), (word.id, CardKind::Word)] {
        let (tx, rx) = oneshot::channel();
        handle
            .send(SessionMessage::SelectCard {
                card_id,
                kind,
                response: tx,
            })
            .await
            .unwrap();
        assert!(rx.await.unwrap().is_success());
    }

    let view = get_view(&handle).await;
    assert_eq!(view.score, 50);
    assert_eq!(view.matched_pairs, 1);

    // Let the replacement and return-to-playing stages fire on the wall
    // clock.
    sleep(Duration::from_millis(600)).await;
    let view = get_view(&handle).await;
    assert_eq!(view.phase, SessionPhase::Playing);
    let mut image_items: Vec<_> = view.image_cards.iter().map(|card| card.item_id).collect();
    let mut word_items: Vec<_> = view.word_cards.iter().map(|card| card.item_id).collect();
    image_items.sort_unstable();
    word_items.sort_unstable();
    assert_eq!(image_items, word_items);
    assert!(!image_items.contains(&image.item_id), "matched item replaced");

    // Subscribers got the cues and a state-change marker, best-effort.
    let mut saw_match_cue = false;
    let mut saw_state_change = false;
    while let Ok(notification) = event_rx.try_recv() {
        match notification {
            SessionNotification::Event(GameEvent::Cue(SoundCue::Match)) => saw_match_cue = true,
            SessionNotification::StateChanged => saw_state_change = true,
            _ => {}
        }
    }
    assert!(saw_match_cue);
    assert!(saw_state_change);

    // Close tears the session down and drops the inbox.
    let (tx, rx) = oneshot::channel();
    handle
        .send(SessionMessage::Close { response: tx })
        .await
        .unwrap();
    assert!(rx.await.unwrap().is_success());
    sleep(Duration::from_millis(50)).await;
    let (tx, _rx) = oneshot::channel();
    assert!(
        handle
            .send(SessionMessage::GetView { response: tx })
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_actor_rejects_invalid_config() {
    let mut config = GameConfig::default();
    config.pair_count = 0;
    match SessionActor::new(config) {
        Err(err) => assert_eq!(err, ConfigError::ZeroPairCount),
        Ok(_) => panic!("expected ZeroPairCount"),
    }
}

#[tokio::test]
async fn test_actor_survives_dropped_subscriber() {
    let (actor, handle) = SessionActor::new(GameConfig::default()).expect("valid config");
    tokio::spawn(actor.run());

    let (event_tx, event_rx) = mpsc::channel(4);
    handle
        .send(SessionMessage::Subscribe { sender: event_tx })
        .await
        .unwrap();
    drop(event_rx);

    // Commands keep working with the subscriber gone.
    let (tx, rx) = oneshot::channel();
    handle
        .send(SessionMessage::Start { response: tx })
        .await
        .unwrap();
    assert!(rx.await.unwrap().is_success());

    let view = get_view(&handle).await;
    assert_eq!(view.phase, SessionPhase::Playing);
}

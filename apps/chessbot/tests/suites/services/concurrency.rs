use std::sync::Arc;
use std::time::{Duration, Instant};

use chessbot::AppState;

use crate::support::chat::{colours, has_pending, say, session_count};
use crate::support::test_state::{build_test_state, build_test_state_with_strategy, SlowMover};

const SEARCH_TIME: Duration = Duration::from_millis(1500);

/// Challenge the bot and, if the human drew white, play a first move so the
/// bot is searching either way. Returns every reply the human received.
async fn keep_bot_busy(state: AppState, realm: &str, human: &str) -> Vec<String> {
    let mut replies = say(&state, realm, human, ",start").await;
    let (white, _) = colours(&state, realm, human).await.unwrap();
    if white == human {
        replies.extend(say(&state, realm, human, ",move e2e4").await);
    }
    replies
}

fn bot_moved(replies: &[String]) -> bool {
    replies
        .iter()
        .any(|r| r.starts_with("The bot made move") || r.contains("the bot has made move"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_reciprocal_starts_create_exactly_one_game() {
    for round in 0..20 {
        let t = build_test_state().await;
        let realm = format!("race{round}");

        let (a_state, b_state) = (t.state.clone(), t.state.clone());
        let (a_realm, b_realm) = (realm.clone(), realm.clone());
        let a = tokio::spawn(async move {
            say(&a_state, &a_realm, "alice", ",start <@bob>").await
        });
        let b = tokio::spawn(async move {
            say(&b_state, &b_realm, "bob", ",start <@alice>").await
        });
        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        let started = a
            .iter()
            .chain(b.iter())
            .filter(|r| r.starts_with("A game has started"))
            .count();
        assert_eq!(started, 1, "round {round}: {a:?} / {b:?}");
        assert_eq!(session_count(&t.state, &realm).await, 1);
        assert!(!has_pending(&t.state, &realm, "alice", "bob").await);
        assert!(!has_pending(&t.state, &realm, "bob", "alice").await);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn realms_progress_independently() {
    let t = build_test_state().await;

    let mut tasks = Vec::new();
    for n in 0..8 {
        let state = t.state.clone();
        tasks.push(tokio::spawn(async move {
            let realm = format!("realm{n}");
            say(&state, &realm, "alice", ",start").await;
            realm
        }));
    }
    for task in tasks {
        let realm = task.await.unwrap();
        assert_eq!(session_count(&t.state, &realm).await, 1);
    }
    assert_eq!(t.state.realm_count(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_bot_search_does_not_hold_up_other_realms() {
    let slow = Arc::new(SlowMover::new(SEARCH_TIME));
    let t = build_test_state_with_strategy(slow.clone()).await;

    let busy = tokio::spawn(keep_bot_busy(t.state.clone(), "slow", "alice"));
    tokio::time::timeout(Duration::from_secs(5), slow.search_started())
        .await
        .expect("bot search should begin");

    let began = Instant::now();
    let replies = say(&t.state, "fast", "xavier", ",start <@yara>").await;
    let elapsed = began.elapsed();

    assert_eq!(replies.len(), 1, "got {replies:?}");
    assert!(has_pending(&t.state, "fast", "xavier", "yara").await);
    assert!(
        elapsed < SEARCH_TIME / 3,
        "command in another realm took {elapsed:?} while the bot searched"
    );

    let busy = busy.await.unwrap();
    assert!(bot_moved(&busy), "bot should still move, got {busy:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_realm_stays_responsive_while_the_bot_searches() {
    let slow = Arc::new(SlowMover::new(SEARCH_TIME));
    let t = build_test_state_with_strategy(slow.clone()).await;

    let busy = tokio::spawn(keep_bot_busy(t.state.clone(), "r1", "alice"));
    tokio::time::timeout(Duration::from_secs(5), slow.search_started())
        .await
        .expect("bot search should begin");

    let began = Instant::now();
    let replies = say(&t.state, "r1", "alice", ",move a2a3").await;
    assert!(began.elapsed() < SEARCH_TIME / 3);
    assert_eq!(replies, vec!["It is not your turn to play, <@alice>".to_string()]);

    busy.await.unwrap();
    let handle = t.state.registry.get(&"r1".into()).unwrap();
    let realm = handle.lock().await;
    let session = realm.sessions.session_for(&"alice".into()).unwrap();
    assert_eq!(session.turn_holder().as_str(), "alice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn resigning_during_the_search_drops_the_bot_move() {
    let slow = Arc::new(SlowMover::new(SEARCH_TIME));
    let t = build_test_state_with_strategy(slow.clone()).await;

    let busy = tokio::spawn(keep_bot_busy(t.state.clone(), "r1", "alice"));
    tokio::time::timeout(Duration::from_secs(5), slow.search_started())
        .await
        .expect("bot search should begin");

    let replies = say(&t.state, "r1", "alice", ",resign").await;
    assert!(replies[0].contains("resignation by <@alice>"), "got {replies:?}");

    let busy = busy.await.unwrap();
    assert!(!bot_moved(&busy), "no bot move after the game ended, got {busy:?}");
    assert_eq!(session_count(&t.state, "r1").await, 0);
}

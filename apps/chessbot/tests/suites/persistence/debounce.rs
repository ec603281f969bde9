use std::time::Duration;

use chessbot::persistence::PersistenceManager;

use crate::support::chat::{colours, say, start_game};
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn a_burst_of_moves_costs_one_write() {
    let t = build_test_state().await;
    start_game(&t.state, "r1", "alice", "bob").await;
    let (white, black) = colours(&t.state, "r1", "alice").await.unwrap();

    for (player, text) in [
        (&white, "e2e4"),
        (&black, "e7e5"),
        (&white, "g1f3"),
        (&black, "b8c6"),
        (&white, "f1b5"),
    ] {
        say(&t.state, "r1", player, &format!(",move {text}")).await;
    }

    assert_eq!(t.store.writes(), 1);
}

#[tokio::test]
async fn rejected_commands_do_not_write() {
    let t = build_test_state().await;

    say(&t.state, "r1", "alice", ",start <@alice>").await;
    say(&t.state, "r1", "alice", ",move e2e4").await;
    say(&t.state, "r1", "alice", ",help").await;

    assert_eq!(t.store.writes(), 0);
}

#[tokio::test]
async fn failed_write_keeps_the_game_and_retries_on_the_next_mutation() {
    let t = build_test_state().await;
    t.store.set_fail_writes(true);

    let replies = say(&t.state, "r1", "alice", ",start <@bob>").await;
    assert_eq!(replies.len(), 1, "the command still succeeds");
    assert_eq!(t.store.writes(), 0);

    t.store.set_fail_writes(false);
    say(&t.state, "r1", "bob", ",start <@alice>").await;

    assert_eq!(t.store.writes(), 1);
    let document = t.store.document().unwrap();
    assert_eq!(document.realms.len(), 1);
    assert_eq!(document.realms[0].sessions.len(), 1);
}

#[tokio::test]
async fn zero_debounce_writes_after_every_mutation() {
    let t = build_test_state().await;
    let manager = PersistenceManager::new(t.store.clone(), Duration::ZERO);

    assert!(manager.note_mutation(&t.state.registry).await);
    assert!(manager.note_mutation(&t.state.registry).await);
    assert_eq!(t.store.writes(), 2);
}

#[tokio::test]
async fn shutdown_writes_a_final_snapshot() {
    let t = build_test_state().await;
    start_game(&t.state, "r1", "alice", "bob").await;
    let before = t.store.writes();

    t.state.persistence.shutdown(&t.state.registry).await.unwrap();

    assert_eq!(t.store.writes(), before + 1);
    let document = t.store.document().unwrap();
    assert_eq!(document.realms[0].sessions.len(), 1);
}

use crate::support::chat::{colours, has_pending, say, session_count, start_game};
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn one_sided_start_only_records_a_solicitation() {
    let t = build_test_state().await;

    let replies = say(&t.state, "r1", "alice", ",start <@bob>").await;

    assert_eq!(
        replies,
        vec!["<@bob>, <@alice> has requested that you play with them."]
    );
    assert!(has_pending(&t.state, "r1", "alice", "bob").await);
    assert_eq!(session_count(&t.state, "r1").await, 0);
}

#[tokio::test]
async fn reciprocal_start_creates_one_game_and_clears_requests() {
    let t = build_test_state().await;

    say(&t.state, "r1", "alice", ",start <@bob>").await;
    let replies = say(&t.state, "r1", "bob", ",start <@!alice>").await;

    assert_eq!(replies[0], "A game has started between <@bob> and <@alice>.");
    assert!(replies.iter().any(|r| r.ends_with("is playing as White.")));
    assert!(replies.iter().any(|r| r.ends_with("is playing as Black.")));
    assert!(replies.iter().any(|r| r.contains("fen-to-image.com")));
    assert_eq!(session_count(&t.state, "r1").await, 1);
    assert!(!has_pending(&t.state, "r1", "alice", "bob").await);
    assert!(!has_pending(&t.state, "r1", "bob", "alice").await);

    let (white, black) = colours(&t.state, "r1", "alice").await.unwrap();
    let mut players = [white, black];
    players.sort();
    assert_eq!(players, ["alice".to_string(), "bob".to_string()]);
}

#[tokio::test]
async fn repeated_solicitation_is_recorded_once() {
    let t = build_test_state().await;

    say(&t.state, "r1", "alice", ",start <@bob>").await;
    say(&t.state, "r1", "alice", ",start <@bob>").await;

    let handle = t.state.registry.get(&"r1".into()).unwrap();
    assert_eq!(handle.lock().await.pending.pending_count(), 1);
}

#[tokio::test]
async fn starting_against_yourself_is_refused() {
    let t = build_test_state().await;

    let replies = say(&t.state, "r1", "alice", ",start <@alice>").await;

    assert_eq!(replies, vec!["<@alice>, you can't play with yourself."]);
    assert!(!has_pending(&t.state, "r1", "alice", "alice").await);
}

#[tokio::test]
async fn busy_players_cannot_be_matched() {
    let t = build_test_state().await;
    start_game(&t.state, "r1", "alice", "bob").await;

    let replies = say(&t.state, "r1", "carol", ",start <@alice>").await;
    assert_eq!(replies, vec!["<@alice> is already in a game."]);
    assert!(!has_pending(&t.state, "r1", "carol", "alice").await);

    let replies = say(&t.state, "r1", "alice", ",start <@carol>").await;
    assert_eq!(replies, vec!["<@alice>, you are already in a game."]);
    assert_eq!(session_count(&t.state, "r1").await, 1);
}

#[tokio::test]
async fn realms_do_not_share_players_or_requests() {
    let t = build_test_state().await;
    start_game(&t.state, "r1", "alice", "bob").await;

    // Same users, different realm: free to play again.
    start_game(&t.state, "r2", "alice", "bob").await;
    assert_eq!(session_count(&t.state, "r1").await, 1);
    assert_eq!(session_count(&t.state, "r2").await, 1);

    say(&t.state, "r3", "carol", ",start <@dave>").await;
    let replies = say(&t.state, "r4", "dave", ",start <@carol>").await;
    assert_eq!(
        replies,
        vec!["<@carol>, <@dave> has requested that you play with them."]
    );
    assert_eq!(session_count(&t.state, "r4").await, 0);
}

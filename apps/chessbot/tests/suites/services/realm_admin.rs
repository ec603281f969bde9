use chessbot::RealmId;

use crate::support::chat::{say, say_as};
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn unprefixed_and_unknown_messages_get_no_reply() {
    let t = build_test_state().await;

    for content in ["hello there", "!start", ",dance", ",", ""] {
        assert!(say(&t.state, "r1", "alice", content).await.is_empty());
    }
    assert_eq!(t.store.writes(), 0);
}

#[tokio::test]
async fn help_lists_commands_with_the_realm_prefix() {
    let t = build_test_state().await;

    let replies = say(&t.state, "r1", "alice", ",help").await;

    assert_eq!(replies.len(), 1);
    assert!(replies[0].starts_with("Commands:"));
    assert!(replies[0].contains(",changeprefix <prefix>"));
}

#[tokio::test]
async fn missing_arguments_show_usage() {
    let t = build_test_state().await;

    assert_eq!(
        say(&t.state, "r1", "alice", ",move").await,
        vec!["Usage: ,move <move>"]
    );
    assert_eq!(
        say_as(&t.state, "r1", "alice", ",changeprefix", true).await,
        vec!["Usage: ,changeprefix <prefix>"]
    );
}

#[tokio::test]
async fn changeprefix_requires_the_manage_capability() {
    let t = build_test_state().await;

    let replies = say(&t.state, "r1", "alice", ",changeprefix !").await;

    assert_eq!(
        replies,
        vec![
            "You must have the \"Manage Server\" permission to change the prefix of this server."
        ]
    );
    assert_eq!(t.state.commands.prefix_for(&RealmId::new("r1")).await, ",");
}

#[tokio::test]
async fn changed_prefix_applies_to_that_realm_only() {
    let t = build_test_state().await;

    let replies = say_as(&t.state, "r1", "admin", ",changeprefix !", true).await;
    assert_eq!(
        replies,
        vec!["The prefix has successfully been changed to !"]
    );

    assert!(say(&t.state, "r1", "alice", ",help").await.is_empty());
    assert_eq!(say(&t.state, "r1", "alice", "!help").await.len(), 1);
    assert_eq!(say(&t.state, "r2", "alice", ",help").await.len(), 1);
    assert_eq!(t.state.commands.prefix_for(&RealmId::new("r2")).await, ",");
}

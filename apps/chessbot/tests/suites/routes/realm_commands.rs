use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use crate::support::app_builder::create_test_app;
use crate::support::chat::session_count;
use crate::support::test_state::build_test_state;

fn command(realm: &str, author: &str, content: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/api/realms/{realm}/commands"))
        .set_json(json!({ "author_id": author, "content": content }))
}

#[actix_web::test]
async fn commands_return_their_replies() {
    let t = build_test_state().await;
    let app = create_test_app(t.state.clone()).await;

    let resp = test::call_service(&app, command("r1", "alice", ",start <@bob>").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["replies"],
        json!(["<@bob>, <@alice> has requested that you play with them."])
    );

    let resp = test::call_service(&app, command("r1", "bob", ",start <@alice>").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let replies = body["replies"].as_array().unwrap();
    assert_eq!(replies[0], "A game has started between <@bob> and <@alice>.");
    assert_eq!(session_count(&t.state, "r1").await, 1);
}

#[actix_web::test]
async fn rule_violations_are_replies_not_http_errors() {
    let t = build_test_state().await;
    let app = create_test_app(t.state).await;

    let resp = test::call_service(&app, command("r1", "alice", ",move e2e4").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["replies"],
        json!(["<@alice>, you are not currently in a game."])
    );
}

#[actix_web::test]
async fn ordinary_chat_yields_an_empty_reply_list() {
    let t = build_test_state().await;
    let app = create_test_app(t.state).await;

    let resp = test::call_service(&app, command("r1", "alice", "good game!").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["replies"], json!([]));
}

#[actix_web::test]
async fn manage_flag_allows_prefix_change() {
    let t = build_test_state().await;
    let app = create_test_app(t.state).await;

    let req = test::TestRequest::post()
        .uri("/api/realms/r1/commands")
        .set_json(json!({
            "author_id": "admin",
            "content": ",changeprefix $",
            "can_manage_realm": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/realms/r1/prefix")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "prefix": "$" }));
}

#[actix_web::test]
async fn prefix_of_an_unseen_realm_is_the_default() {
    let t = build_test_state().await;
    let app = create_test_app(t.state).await;

    let req = test::TestRequest::get()
        .uri("/api/realms/brand-new/prefix")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "prefix": "," }));
}

#[actix_web::test]
async fn join_creates_the_realm() {
    let t = build_test_state().await;
    let app = create_test_app(t.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/api/realms/81384788765712384/join")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(t.state.realm_count(), 1);
    assert!(t.state.registry.get(&"81384788765712384".into()).is_some());

    // Joining twice is harmless.
    let req = test::TestRequest::post()
        .uri("/api/realms/81384788765712384/join")
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(t.state.realm_count(), 1);
}

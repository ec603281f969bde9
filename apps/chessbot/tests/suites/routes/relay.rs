use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use chessbot::RealmId;
use serde_json::{json, Value};

use crate::support::app_builder::create_test_app;
use crate::support::test_state::{
    build_test_state_with_notifier, FailingNotifier, RecordingNotifier,
};

#[actix_web::test]
async fn replies_are_relayed_to_the_notifier() {
    let notifier = Arc::new(RecordingNotifier::default());
    let t = build_test_state_with_notifier(notifier.clone()).await;
    let app = create_test_app(t.state).await;

    let req = test::TestRequest::post()
        .uri("/api/realms/r1/commands")
        .set_json(json!({ "author_id": "alice", "content": ",help" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let deliveries = notifier.deliveries();
    assert_eq!(deliveries.len(), 1);
    let (realm, replies) = &deliveries[0];
    assert_eq!(realm, &RealmId::new("r1"));
    assert_eq!(json!(replies), body["replies"]);
}

#[actix_web::test]
async fn nothing_is_relayed_for_ordinary_chat() {
    let notifier = Arc::new(RecordingNotifier::default());
    let t = build_test_state_with_notifier(notifier.clone()).await;
    let app = create_test_app(t.state).await;

    let req = test::TestRequest::post()
        .uri("/api/realms/r1/commands")
        .set_json(json!({ "author_id": "alice", "content": "hi all" }))
        .to_request();
    test::call_service(&app, req).await;

    assert!(notifier.deliveries().is_empty());
}

#[actix_web::test]
async fn relay_failure_does_not_fail_the_command() {
    let t = build_test_state_with_notifier(Arc::new(FailingNotifier)).await;
    let app = create_test_app(t.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/api/realms/r1/commands")
        .set_json(json!({ "author_id": "alice", "content": ",start" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let handle = t.state.registry.get(&RealmId::new("r1")).unwrap();
    assert_eq!(handle.lock().await.sessions.len(), 1);
}

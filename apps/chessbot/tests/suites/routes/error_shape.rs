use actix_web::http::header::HeaderName;
use actix_web::test;
use serde_json::json;

use crate::common::assert_problem_details_structure;
use crate::support::app_builder::create_test_app;
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn malformed_realm_id_is_a_problem_response() {
    let t = build_test_state().await;
    let app = create_test_app(t.state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/realms/bad.realm/prefix")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let problem = assert_problem_details_structure(resp, 400, "BAD_REQUEST").await;
    assert_eq!(problem["detail"], "Invalid realm id: bad.realm");
    assert_eq!(t.state.realm_count(), 0);
}

#[actix_web::test]
async fn empty_author_is_rejected() {
    let t = build_test_state().await;
    let app = create_test_app(t.state).await;

    let req = test::TestRequest::post()
        .uri("/api/realms/r1/commands")
        .set_json(json!({ "author_id": "  ", "content": ",help" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let problem = assert_problem_details_structure(resp, 400, "BAD_REQUEST").await;
    assert_eq!(problem["detail"], "author_id must not be empty");
}

#[actix_web::test]
async fn unreadable_body_is_rejected() {
    let t = build_test_state().await;
    let app = create_test_app(t.state).await;

    let req = test::TestRequest::post()
        .uri("/api/realms/r1/commands")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"author_id\": 5")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let problem = assert_problem_details_structure(resp, 400, "BAD_REQUEST").await;
    assert!(problem["detail"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
}

#[actix_web::test]
async fn inbound_request_id_is_echoed_and_used_as_trace_id() {
    let t = build_test_state().await;
    let app = create_test_app(t.state).await;

    let req = test::TestRequest::get()
        .uri("/api/realms/bad.realm/prefix")
        .insert_header(("x-request-id", "adapter-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let echoed = resp
        .headers()
        .get(HeaderName::from_static("x-request-id"))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(echoed.as_deref(), Some("adapter-42"));

    let problem = assert_problem_details_structure(resp, 400, "BAD_REQUEST").await;
    assert_eq!(problem["trace_id"], "adapter-42");
}

#[actix_web::test]
async fn successful_responses_carry_a_generated_request_id() {
    let t = build_test_state().await;
    let app = create_test_app(t.state).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    let id = resp
        .headers()
        .get(HeaderName::from_static("x-request-id"))
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id should be set");
    assert_eq!(id.len(), 36, "expected a UUID, got {id}");
}

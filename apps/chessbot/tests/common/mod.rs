#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderName, CONTENT_TYPE};
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    chessbot_test_support::test_logging::init();
}

/// Check that a response is problem+json with the expected code and that the
/// body's trace_id matches the X-Trace-Id header.
pub async fn assert_problem_details_structure(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
) -> Value {
    assert_eq!(resp.status().as_u16(), expected_status);

    let headers = resp.headers().clone();
    let trace_id = headers
        .get(HeaderName::from_static("x-trace-id"))
        .and_then(|v| v.to_str().ok())
        .expect("X-Trace-Id header should be present and valid UTF-8")
        .to_string();
    assert!(!trace_id.is_empty(), "X-Trace-Id header should not be empty");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let body = test::read_body(resp).await;
    let problem: Value = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse error body as ProblemDetails. Raw body: {}",
            String::from_utf8_lossy(&body)
        )
    });

    for key in ["type", "title", "status", "detail", "code", "trace_id"] {
        assert!(problem.get(key).is_some(), "{key} field should be present");
    }
    assert_eq!(problem["code"], expected_code);
    assert_eq!(problem["status"], expected_status);
    assert_eq!(problem["trace_id"], trace_id.as_str());

    let type_value = problem["type"].as_str().expect("type should be a string");
    assert!(
        type_value.starts_with("https://chessbot.local/errors/"),
        "type should follow the expected URL format"
    );
    problem
}

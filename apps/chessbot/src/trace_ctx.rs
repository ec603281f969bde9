//! Task-local request trace id.
//!
//! `RequestTrace` scopes each request's handler future with its trace id so
//! error responses and logs can read it without threading it through calls.

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: String;
}

const MAX_INBOUND_LEN: usize = 128;

/// Trace id of the current request, or `"unknown"` outside one.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run `future` with `trace_id` visible through [`trace_id()`].
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

/// Reuse a caller-supplied id when it is sane, otherwise mint a new one.
pub fn resolve(inbound: Option<&str>) -> String {
    match inbound.map(str::trim) {
        Some(id)
            if !id.is_empty()
                && id.len() <= MAX_INBOUND_LEN
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) =>
        {
            id.to_string()
        }
        _ => Uuid::new_v4().to_string(),
    }
}

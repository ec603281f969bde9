#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod matchmaking;
pub mod middleware;
pub mod notify;
pub mod persistence;
pub mod realm;
pub mod routes;
pub mod services;
pub mod sessions;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use config::bot::BotConfig;
pub use domain::{PairKey, RealmId, UserId};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use infra::state::build_state;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use realm::{Realm, RealmRegistry};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    chessbot_test_support::test_logging::init();
}

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Rule violation: {0}")]
    Rule(DomainError),
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Snapshot I/O error: {detail}")]
    SnapshotIo {
        detail: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Snapshot corrupt: {detail}")]
    SnapshotCorrupt { detail: String },
    #[error("Snapshot locked by another process: {path}")]
    SnapshotLocked { path: String },
    #[error("Notification timed out after {timeout_ms}ms")]
    NotifyTimeout { timeout_ms: u64 },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Rule(err) => rule_code(err),
            AppError::BadRequest { code, .. } => *code,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::SnapshotIo { .. } => ErrorCode::SnapshotIo,
            AppError::SnapshotCorrupt { .. } => ErrorCode::SnapshotCorrupt,
            AppError::SnapshotLocked { .. } => ErrorCode::SnapshotLocked,
            AppError::NotifyTimeout { .. } => ErrorCode::NotifyTimeout,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Rule(err) => err.to_string(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Internal { detail, .. } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
            AppError::SnapshotIo { detail, .. } => detail.clone(),
            AppError::SnapshotCorrupt { detail } => detail.clone(),
            AppError::SnapshotLocked { path } => format!("snapshot lock held: {path}"),
            AppError::NotifyTimeout { timeout_ms } => {
                format!("notification not acknowledged within {timeout_ms}ms")
            }
        }
    }

    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Rule(err) => rule_status(err),
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SnapshotIo { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SnapshotCorrupt { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SnapshotLocked { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotifyTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::Internal,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn snapshot_io(detail: impl Into<String>, source: std::io::Error) -> Self {
        Self::SnapshotIo {
            detail: detail.into(),
            source,
        }
    }

    pub fn snapshot_corrupt(detail: impl Into<String>) -> Self {
        Self::SnapshotCorrupt {
            detail: detail.into(),
        }
    }

    pub(crate) fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(|c| c.to_lowercase()))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn rule_code(err: &DomainError) -> ErrorCode {
    match err {
        DomainError::SelfPlayNotAllowed => ErrorCode::SelfPlayNotAllowed,
        DomainError::AlreadyInSession => ErrorCode::AlreadyInSession,
        DomainError::TargetAlreadyInSession => ErrorCode::TargetAlreadyInSession,
        DomainError::NotInSession => ErrorCode::NotInSession,
        DomainError::NotYourTurn => ErrorCode::NotYourTurn,
        DomainError::InvalidMove(..) => ErrorCode::InvalidMove,
        DomainError::InsufficientPermission => ErrorCode::InsufficientPermission,
        DomainError::NotAParticipant => ErrorCode::NotAParticipant,
        DomainError::Usage(_) => ErrorCode::Usage,
    }
}

fn rule_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::SelfPlayNotAllowed | DomainError::Usage(_) => StatusCode::BAD_REQUEST,
        DomainError::AlreadyInSession
        | DomainError::TargetAlreadyInSession
        | DomainError::NotYourTurn => StatusCode::CONFLICT,
        DomainError::NotInSession => StatusCode::NOT_FOUND,
        DomainError::InvalidMove(..) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::InsufficientPermission | DomainError::NotAParticipant => {
            StatusCode::FORBIDDEN
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Rule(err)
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://chessbot.local/errors/{}", code.as_str()),
            title: Self::humanize_code(code.as_str()),
            status: status.as_u16(),
            detail: self.detail(),
            code: code.as_str().to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}

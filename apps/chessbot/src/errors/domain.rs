//! User-facing rule violations raised by the session layer.
//!
//! Every variant is detected before any realm state is touched, so a command
//! that fails with a `DomainError` has left the registry exactly as it found
//! it. The command service turns these into chat replies; the HTTP layer maps
//! them to `AppError` through `From<DomainError>`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Why the engine refused a move text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidMoveKind {
    /// Text is not coordinate notation (`e2e4`, `e7e8q`).
    Unparseable,
    /// Parsed, but not legal in the current position.
    Illegal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    SelfPlayNotAllowed,
    AlreadyInSession,
    TargetAlreadyInSession,
    NotInSession,
    NotYourTurn,
    InvalidMove(InvalidMoveKind, String),
    InsufficientPermission,
    NotAParticipant,
    /// A command was recognised but its arguments were missing or malformed.
    Usage(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::SelfPlayNotAllowed => write!(f, "self play not allowed"),
            DomainError::AlreadyInSession => write!(f, "already in a session"),
            DomainError::TargetAlreadyInSession => write!(f, "target already in a session"),
            DomainError::NotInSession => write!(f, "not in a session"),
            DomainError::NotYourTurn => write!(f, "not your turn"),
            DomainError::InvalidMove(kind, text) => write!(f, "invalid move {text:?} ({kind:?})"),
            DomainError::InsufficientPermission => write!(f, "insufficient permission"),
            DomainError::NotAParticipant => write!(f, "not a participant of this session"),
            DomainError::Usage(usage) => write!(f, "usage: {usage}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn unparseable_move(text: impl Into<String>) -> Self {
        Self::InvalidMove(InvalidMoveKind::Unparseable, text.into())
    }

    pub fn illegal_move(text: impl Into<String>) -> Self {
        Self::InvalidMove(InvalidMoveKind::Illegal, text.into())
    }

    pub fn usage(usage: impl Into<String>) -> Self {
        Self::Usage(usage.into())
    }
}

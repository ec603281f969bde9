//! Error codes for the chessbot API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes. Every code
//! is SCREAMING_SNAKE_CASE and appears verbatim in problem+json bodies.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Session rules
    SelfPlayNotAllowed,
    AlreadyInSession,
    TargetAlreadyInSession,
    NotInSession,
    NotYourTurn,
    InvalidMove,
    NotAParticipant,
    /// Caller lacks the realm management capability
    InsufficientPermission,

    // Request Validation
    /// Command arguments missing or malformed
    Usage,
    BadRequest,

    // Persistence
    /// Snapshot could not be parsed at startup
    SnapshotCorrupt,
    /// Another process holds the snapshot lock
    SnapshotLocked,
    /// Snapshot read/write failed
    SnapshotIo,

    // System Errors
    Internal,
    ConfigError,
    /// Outbound relay timed out
    NotifyTimeout,
}

impl ErrorCode {
    /// Canonical string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelfPlayNotAllowed => "SELF_PLAY_NOT_ALLOWED",
            Self::AlreadyInSession => "ALREADY_IN_SESSION",
            Self::TargetAlreadyInSession => "TARGET_ALREADY_IN_SESSION",
            Self::NotInSession => "NOT_IN_SESSION",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::InvalidMove => "INVALID_MOVE",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::InsufficientPermission => "INSUFFICIENT_PERMISSION",

            Self::Usage => "USAGE",
            Self::BadRequest => "BAD_REQUEST",

            Self::SnapshotCorrupt => "SNAPSHOT_CORRUPT",
            Self::SnapshotLocked => "SNAPSHOT_LOCKED",
            Self::SnapshotIo => "SNAPSHOT_IO",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::NotifyTimeout => "NOTIFY_TIMEOUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! One game between two participants.
//!
//! A [`GameSession`] owns its [`ChessEngine`] outright. Turn order comes from
//! the engine's side to move, and every move goes through
//! [`GameSession::apply_move`] so human and automated moves share the same
//! validation and end-of-game handling.

use std::fmt;

use time::OffsetDateTime;

use crate::domain::UserId;
use crate::engine::{AppliedMove, ChessEngine, EngineStatus, MoveOutcome, RejectReason, Side};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    CheckmateByWhite,
    CheckmateByBlack,
    Stalemate,
    ThreefoldRepetition,
    FiftyMoveRule,
    InsufficientMaterial,
    /// The given side resigned.
    Resignation(Side),
}

impl EndReason {
    fn from_status(status: EngineStatus) -> Option<Self> {
        match status {
            EngineStatus::InProgress => None,
            EngineStatus::Checkmate {
                winner: Side::White,
            } => Some(EndReason::CheckmateByWhite),
            EngineStatus::Checkmate {
                winner: Side::Black,
            } => Some(EndReason::CheckmateByBlack),
            EngineStatus::Stalemate => Some(EndReason::Stalemate),
            EngineStatus::ThreefoldRepetition => Some(EndReason::ThreefoldRepetition),
            EngineStatus::FiftyMoveRule => Some(EndReason::FiftyMoveRule),
            EngineStatus::InsufficientMaterial => Some(EndReason::InsufficientMaterial),
        }
    }

    /// Side that won, if the game was decisive.
    pub fn winning_side(self) -> Option<Side> {
        match self {
            EndReason::CheckmateByWhite | EndReason::Resignation(Side::Black) => Some(Side::White),
            EndReason::CheckmateByBlack | EndReason::Resignation(Side::White) => Some(Side::Black),
            _ => None,
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::CheckmateByWhite => f.write_str("checkmate by White"),
            EndReason::CheckmateByBlack => f.write_str("checkmate by Black"),
            EndReason::Stalemate => f.write_str("stalemate"),
            EndReason::ThreefoldRepetition => f.write_str("threefold repetition"),
            EndReason::FiftyMoveRule => f.write_str("the fifty move rule"),
            EndReason::InsufficientMaterial => f.write_str("insufficient material"),
            EndReason::Resignation(side) => write!(f, "resignation by {side}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Ended(EndReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Ended(EndReason),
}

/// A move that was applied, with what it did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveApplied {
    pub notation: AppliedMove,
    pub outcome: TurnOutcome,
}

/// Link to a rendered image of a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardImage(String);

impl BoardImage {
    pub fn url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    engine: ChessEngine,
    white: UserId,
    black: UserId,
    created_at: OffsetDateTime,
    state: SessionState,
}

impl GameSession {
    pub fn new(white: UserId, black: UserId, created_at: OffsetDateTime) -> Self {
        Self::restore(white, black, created_at, ChessEngine::new())
    }

    /// Rebuild an active session around an engine loaded from a snapshot.
    pub fn restore(
        white: UserId,
        black: UserId,
        created_at: OffsetDateTime,
        engine: ChessEngine,
    ) -> Self {
        Self {
            engine,
            white,
            black,
            created_at,
            state: SessionState::Active,
        }
    }

    pub fn white(&self) -> &UserId {
        &self.white
    }

    pub fn black(&self) -> &UserId {
        &self.black
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn engine(&self) -> &ChessEngine {
        &self.engine
    }

    pub fn participant(&self, side: Side) -> &UserId {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    pub fn side_of(&self, user: &UserId) -> Option<Side> {
        if user == &self.white {
            Some(Side::White)
        } else if user == &self.black {
            Some(Side::Black)
        } else {
            None
        }
    }

    pub fn turn_holder(&self) -> &UserId {
        self.participant(self.engine.side_to_move())
    }

    /// Validate and apply `text` on behalf of `user`.
    ///
    /// Nothing changes unless the result is `Ok`.
    pub fn apply_move(&mut self, user: &UserId, text: &str) -> Result<MoveApplied, DomainError> {
        if self.state != SessionState::Active {
            return Err(DomainError::NotInSession);
        }
        if user != self.turn_holder() {
            return Err(DomainError::NotYourTurn);
        }

        let notation = match self.engine.try_move(text) {
            MoveOutcome::Applied(applied) => applied,
            MoveOutcome::Rejected(RejectReason::Unparseable) => {
                return Err(DomainError::unparseable_move(text.trim()))
            }
            MoveOutcome::Rejected(RejectReason::Illegal) => {
                return Err(DomainError::illegal_move(text.trim()))
            }
        };

        let outcome = match EndReason::from_status(self.engine.status()) {
            Some(reason) => {
                self.state = SessionState::Ended(reason);
                TurnOutcome::Ended(reason)
            }
            None => TurnOutcome::Continue,
        };
        Ok(MoveApplied { notation, outcome })
    }

    /// End the game in the other participant's favour, whoever is to move.
    pub fn resign(&mut self, user: &UserId) -> Result<EndReason, DomainError> {
        let side = self.side_of(user).ok_or(DomainError::NotAParticipant)?;
        let reason = EndReason::Resignation(side);
        self.state = SessionState::Ended(reason);
        Ok(reason)
    }

    pub fn winner(&self) -> Option<&UserId> {
        match self.state {
            SessionState::Ended(reason) => reason.winning_side().map(|side| self.participant(side)),
            SessionState::Active => None,
        }
    }

    pub fn loser(&self) -> Option<&UserId> {
        match self.state {
            SessionState::Ended(reason) => reason
                .winning_side()
                .map(|side| self.participant(opposite(side))),
            SessionState::Active => None,
        }
    }

    /// Renderer URL for the current position. `{fen}` in the template is
    /// replaced by the position's FEN.
    pub fn board_image(&self, template: &str) -> BoardImage {
        let fen = self.engine.fen().replace(' ', "%20");
        BoardImage(template.replace("{fen}", &fen))
    }
}

fn opposite(side: Side) -> Side {
    match side {
        Side::White => Side::Black,
        Side::Black => Side::White,
    }
}

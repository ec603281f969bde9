//! Chat reply text.

use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::errors::domain::DomainError;
use crate::sessions::{BoardImage, EndReason, GameSession};

/// One chat message to post back into the realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reply(String);

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl From<BoardImage> for Reply {
    fn from(image: BoardImage) -> Self {
        Self(image.url().to_string())
    }
}

pub fn solicitation_pending(requester: &UserId, target: &UserId) -> Reply {
    Reply::new(format!(
        "{}, {} has requested that you play with them.",
        target.mention(),
        requester.mention()
    ))
}

pub fn game_started(requester: &UserId, target: &UserId, session: &GameSession) -> Vec<Reply> {
    vec![
        Reply::new(format!(
            "A game has started between {} and {}.",
            requester.mention(),
            target.mention()
        )),
        Reply::new(format!("{} is playing as White.", session.white().mention())),
        Reply::new(format!("{} is playing as Black.", session.black().mention())),
    ]
}

pub fn move_made(mover: &UserId, opponent: &UserId, text: &str) -> Reply {
    Reply::new(format!(
        "{}, {} has made move {text}",
        opponent.mention(),
        mover.mention()
    ))
}

pub fn bot_opened(uci: &str) -> Reply {
    Reply::new(format!("The bot made move {uci}."))
}

pub fn bot_replied(human: &UserId, uci: &str) -> Reply {
    Reply::new(format!("{}, the bot has made move {uci}", human.mention()))
}

pub fn game_ended(session: &GameSession, reason: EndReason) -> Reply {
    let white = session.white().mention();
    let black = session.black().mention();
    let text = match reason {
        EndReason::CheckmateByWhite => format!("{white} has checkmated {black}"),
        EndReason::CheckmateByBlack => format!("{black} has checkmated {white}"),
        EndReason::Resignation(side) => format!(
            "The game between {white} and {black} has ended due to resignation by {}",
            session.participant(side).mention()
        ),
        EndReason::InsufficientMaterial => format!(
            "The game between {white} and {black} has ended due to insufficient material \
             for a checkmate to be possible."
        ),
        other => format!("The game between {white} and {black} has ended due to {other}."),
    };
    Reply::new(text)
}

pub fn final_position(image: BoardImage) -> Reply {
    Reply::new(format!("Final chessboard position. {image}"))
}

pub fn prefix_changed(prefix: &str) -> Reply {
    Reply::new(format!("The prefix has successfully been changed to {prefix}"))
}

pub fn help(prefix: &str) -> Reply {
    Reply::new(format!(
        "Commands:\n\
         {prefix}start [@user] - challenge a user, or the bot if nobody is named\n\
         {prefix}move <move> - play a move in coordinate notation, e.g. e2e4\n\
         {prefix}resign - resign your current game\n\
         {prefix}changeprefix <prefix> - change the command prefix (Manage Server)\n\
         {prefix}help - show this message"
    ))
}

/// Chat wording for a rule violation by `author`. `target` is the other
/// participant named in a `start` command, if any.
pub fn rule_violation(err: &DomainError, author: &UserId, target: Option<&UserId>) -> Reply {
    let author = author.mention();
    let text = match err {
        DomainError::SelfPlayNotAllowed => format!("{author}, you can't play with yourself."),
        DomainError::AlreadyInSession => format!("{author}, you are already in a game."),
        DomainError::TargetAlreadyInSession => match target {
            Some(target) => format!("{} is already in a game.", target.mention()),
            None => "That user is already in a game.".to_string(),
        },
        DomainError::NotInSession => format!("{author}, you are not currently in a game."),
        DomainError::NotYourTurn => format!("It is not your turn to play, {author}"),
        DomainError::InvalidMove(..) => format!("That move is invalid, {author}"),
        DomainError::InsufficientPermission => "You must have the \"Manage Server\" permission \
             to change the prefix of this server."
            .to_string(),
        DomainError::NotAParticipant => format!("{author}, you are not playing in that game."),
        DomainError::Usage(usage) => format!("Usage: {usage}"),
    };
    Reply::new(text)
}

//! Text command handling.
//!
//! Each command resolves its realm, takes that realm's lock, and runs its
//! whole check-then-mutate sequence before releasing it. A move owed by the
//! automated opponent is searched with no lock held, then applied under a
//! fresh lock only if the game is still where the search left it. The
//! snapshot trigger is spawned after the lock is dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use time::OffsetDateTime;
use tracing::{debug, error, info};

use super::opponent::AutomatedOpponentDriver;
use super::replies::{self, Reply};
use crate::domain::{PairKey, RealmId, UserId};
use crate::engine::ChessEngine;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::matchmaking::{request_match, MatchStatus};
use crate::persistence::PersistenceManager;
use crate::realm::{Realm, RealmRegistry};
use crate::sessions::{GameSession, TurnOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `None` challenges the automated opponent.
    Start(Option<UserId>),
    Resign,
    Move(String),
    ChangePrefix(String),
    Help,
}

/// Recognise a command addressed with `prefix`.
///
/// `None` means the message is not for us (wrong prefix or unknown name).
/// A known command with bad arguments is a `Usage` error.
pub fn parse_command(prefix: &str, content: &str) -> Option<Result<Command, DomainError>> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let name = words.next()?;

    let command = match name {
        "start" => Ok(Command::Start(words.next().map(parse_user))),
        "resign" => Ok(Command::Resign),
        "move" => words
            .next()
            .map(|text| Command::Move(text.to_string()))
            .ok_or_else(|| DomainError::usage(format!("{prefix}move <move>"))),
        "changeprefix" => words
            .next()
            .map(|new_prefix| Command::ChangePrefix(new_prefix.to_string()))
            .ok_or_else(|| DomainError::usage(format!("{prefix}changeprefix <prefix>"))),
        "help" => Ok(Command::Help),
        _ => return None,
    };
    Some(command)
}

/// Accepts a raw id or mention markup (`<@id>`, `<@!id>`).
fn parse_user(token: &str) -> UserId {
    let id = token
        .strip_prefix("<@")
        .and_then(|inner| inner.strip_suffix('>'))
        .map(|inner| inner.trim_start_matches('!'))
        .unwrap_or(token);
    UserId::new(id)
}

/// A message as delivered by the chat adapter.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub realm: RealmId,
    pub author: UserId,
    pub content: String,
    /// Whether the author may manage the realm (changeprefix).
    pub can_manage_realm: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub replies: Vec<Reply>,
    /// Whether realm state changed.
    pub mutated: bool,
}

impl CommandOutcome {
    fn unchanged(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            mutated: false,
        }
    }

    fn changed(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            mutated: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BotTurnKind {
    /// The bot plays white and opens a game that just started.
    Opening,
    /// The bot answers this human's move.
    Reply(UserId),
}

/// A move the automated opponent owes once the realm lock is released.
///
/// `created_at` and `ply` pin the exact game and position that was searched.
struct BotTurn {
    key: PairKey,
    created_at: OffsetDateTime,
    ply: usize,
    engine: ChessEngine,
    kind: BotTurnKind,
}

struct Dispatched {
    outcome: CommandOutcome,
    bot_turn: Option<BotTurn>,
}

impl From<CommandOutcome> for Dispatched {
    fn from(outcome: CommandOutcome) -> Self {
        Self {
            outcome,
            bot_turn: None,
        }
    }
}

pub struct CommandService {
    registry: Arc<RealmRegistry>,
    persistence: Arc<PersistenceManager>,
    driver: AutomatedOpponentDriver,
    board_template: String,
    rng: Mutex<StdRng>,
}

impl CommandService {
    pub fn new(
        registry: Arc<RealmRegistry>,
        persistence: Arc<PersistenceManager>,
        driver: AutomatedOpponentDriver,
        board_template: impl Into<String>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            registry,
            persistence,
            driver,
            board_template: board_template.into(),
            rng: Mutex::new(rng),
        }
    }

    pub fn registry(&self) -> &Arc<RealmRegistry> {
        &self.registry
    }

    pub fn bot_id(&self) -> &UserId {
        self.driver.bot_id()
    }

    /// Current prefix of a realm, creating the realm on first contact.
    pub async fn prefix_for(&self, realm: &RealmId) -> String {
        let handle = self.registry.get_or_create(realm);
        let prefix = handle.lock().await.prefix.clone();
        prefix
    }

    /// Handle one chat message and return the replies to post.
    pub async fn handle(&self, invocation: &Invocation) -> Result<CommandOutcome, AppError> {
        let handle = self.registry.get_or_create(&invocation.realm);
        let Dispatched {
            mut outcome,
            bot_turn,
        } = {
            let mut realm = handle.lock().await;
            let Some(parsed) = parse_command(&realm.prefix, &invocation.content) else {
                return Ok(CommandOutcome::default());
            };
            let command = match parsed {
                Ok(command) => command,
                Err(err) => {
                    let reply = replies::rule_violation(&err, &invocation.author, None);
                    return Ok(CommandOutcome::unchanged(vec![reply]));
                }
            };
            info!(
                realm = %invocation.realm,
                user = %invocation.author,
                command = ?command,
                "Handling command"
            );
            self.dispatch(&mut realm, invocation, command)
        };

        if let Some(turn) = bot_turn {
            let chosen = match self.driver.search(turn.engine.clone()).await {
                Ok(chosen) => chosen,
                Err(err) => {
                    error!(
                        realm = %invocation.realm,
                        session = %turn.key,
                        error = %err,
                        "Automated opponent failed to move"
                    );
                    None
                }
            };
            let mut realm = handle.lock().await;
            outcome
                .replies
                .extend(self.finish_bot_turn(&mut realm, &turn, chosen));
        }

        if outcome.mutated {
            self.persistence.spawn_note_mutation(Arc::clone(&self.registry));
        }
        Ok(outcome)
    }

    fn dispatch(
        &self,
        realm: &mut Realm,
        invocation: &Invocation,
        command: Command,
    ) -> Dispatched {
        let author = &invocation.author;
        match command {
            Command::Start(target) => self.start(realm, author, target),
            Command::Resign => self.resign(realm, author).into(),
            Command::Move(text) => self.play(realm, author, &text),
            Command::ChangePrefix(prefix) => {
                change_prefix(realm, author, &prefix, invocation.can_manage_realm).into()
            }
            Command::Help => CommandOutcome::unchanged(vec![replies::help(&realm.prefix)]).into(),
        }
    }

    fn start(
        &self,
        realm: &mut Realm,
        author: &UserId,
        target: Option<UserId>,
    ) -> Dispatched {
        let target = target.unwrap_or_else(|| self.bot_id().clone());
        let status = match request_match(realm, author, &target, self.bot_id()) {
            Ok(status) => status,
            Err(err) => {
                let reply = replies::rule_violation(&err, author, Some(&target));
                return CommandOutcome::unchanged(vec![reply]).into();
            }
        };
        if status == MatchStatus::AwaitingReciprocation {
            let reply = replies::solicitation_pending(author, &target);
            return CommandOutcome::changed(vec![reply]).into();
        }

        let realm_id = realm.id().clone();
        let key = PairKey::new(author.clone(), target.clone());
        let created = {
            let mut rng = self.rng.lock();
            realm
                .sessions
                .create(author.clone(), target.clone(), self.bot_id(), &mut *rng)
        };
        let session = match created {
            Ok(session) => session,
            Err(err) => {
                let reply = replies::rule_violation(&err, author, Some(&target));
                return CommandOutcome::unchanged(vec![reply]).into();
            }
        };
        info!(
            realm = %realm_id,
            session = %key,
            white = %session.white(),
            black = %session.black(),
            "Game started"
        );

        let mut out = replies::game_started(author, &target, session);
        let bot_turn = self.bot_turn(&key, session, BotTurnKind::Opening);
        if bot_turn.is_none() {
            out.push(session.board_image(&self.board_template).into());
        }
        Dispatched {
            outcome: CommandOutcome::changed(out),
            bot_turn,
        }
    }

    fn resign(&self, realm: &mut Realm, author: &UserId) -> CommandOutcome {
        let Some((key, session)) = realm.sessions.entry_for(author) else {
            let reply = replies::rule_violation(&DomainError::NotInSession, author, None);
            return CommandOutcome::unchanged(vec![reply]);
        };
        let reason = match session.resign(author) {
            Ok(reason) => reason,
            Err(err) => {
                let reply = replies::rule_violation(&err, author, None);
                return CommandOutcome::unchanged(vec![reply]);
            }
        };
        let out = vec![
            replies::game_ended(session, reason),
            replies::final_position(session.board_image(&self.board_template)),
        ];
        realm.sessions.remove(&key);
        info!(realm = %realm.id(), session = %key, user = %author, "Game resigned");
        CommandOutcome::changed(out)
    }

    fn play(
        &self,
        realm: &mut Realm,
        author: &UserId,
        text: &str,
    ) -> Dispatched {
        let Some((key, session)) = realm.sessions.entry_for(author) else {
            let reply = replies::rule_violation(&DomainError::NotInSession, author, None);
            return CommandOutcome::unchanged(vec![reply]).into();
        };

        let applied = match session.apply_move(author, text) {
            Ok(applied) => applied,
            Err(err) => {
                debug!(realm = %realm.id(), user = %author, error = %err, "Move rejected");
                let reply = replies::rule_violation(&err, author, None);
                return CommandOutcome::unchanged(vec![reply]).into();
            }
        };

        let opponent = session.turn_holder().clone();
        let mut out = vec![
            replies::move_made(author, &opponent, text.trim()),
            session.board_image(&self.board_template).into(),
        ];
        if let TurnOutcome::Ended(reason) = applied.outcome {
            out.push(replies::game_ended(session, reason));
            realm.sessions.remove(&key);
            info!(realm = %realm.id(), session = %key, reason = %reason, "Game over");
            return CommandOutcome::changed(out).into();
        }

        let bot_turn = self.bot_turn(&key, session, BotTurnKind::Reply(author.clone()));
        Dispatched {
            outcome: CommandOutcome::changed(out),
            bot_turn,
        }
    }

    fn bot_turn(
        &self,
        key: &PairKey,
        session: &GameSession,
        kind: BotTurnKind,
    ) -> Option<BotTurn> {
        self.driver.is_due(session).then(|| BotTurn {
            key: key.clone(),
            created_at: session.created_at(),
            ply: session.engine().history().len(),
            engine: session.engine().clone(),
            kind,
        })
    }

    /// Apply the searched move if the game is still the one that was searched
    /// and nobody moved in the meantime. A game resigned during the search
    /// gets no further replies.
    fn finish_bot_turn(
        &self,
        realm: &mut Realm,
        turn: &BotTurn,
        chosen: Option<String>,
    ) -> Vec<Reply> {
        let Some(session) = realm
            .sessions
            .session_mut(&turn.key)
            .filter(|session| session.created_at() == turn.created_at)
        else {
            debug!(realm = %realm.id(), session = %turn.key, "Game ended during the search");
            return Vec::new();
        };

        let unchanged =
            session.engine().history().len() == turn.ply && self.driver.is_due(session);
        let applied = match chosen {
            Some(_) if !unchanged => {
                debug!(session = %turn.key, "Position changed during the search");
                None
            }
            Some(text) => match self.driver.apply(session, &text) {
                Ok(applied) => Some(applied),
                Err(err) => {
                    error!(session = %turn.key, error = %err, "Automated opponent failed to move");
                    None
                }
            },
            None => None,
        };

        let mut out = Vec::new();
        let Some(applied) = applied else {
            if turn.kind == BotTurnKind::Opening {
                out.push(session.board_image(&self.board_template).into());
            }
            return out;
        };
        out.push(session.board_image(&self.board_template).into());
        out.push(match &turn.kind {
            BotTurnKind::Opening => replies::bot_opened(&applied.notation.uci),
            BotTurnKind::Reply(human) => replies::bot_replied(human, &applied.notation.uci),
        });
        if let TurnOutcome::Ended(reason) = applied.outcome {
            out.push(replies::game_ended(session, reason));
            realm.sessions.remove(&turn.key);
            info!(realm = %realm.id(), session = %turn.key, reason = %reason, "Game over");
        }
        out
    }
}

fn change_prefix(
    realm: &mut Realm,
    author: &UserId,
    prefix: &str,
    can_manage_realm: bool,
) -> CommandOutcome {
    if !can_manage_realm {
        let reply = replies::rule_violation(&DomainError::InsufficientPermission, author, None);
        return CommandOutcome::unchanged(vec![reply]);
    }
    info!(realm = %realm.id(), old = %realm.prefix, new = %prefix, "Prefix changed");
    realm.prefix = prefix.to_string();
    CommandOutcome::changed(vec![replies::prefix_changed(prefix)])
}

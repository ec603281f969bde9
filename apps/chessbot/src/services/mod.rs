pub mod commands;
pub mod opponent;
pub mod replies;

pub use commands::{parse_command, Command, CommandOutcome, CommandService, Invocation};
pub use opponent::AutomatedOpponentDriver;
pub use replies::Reply;

//! Move selection for the automated opponent.
//!
//! - [`SearchStrategy`]: trait every move chooser implements
//! - [`Minimax`]: alpha-beta search, the production default
//! - [`RandomMover`]: seedable random legal moves for tests
//! - [`registry`]: lookup by configured name

mod minimax;
mod random;
pub mod registry;
mod trait_def;

pub use minimax::Minimax;
pub use random::RandomMover;
pub use trait_def::{AiError, SearchStrategy};

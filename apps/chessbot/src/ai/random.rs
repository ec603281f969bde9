//! Random mover - plays a uniformly random legal move.
//!
//! Useful as a fast, seedable opponent for tests. Production uses
//! [`Minimax`](super::Minimax).

use parking_lot::Mutex;
use rand::prelude::*;
use shakmaty::Position;

use super::trait_def::{AiError, SearchStrategy};
use crate::engine::ChessEngine;

pub struct RandomMover {
    rng: Mutex<StdRng>,
}

impl RandomMover {
    pub const NAME: &'static str = "random";

    /// `Some(seed)` gives reproducible choices; `None` draws from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl SearchStrategy for RandomMover {
    fn choose_move(&self, engine: &ChessEngine, _depth: u8) -> Result<Option<String>, AiError> {
        let legal = engine.position().legal_moves();
        let mut rng = self.rng.lock();
        Ok(legal.as_slice().choose(&mut *rng).map(ChessEngine::uci_of))
    }
}

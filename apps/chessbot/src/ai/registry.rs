//! Registered search strategies.
//!
//! Each entry has a stable `name` used by `CHESSBOT_ENGINE`. Constructors
//! must be side-effect free; the same seed gives the same behavior where a
//! strategy is randomized.

use std::sync::Arc;

use crate::ai::{Minimax, RandomMover, SearchStrategy};

pub struct StrategyFactory {
    pub name: &'static str,
    pub make: fn(seed: Option<u64>) -> Arc<dyn SearchStrategy>,
}

static STRATEGY_FACTORIES: &[StrategyFactory] = &[
    StrategyFactory {
        name: Minimax::NAME,
        make: make_minimax,
    },
    StrategyFactory {
        name: RandomMover::NAME,
        make: make_random,
    },
];

pub fn registered_strategies() -> &'static [StrategyFactory] {
    STRATEGY_FACTORIES
}

/// Finds a registered strategy by its name.
pub fn by_name(name: &str) -> Option<&'static StrategyFactory> {
    registered_strategies()
        .iter()
        .find(|factory| factory.name == name)
}

fn make_minimax(_seed: Option<u64>) -> Arc<dyn SearchStrategy> {
    Arc::new(Minimax::new())
}

fn make_random(seed: Option<u64>) -> Arc<dyn SearchStrategy> {
    Arc::new(RandomMover::new(seed))
}

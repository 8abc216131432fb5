//! Random agent: picks a legal action uniformly at random.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::actions::Action;
use crate::agents::ActionSelector;
use crate::game_state::GameState;

pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible agent; the same seed plays the same game.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionSelector for RandomAgent {
    fn select_action(
        &mut self,
        _state: &GameState,
        legal_actions: &[Action],
    ) -> anyhow::Result<usize> {
        anyhow::ensure!(!legal_actions.is_empty(), "No legal actions available");
        Ok(self.rng.gen_range(0..legal_actions.len()))
    }
}

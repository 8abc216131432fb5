//! Agents for self-play.
//!
//! All agents implement the [`ActionSelector`] trait.

use crate::actions::Action;
use crate::game_state::GameState;

pub mod random_agent;
pub mod shortest_path_agent;

pub use random_agent::RandomAgent;
pub use shortest_path_agent::ShortestPathAgent;

/// Trait for agents that pick one of the legal actions for the player about
/// to move.
pub trait ActionSelector {
    /// Returns an index into `legal_actions`.
    ///
    /// `legal_actions` is never empty when called by the game runner.
    fn select_action(
        &mut self,
        state: &GameState,
        legal_actions: &[Action],
    ) -> anyhow::Result<usize>;
}

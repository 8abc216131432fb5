//! Core game loop for self-play.
//!
//! Agents are abstracted behind the [`ActionSelector`] trait so the runner
//! can be tested with mock agents.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::actions::Action;
use crate::agents::ActionSelector;
use crate::game_state::{GameConfig, GameState, Player};

/// One played turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub player: Player,
    pub action: Action,
}

/// Result of a complete game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// `Some(player)` if that player won, `None` if the step limit was hit.
    pub winner: Option<Player>,
    pub num_turns: usize,
    pub actions: Vec<TurnRecord>,
}

/// Play a complete game between two agents.
///
/// Player 1 moves first. The game is truncated after `config.max_steps`
/// turns.
pub fn play_game<'a>(
    agent_one: &'a mut dyn ActionSelector,
    agent_two: &'a mut dyn ActionSelector,
    config: &GameConfig,
) -> Result<GameResult> {
    let mut state = GameState::new(*config).context("Failed to set up the board")?;
    let mut actions = Vec::new();
    info!(max_walls = config.max_walls, max_steps = config.max_steps, "game started");

    while state.completed_steps() < config.max_steps && !state.is_over() {
        let legal_actions = state.legal_actions();
        // Cannot happen while both players keep a route, but stop cleanly
        if legal_actions.is_empty() {
            break;
        }

        let player = state.current_player();
        let agent = match player {
            Player::One => &mut *agent_one,
            Player::Two => &mut *agent_two,
        };
        let index = agent
            .select_action(&state, &legal_actions)
            .with_context(|| format!("Agent for {} failed to select an action", player))?;
        let action = *legal_actions.get(index).with_context(|| {
            format!(
                "Agent for {} chose action {} of {}",
                player,
                index,
                legal_actions.len()
            )
        })?;

        state
            .apply_action(action)
            .with_context(|| format!("Failed to apply {:?} for {}", action, player))?;
        debug!(%player, ?action, "turn played");
        actions.push(TurnRecord { player, action });
    }

    let winner = state.winner();
    match winner {
        Some(winner) => info!(%winner, turns = actions.len(), "game finished"),
        None => info!(turns = actions.len(), "game truncated"),
    }

    Ok(GameResult {
        winner,
        num_turns: actions.len(),
        actions,
    })
}

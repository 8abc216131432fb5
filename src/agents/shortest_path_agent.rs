//! Greedy agent built on the path search.
//!
//! It walks along a shortest route to its goal row. When the opponent is
//! strictly closer to its own goal, it instead builds the wall that widens
//! the gap the most, provided some wall widens it at all.

use anyhow::{Context, Result};

use crate::actions::Action;
use crate::agents::ActionSelector;
use crate::game_state::{GameState, Player};
use crate::grid::{Board, Coordinates};
use crate::pathfinding::distance_to_row;
use crate::walls::update_board_walls;

/// Deterministic: the same position always yields the same action.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestPathAgent;

impl ShortestPathAgent {
    pub fn new() -> Self {
        Self
    }
}

/// Moves to the goal row, or `None` if it cannot be reached.
fn distance(position: Coordinates, player: Player, board: &Board) -> Result<Option<usize>> {
    distance_to_row(position, player.goal_row(), board)
        .with_context(|| format!("Failed to measure distance for {}", player))
}

/// Opponent's distance minus ours; larger is better for `player`.
fn margin(state: &GameState, player: Player, board: &Board) -> Result<i64> {
    let own = distance(state.player(player).coordinates, player, board)?;
    let opponent = player.opponent();
    let theirs = distance(state.player(opponent).coordinates, opponent, board)?;
    match (own, theirs) {
        (Some(own), Some(theirs)) => Ok(theirs as i64 - own as i64),
        _ => anyhow::bail!("A player has no route to its goal row"),
    }
}

impl ActionSelector for ShortestPathAgent {
    fn select_action(&mut self, state: &GameState, legal_actions: &[Action]) -> Result<usize> {
        anyhow::ensure!(!legal_actions.is_empty(), "No legal actions available");

        let player = state.current_player();
        let board = state.board();
        let current_margin = margin(state, player, board)?;

        if current_margin < 0 {
            let mut best_wall: Option<(usize, i64)> = None;
            for (index, action) in legal_actions.iter().enumerate() {
                let Action::Wall(coordinates) = action else {
                    continue;
                };
                let mut scratch = board.clone();
                update_board_walls(*coordinates, &mut scratch)
                    .with_context(|| format!("Failed to try wall at {}", coordinates))?;
                let score = margin(state, player, &scratch)?;
                if best_wall.is_none_or(|(_, best)| score > best) {
                    best_wall = Some((index, score));
                }
            }
            if let Some((index, score)) = best_wall {
                if score > current_margin {
                    return Ok(index);
                }
            }
        }

        let mut best_move: Option<(usize, usize)> = None;
        for (index, action) in legal_actions.iter().enumerate() {
            let Action::Move(destination) = action else {
                continue;
            };
            let Some(remaining) = distance(*destination, player, board)? else {
                continue;
            };
            if best_move.is_none_or(|(_, best)| remaining < best) {
                best_move = Some((index, remaining));
            }
        }

        best_move
            .map(|(index, _)| index)
            .context("No move leads towards the goal row")
    }
}

//! Move legality driver and the availability flags it maintains.
//!
//! Destinations are found in a fixed order: orthogonal steps, then diagonal
//! jumps, then straight jumps. Only addresses on the board are handed to the
//! checks in [`crate::validation`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{IllegalMove, InvariantViolation, MoveError};
use crate::game_state::Player;
use crate::grid::{
    is_within_board, Board, Coordinates, Occupancy, Square, DISTANCE_BETWEEN_PIECE_SQUARES,
};
use crate::validation::{check_diagonal, check_linear, check_linear_jump};
use crate::walls::would_strand;

const STEP: i32 = DISTANCE_BETWEEN_PIECE_SQUARES;

/// Up, down, left, right.
const LINEAR_OFFSETS: [(i32, i32); 4] = [(0, -STEP), (0, STEP), (-STEP, 0), (STEP, 0)];
const DIAGONAL_OFFSETS: [(i32, i32); 4] =
    [(-STEP, -STEP), (STEP, -STEP), (-STEP, STEP), (STEP, STEP)];
const JUMP_OFFSETS: [(i32, i32); 4] =
    [(0, -2 * STEP), (0, 2 * STEP), (-2 * STEP, 0), (2 * STEP, 0)];

/// A turn: move the mover's piece, or build a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Move(Coordinates),
    Wall(Coordinates),
}

impl Action {
    pub fn coordinates(self) -> Coordinates {
        match self {
            Action::Move(coordinates) | Action::Wall(coordinates) => coordinates,
        }
    }
}

/// Clear `is_available` on every piece square.
pub fn reset_moves(board: &mut Board) {
    for (_, square) in board.squares_mut() {
        if let Square::Piece(piece) = square {
            piece.is_available = false;
        }
    }
}

/// Every square the piece at `player` may move to, without touching the board.
pub fn legal_destinations(
    player: Coordinates,
    board: &Board,
) -> Result<Vec<Coordinates>, InvariantViolation> {
    board.piece_at(player)?;

    let candidates = |offsets: [(i32, i32); 4]| {
        offsets
            .into_iter()
            .map(move |(dx, dy)| player.offset(dx, dy))
            .filter(|target| is_within_board(*target))
    };

    let mut destinations = Vec::new();
    for target in candidates(LINEAR_OFFSETS) {
        if check_linear(target, player, board)? {
            destinations.push(target);
        }
    }
    for target in candidates(DIAGONAL_OFFSETS) {
        if check_diagonal(target, player, board)? {
            destinations.push(target);
        }
    }
    for target in candidates(JUMP_OFFSETS) {
        if check_linear_jump(target, player, board)? {
            destinations.push(target);
        }
    }
    Ok(destinations)
}

/// Recompute the mover's legal destinations and mark them available.
///
/// Previous marks are cleared first, even those left by the other player.
/// On an invariant violation the board is left as it was.
#[instrument(skip(board))]
pub fn compute_legal_moves(
    player: Coordinates,
    board: &mut Board,
) -> Result<Vec<Coordinates>, InvariantViolation> {
    let destinations = legal_destinations(player, board)?;

    reset_moves(board);
    for destination in &destinations {
        board.piece_at_mut(*destination)?.is_available = true;
    }

    debug!(count = destinations.len(), "legal moves computed");
    Ok(destinations)
}

/// Piece squares currently marked as legal destinations.
pub fn available_moves(board: &Board) -> Vec<Coordinates> {
    board
        .squares()
        .filter(|(_, square)| matches!(square, Square::Piece(piece) if piece.is_available))
        .map(|(coordinates, _)| coordinates)
        .collect()
}

/// Wall slots on which a wall may currently be built.
pub fn available_walls(board: &Board) -> Vec<Coordinates> {
    board
        .squares()
        .filter(|(_, square)| matches!(square, Square::Wall(wall) if wall.is_available))
        .map(|(coordinates, _)| coordinates)
        .collect()
}

/// Orthogonal neighbours reachable through a walkable wall slot, in the order
/// up, down, left, right. Occupancy is ignored.
pub fn available_squares_for_path(
    coordinates: Coordinates,
    board: &Board,
) -> Result<Vec<Coordinates>, InvariantViolation> {
    let mut neighbours = Vec::with_capacity(LINEAR_OFFSETS.len());
    for (dx, dy) in LINEAR_OFFSETS {
        let target = coordinates.offset(dx, dy);
        if !is_within_board(target) {
            continue;
        }
        let wall = board.wall_at(coordinates.offset(dx / STEP, dy / STEP))?;
        board.piece_at(target)?;
        if wall.is_walkable {
            neighbours.push(target);
        }
    }
    Ok(neighbours)
}

/// Move the piece standing on `from` to `to`.
///
/// # Returns
/// The player that moved. Availability marks are cleared afterwards since
/// they described the position before the move.
#[instrument(skip(board))]
pub fn apply_piece_move(
    from: Coordinates,
    to: Coordinates,
    board: &mut Board,
) -> Result<Player, MoveError> {
    match board.get(to) {
        None => return Err(IllegalMove::OutOfBoard(to).into()),
        Some(Square::Wall(_)) => return Err(IllegalMove::NotAPieceSquare(to).into()),
        Some(Square::Piece(_)) => {}
    }

    let player = board
        .get(from)
        .and_then(Square::as_piece)
        .and_then(|piece| piece.occupant.player())
        .ok_or(IllegalMove::NoPieceAt(from))?;

    if !legal_destinations(from, board)?.contains(&to) {
        debug!(%player, "move rejected");
        return Err(IllegalMove::Unreachable { from, to }.into());
    }

    board.piece_at_mut(from)?.occupant = Occupancy::Empty;
    board.piece_at_mut(to)?.occupant = Occupancy::Occupied(player);
    reset_moves(board);

    debug!(%player, "piece moved");
    Ok(player)
}

/// Recompute `is_available` on every buildable wall slot, clearing it where
/// a wall would leave some player without a path to its goal row.
///
/// Each candidate is tried on its own copy of the board.
#[instrument(skip(board))]
pub fn refresh_wall_availability(board: &mut Board) -> Result<(), InvariantViolation> {
    let candidates: Vec<Coordinates> = board
        .squares()
        .filter(|(_, square)| matches!(square, Square::Wall(wall) if wall.is_buildable))
        .map(|(coordinates, _)| coordinates)
        .collect();

    let shared: &Board = board;
    let verdicts = candidates
        .into_par_iter()
        .map(|coordinates| {
            would_strand(coordinates, shared).map(|stranded| (coordinates, stranded.is_none()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut blocked = 0;
    for (coordinates, available) in verdicts {
        board.wall_at_mut(coordinates)?.is_available = available;
        if !available {
            blocked += 1;
        }
    }

    debug!(blocked, "wall availability refreshed");
    Ok(())
}

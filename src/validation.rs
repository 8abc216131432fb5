//! Per-destination legality checks for piece moves.
//!
//! Every check takes the destination (`square`) and the mover's position
//! (`player`) and walks from the mover towards the destination with
//! [`offset_towards`]. The checks expect a fixed square variant at each
//! address they read; finding the other variant is reported as an
//! [`InvariantViolation`], never as an illegal move.

use crate::error::InvariantViolation;
use crate::grid::{is_within_board, Board, Coordinates};

/// Step `offset` squares from `player` towards `square` along one axis.
///
/// A zero difference leaves the coordinate where the player is.
pub fn coordinate_offset(square: i32, player: i32, offset: i32) -> i32 {
    player + (square - player).signum() * offset
}

pub fn offset_towards(square: Coordinates, player: Coordinates, offset: i32) -> Coordinates {
    Coordinates::new(
        coordinate_offset(square.x, player.x, offset),
        coordinate_offset(square.y, player.y, offset),
    )
}

/// Orthogonal step to a neighbouring piece square.
pub fn check_linear(
    square: Coordinates,
    player: Coordinates,
    board: &Board,
) -> Result<bool, InvariantViolation> {
    if board.piece_at(square)?.occupant.is_occupied() {
        return Ok(false);
    }

    let wall_near_player = board.wall_at(offset_towards(square, player, 1))?;
    Ok(wall_near_player.is_walkable)
}

/// Straight jump over an adjacent piece, landing two piece squares away.
pub fn check_linear_jump(
    square: Coordinates,
    player: Coordinates,
    board: &Board,
) -> Result<bool, InvariantViolation> {
    board.piece_at(square)?;

    if !board.wall_at(offset_towards(square, player, 1))?.is_walkable {
        return Ok(false);
    }

    if !board
        .piece_at(offset_towards(square, player, 2))?
        .occupant
        .is_occupied()
    {
        return Ok(false);
    }

    Ok(board.wall_at(offset_towards(square, player, 3))?.is_walkable)
}

/// Diagonal jump approached from one side.
///
/// With `start_from_horizontal` the opponent must stand beside the mover on
/// the destination's column; otherwise above or below on the destination's
/// row. The jump is only allowed when the straight jump over that opponent
/// is blocked, either by a wall or by the board edge.
pub fn check_diagonal_from_one_side(
    square: Coordinates,
    player: Coordinates,
    board: &Board,
    start_from_horizontal: bool,
) -> Result<bool, InvariantViolation> {
    if board.piece_at(square)?.occupant.is_occupied() {
        return Ok(false);
    }

    let step_x = |offset| coordinate_offset(square.x, player.x, offset);
    let step_y = |offset| coordinate_offset(square.y, player.y, offset);

    let (wall_near_player, enemy, wall_between_target_and_enemy, wall_over_enemy) =
        if start_from_horizontal {
            (
                Coordinates::new(step_x(1), player.y),
                Coordinates::new(square.x, player.y),
                Coordinates::new(square.x, step_y(1)),
                Coordinates::new(step_x(3), player.y),
            )
        } else {
            (
                Coordinates::new(player.x, step_y(1)),
                Coordinates::new(player.x, square.y),
                Coordinates::new(step_x(1), square.y),
                Coordinates::new(player.x, step_y(3)),
            )
        };

    if !board.wall_at(wall_near_player)?.is_walkable {
        return Ok(false);
    }
    if !board.piece_at(enemy)?.occupant.is_occupied() {
        return Ok(false);
    }
    if !board.wall_at(wall_between_target_and_enemy)?.is_walkable {
        return Ok(false);
    }

    // The board edge blocks the straight jump as well as a wall does
    if !is_within_board(wall_over_enemy) {
        return Ok(true);
    }
    Ok(!board.wall_at(wall_over_enemy)?.is_walkable)
}

pub fn check_diagonal(
    square: Coordinates,
    player: Coordinates,
    board: &Board,
) -> Result<bool, InvariantViolation> {
    Ok(check_diagonal_from_one_side(square, player, board, true)?
        || check_diagonal_from_one_side(square, player, board, false)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::Player;
    use crate::grid::create_board;
    use crate::grid_helpers::create_board_with;

    const MOVER: Coordinates = Coordinates::new(8, 8);
    const FAR: Coordinates = Coordinates::new(8, 4);

    fn facing_pieces(walls: &[Coordinates]) -> Board {
        create_board_with(
            &[
                (Player::One, Coordinates::new(8, 8)),
                (Player::Two, Coordinates::new(8, 6)),
            ],
            walls,
        )
        .unwrap()
    }

    #[test]
    fn test_coordinate_offset() {
        assert_eq!(coordinate_offset(4, 8, 1), 7);
        assert_eq!(coordinate_offset(12, 8, 3), 11);
        assert_eq!(coordinate_offset(8, 8, 3), 8);
    }

    #[test]
    fn test_check_linear_open_board() {
        let board = create_board();
        let player = Coordinates::new(8, 16);
        assert!(check_linear(Coordinates::new(8, 14), player, &board).unwrap());
        assert!(check_linear(Coordinates::new(6, 16), player, &board).unwrap());
    }

    #[test]
    fn test_check_linear_blocked_by_wall() {
        let board = create_board_with(
            &[(Player::One, Coordinates::new(8, 16))],
            &[Coordinates::new(8, 15)],
        )
        .unwrap();
        assert!(!check_linear(Coordinates::new(8, 14), Coordinates::new(8, 16), &board).unwrap());
    }

    #[test]
    fn test_check_linear_blocked_by_piece() {
        let board = facing_pieces(&[]);
        assert!(!check_linear(Coordinates::new(8, 6), Coordinates::new(8, 8), &board).unwrap());
    }

    #[test]
    fn test_check_linear_wrong_variant() {
        let board = create_board();
        let result = check_linear(Coordinates::new(9, 16), Coordinates::new(8, 16), &board);
        assert!(matches!(result, Err(InvariantViolation::TypeMismatch { .. })));
    }

    #[test]
    fn test_linear_jump_needs_open_far_wall() {
        let board = facing_pieces(&[]);
        assert!(check_linear_jump(FAR, MOVER, &board).unwrap());

        // Horizontal wall covering (8,5) and (10,5)
        let board = facing_pieces(&[Coordinates::new(8, 5)]);
        assert!(!check_linear_jump(FAR, MOVER, &board).unwrap());
    }

    #[test]
    fn test_linear_jump_needs_piece_in_between() {
        let board = create_board_with(&[(Player::One, Coordinates::new(8, 8))], &[]).unwrap();
        assert!(!check_linear_jump(FAR, MOVER, &board).unwrap());
    }

    #[test]
    fn test_wall_on_midpoint_blocks_jump() {
        // Horizontal wall covering (8,7) and (10,7)
        let board = facing_pieces(&[Coordinates::new(8, 7)]);
        assert!(!check_linear_jump(FAR, MOVER, &board).unwrap());
    }

    #[test]
    fn test_diagonal_requires_blocked_straight_jump() {
        let player = Coordinates::new(8, 8);

        let board = facing_pieces(&[]);
        assert!(!check_diagonal(Coordinates::new(6, 6), player, &board).unwrap());
        assert!(!check_diagonal(Coordinates::new(10, 6), player, &board).unwrap());

        let board = facing_pieces(&[Coordinates::new(8, 5)]);
        assert!(check_diagonal(Coordinates::new(6, 6), player, &board).unwrap());
        assert!(check_diagonal(Coordinates::new(10, 6), player, &board).unwrap());
        // Diagonals away from the opponent stay closed
        assert!(!check_diagonal(Coordinates::new(6, 10), player, &board).unwrap());
    }

    #[test]
    fn test_diagonal_blocked_by_side_wall() {
        // Straight jump blocked, and a vertical wall covering (7,6) and (7,4)
        let board = facing_pieces(&[Coordinates::new(8, 5), Coordinates::new(7, 6)]);
        let player = Coordinates::new(8, 8);
        assert!(!check_diagonal(Coordinates::new(6, 6), player, &board).unwrap());
        assert!(check_diagonal(Coordinates::new(10, 6), player, &board).unwrap());
    }

    #[test]
    fn test_diagonal_at_board_edge() {
        // Opponent on the back row: the edge blocks the straight jump
        let board = create_board_with(
            &[
                (Player::One, Coordinates::new(8, 2)),
                (Player::Two, Coordinates::new(8, 0)),
            ],
            &[],
        )
        .unwrap();
        let player = Coordinates::new(8, 2);
        assert!(check_diagonal(Coordinates::new(6, 0), player, &board).unwrap());
        assert!(check_diagonal(Coordinates::new(10, 0), player, &board).unwrap());
    }

    #[test]
    fn test_diagonal_at_side_edge() {
        // Opponent on the last column: the edge blocks the jump to the right
        let board = create_board_with(
            &[
                (Player::One, Coordinates::new(14, 8)),
                (Player::Two, Coordinates::new(16, 8)),
            ],
            &[],
        )
        .unwrap();
        let player = Coordinates::new(14, 8);
        assert!(check_diagonal(Coordinates::new(16, 6), player, &board).unwrap());
        assert!(check_diagonal(Coordinates::new(16, 10), player, &board).unwrap());
        assert!(!check_diagonal(Coordinates::new(12, 6), player, &board).unwrap());
    }

    #[test]
    fn test_diagonal_from_horizontal_side() {
        // Opponent to the right, wall behind it
        let board = create_board_with(
            &[
                (Player::One, Coordinates::new(8, 8)),
                (Player::Two, Coordinates::new(10, 8)),
            ],
            &[Coordinates::new(11, 8)],
        )
        .unwrap();
        let player = Coordinates::new(8, 8);
        let target = Coordinates::new(10, 6);
        assert!(check_diagonal_from_one_side(target, player, &board, true).unwrap());
        assert!(!check_diagonal_from_one_side(target, player, &board, false).unwrap());
        assert!(check_diagonal(Coordinates::new(10, 10), player, &board).unwrap());
    }
}

//! Wall placement and its effect on neighbouring wall slots.
//!
//! A wall covers two slots. Building one at `(x, y)` in a `Mixed` row is a
//! vertical wall reaching up to `(x, y - 2)`; in a `Walls` row it is a
//! horizontal wall reaching right to `(x + 2, y)`. The covered slot becomes
//! unwalkable. The slot on the other side and the perpendicular slot through
//! the crossing point lose only their buildability.

use tracing::{debug, instrument};

use crate::error::{IllegalWallPlacement, InvariantViolation, WallError};
use crate::game_state::Player;
use crate::grid::{
    is_within_board, Board, Coordinates, RowType, Square, WallSquare,
    DISTANCE_BETWEEN_PIECE_SQUARES,
};
use crate::pathfinding::find_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallEffect {
    /// Covered by the new wall: unwalkable and never buildable again.
    Blocked,
    /// Still walkable, but a wall there would overlap or cross the new one.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffectedWall {
    pub coordinates: Coordinates,
    pub effect: WallEffect,
}

/// Neighbouring wall slots changed by a wall built at `coordinates`.
///
/// Addresses falling off the board are left out, so a wall against the
/// edge reports fewer than three entries.
pub fn affected_wall_squares(row_type: RowType, coordinates: Coordinates) -> Vec<AffectedWall> {
    let step = DISTANCE_BETWEEN_PIECE_SQUARES;
    let candidates = match row_type {
        RowType::Mixed => [
            (coordinates.offset(0, -step), WallEffect::Blocked),
            (coordinates.offset(0, step), WallEffect::Unavailable),
            (coordinates.offset(-1, -1), WallEffect::Unavailable),
        ],
        RowType::Walls => [
            (coordinates.offset(step, 0), WallEffect::Blocked),
            (coordinates.offset(-step, 0), WallEffect::Unavailable),
            (coordinates.offset(1, 1), WallEffect::Unavailable),
        ],
    };

    candidates
        .into_iter()
        .filter(|(neighbour, _)| is_within_board(*neighbour))
        .map(|(coordinates, effect)| AffectedWall {
            coordinates,
            effect,
        })
        .collect()
}

/// Build a wall without any legality checks.
///
/// Only the target square must be a wall slot. Neighbours that turn out not
/// to be wall slots are skipped. Walkability is only ever cleared, so a slot
/// covered by an earlier wall stays blocked.
pub fn update_board_walls(
    coordinates: Coordinates,
    board: &mut Board,
) -> Result<(), InvariantViolation> {
    let row_type = board
        .row_type(coordinates.y)
        .ok_or(InvariantViolation::OutOfBoard { coordinates })?;

    *board.wall_at_mut(coordinates)? = WallSquare::placed();

    for affected in affected_wall_squares(row_type, coordinates) {
        let Ok(wall) = board.wall_at_mut(affected.coordinates) else {
            continue;
        };
        if affected.effect == WallEffect::Blocked {
            wall.is_walkable = false;
        }
        wall.forbid_building();
    }

    Ok(())
}

/// Check that `coordinates` addresses a wall slot on which a wall may be built.
///
/// Only the structural rules are checked here; see [`would_strand`] for the
/// path rule.
pub fn validate_wall_slot(coordinates: Coordinates, board: &Board) -> Result<(), WallError> {
    match board.get(coordinates) {
        None => Err(IllegalWallPlacement::OutOfBoard(coordinates).into()),
        Some(Square::Piece(_)) => Err(IllegalWallPlacement::NotAWallSquare(coordinates).into()),
        Some(Square::Wall(wall)) if !wall.is_buildable => {
            Err(IllegalWallPlacement::Unavailable(coordinates).into())
        }
        Some(Square::Wall(_)) => Ok(()),
    }
}

/// The first player left without a path to its goal row if a wall were
/// built at `coordinates`, or `None` when every player keeps a route.
///
/// Works on a scratch copy; `board` is never touched.
pub fn would_strand(
    coordinates: Coordinates,
    board: &Board,
) -> Result<Option<Player>, InvariantViolation> {
    let mut scratch = board.clone();
    update_board_walls(coordinates, &mut scratch)?;

    for (player, position) in scratch.occupants() {
        if find_path(position, player.goal_row(), &scratch)?.is_empty() {
            return Ok(Some(player));
        }
    }
    Ok(None)
}

/// Build a wall at `coordinates` if it is legal to do so.
///
/// The board is only mutated once every check has passed.
#[instrument(skip(board))]
pub fn apply_wall_placement(coordinates: Coordinates, board: &mut Board) -> Result<(), WallError> {
    validate_wall_slot(coordinates, board)?;

    if let Some(player) = would_strand(coordinates, board)? {
        debug!(%player, "wall rejected, player would be stranded");
        return Err(IllegalWallPlacement::WouldStrand {
            coordinates,
            player,
        }
        .into());
    }

    update_board_walls(coordinates, board)?;
    debug!("wall placed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::create_board;
    use crate::grid_helpers::create_board_with;

    #[test]
    fn test_affected_squares_for_horizontal_wall() {
        let affected = affected_wall_squares(RowType::Walls, Coordinates::new(4, 5));
        assert_eq!(
            affected,
            vec![
                AffectedWall {
                    coordinates: Coordinates::new(6, 5),
                    effect: WallEffect::Blocked
                },
                AffectedWall {
                    coordinates: Coordinates::new(2, 5),
                    effect: WallEffect::Unavailable
                },
                AffectedWall {
                    coordinates: Coordinates::new(5, 6),
                    effect: WallEffect::Unavailable
                },
            ]
        );
    }

    #[test]
    fn test_affected_squares_at_edges() {
        // Leftmost horizontal slot has no left neighbour
        let affected = affected_wall_squares(RowType::Walls, Coordinates::new(0, 1));
        assert_eq!(affected.len(), 2);

        // Vertical slot on the last row has nothing below it
        let affected = affected_wall_squares(RowType::Mixed, Coordinates::new(3, 16));
        assert_eq!(affected.len(), 2);
        assert!(affected
            .iter()
            .all(|a| a.coordinates != Coordinates::new(3, 18)));
    }

    #[test]
    fn test_horizontal_wall_neighbour_deltas() {
        let mut board = create_board();
        apply_wall_placement(Coordinates::new(4, 5), &mut board).unwrap();

        let target = board.wall_at(Coordinates::new(4, 5)).unwrap();
        assert!(target.is_placed && !target.is_walkable && !target.is_available);

        let covered = board.wall_at(Coordinates::new(6, 5)).unwrap();
        assert!(!covered.is_placed && !covered.is_walkable && !covered.is_available);

        let left = board.wall_at(Coordinates::new(2, 5)).unwrap();
        assert!(left.is_walkable && !left.is_available);

        let crossing = board.wall_at(Coordinates::new(5, 6)).unwrap();
        assert!(crossing.is_walkable && !crossing.is_available);
    }

    #[test]
    fn test_vertical_wall_neighbour_deltas() {
        let mut board = create_board();
        apply_wall_placement(Coordinates::new(7, 8), &mut board).unwrap();

        let covered = board.wall_at(Coordinates::new(7, 6)).unwrap();
        assert!(!covered.is_walkable && !covered.is_available);

        let below = board.wall_at(Coordinates::new(7, 10)).unwrap();
        assert!(below.is_walkable && !below.is_available);

        let crossing = board.wall_at(Coordinates::new(6, 7)).unwrap();
        assert!(crossing.is_walkable && !crossing.is_available);
    }

    #[test]
    fn test_second_placement_on_unavailable_neighbour_fails() {
        let mut board = create_board();
        apply_wall_placement(Coordinates::new(4, 5), &mut board).unwrap();

        for neighbour in [
            Coordinates::new(6, 5),
            Coordinates::new(2, 5),
            Coordinates::new(5, 6),
        ] {
            let before = board.clone();
            assert_eq!(
                apply_wall_placement(neighbour, &mut board),
                Err(WallError::Illegal(IllegalWallPlacement::Unavailable(neighbour)))
            );
            assert_eq!(board, before);
        }
    }

    #[test]
    fn test_earlier_wall_keeps_its_blocked_half() {
        // (0,5) covers (2,5); (4,5) then marks (2,5) as its unavailable left neighbour
        let mut board = create_board();
        apply_wall_placement(Coordinates::new(0, 5), &mut board).unwrap();
        apply_wall_placement(Coordinates::new(4, 5), &mut board).unwrap();

        let shared = board.wall_at(Coordinates::new(2, 5)).unwrap();
        assert!(!shared.is_walkable && !shared.is_buildable);
        assert!(!board.wall_at(Coordinates::new(6, 5)).unwrap().is_walkable);

        // Same for a vertical wall: (5,8) covers (5,6), which (5,4) marks below it
        let mut board = create_board();
        apply_wall_placement(Coordinates::new(5, 8), &mut board).unwrap();
        apply_wall_placement(Coordinates::new(5, 4), &mut board).unwrap();

        let shared = board.wall_at(Coordinates::new(5, 6)).unwrap();
        assert!(!shared.is_walkable && !shared.is_buildable);
        assert!(!board.wall_at(Coordinates::new(5, 2)).unwrap().is_walkable);
    }

    #[test]
    fn test_rejects_non_wall_targets() {
        let mut board = create_board();
        assert_eq!(
            apply_wall_placement(Coordinates::new(4, 4), &mut board),
            Err(WallError::Illegal(IllegalWallPlacement::NotAWallSquare(
                Coordinates::new(4, 4)
            )))
        );
        assert_eq!(
            apply_wall_placement(Coordinates::new(4, 17), &mut board),
            Err(WallError::Illegal(IllegalWallPlacement::OutOfBoard(
                Coordinates::new(4, 17)
            )))
        );
        // Intersections and the back row are never buildable
        assert!(apply_wall_placement(Coordinates::new(5, 5), &mut board).is_err());
        assert!(apply_wall_placement(Coordinates::new(5, 0), &mut board).is_err());
    }

    #[test]
    fn test_stranding_wall_is_rejected() {
        let mut board = create_board_with(
            &[
                (Player::One, Coordinates::new(0, 16)),
                (Player::Two, Coordinates::new(8, 0)),
            ],
            &[Coordinates::new(0, 15)],
        )
        .unwrap();
        let before = board.clone();

        assert_eq!(
            would_strand(Coordinates::new(3, 16), &board).unwrap(),
            Some(Player::One)
        );
        assert_eq!(
            apply_wall_placement(Coordinates::new(3, 16), &mut board),
            Err(WallError::Illegal(IllegalWallPlacement::WouldStrand {
                coordinates: Coordinates::new(3, 16),
                player: Player::One,
            }))
        );
        assert_eq!(board, before);

        // The same wall one column further right leaves a way out
        assert_eq!(would_strand(Coordinates::new(5, 16), &board).unwrap(), None);
    }
}

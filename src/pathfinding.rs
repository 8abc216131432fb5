use std::collections::VecDeque;

use ndarray::Array2;
use tracing::{instrument, trace};

use crate::actions::available_squares_for_path;
use crate::error::InvariantViolation;
use crate::grid::{Board, Coordinates, BOARD_WIDTH};

/// Find a shortest route from `start` to any square on `goal_row`.
///
/// Breadth-first search over the orthogonal-step graph: neighbours are the
/// piece squares reachable through a walkable wall slot, explored in the
/// fixed order up, down, left, right. Occupancy is ignored since a piece in
/// the way can always be jumped or walked around later.
///
/// # Returns
/// The path including `start`, so a one-move route has two entries and a
/// start already on the goal row yields `[start]`. An empty vector means the
/// goal row is unreachable.
#[instrument(skip(board))]
pub fn find_path(
    start: Coordinates,
    goal_row: i32,
    board: &Board,
) -> Result<Vec<Coordinates>, InvariantViolation> {
    // Validates the start address before any bookkeeping
    board.piece_at(start)?;

    let mut parents: Array2<Option<Coordinates>> =
        Array2::from_elem((BOARD_WIDTH, BOARD_WIDTH), None);
    parents[[start.y as usize, start.x as usize]] = Some(start);

    let mut frontier = VecDeque::from([start]);
    while let Some(current) = frontier.pop_front() {
        if current.y == goal_row {
            let path = backtrack(&parents, start, current);
            trace!(steps = path.len() - 1, "path found");
            return Ok(path);
        }

        for next in available_squares_for_path(current, board)? {
            let parent = &mut parents[[next.y as usize, next.x as usize]];
            if parent.is_none() {
                *parent = Some(current);
                frontier.push_back(next);
            }
        }
    }

    trace!("no path");
    Ok(Vec::new())
}

fn backtrack(
    parents: &Array2<Option<Coordinates>>,
    start: Coordinates,
    end: Coordinates,
) -> Vec<Coordinates> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match parents[[current.y as usize, current.x as usize]] {
            Some(parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Number of moves on the shortest route to `goal_row`, or `None` if the row
/// cannot be reached.
pub fn distance_to_row(
    start: Coordinates,
    goal_row: i32,
    board: &Board,
) -> Result<Option<usize>, InvariantViolation> {
    let path = find_path(start, goal_row, board)?;
    Ok(path.len().checked_sub(1))
}

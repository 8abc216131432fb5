//! Board, move and wall legality engine for two-player Quoridor.
//!
//! The board is a 17x17 grid mixing piece squares and wall slots (see
//! [`grid`]). [`game_state::GameState`] drives a game turn by turn, keeping
//! the legal destination marks and wall availability of the board up to date
//! after every action. [`session`] pairs users into rooms around a game.

pub mod actions;
pub mod agents;
pub mod error;
pub mod game_runner;
pub mod game_state;
pub mod grid;
pub mod grid_helpers;
pub mod pathfinding;
pub mod session;
pub mod validation;
pub mod walls;

#[cfg(feature = "binary")]
pub mod replay_writer;
#[cfg(feature = "binary")]
pub mod selfplay_config;

pub use actions::{apply_piece_move, available_moves, available_walls, compute_legal_moves, Action};
pub use error::{
    ActionError, IllegalMove, IllegalWallPlacement, InvariantViolation, MoveError, SessionError,
    WallError,
};
pub use game_state::{has_reached_goal, GameConfig, GameState, Player};
pub use grid::{create_board, Board, Coordinates, RowType, Square, BOARD_WIDTH};
pub use pathfinding::{distance_to_row, find_path};
pub use session::{Room, RoomRegistry};
pub use walls::apply_wall_placement;

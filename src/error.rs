//! Error taxonomy for the rules engine.
//!
//! Two kinds of failure are kept apart on purpose: *legality* errors
//! ([`IllegalMove`], [`IllegalWallPlacement`]) are ordinary rejections the
//! caller reports back to a player, while [`InvariantViolation`] means the
//! grid itself is corrupt and the operation in progress must be abandoned.

use thiserror::Error;

use crate::game_state::Player;
use crate::grid::{Coordinates, SquareKind};

/// The board does not have the shape the algorithms rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("expected a {expected} square at {coordinates}, found a {found} square")]
    TypeMismatch {
        coordinates: Coordinates,
        expected: SquareKind,
        found: SquareKind,
    },
    #[error("no square exists at {coordinates}")]
    OutOfBoard { coordinates: Coordinates },
    #[error("{player} has no piece on the board")]
    MissingPlayer { player: Player },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("destination {0} is outside the board")]
    OutOfBoard(Coordinates),
    #[error("{0} is not a piece square")]
    NotAPieceSquare(Coordinates),
    #[error("no piece stands on {0}")]
    NoPieceAt(Coordinates),
    #[error("{to} is not reachable from {from} this turn")]
    Unreachable { from: Coordinates, to: Coordinates },
    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalWallPlacement {
    #[error("wall slot {0} is outside the board")]
    OutOfBoard(Coordinates),
    #[error("{0} is not a wall square")]
    NotAWallSquare(Coordinates),
    #[error("a wall cannot be built at {0}")]
    Unavailable(Coordinates),
    #[error("{player} has no walls left")]
    NoWallsRemaining { player: Player },
    #[error("a wall at {coordinates} would leave {player} without a path to its goal row")]
    WouldStrand {
        coordinates: Coordinates,
        player: Player,
    },
    #[error("the game is already over")]
    GameOver,
}

/// Outcome of a rejected piece move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    Illegal(#[from] IllegalMove),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Outcome of a rejected wall placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WallError {
    #[error(transparent)]
    Illegal(#[from] IllegalWallPlacement),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Either kind of rejected action, as returned by
/// [`crate::game_state::GameState::apply_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Wall(#[from] WallError),
}

/// Rejected room bookkeeping or play through a room.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("room {0} already exists")]
    RoomExists(String),
    #[error("room {0} does not exist")]
    UnknownRoom(String),
    #[error("room already has two players")]
    RoomFull,
    #[error("user {0} is not seated in this room")]
    UnknownUser(String),
    #[error("the game has not started")]
    NotStarted,
    #[error("it is {waiting_for}'s turn")]
    NotYourTurn { waiting_for: Player },
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl ActionError {
    /// True when the board is corrupt rather than the action merely illegal.
    pub fn is_invariant_violation(&self) -> bool {
        match self {
            ActionError::Move(error) => error.is_invariant_violation(),
            ActionError::Wall(error) => error.is_invariant_violation(),
        }
    }
}

impl MoveError {
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, MoveError::Invariant(_))
    }
}

impl WallError {
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, WallError::Invariant(_))
    }
}

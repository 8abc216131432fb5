//! Grid model for the doubled board.
//!
//! The 9x9 piece board is stored as a 17x17 grid in which wall slots are
//! squares of their own: even rows are `Mixed` (piece squares at even
//! columns, vertical wall slots at odd columns) and odd rows are `Walls`
//! (horizontal wall slots at even columns, wall intersections at odd
//! columns). Two neighbouring piece squares are therefore
//! [`DISTANCE_BETWEEN_PIECE_SQUARES`] apart and the wall between them sits at
//! the midpoint.

use std::fmt;

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;
use crate::game_state::Player;

pub const BOARD_WIDTH: usize = 17;
pub const BOARD_LAST_INDEX: i32 = BOARD_WIDTH as i32 - 1;
pub const DISTANCE_BETWEEN_PIECE_SQUARES: i32 = 2;

/// Grid address. Signed so that offsets may step off the board and be
/// rejected by [`is_within_board`] instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// True for the even/even addresses that hold piece squares.
    pub const fn is_piece_slot(self) -> bool {
        self.x % 2 == 0 && self.y % 2 == 0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub fn is_within_board(coordinates: Coordinates) -> bool {
    (0..=BOARD_LAST_INDEX).contains(&coordinates.x)
        && (0..=BOARD_LAST_INDEX).contains(&coordinates.y)
}

/// Square variant tag, used when a caller states which variant it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareKind {
    Piece,
    Wall,
}

impl fmt::Display for SquareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareKind::Piece => f.write_str("piece"),
            SquareKind::Wall => f.write_str("wall"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Occupancy {
    #[default]
    Empty,
    Occupied(Player),
}

impl Occupancy {
    pub fn player(self) -> Option<Player> {
        match self {
            Occupancy::Empty => None,
            Occupancy::Occupied(player) => Some(player),
        }
    }

    pub fn is_occupied(self) -> bool {
        matches!(self, Occupancy::Occupied(_))
    }
}

/// A square a piece can stand on.
///
/// `is_available` marks a legal destination for the player currently about
/// to move. It is derived state, cleared and recomputed every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PieceSquare {
    pub occupant: Occupancy,
    pub is_available: bool,
}

/// A wall slot (or wall intersection).
///
/// `is_buildable` is the structural half of availability: it is fixed at
/// creation and only ever cleared by wall placements. `is_available` is what
/// callers see; it tracks `is_buildable` and is additionally cleared for
/// slots whose wall would strand a player (see
/// [`crate::actions::refresh_wall_availability`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSquare {
    pub is_placed: bool,
    pub is_walkable: bool,
    pub is_buildable: bool,
    pub is_available: bool,
}

impl WallSquare {
    pub const fn open(buildable: bool) -> Self {
        Self {
            is_placed: false,
            is_walkable: true,
            is_buildable: buildable,
            is_available: buildable,
        }
    }

    /// Odd/odd intersection between four wall slots; never walkable or buildable.
    pub const fn intersection() -> Self {
        Self {
            is_placed: false,
            is_walkable: false,
            is_buildable: false,
            is_available: false,
        }
    }

    pub const fn placed() -> Self {
        Self {
            is_placed: true,
            is_walkable: false,
            is_buildable: false,
            is_available: false,
        }
    }

    pub(crate) fn forbid_building(&mut self) {
        self.is_buildable = false;
        self.is_available = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Square {
    Piece(PieceSquare),
    Wall(WallSquare),
}

impl Square {
    pub fn kind(&self) -> SquareKind {
        match self {
            Square::Piece(_) => SquareKind::Piece,
            Square::Wall(_) => SquareKind::Wall,
        }
    }

    pub fn as_piece(&self) -> Option<&PieceSquare> {
        match self {
            Square::Piece(piece) => Some(piece),
            Square::Wall(_) => None,
        }
    }

    pub fn as_wall(&self) -> Option<&WallSquare> {
        match self {
            Square::Wall(wall) => Some(wall),
            Square::Piece(_) => None,
        }
    }

    pub fn as_piece_mut(&mut self) -> Option<&mut PieceSquare> {
        match self {
            Square::Piece(piece) => Some(piece),
            Square::Wall(_) => None,
        }
    }

    pub fn as_wall_mut(&mut self) -> Option<&mut WallSquare> {
        match self {
            Square::Wall(wall) => Some(wall),
            Square::Piece(_) => None,
        }
    }
}

/// Row shape, fixed at creation. Placing a wall in a `Mixed` row builds a
/// vertical wall; placing one in a `Walls` row builds a horizontal wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowType {
    Mixed,
    Walls,
}

impl RowType {
    pub const fn for_row(y: usize) -> Self {
        if y.is_multiple_of(2) {
            RowType::Mixed
        } else {
            RowType::Walls
        }
    }
}

/// The full grid, indexed `[[y, x]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: Array2<Square>,
    row_types: Vec<RowType>,
}

/// Build the initial, empty board.
///
/// Vertical wall slots on row 0 are never buildable since the wall would
/// have to extend off the back edge; the same holds for horizontal slots in
/// the last column.
pub fn create_board() -> Board {
    let squares = Array2::from_shape_fn((BOARD_WIDTH, BOARD_WIDTH), |(y, x)| {
        match RowType::for_row(y) {
            RowType::Mixed if x.is_multiple_of(2) => Square::Piece(PieceSquare::default()),
            RowType::Mixed => Square::Wall(WallSquare::open(y != 0)),
            RowType::Walls if x.is_multiple_of(2) => {
                Square::Wall(WallSquare::open(x < BOARD_WIDTH - 1))
            }
            RowType::Walls => Square::Wall(WallSquare::intersection()),
        }
    });
    let row_types = (0..BOARD_WIDTH).map(RowType::for_row).collect();

    Board { squares, row_types }
}

impl Default for Board {
    fn default() -> Self {
        create_board()
    }
}

impl Board {
    /// Assemble a board from explicit squares. Row types follow row parity.
    pub(crate) fn from_squares(squares: Array2<Square>) -> Self {
        let row_types = (0..squares.nrows()).map(RowType::for_row).collect();
        Board { squares, row_types }
    }

    pub fn row_type(&self, y: i32) -> Option<RowType> {
        usize::try_from(y)
            .ok()
            .and_then(|y| self.row_types.get(y).copied())
    }

    pub fn row(&self, y: usize) -> Option<ArrayView1<'_, Square>> {
        (y < self.squares.nrows()).then(|| self.squares.row(y))
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Square>> + '_ {
        self.squares.rows().into_iter()
    }

    pub fn get(&self, coordinates: Coordinates) -> Option<&Square> {
        if !is_within_board(coordinates) {
            return None;
        }
        self.squares
            .get([coordinates.y as usize, coordinates.x as usize])
    }

    fn get_mut(&mut self, coordinates: Coordinates) -> Option<&mut Square> {
        if !is_within_board(coordinates) {
            return None;
        }
        self.squares
            .get_mut([coordinates.y as usize, coordinates.x as usize])
    }

    /// Read a square and check that it is of the expected variant.
    pub fn square_at(
        &self,
        coordinates: Coordinates,
        expected: SquareKind,
    ) -> Result<&Square, InvariantViolation> {
        let square = self
            .get(coordinates)
            .ok_or(InvariantViolation::OutOfBoard { coordinates })?;
        expect_kind(coordinates, square, expected)?;
        Ok(square)
    }

    fn square_at_mut(
        &mut self,
        coordinates: Coordinates,
        expected: SquareKind,
    ) -> Result<&mut Square, InvariantViolation> {
        let square = self
            .get_mut(coordinates)
            .ok_or(InvariantViolation::OutOfBoard { coordinates })?;
        expect_kind(coordinates, square, expected)?;
        Ok(square)
    }

    pub fn piece_at(&self, coordinates: Coordinates) -> Result<&PieceSquare, InvariantViolation> {
        self.square_at(coordinates, SquareKind::Piece)?
            .as_piece()
            .ok_or(mismatch(coordinates, SquareKind::Piece))
    }

    pub fn wall_at(&self, coordinates: Coordinates) -> Result<&WallSquare, InvariantViolation> {
        self.square_at(coordinates, SquareKind::Wall)?
            .as_wall()
            .ok_or(mismatch(coordinates, SquareKind::Wall))
    }

    pub fn piece_at_mut(
        &mut self,
        coordinates: Coordinates,
    ) -> Result<&mut PieceSquare, InvariantViolation> {
        self.square_at_mut(coordinates, SquareKind::Piece)?
            .as_piece_mut()
            .ok_or(mismatch(coordinates, SquareKind::Piece))
    }

    pub fn wall_at_mut(
        &mut self,
        coordinates: Coordinates,
    ) -> Result<&mut WallSquare, InvariantViolation> {
        self.square_at_mut(coordinates, SquareKind::Wall)?
            .as_wall_mut()
            .ok_or(mismatch(coordinates, SquareKind::Wall))
    }

    /// Every square with its address, row by row.
    pub fn squares(&self) -> impl Iterator<Item = (Coordinates, &Square)> + '_ {
        self.squares
            .indexed_iter()
            .map(|((y, x), square)| (Coordinates::new(x as i32, y as i32), square))
    }

    pub(crate) fn squares_mut(&mut self) -> impl Iterator<Item = (Coordinates, &mut Square)> + '_ {
        self.squares
            .indexed_iter_mut()
            .map(|((y, x), square)| (Coordinates::new(x as i32, y as i32), square))
    }

    pub fn find_player(&self, player: Player) -> Option<Coordinates> {
        self.occupants()
            .find(|(occupant, _)| *occupant == player)
            .map(|(_, coordinates)| coordinates)
    }

    /// Every piece on the board with its position.
    pub fn occupants(&self) -> impl Iterator<Item = (Player, Coordinates)> + '_ {
        self.squares().filter_map(|(coordinates, square)| {
            square
                .as_piece()
                .and_then(|piece| piece.occupant.player())
                .map(|player| (player, coordinates))
        })
    }
}

fn expect_kind(
    coordinates: Coordinates,
    square: &Square,
    expected: SquareKind,
) -> Result<(), InvariantViolation> {
    if square.kind() == expected {
        Ok(())
    } else {
        Err(InvariantViolation::TypeMismatch {
            coordinates,
            expected,
            found: square.kind(),
        })
    }
}

/// Mismatch against a square already known to be of the other variant.
fn mismatch(coordinates: Coordinates, expected: SquareKind) -> InvariantViolation {
    let found = match expected {
        SquareKind::Piece => SquareKind::Wall,
        SquareKind::Wall => SquareKind::Piece,
    };
    InvariantViolation::TypeMismatch {
        coordinates,
        expected,
        found,
    }
}

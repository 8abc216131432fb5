//! Text form of a board, used for fixtures and debugging.
//!
//! One line per grid row, one symbol per square, symbols separated by
//! whitespace. Leading indentation and blank lines are ignored.
//!
//! Piece squares:
//! - `O` empty
//! - `*` empty and marked as a legal destination
//! - `1`, `2` occupied by that player
//!
//! Wall squares:
//! - `|` open vertical slot (even rows), `-` open horizontal slot (odd rows)
//! - `S` open slot whose wall would strand a player
//! - `U` walkable, but no wall may be built there
//! - `W` placed wall
//! - `#` unwalkable slot covered by the second half of a wall
//! - `+` intersection (odd row, odd column)

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use thiserror::Error;

use crate::error::InvariantViolation;
use crate::game_state::Player;
use crate::grid::{
    create_board, Board, Coordinates, Occupancy, PieceSquare, Square, WallSquare, BOARD_WIDTH,
};
use crate::walls::update_board_walls;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("expected {} rows, found {found}", BOARD_WIDTH)]
    WrongRowCount { found: usize },
    #[error("row {row}: expected {} symbols, found {found}", BOARD_WIDTH)]
    WrongRowLength { row: usize, found: usize },
    #[error("row {row}, column {column}: unknown symbol '{symbol}'")]
    UnknownSymbol {
        row: usize,
        column: usize,
        symbol: String,
    },
    #[error("row {row}, column {column}: '{symbol}' cannot appear here")]
    MisplacedSymbol {
        row: usize,
        column: usize,
        symbol: char,
    },
    #[error("{player} appears more than once")]
    DuplicatePiece { player: Player },
}

/// Board with the given pieces and walls, the walls built without legality
/// checks.
pub fn create_board_with(
    pieces: &[(Player, Coordinates)],
    walls: &[Coordinates],
) -> Result<Board, InvariantViolation> {
    let mut board = create_board();
    for &(player, coordinates) in pieces {
        board.piece_at_mut(coordinates)?.occupant = Occupancy::Occupied(player);
    }
    for &wall in walls {
        update_board_walls(wall, &mut board)?;
    }
    Ok(board)
}

pub fn parse_board(text: &str) -> Result<Board, BoardParseError> {
    let rows: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if rows.len() != BOARD_WIDTH {
        return Err(BoardParseError::WrongRowCount { found: rows.len() });
    }

    let mut squares = Array2::from_elem(
        (BOARD_WIDTH, BOARD_WIDTH),
        Square::Wall(WallSquare::intersection()),
    );
    let mut seen = [false; 2];

    for (y, line) in rows.iter().enumerate() {
        let symbols: Vec<&str> = line.split_whitespace().collect();
        if symbols.len() != BOARD_WIDTH {
            return Err(BoardParseError::WrongRowLength {
                row: y,
                found: symbols.len(),
            });
        }

        for (x, token) in symbols.into_iter().enumerate() {
            let mut chars = token.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(symbol), None) => symbol,
                _ => {
                    return Err(BoardParseError::UnknownSymbol {
                        row: y,
                        column: x,
                        symbol: token.to_owned(),
                    })
                }
            };

            let square = parse_symbol(symbol, x, y)?;
            if let Square::Piece(PieceSquare {
                occupant: Occupancy::Occupied(player),
                ..
            }) = square
            {
                if std::mem::replace(&mut seen[player.index()], true) {
                    return Err(BoardParseError::DuplicatePiece { player });
                }
            }
            squares[[y, x]] = square;
        }
    }

    Ok(Board::from_squares(squares))
}

fn parse_symbol(symbol: char, x: usize, y: usize) -> Result<Square, BoardParseError> {
    let piece_slot = x.is_multiple_of(2) && y.is_multiple_of(2);
    let misplaced = || BoardParseError::MisplacedSymbol {
        row: y,
        column: x,
        symbol,
    };
    let piece = |occupant, is_available| {
        if piece_slot {
            Ok(Square::Piece(PieceSquare {
                occupant,
                is_available,
            }))
        } else {
            Err(misplaced())
        }
    };
    let wall = |wall: WallSquare| {
        if piece_slot {
            Err(misplaced())
        } else {
            Ok(Square::Wall(wall))
        }
    };

    match symbol {
        'O' => piece(Occupancy::Empty, false),
        '*' => piece(Occupancy::Empty, true),
        '1' => piece(Occupancy::Occupied(Player::One), false),
        '2' => piece(Occupancy::Occupied(Player::Two), false),
        '|' if y.is_multiple_of(2) => wall(WallSquare::open(true)),
        '-' if y % 2 == 1 && x.is_multiple_of(2) => wall(WallSquare::open(true)),
        '|' | '-' => Err(misplaced()),
        'S' => wall(WallSquare {
            is_available: false,
            ..WallSquare::open(true)
        }),
        'U' => wall(WallSquare::open(false)),
        'W' => wall(WallSquare::placed()),
        '#' => wall(WallSquare {
            is_walkable: false,
            ..WallSquare::open(false)
        }),
        '+' if x % 2 == 1 && y % 2 == 1 => wall(WallSquare::intersection()),
        '+' => Err(misplaced()),
        other => Err(BoardParseError::UnknownSymbol {
            row: y,
            column: x,
            symbol: other.to_string(),
        }),
    }
}

fn symbol_for(coordinates: Coordinates, square: &Square) -> char {
    match square {
        Square::Piece(piece) => match piece.occupant {
            Occupancy::Occupied(Player::One) => '1',
            Occupancy::Occupied(Player::Two) => '2',
            Occupancy::Empty if piece.is_available => '*',
            Occupancy::Empty => 'O',
        },
        Square::Wall(wall) if wall.is_placed => 'W',
        Square::Wall(wall) if !wall.is_walkable => {
            if coordinates.x % 2 == 1 && coordinates.y % 2 == 1 {
                '+'
            } else {
                '#'
            }
        }
        Square::Wall(wall) if !wall.is_buildable => 'U',
        Square::Wall(wall) if !wall.is_available => 'S',
        Square::Wall(_) if coordinates.y % 2 == 0 => '|',
        Square::Wall(_) => '-',
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(x, square)| {
                    symbol_for(Coordinates::new(x as i32, y as i32), square).to_string()
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

pub fn render_board(board: &Board) -> String {
    board.to_string()
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_board(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{compute_legal_moves, refresh_wall_availability};

    const JUMP_BLOCKED: &str = "
        O U O U O U O U O U O U O U O U O
        - + - + - + - + - + - + - + - + U
        O | O | O | O | O | O | O | O | O
        - + - + - + - + - + - + - + - + U
        O | O | O | O | O | O | O | O | O
        - + - + - + U + W + # + - + - + U
        O | O | O | O | 2 U O | O | O | O
        - + - + - + - + - + - + - + - + U
        O | O | O | O | 1 | O | O | O | O
        - + - + - + - + - + - + - + - + U
        O | O | O | O | O | O | O | O | O
        - + - + - + - + - + - + - + - + U
        O | O | O | O | O | O | O | O | O
        - + - + - + - + - + - + - + - + U
        O | O | O | O | O | O | O | O | O
        - + - + - + - + - + - + - + - + U
        O | O | O | O | O | O | O | O | O
    ";

    #[test]
    fn test_render_initial_board() {
        let rendered = render_board(&create_board());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), BOARD_WIDTH);
        assert_eq!(lines[0], "O U O U O U O U O U O U O U O U O");
        assert_eq!(lines[1], "- + - + - + - + - + - + - + - + U");
        assert_eq!(lines[2], "O | O | O | O | O | O | O | O | O");
    }

    #[test]
    fn test_fixture_matches_built_board() {
        let parsed: Board = JUMP_BLOCKED.parse().unwrap();
        let built = create_board_with(
            &[
                (Player::One, Coordinates::new(8, 8)),
                (Player::Two, Coordinates::new(8, 6)),
            ],
            &[Coordinates::new(8, 5)],
        )
        .unwrap();
        assert_eq!(parsed, built);
    }

    #[test]
    fn test_fixture_drives_move_rules() {
        let mut board = parse_board(JUMP_BLOCKED).unwrap();
        compute_legal_moves(Coordinates::new(8, 8), &mut board).unwrap();
        let rendered = render_board(&board);
        let lines: Vec<&str> = rendered.lines().collect();

        // Diagonals beside the opponent, no straight jump
        assert_eq!(lines[4], "O | O | O | O | O | O | O | O | O");
        assert_eq!(lines[6], "O | O | O | * | 2 U * | O | O | O");
        assert_eq!(lines[8], "O | O | O | * | 1 | * | O | O | O");
        assert_eq!(lines[10], "O | O | O | O | * | O | O | O | O");
    }

    #[test]
    fn test_render_parse_preserves_derived_flags() {
        let mut board = create_board_with(
            &[
                (Player::One, Coordinates::new(0, 16)),
                (Player::Two, Coordinates::new(8, 0)),
            ],
            &[Coordinates::new(0, 15), Coordinates::new(7, 8)],
        )
        .unwrap();
        compute_legal_moves(Coordinates::new(0, 16), &mut board).unwrap();
        refresh_wall_availability(&mut board).unwrap();

        let rendered = render_board(&board);
        assert!(rendered.contains('S'));
        assert_eq!(parse_board(&rendered).unwrap(), board);
    }

    fn initial_rows() -> Vec<String> {
        render_board(&create_board())
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_board("O | O"),
            Err(BoardParseError::WrongRowCount { found: 1 })
        );

        let mut rows = initial_rows();
        rows[2] = rows[2].replacen("O |", "O", 1);
        assert_eq!(
            parse_board(&rows.join("\n")),
            Err(BoardParseError::WrongRowLength { row: 2, found: 16 })
        );

        let mut rows = initial_rows();
        rows[2] = rows[2].replacen('|', "-", 1);
        assert_eq!(
            parse_board(&rows.join("\n")),
            Err(BoardParseError::MisplacedSymbol {
                row: 2,
                column: 1,
                symbol: '-'
            })
        );

        let mut rows = initial_rows();
        rows[4] = rows[4].replacen('O', "Q", 1);
        assert_eq!(
            parse_board(&rows.join("\n")),
            Err(BoardParseError::UnknownSymbol {
                row: 4,
                column: 0,
                symbol: "Q".to_owned()
            })
        );

        let mut rows = initial_rows();
        rows[4] = rows[4].replacen('O', "1", 1);
        rows[6] = rows[6].replacen('O', "1", 1);
        assert_eq!(
            parse_board(&rows.join("\n")),
            Err(BoardParseError::DuplicatePiece {
                player: Player::One
            })
        );
    }
}

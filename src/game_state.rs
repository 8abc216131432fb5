use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::actions::{
    self, available_moves, available_walls, compute_legal_moves, refresh_wall_availability,
    reset_moves, Action,
};
use crate::error::{
    ActionError, IllegalMove, IllegalWallPlacement, InvariantViolation, MoveError, WallError,
};
use crate::grid::{create_board, Board, Coordinates, Occupancy, BOARD_LAST_INDEX};
use crate::walls;

/// Turn-order role of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Centre of the player's home row.
    pub fn start_position(self) -> Coordinates {
        let centre = BOARD_LAST_INDEX / 2;
        match self {
            Player::One => Coordinates::new(centre, BOARD_LAST_INDEX),
            Player::Two => Coordinates::new(centre, 0),
        }
    }

    /// The far edge row, opposite the start.
    pub fn goal_row(self) -> i32 {
        match self {
            Player::One => 0,
            Player::Two => BOARD_LAST_INDEX,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => f.write_str("player 1"),
            Player::Two => f.write_str("player 2"),
        }
    }
}

pub fn has_reached_goal(coordinates: Coordinates, goal_row: i32) -> bool {
    coordinates.y == goal_row
}

/// Rules parameters that vary between games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Walls each player may build.
    pub max_walls: u32,
    /// Turn limit used by the game runner; the rules themselves never end a
    /// game on steps.
    pub max_steps: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_walls: 10,
            max_steps: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub coordinates: Coordinates,
    pub walls_remaining: u32,
}

/// The board together with everything needed to run turns on it.
///
/// Between turns the board's availability flags always describe the player
/// about to move: its legal destinations on piece squares, and on wall slots
/// the walls that would leave both players a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    players: [PlayerState; 2],
    current_player: Player,
    winner: Option<Player>,
    completed_steps: usize,
    config: GameConfig,
}

impl GameState {
    /// New game with both pieces on their start squares; `Player::One` moves first.
    pub fn new(config: GameConfig) -> Result<Self, InvariantViolation> {
        Self::with_first_player(config, Player::One)
    }

    pub fn with_first_player(
        config: GameConfig,
        first: Player,
    ) -> Result<Self, InvariantViolation> {
        let mut board = create_board();
        for player in Player::ALL {
            board.piece_at_mut(player.start_position())?.occupant = Occupancy::Occupied(player);
        }
        Self::from_board(board, config, first)
    }

    /// Resume from an arbitrary position. Both pieces must be on the board;
    /// each player gets the full wall budget from `config`.
    pub fn from_board(
        board: Board,
        config: GameConfig,
        current_player: Player,
    ) -> Result<Self, InvariantViolation> {
        let mut players = [PlayerState {
            coordinates: Coordinates::new(0, 0),
            walls_remaining: config.max_walls,
        }; 2];
        for player in Player::ALL {
            players[player.index()].coordinates = board
                .find_player(player)
                .ok_or(InvariantViolation::MissingPlayer { player })?;
        }

        let mut state = Self {
            board,
            players,
            current_player,
            winner: None,
            completed_steps: 0,
            config,
        };
        state.prepare_turn()?;
        Ok(state)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn player(&self, player: Player) -> &PlayerState {
        &self.players[player.index()]
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn completed_steps(&self) -> usize {
        self.completed_steps
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Every action open to the player about to move.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_over() {
            return Vec::new();
        }

        let mut legal: Vec<Action> = available_moves(&self.board)
            .into_iter()
            .map(Action::Move)
            .collect();
        if self.player(self.current_player).walls_remaining > 0 {
            legal.extend(available_walls(&self.board).into_iter().map(Action::Wall));
        }
        legal
    }

    /// Play one turn for the current player.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn apply_action(&mut self, action: Action) -> Result<(), ActionError> {
        let result = match action {
            Action::Move(to) => self.apply_piece_move(to).map_err(ActionError::from),
            Action::Wall(coordinates) => self
                .apply_wall_placement(coordinates)
                .map_err(ActionError::from),
        };

        match &result {
            Err(error) if error.is_invariant_violation() => warn!(%error, "board invariant broken"),
            Err(error) => debug!(%error, "action rejected"),
            Ok(()) => {}
        }
        result
    }

    /// Move the current player's piece to `to` and pass the turn.
    pub fn apply_piece_move(&mut self, to: Coordinates) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(IllegalMove::GameOver.into());
        }

        let mover = self.current_player;
        let from = self.players[mover.index()].coordinates;
        actions::apply_piece_move(from, to, &mut self.board)?;
        self.players[mover.index()].coordinates = to;

        self.finish_turn(mover)?;
        Ok(())
    }

    /// Build a wall for the current player and pass the turn.
    pub fn apply_wall_placement(&mut self, coordinates: Coordinates) -> Result<(), WallError> {
        if self.is_over() {
            return Err(IllegalWallPlacement::GameOver.into());
        }

        let mover = self.current_player;
        if self.players[mover.index()].walls_remaining == 0 {
            return Err(IllegalWallPlacement::NoWallsRemaining { player: mover }.into());
        }

        walls::apply_wall_placement(coordinates, &mut self.board)?;
        self.players[mover.index()].walls_remaining -= 1;

        self.finish_turn(mover)?;
        Ok(())
    }

    fn finish_turn(&mut self, mover: Player) -> Result<(), InvariantViolation> {
        self.completed_steps += 1;

        if has_reached_goal(self.players[mover.index()].coordinates, mover.goal_row()) {
            self.winner = Some(mover);
            reset_moves(&mut self.board);
            info!(winner = %mover, steps = self.completed_steps, "game over");
            return Ok(());
        }

        self.current_player = mover.opponent();
        self.prepare_turn()
    }

    /// Refresh the availability flags for the player about to move.
    fn prepare_turn(&mut self) -> Result<(), InvariantViolation> {
        let position = self.players[self.current_player.index()].coordinates;
        compute_legal_moves(position, &mut self.board)?;
        refresh_wall_availability(&mut self.board)
    }
}

//! Rooms: two users, a ready handshake, then turns through the rules engine.
//!
//! Nothing here is global. The transport layer owns a [`RoomRegistry`] and
//! must serialise access to each room, for example by keeping the registry
//! behind a mutex or by giving every room its own task. All mutation goes
//! through `&mut`, so a room cannot be changed from two places at once.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::actions::Action;
use crate::error::SessionError;
use crate::game_state::{GameConfig, GameState, Player};

pub type UserId = String;
pub type RoomCode = String;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Seat {
    user_id: UserId,
    player: Player,
    ready: bool,
}

#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    config: GameConfig,
    seats: Vec<Seat>,
    game: Option<GameState>,
}

impl Room {
    pub fn new(code: impl Into<RoomCode>, config: GameConfig) -> Self {
        Self {
            code: code.into(),
            config,
            seats: Vec::with_capacity(Player::ALL.len()),
            game: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The running game, once both users are ready.
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn player_of(&self, user_id: &str) -> Option<Player> {
        self.seat(user_id).map(|seat| seat.player)
    }

    pub fn user_count(&self) -> usize {
        self.seats.len()
    }

    /// User whose turn it is.
    pub fn user_to_move(&self) -> Option<&str> {
        let game = self.game.as_ref()?;
        if game.is_over() {
            return None;
        }
        self.seats
            .iter()
            .find(|seat| seat.player == game.current_player())
            .map(|seat| seat.user_id.as_str())
    }

    fn seat(&self, user_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.user_id == user_id)
    }

    /// Seat a user. The first free role is assigned, `Player::One` first.
    /// Joining again returns the seat already held.
    #[instrument(skip(self), fields(room = %self.code))]
    pub fn join(&mut self, user_id: &str) -> Result<Player, SessionError> {
        if let Some(player) = self.player_of(user_id) {
            return Ok(player);
        }

        let player = Player::ALL
            .into_iter()
            .find(|player| self.seats.iter().all(|seat| seat.player != *player))
            .ok_or_else(|| {
                warn!("room is full");
                SessionError::RoomFull
            })?;

        self.seats.push(Seat {
            user_id: user_id.to_owned(),
            player,
            ready: false,
        });
        info!(%player, "user joined");
        Ok(player)
    }

    /// Mark a user ready. Once both seats are filled and ready the game
    /// starts with a randomly chosen first mover.
    ///
    /// # Returns
    /// `true` if this call started the game.
    #[instrument(skip(self, rng), fields(room = %self.code))]
    pub fn ready<R: Rng + ?Sized>(
        &mut self,
        user_id: &str,
        rng: &mut R,
    ) -> Result<bool, SessionError> {
        let seat = self
            .seats
            .iter_mut()
            .find(|seat| seat.user_id == user_id)
            .ok_or_else(|| SessionError::UnknownUser(user_id.to_owned()))?;
        seat.ready = true;

        if !self.is_ready() || self.game.is_some() {
            return Ok(false);
        }

        let first = if rng.gen_bool(0.5) {
            Player::One
        } else {
            Player::Two
        };
        self.game = Some(GameState::with_first_player(self.config, first)?);
        info!(%first, "game started");
        Ok(true)
    }

    /// Remove a user from the room. A game in progress is kept so that a
    /// returning user can take the seat back over.
    #[instrument(skip(self), fields(room = %self.code))]
    pub fn leave(&mut self, user_id: &str) -> Result<Player, SessionError> {
        let index = self
            .seats
            .iter()
            .position(|seat| seat.user_id == user_id)
            .ok_or_else(|| SessionError::UnknownUser(user_id.to_owned()))?;
        let seat = self.seats.remove(index);
        info!(player = %seat.player, "user left");
        Ok(seat.player)
    }

    /// Both seats are taken and both users are ready.
    pub fn is_ready(&self) -> bool {
        self.seats.len() == Player::ALL.len() && self.seats.iter().all(|seat| seat.ready)
    }

    /// Play `action` on behalf of `user_id`.
    #[instrument(skip(self), fields(room = %self.code))]
    pub fn play(&mut self, user_id: &str, action: Action) -> Result<(), SessionError> {
        let player = self
            .player_of(user_id)
            .ok_or_else(|| SessionError::UnknownUser(user_id.to_owned()))?;

        if !self.is_ready() {
            return Err(SessionError::NotStarted);
        }
        let game = self.game.as_mut().ok_or(SessionError::NotStarted)?;

        if game.current_player() != player {
            warn!(%player, "user tried to move out of turn");
            return Err(SessionError::NotYourTurn {
                waiting_for: game.current_player(),
            });
        }

        game.apply_action(action)?;
        debug!(%player, ?action, "action played");
        if let Some(winner) = game.winner() {
            info!(%winner, "game finished");
        }
        Ok(())
    }
}

/// All live rooms, keyed by room code.
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    config: GameConfig,
}

impl RoomRegistry {
    pub fn new(config: GameConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    #[instrument(skip(self))]
    pub fn create_room(&mut self, code: &str) -> Result<&mut Room, SessionError> {
        if self.rooms.contains_key(code) {
            warn!("room already exists");
            return Err(SessionError::RoomExists(code.to_owned()));
        }
        info!("room created");
        let config = self.config;
        Ok(self
            .rooms
            .entry(code.to_owned())
            .or_insert_with(|| Room::new(code, config)))
    }

    pub fn get(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Store a room under its own code, returning any room it replaced.
    pub fn insert(&mut self, room: Room) -> Option<Room> {
        self.rooms.insert(room.code.clone(), room)
    }

    pub fn remove(&mut self, code: &str) -> Option<Room> {
        self.rooms.remove(code)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Room in which `user_id` holds a seat.
    pub fn room_of_user(&self, user_id: &str) -> Option<&Room> {
        self.rooms
            .values()
            .find(|room| room.player_of(user_id).is_some())
    }

    /// Look up a room and play an action in it.
    pub fn play(&mut self, code: &str, user_id: &str, action: Action) -> Result<(), SessionError> {
        self.rooms
            .get_mut(code)
            .ok_or_else(|| SessionError::UnknownRoom(code.to_owned()))?
            .play(user_id, action)
    }
}

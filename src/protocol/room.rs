use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::event::{GameEvent, GameEventKind};
use crate::error::RoomError;
use crate::game::{GameState, GameStatus, Player};

/// Names seated at each color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yellow: Option<String>,
}

impl Seats {
    pub fn get(&self, player: Player) -> Option<&str> {
        match player {
            Player::Red => self.red.as_deref(),
            Player::Yellow => self.yellow.as_deref(),
        }
    }

    /// Color seated under `name`.
    pub fn seat_of(&self, name: &str) -> Option<Player> {
        [Player::Red, Player::Yellow]
            .into_iter()
            .find(|&player| self.get(player) == Some(name))
    }

    pub fn is_full(&self) -> bool {
        self.red.is_some() && self.yellow.is_some()
    }

    fn slot(&mut self, player: Player) -> &mut Option<String> {
        match player {
            Player::Red => &mut self.red,
            Player::Yellow => &mut self.yellow,
        }
    }
}

/// One game plus the two people playing it.
///
/// The room is where moves for a single game are serialized: it holds the
/// latest state, checks that the mover owns the turn, and can reject moves
/// computed against an older state via `expected_move_count`. A caller
/// sharing a room between threads puts it behind its own lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRoom {
    id: Uuid,
    players: Seats,
    game_state: GameState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GameRoom {
    /// Open a room with `creator` seated as Red.
    pub fn new(creator: impl Into<String>) -> Result<Self, RoomError> {
        let creator = non_empty(creator.into())?;
        let now = Utc::now();
        let room = GameRoom {
            id: Uuid::new_v4(),
            players: Seats {
                red: Some(creator),
                yellow: None,
            },
            game_state: GameState::initial(),
            created_at: now,
            updated_at: now,
        };
        info!(room = %room.id, "room created");
        Ok(room)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn players(&self) -> &Seats {
        &self.players
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Seat `name` at the free color. Filling the second seat starts a
    /// waiting game.
    #[instrument(skip(self), fields(room = %self.id))]
    pub fn join(&mut self, name: &str) -> Result<(Player, GameEvent), RoomError> {
        let name = non_empty(name.to_string())?;
        if self.players.seat_of(&name).is_some() {
            return Err(RoomError::NameTaken(name));
        }
        let player = [Player::Red, Player::Yellow]
            .into_iter()
            .find(|&player| self.players.get(player).is_none())
            .ok_or(RoomError::RoomFull)?;

        *self.players.slot(player) = Some(name.clone());
        if self.players.is_full() {
            self.game_state = self.game_state.start();
        }
        self.touch();

        info!(%player, "player joined");
        Ok((player, GameEvent::new(GameEventKind::PlayerJoined { player, name })))
    }

    /// Free the seat held by `name`. The game itself is left as it is.
    #[instrument(skip(self), fields(room = %self.id))]
    pub fn leave(&mut self, name: &str) -> Result<GameEvent, RoomError> {
        let player = self
            .players
            .seat_of(name)
            .ok_or_else(|| RoomError::NotSeated(name.to_string()))?;

        *self.players.slot(player) = None;
        self.touch();

        info!(%player, "player left");
        Ok(GameEvent::new(GameEventKind::PlayerLeft {
            player,
            name: name.to_string(),
        }))
    }

    /// Apply a move by `name`. On success the held state is replaced and the
    /// resulting events are returned; on any error the room is unchanged.
    #[instrument(skip(self), fields(room = %self.id))]
    pub fn submit_move(
        &mut self,
        name: &str,
        col: i64,
        expected_move_count: Option<u32>,
    ) -> Result<Vec<GameEvent>, RoomError> {
        let player = self
            .players
            .seat_of(name)
            .ok_or_else(|| RoomError::NotSeated(name.to_string()))?;

        let actual = self.game_state.move_count();
        if let Some(expected) = expected_move_count {
            if expected != actual {
                return Err(RoomError::StaleMove { expected, actual });
            }
        }
        if self.game_state.status() == GameStatus::Waiting {
            return Err(RoomError::NotStarted);
        }
        if !self.game_state.is_finished() && self.game_state.current_player() != player {
            return Err(RoomError::NotYourTurn {
                expected: self.game_state.current_player(),
                found: player,
            });
        }

        let next = self.game_state.make_move(col)?;
        self.game_state = next;
        self.touch();

        let mut events = Vec::with_capacity(2);
        if let Some(last) = next.last_move() {
            events.push(GameEvent::new(GameEventKind::Move {
                player,
                row: last.row,
                col: last.col,
                state: next,
            }));
        }
        if next.is_finished() {
            info!(winner = ?next.winner(), moves = next.move_count(), "game ended");
            events.push(GameEvent::new(GameEventKind::GameEnded {
                winner: next.winner(),
                moves: next.move_count(),
            }));
        }
        Ok(events)
    }

    /// Replace the game with a fresh one, started if both seats are taken.
    pub fn reset(&mut self) -> &GameState {
        let state = GameState::initial();
        self.game_state = if self.players.is_full() {
            state.start()
        } else {
            state
        };
        self.touch();
        &self.game_state
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn non_empty(name: String) -> Result<String, RoomError> {
    if name.trim().is_empty() {
        return Err(RoomError::EmptyName);
    }
    Ok(name)
}

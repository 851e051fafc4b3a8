use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{GameState, Player};

/// What happened in a room. Serialized as `{ "type": ..., "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum GameEventKind {
    Move {
        player: Player,
        row: usize,
        col: usize,
        state: GameState,
    },
    PlayerJoined {
        player: Player,
        name: String,
    },
    PlayerLeft {
        player: Player,
        name: String,
    },
    GameEnded {
        winner: Option<Player>,
        moves: u32,
    },
}

/// A pushed room event with the time it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    #[serde(flatten)]
    pub kind: GameEventKind,
    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    pub fn new(kind: GameEventKind) -> Self {
        GameEvent {
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Wire name of the event type.
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            GameEventKind::Move { .. } => "move",
            GameEventKind::PlayerJoined { .. } => "player-joined",
            GameEventKind::PlayerLeft { .. } => "player-left",
            GameEventKind::GameEnded { .. } => "game-ended",
        }
    }
}

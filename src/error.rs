use std::path::PathBuf;

use crate::game::{GameStatus, Player};

/// A rejected move. This is the only error the engine itself produces; the
/// state the move was attempted on is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("invalid move: column {col} is out of range")]
    ColumnOutOfRange { col: i64 },

    #[error("invalid move: column {col} is full")]
    ColumnFull { col: i64 },

    #[error("invalid move: game is already finished")]
    GameFinished,
}

/// A state received from outside the engine breaks a game invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("move count {move_count} does not match {pieces} pieces on the board")]
    MoveCountMismatch { move_count: u32, pieces: usize },

    #[error("board has a piece above an empty cell")]
    FloatingPiece,

    #[error("piece counts are unbalanced (red {red}, yellow {yellow})")]
    PieceBalance { red: usize, yellow: usize },

    #[error("{found} is marked to move but {expected} is next")]
    WrongPlayerToMove { expected: Player, found: Player },

    #[error("a waiting game must have an empty board")]
    WaitingWithPieces,

    #[error("winner {0} declared while the game is {1:?}")]
    WinnerBeforeFinish(Player, GameStatus),

    #[error("winner {0} declared without a line on the board")]
    WinnerWithoutLine(Player),

    #[error("{0} has a line that the state does not report")]
    UnreportedLine(Player),

    #[error("game is {0:?} but the board is full")]
    FullButUnfinished(GameStatus),

    #[error("game is finished without a winner but the board has room")]
    DrawWithEmptyCells,

    #[error("last move ({row}, {col}) is not the top piece of its column")]
    LastMoveMismatch { row: usize, col: usize },

    #[error("last move ({row}, {col}) does not belong to {expected}")]
    LastMoveOwner { row: usize, col: usize, expected: Player },

    #[error("last move recorded on an empty board")]
    LastMoveWithoutPieces,
}

/// A session-service payload that cannot be mapped onto a game state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session board has {found} rows, expected {expected}")]
    RowCount { found: usize, expected: usize },

    #[error("session board row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown cell code {code} at ({row}, {col})")]
    UnknownCell { code: u8, row: usize, col: usize },

    #[error("inconsistent session state: {0}")]
    State(#[from] StateError),
}

/// Room bookkeeping failures. Kept apart from [`MoveError`] so that a
/// collaborator-level rejection never reads as an invalid move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("room is full")]
    RoomFull,

    #[error("player '{0}' is already seated in this room")]
    NameTaken(String),

    #[error("player '{0}' is not seated in this room")]
    NotSeated(String),

    #[error("player name must not be empty")]
    EmptyName,

    #[error("game has not started")]
    NotStarted,

    #[error("it is {expected}'s turn, not {found}'s")]
    NotYourTurn { expected: Player, found: Player },

    #[error("stale move: expected move count {expected}, room is at {actual}")]
    StaleMove { expected: u32, actual: u32 },

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

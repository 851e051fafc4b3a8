use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::board::{column_index, Board, COLS, ROWS};
use super::player::Player;
use crate::error::{MoveError, StateError};

/// Total cells; the move count at which an undecided game is drawn.
pub const MAX_MOVES: u32 = (ROWS * COLS) as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Landing position of an accepted drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

/// Unchecked field set of a [`GameState`], as received from outside the
/// engine. Turned into a state with [`GameState::from_parts`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateParts {
    pub board: Board,
    pub current_player: Player,
    pub status: GameStatus,
    pub winner: Option<Player>,
    pub last_move: Option<Move>,
    pub move_count: u32,
}

/// Immutable snapshot of a game. Every accepted move yields a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GameStateParts")]
pub struct GameState {
    board: Board,
    current_player: Player,
    status: GameStatus,
    winner: Option<Player>,
    last_move: Option<Move>,
    move_count: u32,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::FIRST,
            status: GameStatus::Waiting,
            winner: None,
            last_move: None,
            move_count: 0,
        }
    }

    /// Build a state from externally supplied fields, checking every
    /// invariant the engine maintains for its own states.
    pub fn from_parts(parts: GameStateParts) -> Result<Self, StateError> {
        let GameStateParts {
            board,
            current_player,
            status,
            winner,
            last_move,
            move_count,
        } = parts;

        let pieces = board.piece_count();
        if move_count as usize != pieces {
            return Err(StateError::MoveCountMismatch { move_count, pieces });
        }
        if board.has_floating_piece() {
            return Err(StateError::FloatingPiece);
        }

        let red = board.count_of(Player::Red);
        let yellow = board.count_of(Player::Yellow);
        let expected = if red == yellow {
            Player::Red
        } else if red == yellow + 1 {
            Player::Yellow
        } else {
            return Err(StateError::PieceBalance { red, yellow });
        };
        if current_player != expected {
            return Err(StateError::WrongPlayerToMove {
                expected,
                found: current_player,
            });
        }

        if status == GameStatus::Waiting && pieces > 0 {
            return Err(StateError::WaitingWithPieces);
        }

        match (status, winner) {
            (GameStatus::Finished, Some(winner)) => {
                if !board.has_line(winner) {
                    return Err(StateError::WinnerWithoutLine(winner));
                }
                if board.has_line(winner.other()) {
                    return Err(StateError::UnreportedLine(winner.other()));
                }
                // The winner made the last move, so the other side is next.
                if current_player != winner.other() {
                    return Err(StateError::WrongPlayerToMove {
                        expected: winner.other(),
                        found: current_player,
                    });
                }
            }
            (GameStatus::Finished, None) => {
                if !board.is_full() {
                    return Err(StateError::DrawWithEmptyCells);
                }
                check_no_line(&board)?;
            }
            (status, Some(winner)) => {
                return Err(StateError::WinnerBeforeFinish(winner, status));
            }
            (status, None) => {
                if board.is_full() {
                    return Err(StateError::FullButUnfinished(status));
                }
                check_no_line(&board)?;
            }
        }

        if let Some(Move { row, col }) = last_move {
            if pieces == 0 {
                return Err(StateError::LastMoveWithoutPieces);
            }
            let on_top = row < ROWS
                && col < COLS
                && !board.get(row, col).is_empty()
                && (row == 0 || board.get(row - 1, col).is_empty());
            if !on_top {
                return Err(StateError::LastMoveMismatch { row, col });
            }
            let mover = current_player.other();
            if board.get(row, col).player() != Some(mover) {
                return Err(StateError::LastMoveOwner {
                    row,
                    col,
                    expected: mover,
                });
            }
        }

        Ok(GameState {
            board,
            current_player,
            status,
            winner,
            last_move,
            move_count,
        })
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player whose piece the next accepted move places
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        match (self.status, self.winner) {
            (GameStatus::Finished, Some(player)) => Some(GameOutcome::Winner(player)),
            (GameStatus::Finished, None) => Some(GameOutcome::Draw),
            _ => None,
        }
    }

    /// Check if game is over
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Move a waiting game to playing. Any other status is returned as is, so
    /// a finished game can only be left through [`GameState::initial`].
    pub fn start(&self) -> GameState {
        match self.status {
            GameStatus::Waiting => GameState {
                status: GameStatus::Playing,
                ..*self
            },
            _ => *self,
        }
    }

    /// Columns the next move may use; empty once the game is finished.
    pub fn valid_moves(&self) -> Vec<usize> {
        if self.is_finished() {
            return Vec::new();
        }
        self.board.valid_moves()
    }

    /// Drop the current player's piece into `col` and return the resulting
    /// state. `self` is never modified, so a rejected move leaves the caller
    /// holding exactly what it had.
    ///
    /// A move on a waiting game is accepted and starts it; a move on a
    /// finished game is rejected.
    pub fn make_move(&self, col: i64) -> Result<GameState, MoveError> {
        if self.is_finished() {
            debug!(col, "rejected move on finished game");
            return Err(MoveError::GameFinished);
        }

        let Some(column) = column_index(col) else {
            debug!(col, "rejected out-of-range column");
            return Err(MoveError::ColumnOutOfRange { col });
        };
        let Some(row) = self.board.landing_row(column) else {
            debug!(col, "rejected full column");
            return Err(MoveError::ColumnFull { col });
        };

        let board = self
            .board
            .with_cell(row, column, self.current_player.to_cell());
        let winner = board.check_winner(row, column);
        let move_count = self.move_count + 1;
        let draw = winner.is_none() && move_count == MAX_MOVES;
        let status = if winner.is_some() || draw {
            GameStatus::Finished
        } else {
            GameStatus::Playing
        };

        trace!(player = %self.current_player, row, col = column, move_count, "piece placed");
        if status == GameStatus::Finished {
            trace!(winner = ?winner, move_count, "game finished");
        }

        Ok(GameState {
            board,
            current_player: self.current_player.other(),
            status,
            winner,
            last_move: Some(Move { row, col: column }),
            move_count,
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl TryFrom<GameStateParts> for GameState {
    type Error = StateError;

    fn try_from(parts: GameStateParts) -> Result<Self, Self::Error> {
        GameState::from_parts(parts)
    }
}

impl From<GameState> for GameStateParts {
    fn from(state: GameState) -> Self {
        GameStateParts {
            board: state.board,
            current_player: state.current_player,
            status: state.status,
            winner: state.winner,
            last_move: state.last_move,
            move_count: state.move_count,
        }
    }
}

fn check_no_line(board: &Board) -> Result<(), StateError> {
    for player in [Player::Red, Player::Yellow] {
        if board.has_line(player) {
            return Err(StateError::UnreportedLine(player));
        }
    }
    Ok(())
}

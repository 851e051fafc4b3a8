//! Translation to and from the third-party game-session service.
//!
//! The service stores boards as rows of numeric codes (`0` empty, `1` red,
//! `2` yellow) and runs its own `waiting` / `active` / `finished` session
//! lifecycle. Nothing here is part of the engine; a session payload is decoded
//! into a [`GameState`] before a move is applied and encoded again afterwards.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::game::{Board, Cell, GameState, GameStateParts, GameStatus, Player, COLS, ROWS};

pub const EMPTY_CODE: u8 = 0;
pub const RED_CODE: u8 = 1;
pub const YELLOW_CODE: u8 = 2;

/// Session lifecycle as the service reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Waiting,
    Active,
    Finished,
}

impl From<GameStatus> for SessionStatus {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Waiting => SessionStatus::Waiting,
            GameStatus::Playing => SessionStatus::Active,
            GameStatus::Finished => SessionStatus::Finished,
        }
    }
}

impl From<SessionStatus> for GameStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Waiting => GameStatus::Waiting,
            SessionStatus::Active => GameStatus::Playing,
            SessionStatus::Finished => GameStatus::Finished,
        }
    }
}

/// Game payload stored inside a service session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub board: Vec<Vec<u8>>,
    pub current_player: Player,
    #[serde(default)]
    pub winner: Option<Player>,
}

impl SessionState {
    /// Encode an engine state for the service.
    pub fn from_game(state: &GameState) -> (SessionState, SessionStatus) {
        let session = SessionState {
            board: encode_board(state.board()),
            current_player: state.current_player(),
            winner: state.winner(),
        };
        (session, state.status().into())
    }

    /// Decode a service payload. The service keeps no last move, so the
    /// result has none; the move count is recounted from the board.
    pub fn into_game(self, status: SessionStatus) -> Result<GameState, SessionError> {
        let board = decode_board(&self.board)?;
        let move_count = board.piece_count() as u32;
        let state = GameState::from_parts(GameStateParts {
            board,
            current_player: self.current_player,
            status: status.into(),
            winner: self.winner,
            last_move: None,
            move_count,
        })?;
        Ok(state)
    }
}

pub fn encode_cell(cell: Cell) -> u8 {
    match cell {
        Cell::Empty => EMPTY_CODE,
        Cell::Red => RED_CODE,
        Cell::Yellow => YELLOW_CODE,
    }
}

/// `None` for codes the service never emits.
pub fn decode_cell(code: u8) -> Option<Cell> {
    match code {
        EMPTY_CODE => Some(Cell::Empty),
        RED_CODE => Some(Cell::Red),
        YELLOW_CODE => Some(Cell::Yellow),
        _ => None,
    }
}

pub fn encode_board(board: &Board) -> Vec<Vec<u8>> {
    board
        .rows()
        .iter()
        .map(|row| row.iter().copied().map(encode_cell).collect())
        .collect()
}

pub fn decode_board(rows: &[Vec<u8>]) -> Result<Board, SessionError> {
    if rows.len() != ROWS {
        return Err(SessionError::RowCount {
            found: rows.len(),
            expected: ROWS,
        });
    }

    let mut cells = [[Cell::Empty; COLS]; ROWS];
    for (row, codes) in rows.iter().enumerate() {
        if codes.len() != COLS {
            return Err(SessionError::ColumnCount {
                row,
                found: codes.len(),
                expected: COLS,
            });
        }
        for (col, &code) in codes.iter().enumerate() {
            cells[row][col] =
                decode_cell(code).ok_or(SessionError::UnknownCell { code, row, col })?;
        }
    }
    Ok(Board::from_cells(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use crate::game::{play, DRAW_SEQUENCE};

    #[test]
    fn test_cell_codes() {
        assert_eq!(encode_cell(Cell::Empty), 0);
        assert_eq!(encode_cell(Cell::Red), 1);
        assert_eq!(encode_cell(Cell::Yellow), 2);
        for code in 0..=2 {
            assert_eq!(decode_cell(code).map(encode_cell), Some(code));
        }
        assert_eq!(decode_cell(3), None);
    }

    #[test]
    fn test_encode_board_layout() {
        let state = play(GameState::initial(), &[3, 3]);
        let rows = encode_board(state.board());
        assert_eq!(rows.len(), ROWS);
        assert!(rows.iter().all(|row| row.len() == COLS));
        assert_eq!(rows[5][3], RED_CODE);
        assert_eq!(rows[4][3], YELLOW_CODE);
        assert_eq!(rows[0], vec![0; COLS]);
    }

    #[test]
    fn test_decode_board_rejects_bad_shapes() {
        assert_eq!(
            decode_board(&vec![vec![0; COLS]; ROWS - 1]),
            Err(SessionError::RowCount {
                found: ROWS - 1,
                expected: ROWS
            })
        );

        let mut rows = vec![vec![0; COLS]; ROWS];
        rows[2].pop();
        assert_eq!(
            decode_board(&rows),
            Err(SessionError::ColumnCount {
                row: 2,
                found: COLS - 1,
                expected: COLS
            })
        );

        let mut rows = vec![vec![0; COLS]; ROWS];
        rows[5][6] = 9;
        assert_eq!(
            decode_board(&rows),
            Err(SessionError::UnknownCell {
                code: 9,
                row: 5,
                col: 6
            })
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(SessionStatus::from(GameStatus::Playing), SessionStatus::Active);
        assert_eq!(GameStatus::from(SessionStatus::Active), GameStatus::Playing);
        assert_eq!(
            serde_json::to_string(&SessionStatus::Active).unwrap(),
            "\"active\""
        );
    }

    #[test]
    fn test_game_survives_session_trip() {
        let states = [
            GameState::initial(),
            play(GameState::initial(), &[2, 3, 4]),
            play(GameState::initial(), &[3, 0, 3, 0, 3, 0, 3]),
            play(GameState::initial(), &DRAW_SEQUENCE),
        ];
        for state in states {
            let (session, status) = SessionState::from_game(&state);
            let decoded = session.into_game(status).unwrap();
            assert_eq!(decoded.board(), state.board());
            assert_eq!(decoded.current_player(), state.current_player());
            assert_eq!(decoded.status(), state.status());
            assert_eq!(decoded.winner(), state.winner());
            assert_eq!(decoded.move_count(), state.move_count());
            assert_eq!(decoded.last_move(), None);
        }
    }

    #[test]
    fn test_decoded_game_accepts_moves() {
        let (session, status) = SessionState::from_game(&play(GameState::initial(), &[3]));
        let state = session.into_game(status).unwrap();
        let next = state.make_move(3).unwrap();
        assert_eq!(next.board().get(4, 3), Cell::Yellow);
    }

    #[test]
    fn test_session_json_shape() {
        let json = serde_json::json!({
            "board": vec![vec![0u8; COLS]; ROWS],
            "current_player": "red",
            "winner": null,
        });
        let session: SessionState = serde_json::from_value(json).unwrap();
        let state = session.into_game(SessionStatus::Waiting).unwrap();
        assert_eq!(state, GameState::initial());
    }

    #[test]
    fn test_inconsistent_session_rejected() {
        let mut board = vec![vec![0u8; COLS]; ROWS];
        board[5][0] = YELLOW_CODE;
        let session = SessionState {
            board,
            current_player: Player::Red,
            winner: None,
        };
        assert_eq!(
            session.into_game(SessionStatus::Active),
            Err(SessionError::State(StateError::PieceBalance { red: 0, yellow: 1 }))
        );
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of aligned pieces needed to win.
pub const CONNECT: usize = 4;

/// Line directions as (row delta, col delta): horizontal, vertical, and the
/// two diagonals. Each is walked both ways from the probed cell.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// One grid position. Serializes as `null`, `"red"` or `"yellow"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Player>", into = "Option<Player>")]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// The player occupying this cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Player::Red),
            Cell::Yellow => Some(Player::Yellow),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Option<Player>> for Cell {
    fn from(player: Option<Player>) -> Self {
        player.map_or(Cell::Empty, Player::to_cell)
    }
}

impl From<Cell> for Option<Player> {
    fn from(cell: Cell) -> Self {
        cell.player()
    }
}

/// The 6x7 grid. `Copy`, so every game state owns its board outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Build a board from raw rows, top row first.
    pub fn from_cells(cells: [[Cell; COLS]; ROWS]) -> Self {
        Board { cells }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Rows of the grid, top row first.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// A column accepts a piece iff it is in range and its top cell is empty.
    pub fn is_valid_move(&self, col: i64) -> bool {
        match column_index(col) {
            Some(col) => self.cells[0][col].is_empty(),
            None => false,
        }
    }

    /// Columns that currently accept a piece, ascending.
    pub fn valid_moves(&self) -> Vec<usize> {
        (0..COLS)
            .filter(|&col| self.cells[0][col].is_empty())
            .collect()
    }

    /// Row a piece dropped into `col` would land on, scanning up from the bottom.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_empty())
    }

    /// Copy of this board with `cell` written at (row, col).
    pub(crate) fn with_cell(&self, row: usize, col: usize, cell: Cell) -> Board {
        let mut next = *self;
        next.cells[row][col] = cell;
        next
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|cell| !cell.is_empty())
    }

    /// Number of non-empty cells.
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Pieces owned by `player`.
    pub fn count_of(&self, player: Player) -> usize {
        let target = player.to_cell();
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == target)
            .count()
    }

    /// Winner through the piece at (row, col), if that piece completes a line.
    ///
    /// Only the four lines through the given cell are walked, so this is
    /// constant time. Any win must pass through the last placed piece, which
    /// is the only cell the engine ever probes.
    pub fn check_winner(&self, row: usize, col: usize) -> Option<Player> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        let player = self.cells[row][col].player()?;

        DIRECTIONS
            .iter()
            .any(|&(dr, dc)| {
                // The placed piece counts once; both extensions add to it.
                let count = 1
                    + self.run_length(row, col, dr, dc, player)
                    + self.run_length(row, col, -dr, -dc, player);
                count >= CONNECT
            })
            .then_some(player)
    }

    /// Whether `player` has a line anywhere on the board. Full scan; used to
    /// audit states received from outside, never on the move path.
    pub fn has_line(&self, player: Player) -> bool {
        (0..ROWS).any(|row| {
            (0..COLS).any(|col| {
                self.cells[row][col].player() == Some(player)
                    && self.check_winner(row, col).is_some()
            })
        })
    }

    /// Whether some piece sits above an empty cell.
    pub fn has_floating_piece(&self) -> bool {
        (0..COLS).any(|col| {
            (0..ROWS - 1).any(|row| {
                !self.cells[row][col].is_empty() && self.cells[row + 1][col].is_empty()
            })
        })
    }

    /// Consecutive `player` cells starting one step from (row, col).
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
        let target = player.to_cell();
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while (0..ROWS as isize).contains(&r)
            && (0..COLS as isize).contains(&c)
            && self.cells[r as usize][c as usize] == target
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => '.',
                    Cell::Red => 'R',
                    Cell::Yellow => 'Y',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// In-range column index, or `None` for anything outside `0..COLS`.
pub(crate) fn column_index(col: i64) -> Option<usize> {
    usize::try_from(col).ok().filter(|&col| col < COLS)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drop `cell` into `col` the way the engine does.
    fn drop_piece(board: &mut Board, col: usize, cell: Cell) -> usize {
        let row = board.landing_row(col).unwrap();
        *board = board.with_cell(row, col, cell);
        row
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.piece_count(), 0);
    }

    #[test]
    fn test_valid_move_bounds() {
        let board = Board::new();
        for col in 0..COLS as i64 {
            assert!(board.is_valid_move(col));
        }
        assert!(!board.is_valid_move(-1));
        assert!(!board.is_valid_move(COLS as i64));
        assert!(!board.is_valid_move(COLS as i64 + 1));
        assert!(!board.is_valid_move(i64::MIN));
    }

    #[test]
    fn test_full_column_is_invalid() {
        let mut board = Board::new();
        for _ in 0..ROWS {
            drop_piece(&mut board, 0, Cell::Red);
        }
        assert!(!board.is_valid_move(0));
        assert!(board.is_valid_move(1));
        assert_eq!(board.landing_row(0), None);
        assert_eq!(board.valid_moves(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_landing_row_stacks() {
        let mut board = Board::new();
        assert_eq!(drop_piece(&mut board, 3, Cell::Red), 5);
        assert_eq!(drop_piece(&mut board, 3, Cell::Yellow), 4);
        assert_eq!(board.get(5, 3), Cell::Red);
        assert_eq!(board.get(4, 3), Cell::Yellow);
    }

    #[test]
    fn test_full_board_has_no_valid_moves() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                drop_piece(&mut board, col, Cell::Red);
            }
        }
        assert!(board.is_full());
        assert!(board.valid_moves().is_empty());
        assert_eq!(board.piece_count(), ROWS * COLS);
    }

    #[test]
    fn test_with_cell_leaves_original_untouched() {
        let board = Board::new();
        let next = board.with_cell(5, 0, Cell::Red);
        assert_eq!(board.get(5, 0), Cell::Empty);
        assert_eq!(next.get(5, 0), Cell::Red);
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        for col in 1..=4 {
            drop_piece(&mut board, col, Cell::Red);
        }
        assert_eq!(board.check_winner(5, 4), Some(Player::Red));
        assert_eq!(board.check_winner(5, 2), Some(Player::Red));
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        for _ in 0..4 {
            drop_piece(&mut board, 3, Cell::Yellow);
        }
        assert_eq!(board.check_winner(2, 3), Some(Player::Yellow));
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut board = Board::new();
        drop_piece(&mut board, 0, Cell::Red);

        drop_piece(&mut board, 1, Cell::Yellow);
        drop_piece(&mut board, 1, Cell::Red);

        drop_piece(&mut board, 2, Cell::Yellow);
        drop_piece(&mut board, 2, Cell::Yellow);
        drop_piece(&mut board, 2, Cell::Red);

        drop_piece(&mut board, 3, Cell::Yellow);
        drop_piece(&mut board, 3, Cell::Yellow);
        drop_piece(&mut board, 3, Cell::Yellow);
        let row = drop_piece(&mut board, 3, Cell::Red);

        assert_eq!(board.check_winner(row, 3), Some(Player::Red));
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::new();
        drop_piece(&mut board, 6, Cell::Red);

        drop_piece(&mut board, 5, Cell::Yellow);
        drop_piece(&mut board, 5, Cell::Red);

        drop_piece(&mut board, 4, Cell::Yellow);
        drop_piece(&mut board, 4, Cell::Yellow);
        drop_piece(&mut board, 4, Cell::Red);

        drop_piece(&mut board, 3, Cell::Yellow);
        drop_piece(&mut board, 3, Cell::Yellow);
        drop_piece(&mut board, 3, Cell::Yellow);
        let row = drop_piece(&mut board, 3, Cell::Red);

        assert_eq!(board.check_winner(row, 3), Some(Player::Red));
    }

    #[test]
    fn test_five_in_a_row_still_wins() {
        let mut board = Board::new();
        for col in [0, 1, 3, 4] {
            drop_piece(&mut board, col, Cell::Red);
        }
        assert_eq!(board.check_winner(5, 0), None);
        drop_piece(&mut board, 2, Cell::Red);
        assert_eq!(board.check_winner(5, 2), Some(Player::Red));
        assert_eq!(board.check_winner(5, 0), Some(Player::Red));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            drop_piece(&mut board, col, Cell::Red);
        }
        assert_eq!(board.check_winner(5, 1), None);
        assert_eq!(board.check_winner(5, 2), None);
    }

    #[test]
    fn test_broken_line_is_not_a_win() {
        let mut board = Board::new();
        for col in [0, 1, 2] {
            drop_piece(&mut board, col, Cell::Red);
        }
        drop_piece(&mut board, 3, Cell::Yellow);
        drop_piece(&mut board, 4, Cell::Red);
        assert_eq!(board.check_winner(5, 4), None);
    }

    #[test]
    fn test_check_winner_on_empty_or_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.check_winner(5, 3), None);
        assert_eq!(board.check_winner(ROWS, 0), None);
        assert_eq!(board.check_winner(0, COLS), None);
    }

    #[test]
    fn test_read_only_queries_are_repeatable() {
        let mut board = Board::new();
        for col in 0..4 {
            drop_piece(&mut board, col, Cell::Yellow);
        }
        let snapshot = board;
        for _ in 0..3 {
            assert_eq!(board.check_winner(5, 3), Some(Player::Yellow));
            assert_eq!(board.valid_moves(), (0..COLS).collect::<Vec<_>>());
            assert!(board.is_valid_move(2));
        }
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_has_line_and_floating_piece() {
        let mut board = Board::new();
        for _ in 0..4 {
            drop_piece(&mut board, 6, Cell::Yellow);
        }
        assert!(board.has_line(Player::Yellow));
        assert!(!board.has_line(Player::Red));
        assert!(!board.has_floating_piece());

        let floating = Board::new().with_cell(2, 2, Cell::Red);
        assert!(floating.has_floating_piece());
    }

    #[test]
    fn test_cell_serializes_as_player_or_null() {
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Cell::Red).unwrap(), "\"red\"");
        let cell: Cell = serde_json::from_str("\"yellow\"").unwrap();
        assert_eq!(cell, Cell::Yellow);
    }

    #[test]
    fn test_display_renders_rows() {
        let board = Board::new().with_cell(5, 0, Cell::Red).with_cell(5, 1, Cell::Yellow);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS);
        assert_eq!(lines[0], ".......");
        assert_eq!(lines[5], "RY.....");
    }
}

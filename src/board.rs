//! Playfield grid: cell storage, collision checks and line compaction

use crate::error::BoardError;
use crate::piece::Position;
use ratatui::style::Color;

/// Fixed playfield dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
/// Rows at the top of the grid reserved for spawning. A piece that locks
/// entirely inside this margin tops the game out.
pub const TOP_MARGIN: usize = 1;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Why a candidate block position was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Column outside `[0, width)` or row at/below the floor
    OutOfBounds,
    /// Target cell already holds a locked block
    Occupied,
}

type Row = [Cell; BOARD_WIDTH];

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    fn index(&self, row: i32, col: i32) -> Result<(usize, usize), BoardError> {
        if row < 0 || col < 0 || row as usize >= BOARD_HEIGHT || col as usize >= BOARD_WIDTH {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                width: BOARD_WIDTH,
                height: BOARD_HEIGHT,
            });
        }
        Ok((row as usize, col as usize))
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        self.index(row, col).ok().map(|(r, c)| self.cells[r][c])
    }

    /// Whether the cell at (row, col) holds a locked block
    #[allow(dead_code)]
    pub fn is_occupied(&self, row: i32, col: i32) -> Result<bool, BoardError> {
        let (r, c) = self.index(row, col)?;
        Ok(self.cells[r][c].is_filled())
    }

    /// Fill the cell at (row, col) with a color
    pub fn occupy(&mut self, row: i32, col: i32, color: Color) -> Result<(), BoardError> {
        let (r, c) = self.index(row, col)?;
        self.cells[r][c] = Cell::Filled(color);
        Ok(())
    }

    /// Remove a row, shifting every row above it down by one and
    /// inserting an empty row at the top
    #[allow(dead_code)]
    pub fn clear_row(&mut self, row: i32) -> Result<(), BoardError> {
        let (r, _) = self.index(row, 0)?;
        self.cells.copy_within(0..r, 1);
        self.cells[0] = [Cell::Empty; BOARD_WIDTH];
        Ok(())
    }

    /// Check whether a single block may sit at (row, col).
    ///
    /// Rows above the grid (negative) are the hidden spawn region and
    /// always count as free.
    pub fn check_position(&self, row: i32, col: i32) -> Result<(), Collision> {
        if col < 0 || col >= BOARD_WIDTH as i32 || row >= BOARD_HEIGHT as i32 {
            return Err(Collision::OutOfBounds);
        }
        if row < 0 {
            return Ok(());
        }
        if self.cells[row as usize][col as usize].is_filled() {
            return Err(Collision::Occupied);
        }
        Ok(())
    }

    /// Check a full set of block positions, reporting the first rejection
    pub fn check_blocks(&self, blocks: &[Position]) -> Result<(), Collision> {
        blocks
            .iter()
            .try_for_each(|pos| self.check_position(pos.row, pos.col))
    }

    /// Check if a set of block positions are all valid
    pub fn are_positions_valid(&self, blocks: &[Position]) -> bool {
        self.check_blocks(blocks).is_ok()
    }

    /// Lock a piece onto the board
    pub fn lock_piece(&mut self, blocks: &[Position], color: Color) -> Result<(), BoardError> {
        // Validate everything first so a bad block never leaves a partial lock
        for pos in blocks {
            self.index(pos.row, pos.col)?;
        }
        for pos in blocks {
            self.occupy(pos.row, pos.col, color)?;
        }
        Ok(())
    }

    /// Clear completed lines and return the number cleared.
    ///
    /// Scans bottom to top with a write cursor: rows that are not full are
    /// copied down to the cursor, full rows are dropped. Everything above the
    /// final cursor becomes empty.
    pub fn clear_lines(&mut self) -> usize {
        let mut lines_cleared = 0;
        let mut write_row = BOARD_HEIGHT;

        for read_row in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(read_row) {
                lines_cleared += 1;
            } else {
                write_row -= 1;
                if write_row != read_row {
                    self.cells[write_row] = self.cells[read_row];
                }
            }
        }

        for row in &mut self.cells[..write_row] {
            *row = [Cell::Empty; BOARD_WIDTH];
        }

        lines_cleared
    }

    /// Check if a line is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells
            .get(row)
            .is_some_and(|cells| cells.iter().all(Cell::is_filled))
    }

    /// Number of filled cells on the whole board
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_filled()).count())
            .sum()
    }

    /// Check if the board is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(Cell::is_empty))
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
    }

    /// Rows from top to bottom, for rendering
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, row: i32, color: Color) {
        for col in 0..BOARD_WIDTH as i32 {
            board.occupy(row, col, color).unwrap();
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_occupy_and_query() {
        let mut board = Board::new();
        board.occupy(5, 5, Color::Red).unwrap();
        assert_eq!(board.is_occupied(5, 5), Ok(true));
        assert_eq!(board.is_occupied(5, 6), Ok(false));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(Color::Red)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(BOARD_HEIGHT as i32, 0), None);
        assert!(matches!(
            board.is_occupied(0, BOARD_WIDTH as i32),
            Err(BoardError::OutOfBounds { .. })
        ));
        assert!(board.occupy(-1, 0, Color::Red).is_err());
        assert!(board.clear_row(BOARD_HEIGHT as i32).is_err());
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_row_shifts_rows_above() {
        let mut board = Board::new();
        fill_row(&mut board, 19, Color::Cyan);
        board.occupy(18, 2, Color::Red).unwrap();
        board.occupy(10, 7, Color::Green).unwrap();
        let before = board.occupied_count();

        board.clear_row(19).unwrap();

        assert_eq!(board.occupied_count(), before - BOARD_WIDTH);
        assert_eq!(board.get(19, 2), Some(Cell::Filled(Color::Red)));
        assert_eq!(board.get(11, 7), Some(Cell::Filled(Color::Green)));
        assert!(board.get(0, 0).unwrap().is_empty());
        assert!(board.get(18, 2).unwrap().is_empty());
    }

    #[test]
    fn test_clear_top_row() {
        let mut board = Board::new();
        fill_row(&mut board, 0, Color::Cyan);
        board.clear_row(0).unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn test_check_position() {
        let mut board = Board::new();
        board.occupy(3, 3, Color::Blue).unwrap();
        assert_eq!(board.check_position(3, 3), Err(Collision::Occupied));
        assert_eq!(board.check_position(0, -1), Err(Collision::OutOfBounds));
        assert_eq!(board.check_position(0, 10), Err(Collision::OutOfBounds));
        assert_eq!(board.check_position(20, 0), Err(Collision::OutOfBounds));
        // hidden spawn rows above the grid are free
        assert_eq!(board.check_position(-2, 4), Ok(()));
        assert_eq!(board.check_position(19, 9), Ok(()));
    }

    #[test]
    fn test_lock_piece_is_all_or_nothing() {
        let mut board = Board::new();
        let blocks = [
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(-1, 1),
            Position::new(0, 2),
        ];
        assert!(board.lock_piece(&blocks, Color::Red).is_err());
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::new();
        fill_row(&mut board, 19, Color::Cyan);
        board.occupy(18, 0, Color::Red).unwrap();

        let cleared = board.clear_lines();
        assert_eq!(cleared, 1);
        // The block from row 18 should now be on row 19
        assert_eq!(board.get(19, 0), Some(Cell::Filled(Color::Red)));
        assert!(board.get(18, 0).unwrap().is_empty());
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_clear_lines_keeps_order_of_remaining_rows() {
        let mut board = Board::new();
        // interleave full rows with marker rows
        board.occupy(14, 0, Color::Red).unwrap();
        fill_row(&mut board, 15, Color::Cyan);
        board.occupy(16, 1, Color::Green).unwrap();
        fill_row(&mut board, 17, Color::Cyan);
        fill_row(&mut board, 18, Color::Cyan);
        board.occupy(19, 2, Color::Blue).unwrap();

        assert_eq!(board.clear_lines(), 3);
        assert_eq!(board.occupied_count(), 3);
        assert_eq!(board.get(19, 2), Some(Cell::Filled(Color::Blue)));
        assert_eq!(board.get(18, 1), Some(Cell::Filled(Color::Green)));
        assert_eq!(board.get(17, 0), Some(Cell::Filled(Color::Red)));
        assert!((0..17).all(|row| !board.is_row_full(row)));
    }

    #[test]
    fn test_clear_lines_without_full_rows() {
        let mut board = Board::new();
        for col in 0..BOARD_WIDTH as i32 - 1 {
            board.occupy(19, col, Color::Red).unwrap();
        }
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board.occupied_count(), BOARD_WIDTH - 1);
    }
}

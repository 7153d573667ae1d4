//! Active falling piece logic

use crate::board::Board;
use crate::tetromino::TetrominoType;
use ratatui::style::Color;

/// Column of the spawn anchor; shape offsets are added to (0, SPAWN_COL)
pub const SPAWN_COL: i32 = 3;

/// A block position in grid units. Row 0 is the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Color the blocks take when locked
    pub color: Color,
    /// Absolute positions of the 4 blocks
    blocks: [Position; 4],
}

impl Piece {
    /// Create a new piece at the spawn anchor
    pub fn spawn(piece_type: TetrominoType, color: Color) -> Self {
        let blocks = piece_type
            .offsets()
            .map(|(dr, dc)| Position::new(dr, SPAWN_COL + dc));
        Self {
            piece_type,
            color,
            blocks,
        }
    }

    /// Get the absolute positions of all 4 blocks
    pub fn blocks(&self) -> [Position; 4] {
        self.blocks
    }

    /// Whether a block of this piece sits at (row, col)
    pub fn occupies(&self, row: i32, col: i32) -> bool {
        self.blocks.contains(&Position::new(row, col))
    }

    fn translated(&self, dr: i32, dc: i32) -> [Position; 4] {
        self.blocks.map(|p| Position::new(p.row + dr, p.col + dc))
    }

    /// Block positions after a quarter turn about the pivot block.
    ///
    /// With x = col and y = row: x' = px - (y - py), y' = py + (x - px).
    /// Since rows grow downward this turns the piece clockwise on screen.
    fn rotated(&self) -> [Position; 4] {
        let Some(pivot) = self.piece_type.pivot().map(|i| self.blocks[i]) else {
            return self.blocks;
        };
        self.blocks.map(|p| {
            Position::new(
                pivot.row + (p.col - pivot.col),
                pivot.col - (p.row - pivot.row),
            )
        })
    }

    /// Validate a candidate and commit it. On rejection nothing changes.
    fn try_commit(&mut self, candidate: [Position; 4], board: &Board, what: &str) -> bool {
        match board.check_blocks(&candidate) {
            Ok(()) => {
                self.blocks = candidate;
                true
            }
            Err(reason) => {
                tracing::trace!(piece = self.piece_type.name(), ?reason, "{} rejected", what);
                false
            }
        }
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_commit(self.translated(0, -1), board, "move left")
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_commit(self.translated(0, 1), board, "move right")
    }

    /// Try to move down one row, returns true if successful
    pub fn soft_drop(&mut self, board: &Board) -> bool {
        self.try_commit(self.translated(1, 0), board, "soft drop")
    }

    /// Try to rotate a quarter turn about the pivot block
    pub fn rotate(&mut self, board: &Board) -> bool {
        self.try_commit(self.rotated(), board, "rotate")
    }

    /// Hard drop - move down as far as possible and return distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.soft_drop(board) {
            distance += 1;
        }
        distance
    }

    /// Where the piece would come to rest if dropped now
    pub fn ghost_blocks(&self, board: &Board) -> [Position; 4] {
        let mut ghost = self.blocks;
        loop {
            let next = ghost.map(|p| Position::new(p.row + 1, p.col));
            if !board.are_positions_valid(&next) {
                return ghost;
            }
            ghost = next;
        }
    }

    /// Whether every block lies inside the visible grid
    pub fn is_within_bounds(&self, board: &Board) -> bool {
        self.blocks
            .iter()
            .all(|p| board.get(p.row, p.col).is_some())
    }
}

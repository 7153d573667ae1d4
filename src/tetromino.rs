//! Tetromino catalog: the seven shapes and the block color palette
//!
//! Shapes are given in grid units as (row, col) offsets from the spawn
//! anchor. Row increases downward, col increases rightward.

use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // long bar
    O, // square
    T, // T-shape
    S, // S-shape
    Z, // Z-shape
    J, // J-shape
    L, // L-shape
}

/// Colors a spawned piece may take, picked independently of its shape
pub const PALETTE: [Color; 7] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::Rgb(255, 165, 0), // Orange
];

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::J,
        TetrominoType::L,
    ];

    /// Block offsets at spawn orientation
    //
    //  I: ####    O: .##.    T: ###    S: .##    Z: ##.    J: #..    L: ..#
    //                .##.       .#.       ##.       .##       ###       ###
    pub fn offsets(&self) -> [(i32, i32); 4] {
        match self {
            TetrominoType::I => [(0, 0), (0, 1), (0, 2), (0, 3)],
            TetrominoType::O => [(0, 1), (0, 2), (1, 1), (1, 2)],
            TetrominoType::T => [(0, 0), (0, 1), (0, 2), (1, 1)],
            TetrominoType::S => [(0, 1), (0, 2), (1, 0), (1, 1)],
            TetrominoType::Z => [(0, 0), (0, 1), (1, 1), (1, 2)],
            TetrominoType::J => [(0, 0), (1, 0), (1, 1), (1, 2)],
            TetrominoType::L => [(0, 2), (1, 0), (1, 1), (1, 2)],
        }
    }

    /// Index into `offsets()` of the block the piece rotates about.
    /// The square has none and never rotates.
    pub fn pivot(&self) -> Option<usize> {
        match self {
            TetrominoType::O => None,
            TetrominoType::I | TetrominoType::T => Some(1),
            TetrominoType::S => Some(3),
            TetrominoType::Z | TetrominoType::J | TetrominoType::L => Some(2),
        }
    }

    /// Display name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::O => "O",
            TetrominoType::T => "T",
            TetrominoType::S => "S",
            TetrominoType::Z => "Z",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
        }
    }
}

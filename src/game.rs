//! Core game state and logic

use crate::board::{Board, TOP_MARGIN};
use crate::gravity::Gravity;
use crate::piece::Piece;
use crate::score::{clear_name, Score};
use crate::tetromino::{TetrominoType, PALETTE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Pause,
    Quit,
}

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to move (paused, game over)
    Idle,
    /// The piece fell one row
    Fell,
    /// The piece locked and a new one spawned
    Locked { lines: usize, points: u64 },
    /// The lock topped the game out
    GameOver { final_score: u64 },
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopOut {
    /// Locked with a block above the visible grid
    BlockOut,
    /// Locked entirely inside the spawn margin
    LockOut,
    /// The next piece overlaps locked blocks
    SpawnBlocked,
}

/// The main game struct
pub struct Game {
    /// The game board
    pub board: Board,
    /// Current falling piece
    pub current_piece: Option<Piece>,
    /// Score tracking
    pub score: Score,
    /// Current game state
    pub state: GameState,
    /// Score of the game that just ended, shown on the game over screen
    pub final_score: Option<u64>,
    /// Last clear text to display
    pub last_action: Option<&'static str>,
    gravity: Gravity,
    rng: ChaCha8Rng,
}

impl Game {
    /// Create a new game with a random seed
    pub fn new(rows_per_second: f64) -> Self {
        Self::with_seed(rand::random(), rows_per_second)
    }

    /// Create a new game whose piece sequence is fixed by `seed`
    pub fn with_seed(seed: u64, rows_per_second: f64) -> Self {
        let mut game = Self {
            board: Board::new(),
            current_piece: None,
            score: Score::new(),
            state: GameState::Playing,
            final_score: None,
            last_action: None,
            gravity: Gravity::new(rows_per_second, Instant::now()),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        game.current_piece = Some(game.next_piece());
        debug!(
            seed,
            gravity_ms = game.gravity.interval().as_millis() as u64,
            "new game"
        );
        game
    }

    /// Pick a uniformly random shape and color
    fn next_piece(&mut self) -> Piece {
        let shape = TetrominoType::ALL[self.rng.gen_range(0..TetrominoType::ALL.len())];
        let color = PALETTE[self.rng.gen_range(0..PALETTE.len())];
        Piece::spawn(shape, color)
    }

    /// Process an action. Only a hard drop can lock the piece, so every
    /// other action reports `Idle`.
    pub fn process_action(&mut self, action: Action) -> TickOutcome {
        match self.state {
            GameState::Paused => {
                if action == Action::Pause {
                    self.state = GameState::Playing;
                    self.gravity.reset(Instant::now());
                }
            }
            GameState::Playing => match action {
                Action::MoveLeft => self.with_piece(Piece::move_left),
                Action::MoveRight => self.with_piece(Piece::move_right),
                Action::Rotate => self.with_piece(Piece::rotate),
                Action::SoftDrop => self.soft_drop(),
                Action::HardDrop => return self.hard_drop(),
                Action::Pause => self.state = GameState::Paused,
                Action::Quit => {}
            },
            GameState::GameOver => {
                // No actions, handled by main loop
            }
        }
        TickOutcome::Idle
    }

    fn with_piece(&mut self, apply: fn(&mut Piece, &Board) -> bool) {
        if let Some(piece) = &mut self.current_piece {
            apply(piece, &self.board);
        }
    }

    fn soft_drop(&mut self) {
        if let Some(piece) = &mut self.current_piece {
            if piece.soft_drop(&self.board) {
                self.gravity.reset(Instant::now());
            }
        }
    }

    fn hard_drop(&mut self) -> TickOutcome {
        let Some(piece) = &mut self.current_piece else {
            return TickOutcome::Idle;
        };
        let distance = piece.hard_drop(&self.board);
        debug!(distance, "hard drop");
        self.lock_piece()
    }

    /// Advance gravity if a fall step is due (call every frame)
    pub fn update(&mut self, now: Instant) -> TickOutcome {
        if self.state != GameState::Playing || !self.gravity.due(now) {
            return TickOutcome::Idle;
        }
        self.gravity.reset(now);
        self.tick()
    }

    /// One gravity step: fall a row, or lock when the fall is blocked
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != GameState::Playing {
            return TickOutcome::Idle;
        }
        let Some(piece) = &mut self.current_piece else {
            return TickOutcome::Idle;
        };
        if piece.soft_drop(&self.board) {
            return TickOutcome::Fell;
        }
        self.lock_piece()
    }

    /// Lock the current piece, clear lines and spawn the next
    fn lock_piece(&mut self) -> TickOutcome {
        let Some(piece) = self.current_piece.take() else {
            return TickOutcome::Idle;
        };
        let blocks = piece.blocks();

        if blocks.iter().any(|p| p.row < 0) {
            return self.game_over(TopOut::BlockOut);
        }
        if blocks.iter().all(|p| (p.row as usize) < TOP_MARGIN) {
            return self.game_over(TopOut::LockOut);
        }

        if let Err(err) = self.board.lock_piece(&blocks, piece.color) {
            // validation keeps pieces on the board, so this is a logic bug
            warn!(%err, "lock outside the board");
            return self.game_over(TopOut::BlockOut);
        }

        let lines = self.board.clear_lines();
        let points = self.score.add_clear(lines);
        self.last_action = clear_name(lines);
        debug!(
            piece = piece.piece_type.name(),
            lines,
            points,
            total = self.score.points,
            occupied = self.board.occupied_count(),
            "piece locked"
        );

        let next = self.next_piece();
        if !next.is_within_bounds(&self.board) || !self.board.are_positions_valid(&next.blocks()) {
            return self.game_over(TopOut::SpawnBlocked);
        }
        debug!(piece = next.piece_type.name(), "spawned");
        self.current_piece = Some(next);
        self.gravity.reset(Instant::now());

        TickOutcome::Locked { lines, points }
    }

    /// Clear the board and zero the running score. The final score goes
    /// out in the outcome for the caller to persist.
    fn game_over(&mut self, reason: TopOut) -> TickOutcome {
        let final_score = self.score.points;
        info!(?reason, final_score, lines = self.score.lines, "game over");

        self.board.reset();
        self.current_piece = None;
        self.final_score = Some(final_score);
        self.score.reset();
        self.last_action = None;
        self.state = GameState::GameOver;

        TickOutcome::GameOver { final_score }
    }

    /// Start the next game on the same board and RNG
    pub fn restart(&mut self) {
        self.board.reset();
        self.score.reset();
        self.final_score = None;
        self.last_action = None;
        self.current_piece = Some(self.next_piece());
        self.state = GameState::Playing;
        self.gravity.reset(Instant::now());
    }
}

//! BLOCKFALL - a falling-block puzzle for the terminal
//!
//! Finished games are recorded in a local SQLite database.

mod board;
mod error;
mod game;
mod gravity;
mod input;
mod piece;
mod score;
mod settings;
mod store;
mod tetromino;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Action, Game, GameState, TickOutcome};
use input::KeyBindings;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use store::{ScoreRecord, ScoreStore};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// How many past results the start screen lists
const TOP_SCORES_SHOWN: usize = 5;

/// Input delay after game over to prevent accidental restarts
const GAME_OVER_INPUT_DELAY: Duration = Duration::from_secs(1);

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about)]
struct Args {
    /// Seed for the piece sequence (random when omitted)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Score database file (overrides settings and the platform default)
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip the start screen
    #[arg(long)]
    no_intro: bool,
}

/// Which screen the loop is driving
enum Screen {
    Intro,
    Playing,
}

/// Everything the driver loop needs, built once in `main`
struct App {
    game: Game,
    bindings: KeyBindings,
    settings: Settings,
    store: Option<ScoreStore>,
    best: Option<u64>,
    top_scores: Vec<ScoreRecord>,
    screen: Screen,
    game_over_time: Option<Instant>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let session_id: u32 = rand::random();

    // Log to a file in the temp dir; the terminal belongs to the UI
    let log_dir = std::env::temp_dir().join("blockfall");
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockfall=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let store = open_store(args.database.as_ref().or(settings.storage.database.as_ref()));
    let top_scores = match store.as_ref().map(|store| store.top_scores(TOP_SCORES_SHOWN)) {
        Some(Ok(top)) => top,
        Some(Err(e)) => {
            tracing::warn!("Could not read past scores: {}", e);
            Vec::new()
        }
        None => Vec::new(),
    };
    let best = store.as_ref().and_then(|store| match store.best_score() {
        Ok(best) => best,
        Err(e) => {
            tracing::warn!("Could not read best score: {}", e);
            None
        }
    });

    let rows_per_second = settings.gameplay.gravity_rows_per_second;
    let game = match args.seed {
        Some(seed) => Game::with_seed(seed, rows_per_second),
        None => Game::new(rows_per_second),
    };
    let mut app = App {
        game,
        bindings: KeyBindings::from_settings(&settings),
        settings,
        store,
        best,
        top_scores,
        screen: if args.no_intro { Screen::Playing } else { Screen::Intro },
        game_over_time: None,
    };

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    match &result {
        Ok(()) => {
            println!("\nThanks for playing BLOCKFALL!");
            println!(
                "Final Score: {} | Lines: {}",
                app.game.final_score.unwrap_or(app.game.score.points),
                app.game.score.lines
            );
            if let Some(best) = app.best {
                println!("Best: {}", best);
            }
        }
        Err(e) => tracing::error!("Exiting on error: {}", e),
    }
    tracing::info!("BLOCKFALL shutting down");

    result?;
    Ok(())
}

/// Open the score database. Any failure leaves the game running without
/// persistence.
fn open_store(path: Option<&PathBuf>) -> Option<ScoreStore> {
    let path = match path {
        Some(path) => path.clone(),
        None => match ScoreStore::default_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Scores will not be saved: {}", e);
                return None;
            }
        },
    };
    match ScoreStore::open(&path) {
        Ok(store) => {
            tracing::info!("Score database at {}", path.display());
            Some(store)
        }
        Err(e) => {
            tracing::warn!("Scores will not be saved, could not open {}: {}", path.display(), e);
            None
        }
    }
}

/// Record a finished game's score. Failures are logged and swallowed.
fn save_final_score(store: Option<&ScoreStore>, score: u64) -> bool {
    let Some(store) = store else {
        tracing::debug!(score, "no score database, result dropped");
        return false;
    };
    match store.record_score(score) {
        Ok(()) => {
            tracing::info!(score, "score recorded");
            true
        }
        Err(e) => {
            tracing::warn!(score, "Failed to record score: {}", e);
            false
        }
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        // Render
        terminal.draw(|frame| match app.screen {
            Screen::Intro => ui::render_intro(frame, &app.top_scores),
            Screen::Playing => ui::render_game(frame, &app.game, &app.settings, app.best),
        })?;

        // Handle input
        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                let action = input::action_for_event(&app.bindings, key);
                match app.screen {
                    Screen::Intro => match action {
                        Some(Action::Quit) => return Ok(()),
                        _ if key.kind == event::KeyEventKind::Press => {
                            app.screen = Screen::Playing;
                            app.game.restart();
                        }
                        _ => {}
                    },
                    Screen::Playing if app.game.state == GameState::GameOver => {
                        if action == Some(Action::Quit) {
                            return Ok(());
                        }
                        let waited = app
                            .game_over_time
                            .is_none_or(|t| t.elapsed() >= GAME_OVER_INPUT_DELAY);
                        if waited && key.kind == event::KeyEventKind::Press {
                            app.game_over_time = None;
                            app.game.restart();
                        }
                    }
                    Screen::Playing => match action {
                        Some(Action::Quit) => return Ok(()),
                        Some(action) => {
                            let outcome = app.game.process_action(action);
                            app.on_outcome(outcome);
                        }
                        None => {}
                    },
                }
            }
        }

        if matches!(app.screen, Screen::Playing) {
            let outcome = app.game.update(Instant::now());
            app.on_outcome(outcome);
        }
    }
}

impl App {
    /// React to a lock or game over reported by the core
    fn on_outcome(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Locked { lines, points } if lines > 0 => {
                tracing::debug!(lines, points, "lines cleared");
            }
            TickOutcome::GameOver { final_score } => {
                self.game_over_time = Some(Instant::now());
                save_final_score(self.store.as_ref(), final_score);
                if self.best.is_none_or(|best| final_score > best) {
                    self.best = Some(final_score);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["blockfall", "--seed", "9", "--no-intro"]);
        assert_eq!(args.seed, Some(9));
        assert!(args.no_intro);
        assert!(args.database.is_none());
    }

    #[test]
    fn test_save_without_store_is_tolerated() {
        assert!(!save_final_score(None, 500));
    }

    #[test]
    fn test_save_records_score() {
        let store = ScoreStore::open_in_memory().unwrap();
        assert!(save_final_score(Some(&store), 700));
        assert_eq!(store.best_score().unwrap(), Some(700));
    }

    fn app_with(store: Option<ScoreStore>) -> App {
        let settings = Settings::default();
        App {
            game: Game::with_seed(1, 1.0),
            bindings: KeyBindings::from_settings(&settings),
            settings,
            store,
            best: None,
            top_scores: Vec::new(),
            screen: Screen::Playing,
            game_over_time: None,
        }
    }

    #[test]
    fn test_game_over_records_score_and_best() {
        let mut app = app_with(Some(ScoreStore::open_in_memory().unwrap()));
        app.on_outcome(TickOutcome::GameOver { final_score: 700 });
        assert_eq!(app.best, Some(700));
        assert!(app.game_over_time.is_some());
        let store = app.store.as_ref().unwrap();
        assert_eq!(store.best_score().unwrap(), Some(700));

        // a lower score is recorded but does not replace the best
        app.on_outcome(TickOutcome::GameOver { final_score: 300 });
        assert_eq!(app.best, Some(700));
        assert_eq!(app.store.as_ref().unwrap().top_scores(5).unwrap().len(), 2);
    }

    #[test]
    fn test_locks_do_not_touch_store() {
        let mut app = app_with(Some(ScoreStore::open_in_memory().unwrap()));
        app.on_outcome(TickOutcome::Locked { lines: 2, points: 300 });
        assert_eq!(app.best, None);
        assert_eq!(app.store.as_ref().unwrap().best_score().unwrap(), None);
    }

    #[test]
    fn test_unopenable_store_is_none() {
        // a directory cannot be opened as a database file
        let dir = std::env::temp_dir();
        assert!(open_store(Some(&dir)).is_none());
    }
}

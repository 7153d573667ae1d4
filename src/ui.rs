//! Terminal UI rendering with ratatui

use crate::board::{Cell, BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{Game, GameState};
use crate::piece::Position;
use crate::settings::Settings;
use crate::store::ScoreRecord;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Board is 2 terminal columns per cell plus borders, stats panel beside it
const BOARD_COLS: u16 = BOARD_WIDTH as u16 * 2 + 2;
const STATS_COLS: u16 = 18;
const GAME_WIDTH: u16 = BOARD_COLS + STATS_COLS;
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

/// Background behind the playfield
const BACKGROUND: Color = Color::Rgb(36, 9, 53);

/// Render the start screen shown before the first game
pub fn render_intro(frame: &mut Frame, top_scores: &[ScoreRecord]) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BACKGROUND)), area);

    let intro_area = center_rect(area, 44, 14 + top_scores.len() as u16);
    let mut lines = vec![
        Line::styled("█▀▄ █   █▀█ █▀▀ █▄▀ █▀▀ ▄▀█ █   █  ", Style::default().fg(Color::Cyan)),
        Line::styled("█▄█ █▄▄ █▄█ █▄▄ █ █ █▀  █▀█ █▄▄ █▄▄", Style::default().fg(Color::Cyan)),
        Line::raw(""),
        Line::styled("Welcome to BLOCKFALL", Style::default().fg(Color::White).bold()),
        Line::raw(""),
    ];
    if !top_scores.is_empty() {
        lines.push(Line::styled("TOP SCORES", Style::default().fg(Color::Gray)));
        for (rank, record) in top_scores.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{}. ", rank + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:>7}", record.score),
                    Style::default().fg(Color::Yellow).bold(),
                ),
                Span::styled(
                    format!("  {}", record.recorded_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "←→ Move  ↑ Rotate  ↓ Drop  Space Hard drop",
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press any key to start, q to quit",
        Style::default().fg(Color::Gray),
    ));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, intro_area);
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings, best: Option<u64>) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BACKGROUND)), area);

    // Center the game area
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // board | stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BOARD_COLS), Constraint::Length(STATS_COLS)])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);
    render_stats(frame, main_layout[1], game, best);

    // Overlays
    match game.state {
        GameState::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        GameState::GameOver => {
            let subtitle = match game.final_score {
                Some(score) => format!("Score {}  -  any key", score),
                None => "Press any key".to_string(),
            };
            render_overlay(frame, area, "GAME OVER", &subtitle);
        }
        GameState::Playing => {}
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let piece = game.current_piece.as_ref();
    let ghost: Option<[Position; 4]> = piece
        .filter(|_| settings.visual.show_ghost)
        .map(|piece| piece.ghost_blocks(&game.board));

    let lines: Vec<Line> = game
        .board
        .rows()
        .enumerate()
        .map(|(row, cells)| {
            let row = row as i32;
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let col = col as i32;
                    if let Some(piece) = piece.filter(|p| p.occupies(row, col)) {
                        Span::styled(block_char, Style::default().fg(piece.color))
                    } else if let Some(piece) = piece.filter(|_| {
                        ghost.is_some_and(|g| g.contains(&Position::new(row, col)))
                    }) {
                        Span::styled(ghost_char, Style::default().fg(piece.color).dim())
                    } else {
                        match cell {
                            Cell::Filled(color) => {
                                Span::styled(block_char, Style::default().fg(*color))
                            }
                            Cell::Empty => Span::raw(EMPTY),
                        }
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game, best: Option<u64>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            game.score.points.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            game.score.lines.to_string(),
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        Line::from(Span::styled("BEST", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            best.map_or_else(|| "-".to_string(), |b| b.to_string()),
            Style::default().fg(Color::Cyan),
        )),
    ];

    // Show last clear if any
    if let Some(action) = game.last_action {
        lines.push(Line::raw(""));
        lines.push(Line::styled(action, Style::default().fg(Color::Magenta).bold()));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 30u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

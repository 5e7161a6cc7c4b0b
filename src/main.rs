use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};

use blockfall::board::{CellState, COLS, ROWS};
use blockfall::config::Config;
use blockfall::controller::GameController;
use blockfall::event_log::EventLog;
use blockfall::game::{Game, GameStatus};
use blockfall::input::{map_key, should_quit};
use blockfall::piece::{Rgb, TetrominoType};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";

// How long to wait for input while gravity is stopped.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn tetromino_color(t: TetrominoType) -> Color {
    let Rgb(r, g, b) = t.color();
    Color::Rgb(r, g, b)
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game) {
    let area = frame.size();

    render_game(frame, game, area);
    match game.status() {
        GameStatus::Playing => {}
        GameStatus::NotStarted => render_popup(
            frame,
            area,
            " Tetris ",
            vec![
                Line::from(""),
                Line::from(Span::styled("READY", Style::default().fg(Color::Cyan))),
                Line::from(""),
                hint("Press Enter to start"),
                hint("Press Q to quit"),
            ],
        ),
        GameStatus::Paused => render_popup(
            frame,
            area,
            " Paused ",
            vec![
                Line::from(""),
                Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
                Line::from(""),
                hint("Press P to continue"),
                hint("Press Q to quit"),
            ],
        ),
        GameStatus::GameOver => render_popup(
            frame,
            area,
            " Game Over ",
            vec![
                Line::from(""),
                Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(format!("Score: {}", game.score())),
                Line::from(format!("Lines: {}", game.lines())),
                Line::from(format!("Level: {}", game.level())),
                Line::from(""),
                hint("Enter: new game"),
                hint("Q: quit"),
            ],
        ),
    }
}

fn hint(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn render_game(frame: &mut Frame, game: &Game, area: Rect) {
    let grid_display_width = (COLS as u16 * CELL_WIDTH) + 2;
    let grid_display_height = ROWS as u16 + 2;
    let preview_width = 12;
    let info_width = 14;
    let total_width = grid_display_width + preview_width + info_width + 4;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // Layout: [Grid][Next][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(preview_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_preview(frame, game, horizontal[1]);
    render_info(frame, game, horizontal[2]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→: Move | ↑: Rotate | ↓: Drop | Space: Hard drop | P/Esc: Pause | Q: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .render_grid()
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| match cell {
                    CellState::Empty => Span::raw(EMPTY_CHAR),
                    CellState::Filled(piece_type) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(tetromino_color(piece_type)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = vec![Line::from("")];

    if let Some(next_type) = game.next_piece_type() {
        let color = tetromino_color(next_type);
        for row in next_type.shape().rows() {
            let mut spans: Vec<Span> = vec![Span::raw(" ")];
            for &filled in row {
                if filled {
                    spans.push(Span::styled(BLOCK_CHAR, Style::default().fg(color)));
                } else {
                    spans.push(Span::raw(EMPTY_CHAR));
                }
            }
            lines.push(Line::from(spans));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.score())),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", game.lines())),
        Line::from(""),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(format!("{}", game.level())),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_popup(frame: &mut Frame, area: Rect, title: &'static str, text: Vec<Line<'static>>) {
    let height = text.len() as u16 + 3;
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, height, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn main() -> Result<()> {
    let config = Config::parse();

    let mut event_log = config
        .event_log
        .as_deref()
        .map(EventLog::create)
        .transpose()?;

    enable_raw_mode().context("failed to enable raw mode")?;
    stdout()
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let result = run(&config, event_log.as_mut());

    // Always try to restore terminal state.
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    if let Some(log) = event_log.as_mut() {
        log.flush()?;
    }
    result
}

fn run(
    config: &Config,
    mut event_log: Option<&mut EventLog<std::io::BufWriter<std::fs::File>>>,
) -> Result<()> {
    let backend = CrosstermBackend::new(stdout());
    let mut terminal: Terminal<CrosstermBackend<Stdout>> =
        Terminal::new(backend).context("failed to initialise terminal")?;

    let started_at = Instant::now();
    let mut controller = GameController::new(config.new_game(), started_at);

    loop {
        terminal.draw(|frame| render(frame, controller.game()))?;

        let timeout = controller
            .time_until_tick(Instant::now())
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = map_key(key.code) {
                        controller.submit(command);
                    }
                }
            }
        }

        let events = controller.advance(Instant::now());
        if let Some(log) = event_log.as_deref_mut() {
            log.record(started_at.elapsed(), &events)?;
        }
    }
}

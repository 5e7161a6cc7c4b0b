use serde::Serialize;

use crate::board::{is_valid_move, lock, Board, CellState};
use crate::piece::{Piece, PieceProvider, RandomPieceProvider, TetrominoType};
use crate::scoring::level_for_lines;

// ============================================================================
// Types
// ============================================================================

/// Zero-argument triggers accepted from the input layer and the gravity timer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
    StartNewGame,
}

/// Coarse view of the lifecycle flags, for callers that paint per screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub enum GameEvent {
    GameStarted,
    PieceSpawned(TetrominoType),
    PieceMoved,
    PieceRotated,
    HardDropped { rows: u32 },
    PieceLocked(TetrominoType),
    LinesCleared(u32),
    LevelUp(u32),
    Paused,
    Unpaused,
    GameOver,
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    board: Board,
    active: Option<Piece>,
    next: Option<TetrominoType>,
    score: u32,
    lines: u32,
    level: u32,
    game_over: bool,
    paused: bool,
    started: bool,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    /// An idle game drawing from an entropy-seeded provider. Nothing moves
    /// until `start_new_game`.
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::from_entropy()))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::seeded(seed)))
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>) -> Self {
        Self {
            board: Board::new(),
            active: None,
            next: None,
            score: 0,
            lines: 0,
            level: 1,
            game_over: false,
            paused: false,
            started: false,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    /// A running game on a prepared board with `piece` already active. The
    /// piece is not validated.
    pub fn with_board(board: Board, piece: Piece) -> Self {
        let mut game = Self::new();
        game.board = board;
        game.active = Some(piece);
        game.next = Some(game.piece_provider.next_piece());
        game.started = true;
        game
    }

    /// Replaces the piece source and redraws the lookahead from it.
    pub fn with_piece_provider(mut self, provider: Box<dyn PieceProvider>) -> Self {
        self.piece_provider = provider;
        if self.next.is_some() {
            self.next = Some(self.piece_provider.next_piece());
        }
        self
    }

    // ------------------------------------------------------------------------
    // Read-only view
    // ------------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next_piece_type(&self) -> Option<TetrominoType> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn status(&self) -> GameStatus {
        if !self.started {
            GameStatus::NotStarted
        } else if self.game_over {
            GameStatus::GameOver
        } else if self.paused {
            GameStatus::Paused
        } else {
            GameStatus::Playing
        }
    }

    /// Whether gravity should be ticking.
    pub fn gravity_active(&self) -> bool {
        self.started && !self.game_over && !self.paused
    }

    /// Locked cells with the active piece overlaid.
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        self.board.with_overlay(self.active.as_ref())
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Applies one command to completion. Returns false when the command was
    /// ignored or rejected.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::TogglePause => self.toggle_pause(),
            Command::StartNewGame => {
                self.start_new_game();
                true
            }
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    /// Moves down one row, or locks when the row below is blocked.
    pub fn soft_drop(&mut self) -> bool {
        let Some(piece) = self.movable_piece() else {
            return false;
        };
        let moved = piece.moved(0, 1);
        if is_valid_move(&moved, &self.board) {
            self.active = Some(moved);
            self.events.push(GameEvent::PieceMoved);
        } else {
            self.lock_active();
        }
        true
    }

    pub fn rotate(&mut self) -> bool {
        let Some(piece) = self.movable_piece() else {
            return false;
        };
        let rotated = piece.rotated();
        if !is_valid_move(&rotated, &self.board) {
            return false;
        }
        self.active = Some(rotated);
        self.events.push(GameEvent::PieceRotated);
        true
    }

    /// Snaps to the lowest valid row and locks in the same step.
    pub fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.movable_piece() else {
            return false;
        };
        let mut landed = piece.clone();
        let mut rows = 0;
        loop {
            let below = landed.moved(0, 1);
            if !is_valid_move(&below, &self.board) {
                break;
            }
            landed = below;
            rows += 1;
        }
        self.active = Some(landed);
        self.events.push(GameEvent::HardDropped { rows });
        self.lock_active();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if !self.started || self.game_over {
            return false;
        }
        self.paused = !self.paused;
        self.events.push(if self.paused {
            GameEvent::Paused
        } else {
            GameEvent::Unpaused
        });
        true
    }

    /// Resets board, score, lines and level, then spawns the first piece.
    pub fn start_new_game(&mut self) {
        self.board = Board::new();
        self.active = None;
        self.next = None;
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.game_over = false;
        self.paused = false;
        self.started = true;
        self.events.push(GameEvent::GameStarted);
        self.spawn_next_piece();
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn movable_piece(&self) -> Option<&Piece> {
        if self.gravity_active() {
            self.active.as_ref()
        } else {
            None
        }
    }

    fn shift(&mut self, dx: i16) -> bool {
        let Some(piece) = self.movable_piece() else {
            return false;
        };
        let moved = piece.moved(dx, 0);
        if !is_valid_move(&moved, &self.board) {
            return false;
        }
        self.active = Some(moved);
        self.events.push(GameEvent::PieceMoved);
        true
    }

    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        let outcome = lock(&self.board, &piece, self.level);
        self.board = outcome.board;
        self.events.push(GameEvent::PieceLocked(piece.tetromino_type));

        if outcome.cleared_lines > 0 {
            self.score += outcome.score_delta;
            self.lines += outcome.cleared_lines;
            self.events.push(GameEvent::LinesCleared(outcome.cleared_lines));

            let new_level = level_for_lines(self.lines);
            if new_level > self.level {
                self.level = new_level;
                self.events.push(GameEvent::LevelUp(self.level));
            }
        }

        self.spawn_next_piece();
    }

    /// Spawns the lookahead piece (or a fresh draw) and refills the
    /// lookahead. A blocked spawn ends the game with no active piece.
    fn spawn_next_piece(&mut self) {
        let next_type = match self.next.take() {
            Some(next_type) => next_type,
            None => self.piece_provider.next_piece(),
        };
        let piece = Piece::spawn(next_type);

        if !is_valid_move(&piece, &self.board) {
            self.active = None;
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
            return;
        }

        self.active = Some(piece);
        self.next = Some(self.piece_provider.next_piece());
        self.events.push(GameEvent::PieceSpawned(next_type));
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

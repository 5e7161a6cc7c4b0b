use crate::piece::{Piece, TetrominoType};
use crate::scoring::points_for;

pub const COLS: usize = 10;
pub const ROWS: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Empty,
    Filled(TetrominoType),
}

impl CellState {
    pub fn is_filled(&self) -> bool {
        matches!(self, CellState::Filled(_))
    }
}

// ============================================================================
// Board
// ============================================================================

/// Locked cells only. The active piece is never stored here until it locks.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cells: Vec<Vec<CellState>>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: vec![vec![CellState::Empty; COLS]; ROWS],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> CellState {
        self.cells[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: CellState) {
        self.cells[y][x] = cell;
    }

    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cells[y][x].is_filled()
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.cells
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.cells[y].iter().all(CellState::is_filled)
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.cells[y].iter().filter(|cell| cell.is_filled()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_filled()).count()
    }

    /// Writes the piece's in-bounds cells. Cells above row 0 are dropped.
    fn merge(&mut self, piece: &Piece) {
        let cell = CellState::Filled(piece.tetromino_type);
        for block in piece.blocks() {
            if (0..ROWS as i16).contains(&block.y) && (0..COLS as i16).contains(&block.x) {
                self.cells[block.y as usize][block.x as usize] = cell;
            }
        }
    }

    /// Removes full rows bottom-up, inserting an empty row on top for each.
    fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = ROWS;
        while y > 0 {
            if self.is_row_full(y - 1) {
                self.cells.remove(y - 1);
                self.cells.insert(0, vec![CellState::Empty; COLS]);
                cleared += 1;
                // The row above has shifted into y - 1; check it again.
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Board with the piece overlaid, for painting only.
    pub fn with_overlay(&self, piece: Option<&Piece>) -> Vec<Vec<CellState>> {
        let mut grid = self.cells.clone();
        if let Some(piece) = piece {
            for block in piece.blocks() {
                if (0..ROWS as i16).contains(&block.y) && (0..COLS as i16).contains(&block.x) {
                    grid[block.y as usize][block.x as usize] =
                        CellState::Filled(piece.tetromino_type);
                }
            }
        }
        grid
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Placement Validator
// ============================================================================

/// True when every occupied cell of `piece` is inside the walls, above the
/// floor, and not on a locked cell. Cells above the top row are only checked
/// against the walls.
pub fn is_valid_move(piece: &Piece, board: &Board) -> bool {
    piece.blocks().all(|block| {
        if block.x < 0 || block.x >= COLS as i16 || block.y >= ROWS as i16 {
            return false;
        }
        block.y < 0 || !board.is_occupied(block.x as usize, block.y as usize)
    })
}

// ============================================================================
// Lock & Clear
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LockOutcome {
    pub board: Board,
    pub cleared_lines: u32,
    pub score_delta: u32,
}

/// Merges `piece` into a copy of `board`, clears full rows and scores them
/// at `level` (the level before this lock's lines count).
pub fn lock(board: &Board, piece: &Piece, level: u32) -> LockOutcome {
    let mut board = board.clone();
    board.merge(piece);
    let cleared_lines = board.clear_full_rows();
    LockOutcome {
        board,
        cleared_lines,
        score_delta: points_for(cleared_lines, level),
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn empty_board() -> Board {
        Board::new()
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        for x in 0..COLS {
            board.set(x, y, CellState::Filled(TetrominoType::T));
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 0..COLS {
            if x != gap_x {
                board.set(x, y, CellState::Filled(TetrominoType::T));
            }
        }
    }
}

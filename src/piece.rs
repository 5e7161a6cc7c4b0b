use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::COLS;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

/// Display color of a tetromino, as 8-bit RGB.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum TetrominoType {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

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

    /// Spawn orientation of this tetromino.
    pub fn shape(&self) -> Shape {
        let rows: &[&[u8]] = match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::T => &[&[0, 1, 0], &[1, 1, 1]],
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoType::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        Shape::from_rows(rows.iter().map(|row| row.iter().map(|&c| c != 0).collect()).collect())
    }

    pub fn color(&self) -> Rgb {
        match self {
            TetrominoType::I => Rgb(0x00, 0xf0, 0xf0),
            TetrominoType::O => Rgb(0xf0, 0xf0, 0x00),
            TetrominoType::T => Rgb(0xa0, 0x00, 0xf0),
            TetrominoType::S => Rgb(0x00, 0xf0, 0x00),
            TetrominoType::Z => Rgb(0xf0, 0x00, 0x00),
            TetrominoType::J => Rgb(0x00, 0x00, 0xf0),
            TetrominoType::L => Rgb(0xf0, 0xa0, 0x00),
        }
    }

    /// Uniform draw over the seven types, with replacement.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ============================================================================
// Shape
// ============================================================================

/// Rectangular row-major occupancy matrix.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Builds a shape from rows of equal length.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Offsets `(dx, dy)` of every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(dx, _)| (dx as i16, dy as i16))
        })
    }

    /// 90° clockwise: transpose, then reverse each resulting row.
    pub fn rotated_clockwise(&self) -> Shape {
        let rows = (0..self.width())
            .map(|col| self.rows.iter().rev().map(|row| row[col]).collect())
            .collect();
        Shape { rows }
    }
}

// ============================================================================
// Piece
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub tetromino_type: TetrominoType,
    pub shape: Shape,
    pub position: Position,
}

impl Piece {
    /// A piece horizontally centered on the top row.
    pub fn spawn(tetromino_type: TetrominoType) -> Self {
        let shape = tetromino_type.shape();
        let x = (COLS / 2) as i16 - (shape.width() / 2) as i16;
        Self {
            tetromino_type,
            shape,
            position: Position { x, y: 0 },
        }
    }

    pub fn new_at(tetromino_type: TetrominoType, x: i16, y: i16) -> Self {
        Self {
            tetromino_type,
            shape: tetromino_type.shape(),
            position: Position { x, y },
        }
    }

    pub fn color(&self) -> Rgb {
        self.tetromino_type.color()
    }

    /// Board coordinates of every occupied cell.
    pub fn blocks(&self) -> impl Iterator<Item = Position> + '_ {
        let origin = self.position;
        self.shape.cells().map(move |(dx, dy)| Position {
            x: origin.x + dx,
            y: origin.y + dy,
        })
    }

    pub fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            position: Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            },
            ..self.clone()
        }
    }

    /// Same position, shape rotated clockwise. Placement is not checked.
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            ..self.clone()
        }
    }
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> TetrominoType;
}

pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed, same piece sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        TetrominoType::random(&mut self.rng)
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<TetrominoType>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<TetrominoType>) -> Self {
        assert!(!pieces.is_empty(), "sequence must contain at least one piece");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

pub const LINES_PER_LEVEL: u32 = 10;

pub const SCORE_SINGLE: u32 = 100;
pub const SCORE_DOUBLE: u32 = 300;
pub const SCORE_TRIPLE: u32 = 500;
pub const SCORE_TETRIS: u32 = 800;

const POINTS_TABLE: [u32; 5] = [0, SCORE_SINGLE, SCORE_DOUBLE, SCORE_TRIPLE, SCORE_TETRIS];

/// Points for clearing `lines` rows in one lock at `level`. Counts above four
/// score as a tetris.
pub fn points_for(lines: u32, level: u32) -> u32 {
    POINTS_TABLE[lines.min(4) as usize] * level
}

/// Level derived from the cumulative line count, starting at 1.
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

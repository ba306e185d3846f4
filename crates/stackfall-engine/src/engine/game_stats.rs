use serde::{Deserialize, Serialize};

/// Base score values for line clears, multiplied by the current level.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Lines needed to advance one level.
const LINES_PER_LEVEL: usize = 10;

/// Score, cleared lines and level of a game.
///
/// - **Score**: base points of each clear times the level it happened at
/// - **Level**: starts at 1, one more for every 10 lines cleared
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of 0, 1, 2, 3 and 4 line locks
///
/// # Example
///
/// ```
/// use stackfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new tracker at level 1 with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by number of lines they cleared.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Points a clear of `lines` is worth at the current level.
    ///
    /// Clears of more than four lines are not in the table and score nothing.
    #[must_use]
    pub const fn points_for(&self, lines: usize) -> usize {
        if lines < SCORE_TABLE.len() {
            SCORE_TABLE[lines] * self.level
        } else {
            0
        }
    }

    /// Updates statistics after a piece lock and returns the points earned.
    ///
    /// Points use the level before the clear; the level is recomputed from
    /// the new line total afterwards.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) -> usize {
        self.completed_pieces += 1;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        if cleared_lines == 0 {
            return 0;
        }

        let points = self.points_for(cleared_lines);
        self.score += points;
        self.total_cleared_lines += cleared_lines;
        self.level = self.total_cleared_lines / LINES_PER_LEVEL + 1;
        points
    }
}

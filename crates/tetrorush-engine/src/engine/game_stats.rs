/// Score values for line clears, multiplied by the level at the time of the clear.
///
/// Index corresponds to number of lines cleared simultaneously (0-5).
const SCORE_TABLE: [usize; 6] = [0, 100, 300, 500, 800, 1200];

/// Largest clear the score table knows about.
pub const MAX_SCORED_LINES: usize = SCORE_TABLE.len() - 1;

/// Number of buckets in the clear histogram: no lines, then 1 to [`MAX_SCORED_LINES`] rows.
pub const CLEAR_HISTOGRAM_LEN: usize = SCORE_TABLE.len();

/// Number of cleared lines per level.
pub const LINES_PER_LEVEL: usize = 10;

/// Points awarded per row traversed by a hard drop.
pub const HARD_DROP_POINTS_PER_ROW: usize = 2;

/// What a single lock changed in the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    pub cleared_lines: usize,
    pub points: usize,
    /// The new level, if this lock raised it.
    pub level_up: Option<usize>,
}

/// Score, level and line counters of one game.
///
/// # Scoring
///
/// - a clear of `n` rows earns `SCORE_TABLE[n] × level`, using the level before the
///   clear is counted
/// - a hard drop earns 2 points per row traversed
/// - `level = total_lines / 10 + 1`
///
/// # Example
///
/// ```
/// use tetrorush_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// let outcome = stats.record_lock(4);
///
/// assert_eq!(outcome.points, 800);
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    level: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; CLEAR_HISTOGRAM_LEN],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a tracker at level 1 with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; CLEAR_HISTOGRAM_LEN],
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

    /// Returns a histogram of locks by number of lines cleared.
    ///
    /// Index 0 counts locks that cleared nothing; clears larger than five rows are
    /// counted in the last bucket.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; CLEAR_HISTOGRAM_LEN] {
        &self.line_cleared_counter
    }

    /// Updates the statistics after a piece lock that cleared `cleared_lines` rows.
    pub fn record_lock(&mut self, cleared_lines: usize) -> ClearOutcome {
        let bucket = cleared_lines.min(MAX_SCORED_LINES);
        self.completed_pieces += 1;
        self.line_cleared_counter[bucket] += 1;

        let points = SCORE_TABLE[bucket] * self.level;
        self.score += points;
        self.total_cleared_lines += cleared_lines;

        let level = self.total_cleared_lines / LINES_PER_LEVEL + 1;
        let level_up = (level > self.level).then_some(level);
        self.level = level;

        ClearOutcome {
            cleared_lines,
            points,
            level_up,
        }
    }

    /// Awards hard-drop points for `rows` traversed and returns them.
    pub fn record_hard_drop(&mut self, rows: usize) -> usize {
        let points = rows * HARD_DROP_POINTS_PER_ROW;
        self.score += points;
        points
    }
}

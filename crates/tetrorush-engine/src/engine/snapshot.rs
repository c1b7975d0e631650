use serde::Serialize;

use crate::core::{board::Board, piece::Piece};

use super::{CLEAR_HISTOGRAM_LEN, SessionState};

/// Owned, read-only copy of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub state: SessionState,
    pub board: Board,
    pub current: Piece,
    pub next: Piece,
    pub held: Option<Piece>,
    pub can_hold: bool,
    pub score: usize,
    pub level: usize,
    pub lines: usize,
    pub completed_pieces: usize,
    pub line_cleared_counter: [usize; CLEAR_HISTOGRAM_LEN],
    pub fall_interval_ms: u64,
    pub game_over: bool,
    pub paused: bool,
}

impl GameSnapshot {
    /// Returns the hard-drop destination of the current piece.
    #[must_use]
    pub fn ghost(&self) -> Piece {
        self.current.simulate_drop_position(&self.board)
    }
}

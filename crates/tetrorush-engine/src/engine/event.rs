use serde::Serialize;

/// Number of rows in a single clear that counts as a max clear.
pub const MAX_CLEAR_LINES: usize = 4;

/// Notable things that happened inside the session, queued for the host.
///
/// Hosts drain the queue after feeding commands and ticks, and map the events to sounds,
/// status messages or persistence (the final score).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    GameStart,
    /// A player-initiated move succeeded.
    Move,
    RotateSuccess,
    HardDrop {
        rows: usize,
    },
    Lock,
    LineClear {
        lines: usize,
    },
    /// A clear of [`MAX_CLEAR_LINES`] or more rows.
    MaxClear {
        lines: usize,
    },
    LevelUp {
        level: usize,
    },
    Hold,
    Pause,
    Resume,
    /// Emitted once per transition into the game-over state.
    GameOver {
        final_score: usize,
    },
}

impl GameEvent {
    /// Returns the event for a clear of `lines` rows, or `None` when nothing was cleared.
    #[must_use]
    pub fn for_clear(lines: usize) -> Option<Self> {
        match lines {
            0 => None,
            lines if lines >= MAX_CLEAR_LINES => Some(GameEvent::MaxClear { lines }),
            lines => Some(GameEvent::LineClear { lines }),
        }
    }
}

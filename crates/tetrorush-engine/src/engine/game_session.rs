use std::time::Duration;

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{HoldError, LockError, core::board::Board};

use super::{
    Command, Direction, GameEvent, GameField, GameSnapshot, GameStats, KeyRepeat, PieceSeed,
    SessionConfig,
};

/// Lifecycle state of a [`GameSession`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::IsVariant,
    derive_more::Display,
)]
pub enum SessionState {
    /// No game has been started yet.
    Init,
    Playing,
    Paused,
    GameOver,
}

/// One player's session: a game field, its statistics and the lifecycle around them.
///
/// The session is driven entirely from outside. Commands ([`Self::apply`] or the
/// dedicated methods) act immediately, and [`Self::tick`] advances time by the elapsed
/// duration it is given. Commands issued in a state where they do not apply are ignored.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tetrorush_engine::{Command, GameEvent, GameSession, SessionState};
///
/// let mut session = GameSession::default();
/// assert_eq!(session.state(), SessionState::Init);
///
/// session.apply(Command::Start);
/// session.apply(Command::HardDrop);
/// session.tick(Duration::from_millis(16));
///
/// let snapshot = session.snapshot();
/// assert!(snapshot.score > 0);
/// assert_eq!(snapshot.completed_pieces, 1);
///
/// let events = session.drain_events();
/// assert_eq!(events[0], GameEvent::GameStart);
/// assert!(events.contains(&GameEvent::Lock));
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    field: GameField,
    stats: GameStats,
    state: SessionState,
    /// Sum of elapsed time delivered while playing. Key-repeat timestamps use this clock.
    clock: Duration,
    fall_timer: Duration,
    fall_interval: Duration,
    discard_next_elapsed: bool,
    key_repeat: KeyRepeat,
    events: Vec<GameEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let field = GameField::new(game_seed(&config));
        let fall_interval = config.fall_speed.interval(1);
        Self {
            config,
            field,
            stats: GameStats::new(),
            state: SessionState::Init,
            clock: Duration::ZERO,
            fall_timer: Duration::ZERO,
            fall_interval,
            discard_next_elapsed: false,
            key_repeat: KeyRepeat::default(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    /// Returns the events queued since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Removes and returns the queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            board: self.field.board().clone(),
            current: self.field.current(),
            next: self.field.next(),
            held: self.field.held(),
            can_hold: self.field.can_hold(),
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            completed_pieces: self.stats.completed_pieces(),
            line_cleared_counter: *self.stats.line_cleared_counter(),
            fall_interval_ms: u64::try_from(self.fall_interval.as_millis()).unwrap_or(u64::MAX),
            game_over: self.state.is_game_over(),
            paused: self.state.is_paused(),
        }
    }

    /// Starts the first game. Only valid in [`SessionState::Init`].
    pub fn start(&mut self) {
        self.start_with_board(Board::EMPTY);
    }

    /// Starts the first game on a pre-seeded board. Only valid in [`SessionState::Init`].
    ///
    /// If the first piece already collides at its spawn position the game ends
    /// immediately.
    pub fn start_with_board(&mut self, board: Board) {
        if !self.state.is_init() {
            return;
        }
        self.begin_game(board);
    }

    /// Starts a new game after game over. Only valid in [`SessionState::GameOver`].
    pub fn restart(&mut self) {
        if !self.state.is_game_over() {
            return;
        }
        self.begin_game(Board::EMPTY);
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            SessionState::Playing => {
                self.state = SessionState::Paused;
                self.key_repeat.release_all();
                self.events.push(GameEvent::Pause);
            }
            SessionState::Paused => {
                self.state = SessionState::Playing;
                self.discard_next_elapsed = true;
                self.events.push(GameEvent::Resume);
            }
            SessionState::Init | SessionState::GameOver => {}
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::Restart => self.restart(),
            Command::TogglePause => self.toggle_pause(),
            Command::Move(direction) => self.move_piece(direction),
            Command::Press(direction) => self.press(direction),
            Command::Release(direction) => self.release(direction),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::Hold => self.hold(),
        }
    }

    /// Parses and applies a text command. Unrecognized text is ignored.
    pub fn apply_text(&mut self, text: &str) {
        if let Ok(command) = text.parse() {
            self.apply(command);
        }
    }

    /// Moves the falling piece one step. A rejected downward step locks the piece.
    pub fn move_piece(&mut self, direction: Direction) {
        if !self.state.is_playing() {
            return;
        }
        self.step(direction);
    }

    /// Starts holding a direction: one immediate step, then key repeat from [`Self::tick`].
    pub fn press(&mut self, direction: Direction) {
        if !self.state.is_playing() {
            return;
        }
        if self.key_repeat.press(direction, self.clock) {
            self.step(direction);
        }
    }

    pub fn release(&mut self, direction: Direction) {
        self.key_repeat.release(direction);
    }

    pub fn rotate(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        if self.field.try_rotate().is_ok() {
            self.events.push(GameEvent::RotateSuccess);
        }
    }

    /// Drops the falling piece to the bottom, awarding 2 points per row, and locks it.
    pub fn hard_drop(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        let rows = self.field.hard_drop();
        self.stats.record_hard_drop(rows);
        self.events.push(GameEvent::HardDrop { rows });
        self.lock();
    }

    pub fn hold(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        match self.field.try_hold() {
            Ok(()) => self.events.push(GameEvent::Hold),
            Err(HoldError::HoldAlreadyUsed) => {}
            Err(HoldError::PieceCollision(_)) => {
                self.events.push(GameEvent::Hold);
                self.game_over();
            }
        }
    }

    /// Advances the session by `elapsed`. Does nothing unless playing.
    ///
    /// Held directions repeat first, then the fall timer accumulates `elapsed`; once it
    /// exceeds the fall interval it resets and the piece moves down one row, locking if
    /// it cannot. The first tick after a resume contributes no time.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.state.is_playing() {
            return;
        }
        let elapsed = if std::mem::take(&mut self.discard_next_elapsed) {
            Duration::ZERO
        } else {
            elapsed
        };
        self.clock += elapsed;

        for direction in self.key_repeat.due(self.clock, &self.config.key_repeat) {
            if !self.state.is_playing() {
                return;
            }
            self.step(direction);
        }
        if !self.state.is_playing() {
            return;
        }

        self.fall_timer += elapsed;
        if self.fall_timer > self.fall_interval {
            self.fall_timer = Duration::ZERO;
            if self.field.try_move(Direction::Down).is_err() {
                self.lock();
            }
        }
    }

    fn begin_game(&mut self, board: Board) {
        self.field = GameField::with_board(board, game_seed(&self.config));
        self.stats = GameStats::new();
        self.clock = Duration::ZERO;
        self.fall_timer = Duration::ZERO;
        self.fall_interval = self.config.fall_speed.interval(self.stats.level());
        self.discard_next_elapsed = false;
        self.key_repeat.release_all();
        self.state = SessionState::Playing;
        self.events.push(GameEvent::GameStart);

        if self.field.is_current_colliding() {
            self.game_over();
        }
    }

    fn step(&mut self, direction: Direction) {
        match self.field.try_move(direction) {
            Ok(()) => {
                if direction == Direction::Down {
                    self.fall_timer = Duration::ZERO;
                }
                self.events.push(GameEvent::Move);
            }
            Err(_) if direction == Direction::Down => self.lock(),
            Err(_) => {}
        }
    }

    fn lock(&mut self) {
        let (cleared_lines, result) = self.field.lock_piece();
        if let Err(LockError::AboveBoard) = result {
            self.game_over();
            return;
        }

        self.events.push(GameEvent::Lock);
        let outcome = self.stats.record_lock(cleared_lines);
        if let Some(event) = GameEvent::for_clear(cleared_lines) {
            self.events.push(event);
        }
        if let Some(level) = outcome.level_up {
            self.fall_interval = self.config.fall_speed.interval(level);
            self.events.push(GameEvent::LevelUp { level });
        }

        if result.is_err() {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        self.state = SessionState::GameOver;
        self.key_repeat.release_all();
        self.events.push(GameEvent::GameOver {
            final_score: self.stats.score(),
        });
    }
}

fn game_seed(config: &SessionConfig) -> PieceSeed {
    config.seed.unwrap_or_else(|| rand::rng().random())
}

//! Game rules and session state built on top of [`crate::core`].
//!
//! - [`PieceBag`] - 7-bag randomizer seeded by a [`PieceSeed`]
//! - [`GameField`] - board, falling piece, next and held pieces of one game
//! - [`GameStats`] - score, level and line counters
//! - [`KeyRepeat`] - per-direction auto-repeat timing
//! - [`GameSession`] - lifecycle state machine driven by [`Command`]s and ticks
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (state `Init`) and send [`Command::Start`]
//! 2. Feed commands from the keyboard and call [`GameSession::tick`] with the elapsed time
//! 3. Render [`GameSession::snapshot`] and drain [`GameEvent`]s for sounds and messages
//! 4. After [`GameEvent::GameOver`], send [`Command::Restart`] to play again
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tetrorush_engine::{Command, Direction, GameSession, SessionState};
//!
//! let mut session = GameSession::default();
//! session.apply(Command::Start);
//!
//! session.apply(Command::Press(Direction::Left));
//! session.tick(Duration::from_millis(300));
//! session.apply(Command::Release(Direction::Left));
//! session.apply(Command::Rotate);
//!
//! while session.state() == SessionState::Playing {
//!     session.apply(Command::HardDrop);
//! }
//! assert!(session.snapshot().game_over);
//! ```

pub use self::{
    command::*, config::*, event::*, game_field::*, game_session::*, game_stats::*,
    key_repeat::*, piece_bag::*, snapshot::*,
};

mod command;
mod config;
mod event;
mod game_field;
mod game_session;
mod game_stats;
mod key_repeat;
mod piece_bag;
mod snapshot;

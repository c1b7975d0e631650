//! Falling-block puzzle engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - board, piece shapes, collision and the transform helpers built on it
//! - [`engine`] - randomizer, scoring, hold, key repeat and the [`GameSession`] state machine
//!
//! The engine never touches the terminal, the clock or the file system. Hosts feed it
//! [`Command`]s and elapsed time, read a [`GameSnapshot`] back and drain [`GameEvent`]s.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("piece colliding when holding piece")]
    PieceCollision(PieceCollisionError),
    #[display("hold already used in this turn")]
    HoldAlreadyUsed,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum LockError {
    #[display("piece locked above the visible board")]
    AboveBoard,
    #[display("new piece colliding at spawn position")]
    SpawnCollision(PieceCollisionError),
}

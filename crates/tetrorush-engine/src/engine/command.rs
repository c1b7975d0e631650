use std::str::FromStr;

use super::Direction;

/// An input accepted by [`GameSession::apply`](super::GameSession::apply).
///
/// Commands issued in a state where they make no sense are ignored by the session.
///
/// The text form is a small, case-insensitive vocabulary:
///
/// | text | command |
/// |------|---------|
/// | `start` | [`Command::Start`] |
/// | `restart` | [`Command::Restart`] |
/// | `pause`, `toggle-pause` | [`Command::TogglePause`] |
/// | `left`, `right`, `down` | [`Command::Move`] |
/// | `press-left`, `press-right`, `press-down` | [`Command::Press`] |
/// | `release-left`, `release-right`, `release-down` | [`Command::Release`] |
/// | `rotate` | [`Command::Rotate`] |
/// | `hard-drop`, `drop` | [`Command::HardDrop`] |
/// | `hold` | [`Command::Hold`] |
///
/// ```
/// use tetrorush_engine::{Command, Direction};
///
/// assert_eq!("left".parse(), Ok(Command::Move(Direction::Left)));
/// assert_eq!(" Release-Down ".parse(), Ok(Command::Release(Direction::Down)));
/// assert!("jump".parse::<Command>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Restart,
    TogglePause,
    /// Single step in a direction, without key repeat.
    Move(Direction),
    /// Key down: one immediate step, then auto-repeat while held.
    Press(Direction),
    /// Key up: stops auto-repeat.
    Release(Direction),
    Rotate,
    HardDrop,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown command: {input:?}")]
pub struct UnknownCommandError {
    input: String,
}

impl UnknownCommandError {
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

fn parse_direction(s: &str) -> Option<Direction> {
    match s {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

impl FromStr for Command {
    type Err = UnknownCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let command = match text.as_str() {
            "start" => Some(Command::Start),
            "restart" => Some(Command::Restart),
            "pause" | "toggle-pause" => Some(Command::TogglePause),
            "rotate" => Some(Command::Rotate),
            "hard-drop" | "drop" => Some(Command::HardDrop),
            "hold" => Some(Command::Hold),
            other => {
                if let Some(dir) = other.strip_prefix("press-") {
                    parse_direction(dir).map(Command::Press)
                } else if let Some(dir) = other.strip_prefix("release-") {
                    parse_direction(dir).map(Command::Release)
                } else {
                    parse_direction(other).map(Command::Move)
                }
            }
        };
        command.ok_or_else(|| UnknownCommandError {
            input: s.to_owned(),
        })
    }
}

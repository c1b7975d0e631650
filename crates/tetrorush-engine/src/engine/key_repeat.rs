use std::time::Duration;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::KeyRepeatConfig;

/// A repeatable movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
pub enum Direction {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    #[display("down")]
    Down,
}

impl Direction {
    pub const LEN: usize = 3;
    pub const ALL: [Self; Self::LEN] = [Direction::Left, Direction::Right, Direction::Down];

    const fn index(self) -> usize {
        self as usize
    }

    /// Returns the `(dx, dy)` translation of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeldKey {
    pressed_at: Duration,
    last_fired_at: Duration,
}

/// Per-direction key-repeat tracker.
///
/// Timestamps are session clock values (the sum of elapsed time delivered to the
/// session while playing). A press fires once immediately (reported by [`Self::press`]);
/// afterwards the direction fires whenever it has been held longer than the repeat delay
/// and the last firing is more than one repeat interval ago.
///
/// ```
/// use std::time::Duration;
/// use tetrorush_engine::{Direction, KeyRepeat, KeyRepeatConfig};
///
/// let config = KeyRepeatConfig::default();
/// let ms = Duration::from_millis;
/// let mut repeat = KeyRepeat::default();
///
/// assert!(repeat.press(Direction::Left, ms(0)));
/// assert!(repeat.due(ms(250), &config).is_empty());
/// assert_eq!(repeat.due(ms(251), &config).as_slice(), &[Direction::Left]);
/// assert!(repeat.due(ms(300), &config).is_empty());
/// assert_eq!(repeat.due(ms(302), &config).as_slice(), &[Direction::Left]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRepeat {
    held: [Option<HeldKey>; Direction::LEN],
}

impl KeyRepeat {
    /// Starts holding `direction` at `now`.
    ///
    /// Returns `true` if the key was not already held, i.e. the caller should perform the
    /// immediate step.
    pub fn press(&mut self, direction: Direction, now: Duration) -> bool {
        let slot = &mut self.held[direction.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(HeldKey {
            pressed_at: now,
            last_fired_at: now,
        });
        true
    }

    pub fn release(&mut self, direction: Direction) {
        self.held[direction.index()] = None;
    }

    pub fn release_all(&mut self) {
        self.held = [None; Direction::LEN];
    }

    #[must_use]
    pub fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.index()].is_some()
    }

    /// Returns the directions that repeat at `now` and marks them as fired.
    pub fn due(
        &mut self,
        now: Duration,
        config: &KeyRepeatConfig,
    ) -> ArrayVec<Direction, { Direction::LEN }> {
        let mut due = ArrayVec::new();
        for direction in Direction::ALL {
            if let Some(key) = &mut self.held[direction.index()]
                && now.saturating_sub(key.pressed_at) > config.delay()
                && now.saturating_sub(key.last_fired_at) > config.interval()
            {
                key.last_fired_at = now;
                due.push(direction);
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_press_fires_once() {
        let mut repeat = KeyRepeat::default();
        assert!(repeat.press(Direction::Right, ms(10)));
        assert!(!repeat.press(Direction::Right, ms(20)));
        assert!(repeat.is_held(Direction::Right));
        assert!(!repeat.is_held(Direction::Left));
    }

    #[test]
    fn test_repeat_waits_for_delay_then_interval() {
        let config = KeyRepeatConfig::default();
        let mut repeat = KeyRepeat::default();
        repeat.press(Direction::Down, ms(1000));

        let fired = (1000..=1600)
            .step_by(10)
            .filter(|&t| !repeat.due(ms(t), &config).is_empty())
            .collect::<Vec<_>>();
        // Strictly more than 250 ms held, then strictly more than 50 ms apart.
        assert_eq!(fired, [1260, 1320, 1380, 1440, 1500, 1560]);
    }

    #[test]
    fn test_directions_are_tracked_independently() {
        let config = KeyRepeatConfig::default();
        let mut repeat = KeyRepeat::default();
        repeat.press(Direction::Left, ms(0));
        repeat.press(Direction::Down, ms(100));

        assert_eq!(repeat.due(ms(300), &config).as_slice(), &[Direction::Left]);
        assert_eq!(
            repeat.due(ms(360), &config).as_slice(),
            &[Direction::Left, Direction::Down]
        );
    }

    #[test]
    fn test_release_stops_repeat() {
        let config = KeyRepeatConfig::default();
        let mut repeat = KeyRepeat::default();
        repeat.press(Direction::Left, ms(0));
        repeat.press(Direction::Right, ms(0));
        repeat.release(Direction::Left);
        assert_eq!(repeat.due(ms(300), &config).as_slice(), &[Direction::Right]);

        repeat.release_all();
        assert!(repeat.due(ms(1000), &config).is_empty());
        assert!(repeat.press(Direction::Right, ms(1000)));
    }

    #[test]
    fn test_offsets() {
        assert_eq!(Direction::Left.offset(), (-1, 0));
        assert_eq!(Direction::Right.offset(), (1, 0));
        assert_eq!(Direction::Down.offset(), (0, 1));
    }
}

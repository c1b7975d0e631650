use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::PieceSeed;

/// Tunable timing constants and the optional randomizer seed for a session.
///
/// Every field has a default, so a partial JSON document deserializes into a complete
/// configuration.
///
/// ```
/// use std::time::Duration;
/// use tetrorush_engine::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{"key_repeat": {"delay_ms": 200}}"#).unwrap();
/// assert_eq!(config.key_repeat.delay(), Duration::from_millis(200));
/// assert_eq!(config.key_repeat.interval(), Duration::from_millis(50));
/// assert_eq!(config.fall_speed.interval(1), Duration::from_millis(750));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub fall_speed: FallSpeed,
    pub key_repeat: KeyRepeatConfig,
    /// Seed used for every game of the session. A fresh random seed is drawn per game
    /// when unset.
    pub seed: Option<PieceSeed>,
}

/// Gravity curve: the fall interval shrinks by `step_ms` per level down to
/// `min_interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallSpeed {
    pub initial_interval_ms: u64,
    pub step_ms: u64,
    pub min_interval_ms: u64,
}

impl Default for FallSpeed {
    fn default() -> Self {
        Self {
            initial_interval_ms: 750,
            step_ms: 40,
            min_interval_ms: 100,
        }
    }
}

impl FallSpeed {
    /// Returns the fall interval for `level` (levels start at 1).
    #[must_use]
    pub fn interval(&self, level: usize) -> Duration {
        let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
        let millis = self
            .initial_interval_ms
            .saturating_sub(steps.saturating_mul(self.step_ms))
            .max(self.min_interval_ms);
        Duration::from_millis(millis)
    }
}

/// Auto-repeat timing for held direction keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyRepeatConfig {
    /// Time a key must be held before it starts repeating.
    pub delay_ms: u64,
    /// Minimum time between two repeats.
    pub interval_ms: u64,
}

impl Default for KeyRepeatConfig {
    fn default() -> Self {
        Self {
            delay_ms: 250,
            interval_ms: 50,
        }
    }
}

impl KeyRepeatConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_interval_curve() {
        let speed = FallSpeed::default();
        assert_eq!(speed.interval(1), Duration::from_millis(750));
        assert_eq!(speed.interval(2), Duration::from_millis(710));
        assert_eq!(speed.interval(5), Duration::from_millis(590));
        assert_eq!(speed.interval(17), Duration::from_millis(110));
        assert_eq!(speed.interval(18), Duration::from_millis(100));
        assert_eq!(speed.interval(100), Duration::from_millis(100));
        assert_eq!(speed.interval(usize::MAX), Duration::from_millis(100));
    }

    #[test]
    fn test_config_json_roundtrip_with_seed() {
        let config = SessionConfig {
            seed: Some(PieceSeed::from_bytes([0xab; 16])),
            ..SessionConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("abababababababababababababababab"));
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }
}

use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the randomizer's PCG generator. The same seed always produces the
/// same piece sequence. Seeds are written as 32 lowercase hex digits, both by
/// [`Display`](fmt::Display) and by serde, and parsed back with [`FromStr`].
///
/// # Example
///
/// ```
/// use tetrorush_engine::{PieceBag, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut bag1 = PieceBag::with_seed(seed);
/// let mut bag2 = PieceBag::with_seed(seed);
/// for _ in 0..14 {
///     assert_eq!(bag1.draw(), bag2.draw());
/// }
///
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid seed: expected 32 hex characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid seed: non-hex character in {_0:?}")]
    InvalidDigit(#[error(not(source))] String),
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength(s.len()));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParsePieceSeedError::InvalidDigit(s.to_owned()));
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|_| ParsePieceSeedError::InvalidDigit(s.to_owned()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// 7-bag randomizer.
///
/// The bag holds a shuffled permutation of all seven kinds and is consumed from the
/// back. When it runs empty, a fresh shuffled permutation replaces it, so every window of
/// seven draws starting at a refill boundary contains each kind exactly once.
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    bag: ArrayVec<PieceKind, { PieceKind::LEN }>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Creates an empty bag driven by a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            bag: ArrayVec::new(),
        }
    }

    /// Replaces the bag contents with a uniformly shuffled set of all seven kinds.
    pub fn refill(&mut self) {
        let mut kinds = PieceKind::ALL;
        kinds.shuffle(&mut self.rng);
        self.bag = ArrayVec::from(kinds);
    }

    /// Draws the next piece kind, refilling the bag first if it is empty.
    pub fn draw(&mut self) -> PieceKind {
        loop {
            if let Some(kind) = self.bag.pop() {
                return kind;
            }
            self.refill();
        }
    }

    /// Returns the number of kinds left before the next refill.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([
        0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ]);

    #[test]
    fn test_each_bag_is_a_permutation() {
        let mut bag = PieceBag::with_seed(SEED);
        assert_eq!(bag.remaining(), 0);
        for _ in 0..20 {
            let mut seen = [false; PieceKind::LEN];
            for _ in 0..PieceKind::LEN {
                let kind = bag.draw();
                assert!(!seen[kind.index()], "{kind:?} drawn twice in one bag");
                seen[kind.index()] = true;
            }
            assert!(seen.iter().all(|&s| s));
            assert_eq!(bag.remaining(), 0);
        }
    }

    #[test]
    fn test_draw_consumes_from_back() {
        let mut bag = PieceBag::with_seed(SEED);
        bag.refill();
        let last = *bag.bag.last().unwrap();
        assert_eq!(bag.draw(), last);
        assert_eq!(bag.remaining(), 6);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut bag1 = PieceBag::with_seed(SEED);
        let mut bag2 = PieceBag::with_seed(SEED);
        let seq1 = (0..50).map(|_| bag1.draw()).collect::<Vec<_>>();
        let seq2 = (0..50).map(|_| bag2.draw()).collect::<Vec<_>>();
        assert_eq!(seq1, seq2);
    }

    mod piece_seed {
        use super::*;

        #[test]
        fn test_display_is_32_char_hex() {
            let seed: PieceSeed = rand::rng().random();
            let hex_str = seed.to_string();
            assert_eq!(hex_str.len(), 32);
            assert!(hex_str.chars().all(|c| c.is_ascii_hexdigit()));
        }

        #[test]
        fn test_known_value_is_big_endian() {
            assert_eq!(SEED.to_string(), "0123456789abcdeffedcba9876543210");
            assert_eq!(
                PieceSeed::from_bytes([0; 16]).to_string(),
                "00000000000000000000000000000000"
            );
        }

        #[test]
        fn test_parse() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed, SEED);

            assert_eq!(
                "abc".parse::<PieceSeed>(),
                Err(ParsePieceSeedError::InvalidLength(3))
            );
            assert!(matches!(
                "+0123456789abcdeffedcba987654321".parse::<PieceSeed>(),
                Err(ParsePieceSeedError::InvalidDigit(_))
            ));
            assert!(matches!(
                "0123456789abcdeffedcba98765432zz".parse::<PieceSeed>(),
                Err(ParsePieceSeedError::InvalidDigit(_))
            ));
        }

        #[test]
        fn test_serde_uses_hex_string() {
            let json = serde_json::to_string(&SEED).unwrap();
            assert_eq!(json, "\"0123456789abcdeffedcba9876543210\"");
            let back: PieceSeed = serde_json::from_str(&json).unwrap();
            assert_eq!(back, SEED);
        }

        #[test]
        fn test_deserialize_rejects_bad_input() {
            assert!(serde_json::from_str::<PieceSeed>("\"0123\"").is_err());
            assert!(serde_json::from_str::<PieceSeed>("42").is_err());
        }
    }
}

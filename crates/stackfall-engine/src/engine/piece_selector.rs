use std::{collections::VecDeque, fmt};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Source of the next piece kind.
///
/// The session owns one selector and asks it for a kind on every spawn.
/// Implementations must always return a kind; there is no end of the
/// sequence.
pub trait PieceSelector: fmt::Debug {
    fn next_kind(&mut self) -> PieceKind;
}

impl<S> PieceSelector for Box<S>
where
    S: PieceSelector + ?Sized,
{
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

/// Cycles through all seven kinds in the fixed order O, I, J, L, S, Z, T.
///
/// # Example
///
/// ```
/// use stackfall_engine::{PieceKind, PieceSelector, RoundRobin};
///
/// let mut selector = RoundRobin::new();
/// let kinds: Vec<_> = (0..8).map(|_| selector.next_kind()).collect();
/// assert_eq!(kinds[0], PieceKind::O);
/// assert_eq!(kinds[6], PieceKind::T);
/// assert_eq!(kinds[7], PieceKind::O);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoundRobin {
    index: usize,
}

impl RoundRobin {
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 0 }
    }
}

impl PieceSelector for RoundRobin {
    fn next_kind(&mut self) -> PieceKind {
        let kind = PieceKind::ALL[self.index];
        self.index = (self.index + 1) % PieceKind::LEN;
        kind
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the random selectors. The same seed always produces
/// the same sequence of kinds. Serialized as a 32 character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.as_u128())
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
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// 7-bag randomizer.
///
/// 1. Fill a bag with one of each of the 7 kinds
/// 2. Shuffle the bag
/// 3. Draw kinds from the bag in order
/// 4. Refill with a new shuffled bag once it runs empty
///
/// Every run of 7 draws aligned to a bag boundary contains each kind once.
#[derive(Debug, Clone)]
pub struct SevenBag {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl SevenBag {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN),
        }
    }

    fn fill_bag(&mut self) {
        let mut new_bag = PieceKind::ALL;
        new_bag.shuffle(&mut self.rng);
        self.bag.extend(new_bag);
    }
}

impl PieceSelector for SevenBag {
    fn next_kind(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.fill_bag();
        }
        match self.bag.pop_front() {
            Some(kind) => kind,
            None => unreachable!("bag was just refilled"),
        }
    }
}

/// Independent uniform draw for every piece.
#[derive(Debug, Clone)]
pub struct UniformSelector {
    rng: Pcg32,
}

impl UniformSelector {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl PieceSelector for UniformSelector {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

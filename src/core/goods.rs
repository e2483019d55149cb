//! Good types, per-good storage and bounded counters.
//!
//! Every per-good table in the engine is a `GoodMap<T>`: a fixed array
//! indexed by the closed `GoodType` enumeration. There are no missing keys,
//! and iteration always follows `GoodType::ALL`, which is also the order
//! legal actions are generated in.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::error::CounterError;

/// Number of card kinds, camels and wildcards included.
pub const GOOD_COUNT: usize = 8;

/// Kind of card in the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GoodType {
    Diamonds,
    Gold,
    Silver,
    Cloth,
    Spice,
    Leather,
    /// Goes to the herd, never to the hand.
    Camel,
    /// Stands in 1:1 for another good when selling (customized rules only).
    Wildcard,
}

impl GoodType {
    /// All kinds in canonical order.
    pub const ALL: [GoodType; GOOD_COUNT] = [
        GoodType::Diamonds,
        GoodType::Gold,
        GoodType::Silver,
        GoodType::Cloth,
        GoodType::Spice,
        GoodType::Leather,
        GoodType::Camel,
        GoodType::Wildcard,
    ];

    /// Goods that have a token stack and can be sold.
    pub const TRADEABLE: [GoodType; 6] = [
        GoodType::Diamonds,
        GoodType::Gold,
        GoodType::Silver,
        GoodType::Cloth,
        GoodType::Spice,
        GoodType::Leather,
    ];

    /// Position in `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True for the six goods that earn tokens.
    #[must_use]
    pub const fn is_tradeable(self) -> bool {
        !matches!(self, GoodType::Camel | GoodType::Wildcard)
    }

    /// True for kinds that live in a hand (everything but camels).
    #[must_use]
    pub const fn is_hand_good(self) -> bool {
        !matches!(self, GoodType::Camel)
    }
}

impl std::fmt::Display for GoodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GoodType::Diamonds => "Diamonds",
            GoodType::Gold => "Gold",
            GoodType::Silver => "Silver",
            GoodType::Cloth => "Cloth",
            GoodType::Spice => "Spice",
            GoodType::Leather => "Leather",
            GoodType::Camel => "Camel",
            GoodType::Wildcard => "Wildcard",
        };
        f.write_str(name)
    }
}

/// One value per `GoodType`.
///
/// ```
/// use rust_jaipur::core::{GoodMap, GoodType};
///
/// let mut market: GoodMap<u32> = GoodMap::default();
/// market[GoodType::Camel] = 3;
/// market[GoodType::Gold] += 2;
/// assert_eq!(market.values().sum::<u32>(), 5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoodMap<T>([T; GOOD_COUNT]);

impl<T> GoodMap<T> {
    /// Build a map by calling `f` for each good in canonical order.
    pub fn from_fn(mut f: impl FnMut(GoodType) -> T) -> Self {
        Self(std::array::from_fn(|i| f(GoodType::ALL[i])))
    }

    /// Iterate over `(GoodType, &T)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (GoodType, &T)> {
        GoodType::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate over `(GoodType, &mut T)` in canonical order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GoodType, &mut T)> {
        GoodType::ALL.into_iter().zip(self.0.iter_mut())
    }

    /// Iterate over values in canonical order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// Apply `f` to every entry.
    pub fn map<U>(&self, mut f: impl FnMut(GoodType, &T) -> U) -> GoodMap<U> {
        GoodMap::from_fn(|good| f(good, &self.0[good.index()]))
    }
}

impl<T> Index<GoodType> for GoodMap<T> {
    type Output = T;

    fn index(&self, good: GoodType) -> &T {
        &self.0[good.index()]
    }
}

impl<T> IndexMut<GoodType> for GoodMap<T> {
    fn index_mut(&mut self, good: GoodType) -> &mut T {
        &mut self.0[good.index()]
    }
}

impl GoodMap<u32> {
    /// Sum of all entries.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// Counter bounded to `0..=max`.
///
/// Every mutation is checked; a violation is an engine bug and surfaces as
/// `CounterError`, never as a silently clamped value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counter {
    value: u32,
    max: u32,
}

impl Counter {
    /// Zeroed counter with an upper bound.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { value: 0, max }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// True when the counter holds zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Overwrite the value.
    pub fn set(&mut self, value: u32) -> Result<(), CounterError> {
        if value > self.max {
            return Err(CounterError::Overflow {
                value: self.value,
                delta: value.saturating_sub(self.value),
                max: self.max,
            });
        }
        self.value = value;
        Ok(())
    }

    /// Add `delta`, failing above `max`.
    pub fn increment(&mut self, delta: u32) -> Result<u32, CounterError> {
        match self.value.checked_add(delta) {
            Some(next) if next <= self.max => {
                self.value = next;
                Ok(next)
            }
            _ => Err(CounterError::Overflow {
                value: self.value,
                delta,
                max: self.max,
            }),
        }
    }

    /// Subtract `delta`, failing below zero.
    pub fn decrement(&mut self, delta: u32) -> Result<u32, CounterError> {
        let next = self.value.checked_sub(delta).ok_or(CounterError::Underflow {
            value: self.value,
            delta,
        })?;
        self.value = next;
        Ok(next)
    }
}

/// Sum of counter values.
#[must_use]
pub fn counter_total(counters: &GoodMap<Counter>) -> u32 {
    counters.values().map(Counter::value).sum()
}

//! Good-token stacks and bonus-token tiers.
//!
//! Both use `im::Vector` so cloning a state for search shares the token
//! data until one side pops from it.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::rng::GameRng;

/// Number of bonus tiers (sales of 3, 4 and 5+ cards).
pub const BONUS_TIERS: usize = 3;

/// Smallest sale that earns a bonus token.
pub const MIN_BONUS_SALE: u32 = 3;

/// Token values popped by one sale.
pub type TokenDraw = SmallVec<[u32; 8]>;

/// Ordered stack of token values for one good, drawn from the front.
///
/// Never grows after the round is set up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStack {
    tokens: Vector<u32>,
}

impl TokenStack {
    /// Stack holding `values` in draw order.
    #[must_use]
    pub fn new(values: &[u32]) -> Self {
        Self {
            tokens: values.iter().copied().collect(),
        }
    }

    /// Tokens left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True once every token has been taken.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Value of the next token to be drawn.
    #[must_use]
    pub fn top(&self) -> Option<u32> {
        self.tokens.front().copied()
    }

    /// Remaining values in draw order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.tokens.iter().copied()
    }

    /// Pop up to `count` tokens from the front.
    ///
    /// A short stack yields what it has.
    pub fn draw(&mut self, count: u32) -> TokenDraw {
        let mut drawn = TokenDraw::new();
        for _ in 0..count {
            match self.tokens.pop_front() {
                Some(value) => drawn.push(value),
                None => break,
            }
        }
        drawn
    }
}

/// Shuffled bonus pools keyed by sale size.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTokens {
    tiers: [Vector<u32>; BONUS_TIERS],
}

impl BonusTokens {
    /// Shuffle each configured tier with `rng`.
    pub fn shuffled(tiers: &[Vec<u32>; BONUS_TIERS], rng: &mut GameRng) -> Self {
        let shuffle = |values: &Vec<u32>, rng: &mut GameRng| {
            let mut values = values.clone();
            rng.shuffle(&mut values);
            values.into_iter().collect::<Vector<u32>>()
        };

        Self {
            tiers: [
                shuffle(&tiers[0], rng),
                shuffle(&tiers[1], rng),
                shuffle(&tiers[2], rng),
            ],
        }
    }

    /// Tier a sale of `count` cards draws from: 3, 4 and 5+.
    #[must_use]
    pub fn tier_for(count: u32) -> Option<usize> {
        if count < MIN_BONUS_SALE {
            return None;
        }
        Some(((count - MIN_BONUS_SALE) as usize).min(BONUS_TIERS - 1))
    }

    /// Tokens left in a tier.
    #[must_use]
    pub fn remaining(&self, tier: usize) -> usize {
        self.tiers.get(tier).map_or(0, Vector::len)
    }

    /// Draw the bonus for a sale of `count` cards.
    ///
    /// `None` for small sales and for exhausted tiers.
    pub fn draw(&mut self, count: u32) -> Option<u32> {
        let tier = Self::tier_for(count)?;
        self.tiers[tier].pop_front()
    }
}

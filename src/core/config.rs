//! Match configuration.
//!
//! A flat set of named parameters supplied once at match creation and then
//! shared read-only (behind an `Arc`) by every clone of the state.
//!
//! ```
//! use rust_jaipur::core::{GoodType, JaipurConfig};
//!
//! let config = JaipurConfig::standard()
//!     .with_hand_limit(8)
//!     .with_min_sell(GoodType::Gold, 3);
//! assert!(config.validate(2).is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::goods::{GoodMap, GoodType};
use super::tokens::BONUS_TIERS;

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;

/// Largest supported table.
pub const MAX_PLAYERS: usize = 4;

/// Every rule parameter of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JaipurConfig {
    /// Cards per kind in the deck. The camel count also bounds each herd.
    pub deck: GoodMap<u32>,

    /// Smallest sale allowed per tradeable good.
    pub min_sell: GoodMap<u32>,

    /// Token values per tradeable good, in draw order.
    pub token_progression: GoodMap<Vec<u32>>,

    /// Bonus pools for sales of 3, 4 and 5+ cards.
    pub bonus_tokens: [Vec<u32>; BONUS_TIERS],

    /// Points for the unique camel leader at round end.
    pub camel_bonus: u32,

    /// Exhausted token stacks that end a round.
    pub goods_sold_for_round_end: u32,

    /// Round wins needed to take the match.
    pub round_wins_for_match: u32,

    /// Most non-camel cards a hand may hold.
    pub hand_limit: u32,

    /// Cards dealt to each player per round.
    pub initial_hand_size: u32,

    /// Cards the market holds when full.
    pub market_capacity: u32,

    /// Camels placed in the market before the deal.
    pub initial_market_camels: u32,

    /// Shuffle wildcards into the deck and allow wildcard sales.
    pub customized: bool,
}

impl Default for JaipurConfig {
    fn default() -> Self {
        Self {
            deck: GoodMap::from_fn(|good| match good {
                GoodType::Diamonds | GoodType::Gold | GoodType::Silver => 6,
                GoodType::Cloth | GoodType::Spice => 8,
                GoodType::Leather => 10,
                GoodType::Camel => 11,
                GoodType::Wildcard => 6,
            }),
            min_sell: GoodMap::from_fn(|good| match good {
                GoodType::Diamonds | GoodType::Gold | GoodType::Silver => 2,
                GoodType::Cloth | GoodType::Spice | GoodType::Leather => 1,
                GoodType::Camel | GoodType::Wildcard => 0,
            }),
            token_progression: GoodMap::from_fn(|good| match good {
                GoodType::Diamonds => vec![5, 5, 5, 7, 7],
                GoodType::Gold => vec![5, 5, 5, 6, 6],
                GoodType::Silver => vec![5, 5, 5, 5, 5],
                GoodType::Cloth | GoodType::Spice => vec![1, 1, 2, 2, 3, 3, 5],
                GoodType::Leather => vec![1, 1, 1, 1, 1, 1, 2, 3, 4],
                GoodType::Camel | GoodType::Wildcard => Vec::new(),
            }),
            bonus_tokens: [
                vec![1, 1, 2, 2, 2, 3, 3],
                vec![4, 4, 5, 5, 6, 6],
                vec![8, 8, 9, 10, 10],
            ],
            camel_bonus: 5,
            goods_sold_for_round_end: 3,
            round_wins_for_match: 2,
            hand_limit: 7,
            initial_hand_size: 5,
            market_capacity: 5,
            initial_market_camels: 3,
            customized: true,
        }
    }
}

impl JaipurConfig {
    /// Default parameters without wildcards.
    #[must_use]
    pub fn standard() -> Self {
        Self::default().with_customized(false)
    }

    /// Toggle the wildcard rules.
    #[must_use]
    pub fn with_customized(mut self, customized: bool) -> Self {
        self.customized = customized;
        self
    }

    /// Set the hand limit.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: u32) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Set the minimum sale for one good.
    #[must_use]
    pub fn with_min_sell(mut self, good: GoodType, min: u32) -> Self {
        self.min_sell[good] = min;
        self
    }

    /// Set how many cards of a kind the deck holds.
    #[must_use]
    pub fn with_deck_count(mut self, good: GoodType, count: u32) -> Self {
        self.deck[good] = count;
        self
    }

    /// Set the token values of one good.
    #[must_use]
    pub fn with_token_progression(mut self, good: GoodType, values: Vec<u32>) -> Self {
        self.token_progression[good] = values;
        self
    }

    /// Set the camel majority bonus.
    #[must_use]
    pub fn with_camel_bonus(mut self, bonus: u32) -> Self {
        self.camel_bonus = bonus;
        self
    }

    /// Set how many exhausted stacks end a round.
    #[must_use]
    pub fn with_goods_sold_for_round_end(mut self, count: u32) -> Self {
        self.goods_sold_for_round_end = count;
        self
    }

    /// Set the round wins needed for the match.
    #[must_use]
    pub fn with_round_wins_for_match(mut self, wins: u32) -> Self {
        self.round_wins_for_match = wins;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_initial_hand_size(mut self, size: u32) -> Self {
        self.initial_hand_size = size;
        self
    }

    /// Set the market size and opening camels.
    #[must_use]
    pub fn with_market(mut self, capacity: u32, initial_camels: u32) -> Self {
        self.market_capacity = capacity;
        self.initial_market_camels = initial_camels;
        self
    }

    /// Camels in the game; also the herd bound.
    #[must_use]
    pub fn max_camels(&self) -> u32 {
        self.deck[GoodType::Camel]
    }

    /// Cards of `good` shuffled into the deck this match.
    #[must_use]
    pub fn cards_in_play(&self, good: GoodType) -> u32 {
        match good {
            GoodType::Wildcard if !self.customized => 0,
            _ => self.deck[good],
        }
    }

    /// Total cards in a round, camels and wildcards included.
    #[must_use]
    pub fn deck_total(&self) -> u32 {
        GoodType::ALL.iter().map(|&good| self.cards_in_play(good)).sum()
    }

    /// Check every parameter for a table of `player_count`.
    pub fn validate(&self, player_count: usize) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(ConfigError::PlayerCount {
                count: player_count,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }

        for good in GoodType::TRADEABLE {
            if self.token_progression[good].is_empty() {
                return Err(ConfigError::MissingTokenProgression(good));
            }
            if self.min_sell[good] == 0 {
                return Err(ConfigError::ZeroSellThreshold(good));
            }
        }

        let at_least = |name: &'static str, value: u32, min: u32| {
            if value < min {
                Err(ConfigError::TooSmall { name, value, min })
            } else {
                Ok(())
            }
        };
        at_least("hand_limit", self.hand_limit, 1)?;
        at_least("market_capacity", self.market_capacity, 1)?;
        at_least("round_wins_for_match", self.round_wins_for_match, 1)?;
        at_least("goods_sold_for_round_end", self.goods_sold_for_round_end, 1)?;

        let at_most = |name: &'static str, value: u32, limit_name: &'static str, limit: u32| {
            if value > limit {
                Err(ConfigError::Exceeds { name, value, limit_name, limit })
            } else {
                Ok(())
            }
        };
        at_most(
            "goods_sold_for_round_end",
            self.goods_sold_for_round_end,
            "tradeable goods",
            GoodType::TRADEABLE.len() as u32,
        )?;
        at_most("initial_hand_size", self.initial_hand_size, "hand_limit", self.hand_limit)?;
        at_most(
            "initial_market_camels",
            self.initial_market_camels,
            "market_capacity",
            self.market_capacity,
        )?;
        at_most(
            "initial_market_camels",
            self.initial_market_camels,
            "camels in deck",
            self.max_camels(),
        )?;

        // Everything dealt at round start comes from the shuffled pile
        let drawable = self.deck_total() - self.initial_market_camels;
        let needed = self.initial_hand_size * player_count as u32
            + (self.market_capacity - self.initial_market_camels);
        if needed > drawable {
            return Err(ConfigError::DeckTooSmall { available: drawable, needed });
        }

        Ok(())
    }
}

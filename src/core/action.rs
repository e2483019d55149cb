//! Player actions.
//!
//! Two families, modelled as a closed sum type so the applier matches
//! exhaustively:
//! - `Take`: cards leave the market for the hand (or herd, for camels),
//!   optionally with cards handed back to the market
//! - `Sell`: cards of one good leave the hand for tokens, optionally padded
//!   with wildcards

use serde::{Deserialize, Serialize};

use super::goods::{GoodMap, GoodType};
use super::player::PlayerId;

/// Cards moved from the market, and cards returned to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Take {
    /// Cards taken from the market per good.
    pub take: GoodMap<u32>,
    /// Cards given back from hand (or herd, for camels) per good.
    pub give: GoodMap<u32>,
}

impl Take {
    /// Total cards taken.
    #[must_use]
    pub fn taken(&self) -> u32 {
        self.take.total()
    }

    /// Total cards given back.
    #[must_use]
    pub fn given(&self) -> u32 {
        self.give.total()
    }

    /// Number of distinct non-camel goods taken.
    #[must_use]
    pub fn distinct_goods_taken(&self) -> usize {
        self.take
            .iter()
            .filter(|&(good, &n)| good != GoodType::Camel && n > 0)
            .count()
    }
}

/// A sale of one good, possibly padded with wildcards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sell {
    /// Good whose token stack pays out.
    pub good: GoodType,
    /// Total cards sold, wildcards included.
    pub count: u32,
    /// How many of `count` are wildcards.
    pub wildcards: u32,
}

impl Sell {
    /// Cards of `good` itself leaving the hand.
    #[must_use]
    pub fn natural(&self) -> u32 {
        self.count.saturating_sub(self.wildcards)
    }
}

/// A complete action for the player to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Take(Take),
    Sell(Sell),
}

impl Action {
    /// Take every camel in the market.
    #[must_use]
    pub fn take_camels(count: u32) -> Self {
        let mut take = GoodMap::default();
        take[GoodType::Camel] = count;
        Action::Take(Take { take, give: GoodMap::default() })
    }

    /// Take a single card of one good.
    #[must_use]
    pub fn take_one(good: GoodType) -> Self {
        let mut take = GoodMap::default();
        take[good] = 1;
        Action::Take(Take { take, give: GoodMap::default() })
    }

    /// Take several cards while returning the same number to the market.
    #[must_use]
    pub fn exchange(take: GoodMap<u32>, give: GoodMap<u32>) -> Self {
        Action::Take(Take { take, give })
    }

    /// Sell `count` cards of `good` without wildcards.
    #[must_use]
    pub fn sell(good: GoodType, count: u32) -> Self {
        Action::Sell(Sell { good, count, wildcards: 0 })
    }

    /// Sell `natural` cards of `good` plus `wildcards` wildcards.
    #[must_use]
    pub fn sell_with_wildcards(good: GoodType, natural: u32, wildcards: u32) -> Self {
        Action::Sell(Sell {
            good,
            count: natural + wildcards,
            wildcards,
        })
    }

    /// True for the take family.
    #[must_use]
    pub fn is_take(&self) -> bool {
        matches!(self, Action::Take(_))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn list(map: &GoodMap<u32>) -> String {
            map.iter()
                .filter(|&(_, &n)| n > 0)
                .map(|(good, n)| format!("{n} {good}"))
                .collect::<Vec<_>>()
                .join(", ")
        }

        match self {
            Action::Take(take) if take.given() == 0 => write!(f, "take {}", list(&take.take)),
            Action::Take(take) => {
                write!(f, "take {} giving {}", list(&take.take), list(&take.give))
            }
            Action::Sell(sell) if sell.wildcards == 0 => {
                write!(f, "sell {} {}", sell.count, sell.good)
            }
            Action::Sell(sell) => write!(
                f,
                "sell {} {} ({} wildcards)",
                sell.count, sell.good, sell.wildcards
            ),
        }
    }
}

/// An applied action with its place in the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who acted.
    pub player: PlayerId,
    /// The action taken.
    pub action: Action,
    /// Round number (starts at 1).
    pub round: u32,
    /// Turn number within the round (starts at 1).
    pub turn: u32,
}

//! Match creation and round setup.
//!
//! Round setup order:
//! 1. Place the opening camels in the market
//! 2. Build the draw pile (wildcards, tradeable goods, remaining camels)
//!    and shuffle it
//! 3. Deal each player a hand, routing camels to the herd
//! 4. Fill the market from the pile
//! 5. Load token stacks and shuffle the bonus tiers
//!
//! All randomness comes from the `GameRng` passed in, so the same generator
//! state always deals the same round.

use std::sync::Arc;

use im::Vector;
use log::debug;

use crate::core::{
    BonusTokens, EngineError, EngineResult, GameRng, GameState, GoodMap, GoodType, JaipurConfig,
    PlayerId, RoundState, TokenStack,
};

/// Order in which card kinds are laid into the pile before shuffling.
const DECK_ORDER: [GoodType; 8] = [
    GoodType::Wildcard,
    GoodType::Diamonds,
    GoodType::Gold,
    GoodType::Silver,
    GoodType::Cloth,
    GoodType::Spice,
    GoodType::Leather,
    GoodType::Camel,
];

/// Create a match and deal its first round.
///
/// Fails with `InvalidConfiguration` before touching any state.
///
/// ```
/// use rust_jaipur::core::JaipurConfig;
/// use rust_jaipur::rules::new_match;
///
/// let state = new_match(JaipurConfig::default(), 2, 42).unwrap();
/// assert_eq!(state.round.market_size(), 5);
/// assert_eq!(state.round_number, 1);
/// ```
pub fn new_match(config: JaipurConfig, player_count: usize, seed: u64) -> EngineResult<GameState> {
    config.validate(player_count)?;

    let mut state = GameState::empty(Arc::new(config), player_count, seed);
    let mut round_rng = state.rng_mut().fork();
    new_round(&mut state, &mut round_rng)?;

    debug!(
        "new match: {} players, seed {}, {} cards per round",
        player_count,
        seed,
        state.config().deck_total()
    );
    Ok(state)
}

/// Replace the round with a freshly dealt one.
///
/// Round wins, cumulative scores, history and the round number are kept.
/// Player 0 opens.
pub fn new_round(state: &mut GameState, rng: &mut GameRng) -> EngineResult<()> {
    let config = state.config_arc();
    let mut round = RoundState::empty(&config, state.player_count());

    round.market[GoodType::Camel]
        .set(config.initial_market_camels)
        .map_err(EngineError::counter("market camels"))?;

    let mut deck = build_deck(&config);
    rng.shuffle(&mut deck);
    round.draw_pile = deck.into_iter().collect::<Vector<_>>();

    for player in PlayerId::all(state.player_count()) {
        for _ in 0..config.initial_hand_size {
            let card = round.draw_pile.pop_front().ok_or_else(|| {
                EngineError::InternalConsistency(format!("draw pile ran out dealing to {player}"))
            })?;
            receive_card(&mut round, player, card)?;
        }
    }

    if !refill_market(&mut round, config.market_capacity)? {
        return Err(EngineError::InternalConsistency(
            "draw pile ran out filling the opening market".to_string(),
        ));
    }

    round.good_tokens = GoodMap::from_fn(|good| {
        if good.is_tradeable() {
            TokenStack::new(&config.token_progression[good])
        } else {
            TokenStack::default()
        }
    });
    round.bonus_tokens = BonusTokens::shuffled(&config.bonus_tokens, rng);

    debug!(
        "round {} dealt: market {:?}, {} cards in pile",
        state.round_number,
        round.market.map(|_, c| c.value()),
        round.draw_pile.len()
    );

    state.round = round;
    state.current_player = PlayerId::new(0);
    Ok(())
}

/// Every card of the round except the opening market camels, unshuffled.
fn build_deck(config: &JaipurConfig) -> Vec<GoodType> {
    let mut deck = Vec::with_capacity(config.deck_total() as usize);
    for good in DECK_ORDER {
        let mut count = config.cards_in_play(good);
        if good == GoodType::Camel {
            count -= config.initial_market_camels;
        }
        deck.extend(std::iter::repeat(good).take(count as usize));
    }
    deck
}

/// Put a dealt card in the player's herd or hand.
fn receive_card(round: &mut RoundState, player: PlayerId, card: GoodType) -> EngineResult<()> {
    if card == GoodType::Camel {
        round.herds[player]
            .increment(1)
            .map_err(EngineError::counter(format!("{player} herd")))?;
    } else {
        round.hands[player][card]
            .increment(1)
            .map_err(EngineError::counter(format!("{player} {card} hand")))?;
    }
    Ok(())
}

/// Draw from the front of the pile until the market is full.
///
/// Returns `false` when the pile ran dry first.
pub(crate) fn refill_market(round: &mut RoundState, capacity: u32) -> EngineResult<bool> {
    while round.market_size() < capacity {
        let Some(card) = round.draw_pile.pop_front() else {
            return Ok(false);
        };
        round.market[card]
            .increment(1)
            .map_err(EngineError::counter(format!("market {card}")))?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::counter_total;

    #[test]
    fn test_new_match_deals_opening() {
        let state = new_match(JaipurConfig::default(), 2, 7).unwrap();
        let round = &state.round;

        assert_eq!(state.current_player, PlayerId::new(0));
        assert!(round.market[GoodType::Camel].value() >= 3);
        assert_eq!(round.market_size(), 5);
        for player in state.player_ids() {
            assert_eq!(round.hand_size(player) + round.herds[player].value(), 5);
        }
        assert_eq!(round.draw_pile.len(), 61 - 5 - 10);
        assert_eq!(round.good_tokens[GoodType::Diamonds].len(), 5);
        assert!(round.good_tokens[GoodType::Camel].is_empty());
        assert_eq!(round.bonus_tokens.remaining(2), 5);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = new_match(JaipurConfig::default(), 3, 99).unwrap();
        let b = new_match(JaipurConfig::default(), 3, 99).unwrap();
        assert_eq!(a, b);

        let c = new_match(JaipurConfig::default(), 3, 100).unwrap();
        assert_ne!(a.round.draw_pile, c.round.draw_pile);
    }

    #[test]
    fn test_standard_deck_has_no_wildcards() {
        let state = new_match(JaipurConfig::standard(), 2, 3).unwrap();
        let round = &state.round;

        assert!(round.draw_pile.iter().all(|&card| card != GoodType::Wildcard));
        assert_eq!(round.market[GoodType::Wildcard].value(), 0);
        for player in state.player_ids() {
            assert_eq!(round.hand_count(player, GoodType::Wildcard), 0);
        }
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = new_match(JaipurConfig::default(), 5, 1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_new_round_keeps_match_counters() {
        let mut state = new_match(JaipurConfig::default(), 2, 11).unwrap();
        state.rounds_won[PlayerId::new(1)] = 1;
        state.total_scores[PlayerId::new(1)] = 40;
        state.round_number = 2;
        state.current_player = PlayerId::new(1);
        state.round.scores[PlayerId::new(1)] = 40;

        let mut rng = GameRng::new(5);
        new_round(&mut state, &mut rng).unwrap();

        assert_eq!(state.rounds_won[PlayerId::new(1)], 1);
        assert_eq!(state.total_scores[PlayerId::new(1)], 40);
        assert_eq!(state.round.scores[PlayerId::new(1)], 0);
        assert_eq!(state.current_player, PlayerId::new(0));
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_refill_reports_dry_pile() {
        let config = JaipurConfig::default();
        let mut round = RoundState::empty(&config, 2);
        round.draw_pile = [GoodType::Gold, GoodType::Gold].into_iter().collect();

        assert!(!refill_market(&mut round, 5).unwrap());
        assert_eq!(round.market[GoodType::Gold].value(), 2);
        assert!(round.draw_pile.is_empty());

        round.draw_pile = [GoodType::Spice; 4].into_iter().collect();
        assert!(refill_market(&mut round, 5).unwrap());
        assert_eq!(counter_total(&round.market), 5);
        assert_eq!(round.draw_pile.len(), 1);
    }
}

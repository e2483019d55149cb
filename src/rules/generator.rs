//! Legal action enumeration and re-validation.
//!
//! Actions are listed in a fixed order so the list is stable across calls
//! and clones:
//! 1. Sells, by good in canonical order. Within a good, plain sells by
//!    ascending count, then wildcard sells by ascending natural cards and
//!    ascending wildcards.
//! 2. Take all camels.
//! 3. Take one card, by good in canonical order.
//!
//! Exchanges (several cards taken while others are handed back) are never
//! generated, and the applier refuses them.

use crate::core::{Action, EngineError, EngineResult, GameState, GoodType, PlayerId, Sell, Take};

/// Every legal action for the player to move.
///
/// Fails with `MatchEnded` once the match is over, and with
/// `InternalConsistency` if the list would be empty.
pub fn legal_actions(state: &GameState) -> EngineResult<Vec<Action>> {
    if state.is_over() {
        return Err(EngineError::MatchEnded);
    }

    let player = state.current_player;
    let mut actions = Vec::with_capacity(16);
    push_sells(state, player, &mut actions);
    push_takes(state, player, &mut actions);

    if actions.is_empty() {
        return Err(EngineError::InternalConsistency(format!(
            "no legal action for {player} in round {}",
            state.round_number
        )));
    }
    Ok(actions)
}

fn push_sells(state: &GameState, player: PlayerId, out: &mut Vec<Action>) {
    let config = state.config();
    let round = &state.round;
    let wildcards = if config.customized {
        round.hand_count(player, GoodType::Wildcard)
    } else {
        0
    };

    for good in GoodType::TRADEABLE {
        let held = round.hand_count(player, good);
        if held == 0 {
            continue;
        }
        let threshold = config.min_sell[good];

        if held >= threshold {
            for count in threshold..=held {
                out.push(Action::sell(good, count));
            }
        }

        for natural in 1..=held {
            for used in 1..=wildcards {
                if natural + used >= threshold {
                    out.push(Action::sell_with_wildcards(good, natural, used));
                }
            }
        }
    }
}

fn push_takes(state: &GameState, player: PlayerId, out: &mut Vec<Action>) {
    let config = state.config();
    let round = &state.round;

    let camels = round.market[GoodType::Camel].value();
    if camels > 0 {
        out.push(Action::take_camels(camels));
    }

    if round.hand_size(player) < config.hand_limit {
        for (good, count) in round.market.iter() {
            if good != GoodType::Camel && count.value() > 0 {
                out.push(Action::take_one(good));
            }
        }
    }
}

/// Check `action` against the current state for `player`.
///
/// Mirrors the generator rule for rule, so a stale or hand-built action is
/// rejected with a reason instead of corrupting state.
pub fn validate_action(state: &GameState, player: PlayerId, action: &Action) -> EngineResult<()> {
    if state.is_over() {
        return Err(EngineError::MatchEnded);
    }
    if player != state.current_player {
        return Err(EngineError::illegal(
            player,
            action,
            format!("it is {}'s turn", state.current_player),
        ));
    }

    let reason = match action {
        Action::Take(take) => take_violation(state, player, take),
        Action::Sell(sell) => sell_violation(state, player, sell),
    };
    match reason {
        Some(reason) => Err(EngineError::illegal(player, action, reason)),
        None => Ok(()),
    }
}

fn take_violation(state: &GameState, player: PlayerId, take: &Take) -> Option<String> {
    let round = &state.round;

    if take.given() > 0 {
        return Some("exchanges with the market are not offered".to_string());
    }

    let camels = take.take[GoodType::Camel];
    if camels > 0 {
        let in_market = round.market[GoodType::Camel].value();
        if take.taken() != camels {
            return Some("camels must be taken on their own".to_string());
        }
        if camels != in_market {
            return Some(format!("market holds {in_market} camels, all must be taken"));
        }
        return None;
    }

    if take.taken() != 1 {
        return Some(format!("takes {} cards, exactly one allowed", take.taken()));
    }
    let Some((good, _)) = take.take.iter().find(|&(_, &n)| n > 0) else {
        return Some("takes nothing".to_string());
    };
    if round.market[good].is_zero() {
        return Some(format!("market has no {good}"));
    }
    let hand = round.hand_size(player);
    if hand >= state.config().hand_limit {
        return Some(format!("hand already holds {hand} cards"));
    }
    None
}

fn sell_violation(state: &GameState, player: PlayerId, sell: &Sell) -> Option<String> {
    let config = state.config();
    let round = &state.round;

    if !sell.good.is_tradeable() {
        return Some(format!("{} cannot be sold", sell.good));
    }
    if sell.wildcards > 0 && !config.customized {
        return Some("wildcards are not in play".to_string());
    }
    if sell.wildcards >= sell.count {
        return Some("wildcards cannot be sold alone".to_string());
    }

    let natural = sell.natural();
    let held = round.hand_count(player, sell.good);
    if natural > held {
        return Some(format!("holds only {held} {}", sell.good));
    }
    let wild = round.hand_count(player, GoodType::Wildcard);
    if sell.wildcards > wild {
        return Some(format!("holds only {wild} wildcards"));
    }

    let threshold = config.min_sell[sell.good];
    if sell.count < threshold {
        return Some(format!("minimum sale of {} is {threshold}", sell.good));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GoodMap, JaipurConfig};
    use crate::rules::new_match;

    /// Match with player 0 holding exactly `hand` and a fixed market.
    fn arranged(
        config: JaipurConfig,
        hand: &[(GoodType, u32)],
        market: &[(GoodType, u32)],
    ) -> GameState {
        let mut state = new_match(config, 2, 1).unwrap();
        let p0 = PlayerId::new(0);
        for good in GoodType::ALL {
            state.round.hands[p0][good].set(0).unwrap();
            state.round.market[good].set(0).unwrap();
        }
        for &(good, n) in hand {
            state.round.hands[p0][good].set(n).unwrap();
        }
        for &(good, n) in market {
            state.round.market[good].set(n).unwrap();
        }
        state
    }

    fn sells_of(actions: &[Action], good: GoodType) -> Vec<(u32, u32)> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Sell(s) if s.good == good => Some((s.count, s.wildcards)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_sell_quantities_respect_threshold() {
        let state = arranged(
            JaipurConfig::default(),
            &[(GoodType::Diamonds, 3)],
            &[(GoodType::Gold, 5)],
        );
        let actions = legal_actions(&state).unwrap();

        assert_eq!(sells_of(&actions, GoodType::Diamonds), vec![(2, 0), (3, 0)]);
        assert!(!actions.contains(&Action::sell(GoodType::Diamonds, 1)));
        assert!(!actions.contains(&Action::sell(GoodType::Diamonds, 4)));
    }

    #[test]
    fn test_single_cheap_good_sells_one() {
        let state = arranged(JaipurConfig::default(), &[(GoodType::Leather, 2)], &[]);
        let actions = legal_actions(&state).unwrap();
        assert_eq!(sells_of(&actions, GoodType::Leather), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn test_wildcard_combinations() {
        let state = arranged(
            JaipurConfig::default(),
            &[(GoodType::Gold, 1), (GoodType::Wildcard, 2)],
            &[],
        );
        let actions = legal_actions(&state).unwrap();

        // One gold alone is below the threshold of 2
        assert_eq!(sells_of(&actions, GoodType::Gold), vec![(2, 1), (3, 2)]);
        assert!(sells_of(&actions, GoodType::Wildcard).is_empty());
    }

    #[test]
    fn test_no_wildcard_sells_in_standard_mode() {
        let mut state = arranged(JaipurConfig::standard(), &[(GoodType::Cloth, 1)], &[]);
        state.round.hands[PlayerId::new(0)][GoodType::Wildcard].set(2).unwrap();
        let actions = legal_actions(&state).unwrap();
        assert_eq!(sells_of(&actions, GoodType::Cloth), vec![(1, 0)]);
    }

    #[test]
    fn test_take_camels_and_single_cards() {
        let state = arranged(
            JaipurConfig::default(),
            &[(GoodType::Spice, 1)],
            &[(GoodType::Camel, 2), (GoodType::Silver, 2), (GoodType::Wildcard, 1)],
        );
        let actions = legal_actions(&state).unwrap();

        let takes: Vec<Action> = actions.iter().copied().filter(Action::is_take).collect();
        assert_eq!(
            takes,
            vec![
                Action::take_camels(2),
                Action::take_one(GoodType::Silver),
                Action::take_one(GoodType::Wildcard),
            ]
        );
    }

    #[test]
    fn test_full_hand_only_takes_camels() {
        let state = arranged(
            JaipurConfig::default(),
            &[(GoodType::Leather, 7)],
            &[(GoodType::Camel, 1), (GoodType::Gold, 4)],
        );
        let actions = legal_actions(&state).unwrap();

        assert!(actions.contains(&Action::take_camels(1)));
        assert!(!actions.contains(&Action::take_one(GoodType::Gold)));
        assert_eq!(sells_of(&actions, GoodType::Leather).len(), 7);
    }

    #[test]
    fn test_sells_precede_takes() {
        let state = arranged(
            JaipurConfig::default(),
            &[(GoodType::Cloth, 1), (GoodType::Diamonds, 2)],
            &[(GoodType::Camel, 1), (GoodType::Gold, 1)],
        );
        let actions = legal_actions(&state).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::sell(GoodType::Diamonds, 2),
                Action::sell(GoodType::Cloth, 1),
                Action::take_camels(1),
                Action::take_one(GoodType::Gold),
            ]
        );
    }

    #[test]
    fn test_empty_list_is_an_error() {
        let state = arranged(JaipurConfig::default(), &[], &[]);
        assert!(matches!(
            legal_actions(&state),
            Err(EngineError::InternalConsistency(_))
        ));
    }

    #[test]
    fn test_validation_rejects_hand_built_actions() {
        let state = arranged(
            JaipurConfig::default(),
            &[(GoodType::Diamonds, 3), (GoodType::Wildcard, 1)],
            &[(GoodType::Camel, 2), (GoodType::Gold, 1)],
        );
        let p0 = PlayerId::new(0);

        let rejected = [
            Action::sell(GoodType::Diamonds, 1),
            Action::sell(GoodType::Diamonds, 4),
            Action::sell(GoodType::Camel, 1),
            Action::sell_with_wildcards(GoodType::Gold, 0, 1),
            Action::sell_with_wildcards(GoodType::Diamonds, 1, 2),
            Action::take_camels(1),
            Action::take_one(GoodType::Silver),
            Action::exchange(
                GoodMap::from_fn(|g| u32::from(g == GoodType::Gold)),
                GoodMap::from_fn(|g| u32::from(g == GoodType::Diamonds)),
            ),
        ];
        for action in rejected {
            assert!(
                matches!(
                    validate_action(&state, p0, &action),
                    Err(EngineError::IllegalAction { .. })
                ),
                "{action} should be rejected"
            );
        }

        for action in legal_actions(&state).unwrap() {
            validate_action(&state, p0, &action).unwrap();
        }
    }

    #[test]
    fn test_validation_rejects_wrong_player() {
        let state = new_match(JaipurConfig::default(), 2, 4).unwrap();
        let action = legal_actions(&state).unwrap()[0];
        let err = validate_action(&state, PlayerId::new(1), &action).unwrap_err();
        assert!(err.to_string().contains("it is Player 0's turn"));
    }
}

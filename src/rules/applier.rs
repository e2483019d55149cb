//! Action application.
//!
//! `apply` re-validates the action, mutates the round, records it, and then
//! either settles the round or passes the turn. Settlement only ever runs
//! after the whole action (give-backs and market refill included) is done.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::core::{
    Action, ActionRecord, Counter, EngineError, EngineResult, GameState, GoodType, PlayerId,
    RoundOutcome, RoundState, Sell, Take, TokenDraw,
};

use super::generator::validate_action;
use super::lifecycle::{round_should_end, settle_round};
use super::setup::refill_market;

/// What one applied action did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedEffects {
    /// Acting player.
    pub player: PlayerId,
    /// The action applied.
    pub action: Action,
    /// Points scored, bonus included.
    pub points: u32,
    /// Good tokens drawn, in draw order.
    pub tokens: TokenDraw,
    /// Bonus token drawn, if any.
    pub bonus: Option<u32>,
    /// The sale emptied its good's token stack.
    pub stack_exhausted: bool,
    /// Cards drawn from the pile into the market.
    pub refilled: u32,
    /// The take set the round-end trigger.
    pub round_end_triggered: bool,
    /// Set when this action ended the round.
    pub round_outcome: Option<RoundOutcome>,
}

impl AppliedEffects {
    fn new(player: PlayerId, action: Action) -> Self {
        Self {
            player,
            action,
            points: 0,
            tokens: TokenDraw::new(),
            bonus: None,
            stack_exhausted: false,
            refilled: 0,
            round_end_triggered: false,
            round_outcome: None,
        }
    }

    /// True when the action ended the round.
    #[must_use]
    pub fn ended_round(&self) -> bool {
        self.round_outcome.is_some()
    }

    /// True when the action ended the match.
    #[must_use]
    pub fn ended_match(&self) -> bool {
        self.round_outcome
            .as_ref()
            .is_some_and(|outcome| outcome.match_winner.is_some())
    }
}

/// Apply `action` for the player to move.
///
/// Fails with `IllegalAction` (state untouched) if the action is not legal
/// right now, and with `InternalConsistency` if a bounded counter would be
/// violated.
pub fn apply(state: &mut GameState, action: &Action) -> EngineResult<AppliedEffects> {
    let player = state.current_player;
    validate_action(state, player, action)?;

    let mut effects = AppliedEffects::new(player, *action);
    let hand_limit = state.config().hand_limit;
    let capacity = state.config().market_capacity;

    match action {
        Action::Take(take) => apply_take(&mut state.round, player, take, capacity, &mut effects)?,
        Action::Sell(sell) => apply_sell(&mut state.round, player, sell, &mut effects)?,
    }

    if state.round.hand_size(player) > hand_limit {
        return Err(EngineError::InternalConsistency(format!(
            "{player} holds {} cards after `{action}`",
            state.round.hand_size(player)
        )));
    }

    state.history.push_back(ActionRecord {
        player,
        action: *action,
        round: state.round_number,
        turn: state.round.turn,
    });
    trace!(
        "round {} turn {}: {player} {action} (+{} points)",
        state.round_number,
        state.round.turn,
        effects.points
    );

    if round_should_end(&state.round, state.config()) {
        effects.round_outcome = Some(settle_round(state)?);
    } else {
        state.round.turn += 1;
        state.current_player = player.next(state.player_count());
    }

    Ok(effects)
}

/// Move taken cards out of the market, give-backs into it, then refill.
fn apply_take(
    round: &mut RoundState,
    player: PlayerId,
    take: &Take,
    capacity: u32,
    effects: &mut AppliedEffects,
) -> EngineResult<()> {
    for (good, &n) in take.take.iter().filter(|&(_, &n)| n > 0) {
        round.market[good]
            .decrement(n)
            .map_err(EngineError::counter(format!("market {good}")))?;
        stock_mut(round, player, good)
            .increment(n)
            .map_err(EngineError::counter(format!("{player} {good}")))?;
    }

    for (good, &n) in take.give.iter().filter(|&(_, &n)| n > 0) {
        stock_mut(round, player, good)
            .decrement(n)
            .map_err(EngineError::counter(format!("{player} {good}")))?;
        round.market[good]
            .increment(n)
            .map_err(EngineError::counter(format!("market {good}")))?;
    }

    if take.distinct_goods_taken() >= 2 {
        round.end_triggered = true;
    }

    let before = round.draw_pile.len();
    if !refill_market(round, capacity)? {
        round.end_triggered = true;
    }
    effects.refilled = (before - round.draw_pile.len()) as u32;
    effects.round_end_triggered = round.end_triggered;
    Ok(())
}

/// Herd for camels, hand slot for everything else.
fn stock_mut(round: &mut RoundState, player: PlayerId, good: GoodType) -> &mut Counter {
    if good == GoodType::Camel {
        &mut round.herds[player]
    } else {
        &mut round.hands[player][good]
    }
}

/// Discard the sold cards, then pay out good tokens and the bonus.
fn apply_sell(
    round: &mut RoundState,
    player: PlayerId,
    sell: &Sell,
    effects: &mut AppliedEffects,
) -> EngineResult<()> {
    let natural = sell.natural();
    round.hands[player][sell.good]
        .decrement(natural)
        .map_err(EngineError::counter(format!("{player} {} hand", sell.good)))?;
    round.hands[player][GoodType::Wildcard]
        .decrement(sell.wildcards)
        .map_err(EngineError::counter(format!("{player} wildcard hand")))?;
    round.discard[sell.good] += natural;
    round.discard[GoodType::Wildcard] += sell.wildcards;

    let stack = &mut round.good_tokens[sell.good];
    let had_tokens = !stack.is_empty();
    let drawn = stack.draw(sell.count);
    if had_tokens && stack.is_empty() {
        round.goods_fully_sold += 1;
        effects.stack_exhausted = true;
    }

    let mut points: u32 = drawn.iter().sum();
    round.good_tokens_taken[player] += drawn.len() as u32;

    effects.bonus = round.bonus_tokens.draw(sell.count);
    if let Some(bonus) = effects.bonus {
        points += bonus;
        round.bonus_tokens_taken[player] += 1;
    }

    round.scores[player] += points;
    effects.points = points;
    effects.tokens = drawn;
    Ok(())
}

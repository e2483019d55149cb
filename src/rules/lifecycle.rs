//! Round and match lifecycle.
//!
//! A round ends when a take sets the round-end trigger, or when enough token
//! stacks have been emptied. Settlement then:
//! 1. Awards the camel bonus to the unique herd leader
//! 2. Picks the round winner (score, bonus tokens, good tokens, lowest seat)
//! 3. Credits the round win and cumulative scores
//! 4. Ends the match, or deals the next round from a fork of the match RNG

use log::{debug, info};

use crate::core::{
    EngineResult, GameState, JaipurConfig, MatchStatus, PlayerId, PlayerMap, RoundOutcome,
    RoundPhase, RoundState,
};

use super::setup::new_round;

/// True when the round must be settled.
#[must_use]
pub fn round_should_end(round: &RoundState, config: &JaipurConfig) -> bool {
    round.end_triggered || round.goods_fully_sold >= config.goods_sold_for_round_end
}

/// Player with strictly the largest non-empty herd.
#[must_use]
pub fn camel_leader(round: &RoundState) -> Option<PlayerId> {
    let max = round.herds.values().map(|herd| herd.value()).max()?;
    if max == 0 {
        return None;
    }

    let mut leaders = round.herds.iter().filter(|(_, herd)| herd.value() == max);
    let (leader, _) = leaders.next()?;
    match leaders.next() {
        Some(_) => None,
        None => Some(leader),
    }
}

/// Best player of the round.
///
/// Highest score wins; ties go to more bonus tokens, then more good tokens,
/// then the lowest seat.
#[must_use]
pub fn round_winner(round: &RoundState) -> PlayerId {
    let mut best = PlayerId::new(0);
    for player in round.scores.player_ids().skip(1) {
        if rank_key(round, player) > rank_key(round, best) {
            best = player;
        }
    }
    best
}

fn rank_key(round: &RoundState, player: PlayerId) -> (u32, u32, u32) {
    (
        round.scores[player],
        round.bonus_tokens_taken[player],
        round.good_tokens_taken[player],
    )
}

/// Settle the current round and advance the match.
///
/// On return the state is either a fresh `Active` round or a finished match
/// whose last round is `Settled`.
pub fn settle_round(state: &mut GameState) -> EngineResult<RoundOutcome> {
    state.round.phase = RoundPhase::Ending;

    let camel_bonus = camel_leader(&state.round);
    if let Some(leader) = camel_bonus {
        let bonus = state.config().camel_bonus;
        state.round.scores[leader] += bonus;
        debug!(
            "{leader} takes the camel bonus with {} camels",
            state.round.herds[leader].value()
        );
    }

    let winner = round_winner(&state.round);
    state.rounds_won[winner] += 1;
    for player in state.player_ids() {
        state.total_scores[player] += state.round.scores[player];
    }

    let match_winner = (state.rounds_won[winner] >= state.config().round_wins_for_match)
        .then_some(winner);

    let outcome = RoundOutcome {
        round: state.round_number,
        scores: state.round.scores.clone(),
        herds: PlayerMap::new(state.player_count(), |p| state.round.herds[p].value()),
        camel_bonus,
        winner,
        rounds_won: state.rounds_won.clone(),
        match_winner,
    };
    state.round_results.push_back(outcome.clone());
    state.round.phase = RoundPhase::Settled;

    info!(
        "round {} won by {winner} with {} points",
        outcome.round, outcome.scores[winner]
    );

    match match_winner {
        Some(champion) => {
            state.status = MatchStatus::Ended { winner: champion };
            info!(
                "match won by {champion} after {} rounds, totals {:?}",
                state.round_number,
                state.total_scores.values().collect::<Vec<_>>()
            );
        }
        None => {
            state.round_number += 1;
            let mut round_rng = state.rng_mut().fork();
            new_round(state, &mut round_rng)?;
        }
    }

    Ok(outcome)
}

//! Match and round state.
//!
//! ## RoundState
//!
//! Everything rebuilt at each round boundary:
//! - Market, draw pile, discard tally
//! - Hands and herds
//! - Good-token stacks and bonus tiers
//! - Round scores and token tallies
//!
//! ## GameState
//!
//! The match: round number, round wins, cumulative scores, status, the
//! player to move, action history, and the current `RoundState`.
//!
//! `GameState::clone` is an exact, independent deep copy. Persistent
//! `im` vectors keep it cheap for tree search.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::JaipurConfig;
use super::error::{EngineError, EngineResult};
use super::goods::{counter_total, Counter, GoodMap, GoodType};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use super::tokens::{BonusTokens, TokenStack};

/// Whether the match is still being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Ended { winner: PlayerId },
}

/// Round lifecycle: `Active → Ending → Settled`.
///
/// Between actions a round is either `Active`, or `Settled` on the final
/// round of a finished match. `Ending` only exists during settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    Active,
    Ending,
    Settled,
}

/// Result of a settled round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Round number (starts at 1).
    pub round: u32,
    /// Final round scores, camel bonus included.
    pub scores: PlayerMap<u32>,
    /// Herd sizes at round end.
    pub herds: PlayerMap<u32>,
    /// Unique camel leader, if any.
    pub camel_bonus: Option<PlayerId>,
    /// Round winner.
    pub winner: PlayerId,
    /// Round wins after this round.
    pub rounds_won: PlayerMap<u32>,
    /// Set when this round decided the match.
    pub match_winner: Option<PlayerId>,
}

/// Per-round state, rebuilt by setup at each round boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Face-up cards per kind.
    pub market: GoodMap<Counter>,
    /// Face-down cards, drawn from the front.
    pub draw_pile: Vector<GoodType>,
    /// Cards sold this round.
    pub discard: GoodMap<u32>,
    /// Non-camel cards per player. The camel slot is always zero.
    pub hands: PlayerMap<GoodMap<Counter>>,
    /// Camels per player.
    pub herds: PlayerMap<Counter>,
    /// Token stack per tradeable good. Empty for camels and wildcards.
    pub good_tokens: GoodMap<TokenStack>,
    /// Bonus pools.
    pub bonus_tokens: BonusTokens,
    /// Points earned this round.
    pub scores: PlayerMap<u32>,
    /// Good tokens collected this round.
    pub good_tokens_taken: PlayerMap<u32>,
    /// Bonus tokens collected this round.
    pub bonus_tokens_taken: PlayerMap<u32>,
    /// Token stacks emptied this round.
    pub goods_fully_sold: u32,
    /// Set by a take that forces the round to end.
    pub end_triggered: bool,
    /// Lifecycle phase.
    pub phase: RoundPhase,
    /// Turn number within the round (starts at 1).
    pub turn: u32,
}

impl RoundState {
    /// Empty round with counters bounded by `config`.
    #[must_use]
    pub fn empty(config: &JaipurConfig, player_count: usize) -> Self {
        let hand = GoodMap::from_fn(|good| {
            Counter::new(if good.is_hand_good() { config.hand_limit } else { 0 })
        });

        Self {
            market: GoodMap::from_fn(|_| Counter::new(config.market_capacity)),
            draw_pile: Vector::new(),
            discard: GoodMap::default(),
            hands: PlayerMap::with_value(player_count, hand),
            herds: PlayerMap::with_value(player_count, Counter::new(config.max_camels())),
            good_tokens: GoodMap::default(),
            bonus_tokens: BonusTokens::default(),
            scores: PlayerMap::with_default(player_count),
            good_tokens_taken: PlayerMap::with_default(player_count),
            bonus_tokens_taken: PlayerMap::with_default(player_count),
            goods_fully_sold: 0,
            end_triggered: false,
            phase: RoundPhase::Active,
            turn: 1,
        }
    }

    /// Non-camel cards in a player's hand, wildcards included.
    #[must_use]
    pub fn hand_size(&self, player: PlayerId) -> u32 {
        counter_total(&self.hands[player])
    }

    /// Cards in a player's hand of one kind.
    #[must_use]
    pub fn hand_count(&self, player: PlayerId, good: GoodType) -> u32 {
        self.hands[player][good].value()
    }

    /// Cards in the market.
    #[must_use]
    pub fn market_size(&self) -> u32 {
        counter_total(&self.market)
    }

    /// Every card of the round: market, hands, herds, draw pile and discard.
    #[must_use]
    pub fn cards_accounted(&self) -> u32 {
        let hands: u32 = self.hands.values().map(counter_total).sum();
        let herds: u32 = self.herds.values().map(Counter::value).sum();
        self.market_size() + hands + herds + self.draw_pile.len() as u32 + self.discard.total()
    }
}

/// Complete match state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    config: Arc<JaipurConfig>,
    player_count: usize,

    /// Current round (starts at 1).
    pub round_number: u32,
    /// Rounds won per player.
    pub rounds_won: PlayerMap<u32>,
    /// Sum of settled round scores per player.
    pub total_scores: PlayerMap<u32>,
    /// Match status.
    pub status: MatchStatus,
    /// Player to move.
    pub current_player: PlayerId,
    /// The round being played.
    pub round: RoundState,
    /// Every applied action.
    pub history: Vector<ActionRecord>,
    /// Every settled round.
    pub round_results: Vector<RoundOutcome>,

    rng: GameRng,
}

impl GameState {
    /// Bare match with an empty round; setup deals the first round.
    pub(crate) fn empty(config: Arc<JaipurConfig>, player_count: usize, seed: u64) -> Self {
        let round = RoundState::empty(&config, player_count);
        Self {
            player_count,
            round_number: 1,
            rounds_won: PlayerMap::with_default(player_count),
            total_scores: PlayerMap::with_default(player_count),
            status: MatchStatus::InProgress,
            current_player: PlayerId::new(0),
            round,
            history: Vector::new(),
            round_results: Vector::new(),
            rng: GameRng::new(seed),
            config,
        }
    }

    /// Rules in force for this match.
    #[must_use]
    pub fn config(&self) -> &JaipurConfig {
        &self.config
    }

    /// Shared handle to the rules.
    #[must_use]
    pub fn config_arc(&self) -> Arc<JaipurConfig> {
        Arc::clone(&self.config)
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Iterate over all seats.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count)
    }

    /// True once a player has won the match.
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.status, MatchStatus::Ended { .. })
    }

    /// Match winner, once decided.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            MatchStatus::Ended { winner } => Some(winner),
            MatchStatus::InProgress => None,
        }
    }

    /// Match generator; rounds shuffle with forks of it.
    pub(crate) fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Check conservation and bounds of the round.
    ///
    /// Counters already refuse to leave their bounds; this also checks the
    /// card total and the market capacity.
    pub fn check_invariants(&self) -> EngineResult<()> {
        let expected = self.config.deck_total();
        let actual = self.round.cards_accounted();
        if actual != expected {
            return Err(EngineError::InternalConsistency(format!(
                "round {} accounts for {actual} cards, deck holds {expected}",
                self.round_number
            )));
        }
        if self.round.market_size() > self.config.market_capacity {
            return Err(EngineError::InternalConsistency(format!(
                "market holds {} cards, capacity {}",
                self.round.market_size(),
                self.config.market_capacity
            )));
        }
        Ok(())
    }

    /// Encode the full state for a read-only observer.
    pub fn snapshot(&self) -> EngineResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Restore a state from `snapshot` bytes.
    pub fn from_snapshot(bytes: &[u8]) -> EngineResult<Self> {
        bincode::deserialize(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> GameState {
        GameState::empty(Arc::new(JaipurConfig::default()), 2, 42)
    }

    #[test]
    fn test_empty_round_bounds() {
        let config = JaipurConfig::default();
        let round = RoundState::empty(&config, 3);

        assert_eq!(round.hands.player_count(), 3);
        assert_eq!(round.hands[PlayerId::new(0)][GoodType::Gold].max(), 7);
        assert_eq!(round.hands[PlayerId::new(0)][GoodType::Camel].max(), 0);
        assert_eq!(round.herds[PlayerId::new(2)].max(), 11);
        assert_eq!(round.market[GoodType::Camel].max(), 5);
        assert_eq!(round.cards_accounted(), 0);
    }

    #[test]
    fn test_hand_size_excludes_herd() {
        let mut state = bare();
        let p0 = PlayerId::new(0);
        state.round.hands[p0][GoodType::Spice].set(2).unwrap();
        state.round.hands[p0][GoodType::Wildcard].set(1).unwrap();
        state.round.herds[p0].set(4).unwrap();

        assert_eq!(state.round.hand_size(p0), 3);
        assert_eq!(state.round.hand_count(p0, GoodType::Spice), 2);
        assert_eq!(state.round.cards_accounted(), 7);
    }

    #[test]
    fn test_status_helpers() {
        let mut state = bare();
        assert!(!state.is_over());
        assert_eq!(state.winner(), None);

        state.status = MatchStatus::Ended { winner: PlayerId::new(1) };
        assert!(state.is_over());
        assert_eq!(state.winner(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_invariant_check_reports_missing_cards() {
        let state = bare();
        let err = state.check_invariants().unwrap_err();
        assert!(matches!(err, EngineError::InternalConsistency(_)));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = bare();
        state.round.draw_pile.push_back(GoodType::Gold);

        let mut copy = state.clone();
        assert_eq!(copy, state);

        copy.round.draw_pile.pop_front();
        copy.round.scores[PlayerId::new(0)] = 9;
        copy.rng_mut().gen_range_usize(0..10);

        assert_eq!(state.round.draw_pile.len(), 1);
        assert_eq!(state.round.scores[PlayerId::new(0)], 0);
        assert_ne!(copy, state);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = bare();
        state.round.market[GoodType::Camel].set(3).unwrap();
        state.rng_mut().gen_range_usize(0..10);

        let bytes = state.snapshot().unwrap();
        let restored = GameState::from_snapshot(&bytes).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        assert!(matches!(
            GameState::from_snapshot(&[1, 2, 3]),
            Err(EngineError::Snapshot(_))
        ));
    }
}

//! State encoders.

use crate::core::{GameState, GoodType, PlayerId, BONUS_TIERS, GOOD_COUNT};

/// Encodes a state as a flat feature vector from one player's perspective.
///
/// Implementations must hide what the perspective player cannot see: the
/// contents of other hands and the order of the draw pile.
pub trait StateEncoder: Send + Sync {
    /// Features of `state` as seen by `perspective`.
    fn encode(&self, state: &GameState, perspective: PlayerId) -> Vec<f32>;

    /// Length of every vector `encode` returns.
    fn feature_count(&self) -> usize;

    /// Table size this encoder was built for.
    fn player_count(&self) -> usize;
}

/// Feature encoder for Jaipur.
///
/// Layout, with seats listed starting from the perspective player:
/// - Market count per card kind (8)
/// - Own hand count per card kind (8), own herd (1)
/// - Hand size and herd of each other seat (2 per seat)
/// - Per tradeable good: remaining stack share and top token value (12)
/// - Remaining share of each bonus tier (3)
/// - Round score per seat, round wins per seat
/// - Exhausted-stack progress, draw pile share, to-move flag (3)
///
/// Every feature lies in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct JaipurEncoder {
    player_count: usize,
    score_scale: f32,
    token_scale: f32,
}

impl JaipurEncoder {
    /// Encoder for a table of `player_count`.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            score_scale: 100.0,
            token_scale: 10.0,
        }
    }

    /// Round score mapped to 1.0.
    #[must_use]
    pub fn with_score_scale(mut self, scale: f32) -> Self {
        self.score_scale = scale;
        self
    }

    /// Token value mapped to 1.0.
    #[must_use]
    pub fn with_token_scale(mut self, scale: f32) -> Self {
        self.token_scale = scale;
        self
    }

    fn seat(&self, perspective: PlayerId, offset: usize) -> PlayerId {
        PlayerId::new(((perspective.index() + offset) % self.player_count) as u8)
    }
}

/// `value / max` clamped to `[0, 1]`; 0 when `max` is 0.
fn ratio(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max).clamp(0.0, 1.0)
    }
}

impl StateEncoder for JaipurEncoder {
    fn encode(&self, state: &GameState, perspective: PlayerId) -> Vec<f32> {
        let config = state.config();
        let round = &state.round;
        let hand_limit = config.hand_limit as f32;
        let max_camels = config.max_camels() as f32;
        let mut features = Vec::with_capacity(self.feature_count());

        // Market and own cards
        for good in GoodType::ALL {
            features.push(ratio(
                round.market[good].value() as f32,
                config.market_capacity as f32,
            ));
        }
        for good in GoodType::ALL {
            features.push(ratio(round.hand_count(perspective, good) as f32, hand_limit));
        }
        features.push(ratio(round.herds[perspective].value() as f32, max_camels));

        // Other seats, sizes only
        for offset in 1..self.player_count {
            let seat = self.seat(perspective, offset);
            if seat.index() < state.player_count() {
                features.push(ratio(round.hand_size(seat) as f32, hand_limit));
                features.push(ratio(round.herds[seat].value() as f32, max_camels));
            } else {
                features.extend([0.0, 0.0]);
            }
        }

        for good in GoodType::TRADEABLE {
            let stack = &round.good_tokens[good];
            features.push(ratio(
                stack.len() as f32,
                config.token_progression[good].len() as f32,
            ));
            features.push(ratio(stack.top().unwrap_or(0) as f32, self.token_scale));
        }

        for tier in 0..BONUS_TIERS {
            features.push(ratio(
                round.bonus_tokens.remaining(tier) as f32,
                config.bonus_tokens[tier].len() as f32,
            ));
        }

        let wins_needed = config.round_wins_for_match as f32;
        for offset in 0..self.player_count {
            let seat = self.seat(perspective, offset);
            let score = if seat.index() < state.player_count() {
                round.scores[seat] as f32
            } else {
                0.0
            };
            features.push(ratio(score, self.score_scale));
        }
        for offset in 0..self.player_count {
            let seat = self.seat(perspective, offset);
            let wins = if seat.index() < state.player_count() {
                state.rounds_won[seat] as f32
            } else {
                0.0
            };
            features.push(ratio(wins, wins_needed));
        }

        features.push(ratio(
            round.goods_fully_sold as f32,
            config.goods_sold_for_round_end as f32,
        ));
        features.push(ratio(
            round.draw_pile.len() as f32,
            config.deck_total() as f32,
        ));
        features.push(if state.current_player == perspective { 1.0 } else { 0.0 });

        features
    }

    fn feature_count(&self) -> usize {
        let others = self.player_count.saturating_sub(1);
        2 * GOOD_COUNT + 1 + 2 * others + 2 * GoodType::TRADEABLE.len() + BONUS_TIERS
            + 2 * self.player_count
            + 3
    }

    fn player_count(&self) -> usize {
        self.player_count
    }
}

//! Match driver.
//!
//! Each step:
//! 1. List the legal actions for the player to move
//! 2. Ask that player's `Player` for one
//! 3. Check it was on the list
//! 4. Apply it
//! 5. Publish the resulting events
//!
//! until the match is over or the action cap is hit. Errors from a player
//! end the run and are returned untouched.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, EngineError, EngineResult, GameState, JaipurConfig};
use crate::events::{EventBus, GameEvent};
use crate::rules::{new_match, GameResult, JaipurRules, RulesEngine};

use super::player::Player;

/// Runner limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Applied actions after which the match is declared runaway.
    pub max_actions: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { max_actions: 10_000 }
    }
}

impl RunnerConfig {
    /// Set the action cap.
    #[must_use]
    pub fn with_max_actions(mut self, max: u32) -> Self {
        self.max_actions = max;
        self
    }
}

/// Drives a match to the end with one `Player` per seat.
#[derive(Clone, Debug, Default)]
pub struct MatchRunner<E: RulesEngine = JaipurRules> {
    engine: E,
    config: RunnerConfig,
}

impl MatchRunner<JaipurRules> {
    /// Runner for the Jaipur rules.
    #[must_use]
    pub fn jaipur(config: RunnerConfig) -> Self {
        Self::new(JaipurRules, config)
    }

    /// Deal a match for `players` and play it out.
    pub fn play_match(
        &self,
        config: JaipurConfig,
        seed: u64,
        players: &mut [&mut dyn Player],
        bus: &mut EventBus<'_>,
    ) -> EngineResult<(GameState, GameResult)> {
        let mut state = new_match(config, players.len(), seed)?;
        let result = self.run(&mut state, players, bus)?;
        Ok((state, result))
    }
}

impl<E: RulesEngine> MatchRunner<E> {
    /// Create a runner.
    pub fn new(engine: E, config: RunnerConfig) -> Self {
        Self { engine, config }
    }

    /// Runner limits.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Play `state` to the end. `players[i]` moves for seat `i`.
    ///
    /// Fails with `IllegalAction` when a player answers with an action that
    /// was not offered, and with `InternalConsistency` when the action cap
    /// is reached. A player's own error is passed through.
    pub fn run(
        &self,
        state: &mut GameState,
        players: &mut [&mut dyn Player],
        bus: &mut EventBus<'_>,
    ) -> EngineResult<GameResult> {
        if players.len() != state.player_count() {
            return Err(ConfigError::PlayerCount {
                count: players.len(),
                min: state.player_count(),
                max: state.player_count(),
            }
            .into());
        }

        let mut applied = 0;
        loop {
            if let Some(result) = self.engine.is_terminal(state) {
                info!(
                    "match over after {applied} actions, {} wins",
                    result.winner
                );
                return Ok(result);
            }
            if applied >= self.config.max_actions {
                return Err(EngineError::InternalConsistency(format!(
                    "match still running after {applied} actions"
                )));
            }

            let mover = self.engine.current_player(state);
            let actions = self.engine.legal_actions(state)?;
            let player = &mut players[mover.index()];
            let action = player.choose_action(state, &actions)?;

            if !actions.contains(&action) {
                return Err(EngineError::illegal(
                    mover,
                    &action,
                    format!("{} chose an action that was not offered", player.name()),
                ));
            }

            let effects = self.engine.apply_action(state, &action)?;
            applied += 1;

            if let Some(outcome) = &effects.round_outcome {
                debug!("round {} settled, {} won it", outcome.round, outcome.winner);
            }
            bus.publish_all(&GameEvent::from_effects(&effects, state), state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, GoodType, PlayerId};
    use crate::events::{EventKind, MetricsCollector};
    use crate::players::{FirstActionPlayer, GreedyPlayer, RandomPlayer};

    struct Stubborn;

    impl Player for Stubborn {
        fn choose_action(
            &mut self,
            _state: &GameState,
            _actions: &[Action],
        ) -> EngineResult<Action> {
            Ok(Action::sell(GoodType::Camel, 4))
        }
    }

    /// Plays first actions until its budget runs out, then fails.
    struct Broken {
        budget: u32,
    }

    impl Player for Broken {
        fn choose_action(
            &mut self,
            _state: &GameState,
            actions: &[Action],
        ) -> EngineResult<Action> {
            if self.budget == 0 {
                return Err(EngineError::InternalConsistency("player lost track".to_string()));
            }
            self.budget -= 1;
            Ok(actions[0])
        }
    }

    #[test]
    fn test_first_action_players_finish() {
        let runner = MatchRunner::jaipur(RunnerConfig::default());
        let (mut a, mut b) = (FirstActionPlayer, FirstActionPlayer);
        let mut bus = EventBus::new();

        let (state, result) = runner
            .play_match(JaipurConfig::default(), 4, &mut [&mut a, &mut b], &mut bus)
            .unwrap();

        assert!(state.is_over());
        assert_eq!(state.winner(), Some(result.winner));
        assert_eq!(result.rounds_won[result.winner], 2);
    }

    #[test]
    fn test_runner_publishes_every_action() {
        let runner = MatchRunner::jaipur(RunnerConfig::default());
        let mut collector = MetricsCollector::jaipur();
        let (mut a, mut b, mut c) = (RandomPlayer::new(1), GreedyPlayer, RandomPlayer::new(2));

        let (state, _) = {
            let mut bus = EventBus::new().with_listener(&mut collector);
            runner
                .play_match(
                    JaipurConfig::default(),
                    9,
                    &mut [&mut a, &mut b, &mut c],
                    &mut bus,
                )
                .unwrap()
        };

        let games = collector
            .rows()
            .iter()
            .filter(|row| row.event == EventKind::GameOver)
            .count();
        assert_eq!(games, 1);
        assert_eq!(
            collector.rows_for("WinRoundsWithMoreCamels").count(),
            state.round_results.len()
        );
    }

    #[test]
    fn test_unoffered_action_is_rejected() {
        let runner = MatchRunner::jaipur(RunnerConfig::default());
        let (mut a, mut b) = (Stubborn, FirstActionPlayer);
        let mut bus = EventBus::new();

        let err = runner
            .play_match(JaipurConfig::default(), 4, &mut [&mut a, &mut b], &mut bus)
            .unwrap_err();

        match err {
            EngineError::IllegalAction { player, reason, .. } => {
                assert_eq!(player, PlayerId::new(0));
                assert!(reason.contains("not offered"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_player_error_stops_the_match() {
        let runner = MatchRunner::jaipur(RunnerConfig::default());
        let mut state = new_match(JaipurConfig::default(), 2, 4).unwrap();
        let (mut a, mut b) = (FirstActionPlayer, Broken { budget: 2 });
        let mut bus = EventBus::new();

        let err = runner
            .run(&mut state, &mut [&mut a, &mut b], &mut bus)
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::InternalConsistency("player lost track".to_string())
        );
        assert_eq!(state.history.len(), 5);
        assert!(!state.is_over());
    }

    #[test]
    fn test_action_cap() {
        let runner = MatchRunner::jaipur(RunnerConfig::default().with_max_actions(3));
        let (mut a, mut b) = (RandomPlayer::new(1), RandomPlayer::new(2));
        let mut bus = EventBus::new();

        let err = runner
            .play_match(JaipurConfig::default(), 4, &mut [&mut a, &mut b], &mut bus)
            .unwrap_err();
        assert!(matches!(err, EngineError::InternalConsistency(_)));
    }

    #[test]
    fn test_seat_count_must_match() {
        let runner = MatchRunner::jaipur(RunnerConfig::default());
        let mut state = new_match(JaipurConfig::default(), 3, 1).unwrap();
        let (mut a, mut b) = (FirstActionPlayer, FirstActionPlayer);

        let err = runner
            .run(&mut state, &mut [&mut a, &mut b], &mut EventBus::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }
}

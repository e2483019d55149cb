//! Event publication and metric collection over full matches.

use rust_jaipur::core::{GameState, JaipurConfig};
use rust_jaipur::events::{
    EventBus, EventKind, GameEvent, MetricValue, MetricsCollector, MetricsListener,
};
use rust_jaipur::players::{GreedyPlayer, MatchRunner, RandomPlayer, RunnerConfig};

/// Counts events and checks the state it is shown.
#[derive(Default)]
struct Auditor {
    actions: usize,
    rounds: usize,
    games: usize,
}

impl MetricsListener for Auditor {
    fn on_event(&mut self, event: &GameEvent, state: &GameState) {
        state.check_invariants().unwrap();
        match event {
            GameEvent::ActionApplied(effects) => {
                self.actions += 1;
                assert_eq!(state.history.back().map(|r| r.action), Some(effects.action));
            }
            GameEvent::RoundOver(outcome) => {
                self.rounds += 1;
                assert_eq!(state.round_results.back(), Some(outcome));
            }
            GameEvent::GameOver(result) => {
                self.games += 1;
                assert_eq!(state.winner(), Some(result.winner));
            }
        }
    }
}

#[test]
fn test_events_follow_the_match() {
    let runner = MatchRunner::jaipur(RunnerConfig::default());
    let mut auditor = Auditor::default();
    let mut collector = MetricsCollector::jaipur();
    let (mut a, mut b) = (RandomPlayer::new(10), GreedyPlayer);

    let (state, _) = {
        let mut bus = EventBus::new()
            .with_listener(&mut auditor)
            .with_listener(&mut collector);
        runner
            .play_match(JaipurConfig::default(), 31, &mut [&mut a, &mut b], &mut bus)
            .unwrap()
    };

    assert_eq!(auditor.actions, state.history.len());
    assert_eq!(auditor.rounds, state.round_results.len());
    assert_eq!(auditor.games, 1);

    let takes = state.history.iter().filter(|r| r.action.is_take()).count();
    assert_eq!(collector.rows_for("PurchaseFromMarket").count(), takes);
    assert_eq!(
        collector.rows_for("RoundScoreDifference").count(),
        state.round_results.len()
    );

    let first_won = collector
        .rows_for("WinGamesFirstPlayer")
        .map(|row| row.values["WinGames"].clone())
        .collect::<Vec<_>>();
    let expected = i64::from(state.winner().map(|w| w.index()) == Some(0));
    assert_eq!(first_won, vec![MetricValue::Int(expected)]);
}

#[test]
fn test_kind_filtered_listener() {
    struct RoundsOnly(Vec<EventKind>);

    impl MetricsListener for RoundsOnly {
        fn event_kinds(&self) -> Vec<EventKind> {
            vec![EventKind::RoundOver]
        }

        fn on_event(&mut self, event: &GameEvent, _state: &GameState) {
            self.0.push(event.kind());
        }
    }

    let runner = MatchRunner::jaipur(RunnerConfig::default());
    let mut rounds = RoundsOnly(Vec::new());
    let (mut a, mut b) = (RandomPlayer::new(1), RandomPlayer::new(2));

    let (state, _) = {
        let mut bus = EventBus::new().with_listener(&mut rounds);
        runner
            .play_match(JaipurConfig::default(), 5, &mut [&mut a, &mut b], &mut bus)
            .unwrap()
    };

    assert_eq!(rounds.0.len(), state.round_results.len());
    assert!(rounds.0.iter().all(|&k| k == EventKind::RoundOver));
}

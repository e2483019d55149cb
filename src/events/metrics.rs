//! Metric collection over lifecycle events.
//!
//! A `Metric` turns one event into a record of named values. The
//! `MetricsCollector` runs its metrics on the kinds each one asks for and
//! keeps every record produced, tagged with the metric name, event kind and
//! round.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Action, GameState, GoodType, PlayerId};

use super::bus::MetricsListener;
use super::event::{EventKind, GameEvent};

/// Column values written by metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Integer value, if this is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetricValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value as `f64`.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetricValue::Int(v) => Some(*v as f64),
            MetricValue::Float(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }
}

/// Named values produced by one metric for one event.
pub type Record = FxHashMap<String, MetricValue>;

/// A measurement taken on lifecycle events.
pub trait Metric {
    /// Name used to tag records.
    fn name(&self) -> &'static str;

    /// Kinds this metric runs on.
    fn event_kinds(&self) -> Vec<EventKind>;

    /// Column names this metric may write.
    fn columns(&self) -> Vec<String>;

    /// Fill `record`; return `false` when the event is not relevant.
    fn run(&self, event: &GameEvent, state: &GameState, record: &mut Record) -> bool;
}

/// One stored record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub metric: String,
    pub event: EventKind,
    pub round: u32,
    pub values: Record,
}

/// Listener running a set of metrics and keeping their records.
#[derive(Default)]
pub struct MetricsCollector {
    metrics: Vec<Box<dyn Metric>>,
    rows: Vec<MetricRow>,
}

impl MetricsCollector {
    /// Collector with no metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector with the four built-in Jaipur metrics.
    #[must_use]
    pub fn jaipur() -> Self {
        Self::new()
            .with_metric(RoundScoreDifference)
            .with_metric(PurchaseFromMarket::new())
            .with_metric(WinGamesFirstPlayer)
            .with_metric(WinRoundsWithMoreCamels)
    }

    /// Add a metric (builder pattern).
    #[must_use]
    pub fn with_metric(mut self, metric: impl Metric + 'static) -> Self {
        self.metrics.push(Box::new(metric));
        self
    }

    /// All records so far.
    #[must_use]
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// Records of one metric.
    pub fn rows_for<'a>(&'a self, metric: &'a str) -> impl Iterator<Item = &'a MetricRow> + 'a {
        self.rows.iter().filter(move |row| row.metric == metric)
    }

    /// Every column any metric may write, sorted.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self.metrics.iter().flat_map(|m| m.columns()).collect();
        columns.sort();
        columns.dedup();
        columns
    }

    /// Drop stored records.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

impl MetricsListener for MetricsCollector {
    fn event_kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = Vec::new();
        for kind in self.metrics.iter().flat_map(|m| m.event_kinds()) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    fn on_event(&mut self, event: &GameEvent, state: &GameState) {
        let kind = event.kind();
        let round = match event {
            GameEvent::RoundOver(outcome) => outcome.round,
            _ => state.round_number,
        };

        for metric in &self.metrics {
            if !metric.event_kinds().contains(&kind) {
                continue;
            }
            let mut values = Record::default();
            if metric.run(event, state, &mut values) {
                self.rows.push(MetricRow {
                    metric: metric.name().to_string(),
                    event: kind,
                    round,
                    values,
                });
            }
        }
    }
}

impl std::fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("metrics", &self.metrics.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("rows", &self.rows.len())
            .finish()
    }
}

// === Built-in Metrics ===

/// Mean absolute score gap between neighbouring seats at round end.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundScoreDifference;

impl Metric for RoundScoreDifference {
    fn name(&self) -> &'static str {
        "RoundScoreDifference"
    }

    fn event_kinds(&self) -> Vec<EventKind> {
        vec![EventKind::RoundOver]
    }

    fn columns(&self) -> Vec<String> {
        vec!["ScoreDiff".to_string()]
    }

    fn run(&self, event: &GameEvent, _state: &GameState, record: &mut Record) -> bool {
        let GameEvent::RoundOver(outcome) = event else {
            return false;
        };
        let scores: Vec<u32> = outcome.scores.values().copied().collect();
        if scores.len() < 2 {
            return false;
        }

        let total: u32 = scores.windows(2).map(|w| w[0].abs_diff(w[1])).sum();
        let diff = f64::from(total) / (scores.len() - 1) as f64;
        record.insert("ScoreDiff".to_string(), MetricValue::Float(diff));
        true
    }
}

/// Which good a take bought from the market, and how many.
#[derive(Clone, Debug)]
pub struct PurchaseFromMarket {
    goods: Vec<GoodType>,
}

impl PurchaseFromMarket {
    /// Track every kind of card.
    #[must_use]
    pub fn new() -> Self {
        Self {
            goods: GoodType::ALL.to_vec(),
        }
    }

    /// Track only `goods`.
    #[must_use]
    pub fn for_goods(goods: &[GoodType]) -> Self {
        Self {
            goods: goods.to_vec(),
        }
    }
}

impl Default for PurchaseFromMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl Metric for PurchaseFromMarket {
    fn name(&self) -> &'static str {
        "PurchaseFromMarket"
    }

    fn event_kinds(&self) -> Vec<EventKind> {
        vec![EventKind::ActionApplied]
    }

    fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> =
            self.goods.iter().map(|good| format!("Purchase-{good}")).collect();
        columns.push("Purchase".to_string());
        columns
    }

    fn run(&self, event: &GameEvent, _state: &GameState, record: &mut Record) -> bool {
        let GameEvent::ActionApplied(effects) = event else {
            return false;
        };
        let Action::Take(take) = effects.action else {
            return false;
        };

        for &good in &self.goods {
            let n = take.take[good];
            if n > 0 {
                record.insert(format!("Purchase-{good}"), MetricValue::Int(i64::from(n)));
                record.insert("Purchase".to_string(), MetricValue::Text(good.to_string()));
            }
        }
        true
    }
}

/// 1 when the seat that opens each round won the match.
#[derive(Clone, Copy, Debug, Default)]
pub struct WinGamesFirstPlayer;

impl Metric for WinGamesFirstPlayer {
    fn name(&self) -> &'static str {
        "WinGamesFirstPlayer"
    }

    fn event_kinds(&self) -> Vec<EventKind> {
        vec![EventKind::GameOver]
    }

    fn columns(&self) -> Vec<String> {
        vec!["WinGames".to_string()]
    }

    fn run(&self, event: &GameEvent, _state: &GameState, record: &mut Record) -> bool {
        let GameEvent::GameOver(result) = event else {
            return false;
        };
        let won = result.is_winner(PlayerId::new(0));
        record.insert("WinGames".to_string(), MetricValue::Int(i64::from(won)));
        true
    }
}

/// 1 when the unique camel leader also won the round.
#[derive(Clone, Copy, Debug, Default)]
pub struct WinRoundsWithMoreCamels;

impl Metric for WinRoundsWithMoreCamels {
    fn name(&self) -> &'static str {
        "WinRoundsWithMoreCamels"
    }

    fn event_kinds(&self) -> Vec<EventKind> {
        vec![EventKind::RoundOver]
    }

    fn columns(&self) -> Vec<String> {
        vec!["WinRound".to_string()]
    }

    fn run(&self, event: &GameEvent, _state: &GameState, record: &mut Record) -> bool {
        let GameEvent::RoundOver(outcome) = event else {
            return false;
        };
        let won = outcome.camel_bonus == Some(outcome.winner);
        record.insert("WinRound".to_string(), MetricValue::Int(i64::from(won)));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JaipurConfig, PlayerMap, RoundOutcome};
    use crate::rules::{new_match, AppliedEffects, GameResult};

    fn outcome(scores: &[u32], camel_bonus: Option<u8>, winner: u8) -> RoundOutcome {
        let map = PlayerMap::new(scores.len(), |p| scores[p.index()]);
        RoundOutcome {
            round: 1,
            scores: map.clone(),
            herds: PlayerMap::with_default(scores.len()),
            camel_bonus: camel_bonus.map(PlayerId::new),
            winner: PlayerId::new(winner),
            rounds_won: PlayerMap::with_default(scores.len()),
            match_winner: None,
        }
    }

    fn state() -> GameState {
        new_match(JaipurConfig::default(), 3, 1).unwrap()
    }

    #[test]
    fn test_score_difference_averages_neighbours() {
        let mut record = Record::default();
        let event = GameEvent::RoundOver(outcome(&[10, 4, 9], None, 0));
        assert!(RoundScoreDifference.run(&event, &state(), &mut record));
        // (6 + 5) / 2
        assert_eq!(record["ScoreDiff"], MetricValue::Float(5.5));
    }

    #[test]
    fn test_purchase_records_taken_good() {
        let effects: AppliedEffects = {
            let mut s = new_match(JaipurConfig::default(), 2, 4).unwrap();
            let camels = s.round.market[GoodType::Camel].value();
            crate::rules::apply(&mut s, &Action::take_camels(camels)).unwrap()
        };
        let Action::Take(take) = effects.action else {
            panic!("expected take");
        };
        let camels = take.take[GoodType::Camel];

        let mut record = Record::default();
        let event = GameEvent::ActionApplied(effects);
        assert!(PurchaseFromMarket::new().run(&event, &state(), &mut record));
        assert_eq!(record["Purchase-Camel"], MetricValue::Int(i64::from(camels)));
        assert_eq!(record["Purchase"], MetricValue::Text("Camel".to_string()));

        let mut ignored = Record::default();
        assert!(!PurchaseFromMarket::for_goods(&[GoodType::Gold]).run(
            &GameEvent::RoundOver(outcome(&[1, 2], None, 1)),
            &state(),
            &mut ignored
        ));
    }

    #[test]
    fn test_first_player_win() {
        let mut record = Record::default();
        let event = GameEvent::GameOver(GameResult {
            winner: PlayerId::new(0),
            rounds_won: PlayerMap::with_default(2),
            total_scores: PlayerMap::with_default(2),
        });
        assert!(WinGamesFirstPlayer.run(&event, &state(), &mut record));
        assert_eq!(record["WinGames"].as_int(), Some(1));
    }

    #[test]
    fn test_camel_leader_round_win() {
        let mut record = Record::default();
        let event = GameEvent::RoundOver(outcome(&[20, 10], Some(0), 0));
        WinRoundsWithMoreCamels.run(&event, &state(), &mut record);
        assert_eq!(record["WinRound"].as_int(), Some(1));

        let event = GameEvent::RoundOver(outcome(&[20, 10], None, 0));
        WinRoundsWithMoreCamels.run(&event, &state(), &mut record);
        assert_eq!(record["WinRound"].as_int(), Some(0));
    }

    #[test]
    fn test_collector_tags_rows() {
        let mut collector = MetricsCollector::jaipur();
        let kinds = collector.event_kinds();
        assert_eq!(kinds.len(), 3);
        assert!(collector.columns().contains(&"WinRound".to_string()));

        let state = state();
        collector.on_event(&GameEvent::RoundOver(outcome(&[3, 8, 1], Some(1), 1)), &state);

        assert_eq!(collector.rows().len(), 2);
        let row = collector.rows_for("WinRoundsWithMoreCamels").next().unwrap();
        assert_eq!(row.event, EventKind::RoundOver);
        assert_eq!(row.round, 1);
        assert_eq!(row.values["WinRound"].as_float(), Some(1.0));

        collector.clear();
        assert!(collector.rows().is_empty());
    }
}

//! Lifecycle events and metric listeners.
//!
//! The match runner publishes `ActionApplied`, `RoundOver` and `GameOver`
//! after each transition. Listeners only ever read the state.

pub mod bus;
pub mod event;
pub mod metrics;

pub use bus::{EventBus, MetricsListener};
pub use event::{EventKind, GameEvent};
pub use metrics::{
    Metric, MetricRow, MetricValue, MetricsCollector, PurchaseFromMarket, Record,
    RoundScoreDifference, WinGamesFirstPlayer, WinRoundsWithMoreCamels,
};

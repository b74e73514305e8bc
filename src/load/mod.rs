//! Session loads, weekly aggregation and squad statistics.

pub mod aggregator;
pub mod team;
pub mod types;

pub use aggregator::WeeklyAggregator;
pub use team::{MetricSpread, TeamWeekStats, WeeklyZScores};
pub use types::{week_end, week_start, LoadError, LoadRecord, WeeklyMetric};

//! LoadRisk - Training-Load Risk Engine
//!
//! Computes weekly injury-risk metrics for football squads from session-RPE
//! training loads: monotony, strain, acute:chronic workload ratio and
//! squad Z-scores, each mapped onto green / yellow / red bands.

pub mod load;
pub mod metrics;
pub mod storage;

// Re-export commonly used types
pub use load::{LoadRecord, TeamWeekStats, WeeklyAggregator, WeeklyMetric};
pub use metrics::{MetricsCalculator, RiskClassifier, RiskLevel};
pub use storage::config::AppConfig;
pub use storage::database::Database;

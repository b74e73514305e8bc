//! Squad-level statistics for one week and per-athlete Z-scores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::WeeklyMetric;
use crate::metrics::stats::mean_and_std;
use crate::metrics::MetricsCalculator;

/// Mean and sample standard deviation of one metric across athletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSpread {
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

impl MetricSpread {
    fn from_values<I: IntoIterator<Item = Option<f64>>>(values: I) -> Self {
        let (mean, std) = mean_and_std(values);
        Self { mean, std }
    }

    /// Z-score of `value` against this spread.
    pub fn z_score(&self, value: Option<f64>) -> Option<f64> {
        match (value, self.mean, self.std) {
            (Some(v), Some(m), Some(s)) => MetricsCalculator::z_score(v, m, s),
            _ => None,
        }
    }
}

/// Squad statistics for one week. Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWeekStats {
    pub week_start: NaiveDate,
    pub athlete_count: usize,
    pub total_load: MetricSpread,
    pub monotony: MetricSpread,
    pub strain: MetricSpread,
    pub acwr: MetricSpread,
}

/// An athlete's weekly metrics relative to the squad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyZScores {
    pub athlete_id: Uuid,
    pub week_start: NaiveDate,
    pub total_load_z: Option<f64>,
    pub monotony_z: Option<f64>,
    pub strain_z: Option<f64>,
    pub acwr_z: Option<f64>,
}

impl TeamWeekStats {
    /// Build from the rows of one week. Rows from other weeks are ignored.
    pub fn from_metrics(week_start: NaiveDate, metrics: &[WeeklyMetric]) -> Self {
        let week: Vec<&WeeklyMetric> = metrics
            .iter()
            .filter(|m| m.week_start == week_start)
            .collect();

        Self {
            week_start,
            athlete_count: week.len(),
            total_load: MetricSpread::from_values(week.iter().map(|m| Some(m.total_load))),
            monotony: MetricSpread::from_values(week.iter().map(|m| m.monotony)),
            strain: MetricSpread::from_values(week.iter().map(|m| m.strain)),
            acwr: MetricSpread::from_values(week.iter().map(|m| m.acwr)),
        }
    }

    /// Z-scores of one athlete's row against these statistics.
    pub fn z_scores_for(&self, metric: &WeeklyMetric) -> WeeklyZScores {
        WeeklyZScores {
            athlete_id: metric.athlete_id,
            week_start: metric.week_start,
            total_load_z: self.total_load.z_score(Some(metric.total_load)),
            monotony_z: self.monotony.z_score(metric.monotony),
            strain_z: self.strain.z_score(metric.strain),
            acwr_z: self.acwr.z_score(metric.acwr),
        }
    }

    /// Z-scores for every athlete row of this week.
    pub fn z_scores(&self, metrics: &[WeeklyMetric]) -> Vec<WeeklyZScores> {
        metrics
            .iter()
            .filter(|m| m.week_start == self.week_start)
            .map(|m| self.z_scores_for(m))
            .collect()
    }
}

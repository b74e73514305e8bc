//! Weekly aggregation of session loads into per-athlete metrics.
//!
//! Weeks start on Monday. Weekly totals are calendar-bucketed, but
//! monotony slides over the chronological sequence of workouts, so a
//! week's monotony can include sessions from the week before.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use super::types::{week_end, LoadRecord, WeeklyMetric};
use crate::metrics::stats::{mean, sample_std};
use crate::metrics::{MetricsCalculator, RiskClassifier};

/// Builds `WeeklyMetric` rows from raw load records.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyAggregator {
    calculator: MetricsCalculator,
    classifier: RiskClassifier,
}

impl WeeklyAggregator {
    /// Create with default windows and thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a configured calculator and classifier.
    pub fn with_parts(calculator: MetricsCalculator, classifier: RiskClassifier) -> Self {
        Self {
            calculator,
            classifier,
        }
    }

    pub fn calculator(&self) -> &MetricsCalculator {
        &self.calculator
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    /// Compute one row per week for a single athlete.
    ///
    /// Records belonging to other athletes are ignored. Weeks with no
    /// sessions between the first and last recorded week are still emitted
    /// (zero totals) so the rolling windows stay contiguous.
    pub fn aggregate_athlete(&self, athlete_id: Uuid, records: &[LoadRecord]) -> Vec<WeeklyMetric> {
        let mut sessions: Vec<&LoadRecord> = records
            .iter()
            .filter(|r| r.athlete_id == athlete_id)
            .collect();
        if sessions.is_empty() {
            return Vec::new();
        }
        // Stable: same-day sessions keep their insertion order
        sessions.sort_by_key(|r| r.date);

        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for r in &sessions {
            *per_day.entry(r.date).or_insert(0.0) += r.load_value();
        }
        let daily_loads: Vec<(NaiveDate, f64)> = per_day.into_iter().collect();

        let first_week = sessions[0].week_start();
        let last_week = sessions[sessions.len() - 1].week_start();

        let mut results = Vec::new();
        let mut previous_total: Option<f64> = None;
        let mut week = first_week;

        while week <= last_week {
            let end = week_end(week);
            let week_loads: Vec<f64> = sessions
                .iter()
                .filter(|r| r.date >= week && r.date <= end)
                .map(|r| r.load_value())
                .collect();
            let total_load: f64 = week_loads.iter().sum();

            let history: Vec<f64> = sessions
                .iter()
                .take_while(|r| r.date <= end)
                .map(|r| r.load_value())
                .collect();
            let monotony = self.calculator.monotony(&history);
            let strain = MetricsCalculator::strain(total_load, monotony);

            let acute_load = self.calculator.acute_load(&daily_loads, end);
            let chronic_load = self.calculator.chronic_load(&daily_loads, end);
            let acwr = MetricsCalculator::acwr(acute_load, chronic_load);

            let monotony_risk = self.classifier.risk_level_for_monotony(monotony);
            let strain_risk = self.classifier.risk_level_for_strain(strain);
            let acwr_risk = self.classifier.risk_level_for_acwr(acwr);

            results.push(WeeklyMetric {
                athlete_id,
                week_start: week,
                session_count: week_loads.len() as u32,
                total_load,
                mean_load: mean(&week_loads),
                std_dev: sample_std(&week_loads),
                monotony,
                strain,
                acute_load,
                chronic_load,
                acwr,
                variation_pct: MetricsCalculator::variation_pct(total_load, previous_total),
                monotony_risk,
                strain_risk,
                acwr_risk,
                overall_risk: RiskClassifier::overall(&[monotony_risk, strain_risk, acwr_risk]),
            });

            previous_total = Some(total_load);
            match week.checked_add_signed(Duration::days(7)) {
                Some(next) => week = next,
                None => break,
            }
        }

        tracing::debug!(
            "Aggregated {} sessions into {} weeks for athlete {}",
            sessions.len(),
            results.len(),
            athlete_id
        );

        results
    }

    /// Compute weekly rows for every athlete present in `records`,
    /// ordered by athlete then week.
    pub fn aggregate_all(&self, records: &[LoadRecord]) -> Vec<WeeklyMetric> {
        let mut by_athlete: BTreeMap<Uuid, Vec<LoadRecord>> = BTreeMap::new();
        for r in records {
            by_athlete.entry(r.athlete_id).or_default().push(r.clone());
        }

        by_athlete
            .iter()
            .flat_map(|(athlete_id, athlete_records)| {
                self.aggregate_athlete(*athlete_id, athlete_records)
            })
            .collect()
    }
}

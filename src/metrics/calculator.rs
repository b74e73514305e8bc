//! Training-load metrics: monotony, strain, ACWR and Z-scores.
//!
//! Every undefined result (too few samples, zero variance, zero divisor)
//! is `None`. Callers must read `None` as "insufficient data", not as
//! zero risk.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::stats::{mean, sample_std};

/// Standard deviations below this are treated as zero.
const ZERO_STD: f64 = 1e-9;

/// Window sizes used by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Number of most recent workouts (load > 0) used for monotony.
    pub monotony_window: usize,
    /// Calendar days in the acute window.
    pub acute_days: u32,
    /// Calendar days in the chronic window.
    pub chronic_days: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            monotony_window: 7,
            acute_days: 7,
            chronic_days: 28,
        }
    }
}

/// Computes load metrics from numeric load series.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCalculator {
    config: CalculatorConfig,
}

impl MetricsCalculator {
    /// Create with default windows (7 workouts, 7/28 days).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom windows.
    pub fn with_config(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Monotony = mean / std over the last `monotony_window` workouts.
    ///
    /// The window counts workouts, not calendar days: entries with load <= 0
    /// are skipped before the window is taken. `None` with fewer than 2 valid
    /// entries or zero standard deviation.
    pub fn monotony(&self, load_series: &[f64]) -> Option<f64> {
        let valid: Vec<f64> = load_series
            .iter()
            .copied()
            .filter(|l| l.is_finite() && *l > 0.0)
            .collect();

        let start = valid.len().saturating_sub(self.config.monotony_window);
        let window = &valid[start..];
        if window.len() < 2 {
            return None;
        }

        let std = sample_std(window)?;
        if std < ZERO_STD {
            return None;
        }
        Some(mean(window)? / std)
    }

    /// Strain = total load × monotony.
    pub fn strain(total_load: f64, monotony: Option<f64>) -> Option<f64> {
        monotony.map(|m| total_load * m)
    }

    /// ACWR = acute / chronic, `None` when chronic is zero.
    pub fn acwr(acute_load: f64, chronic_load: f64) -> Option<f64> {
        if chronic_load == 0.0 {
            None
        } else {
            Some(acute_load / chronic_load)
        }
    }

    /// Z-score of `value` within a group, `None` when the group std is zero.
    pub fn z_score(value: f64, group_mean: f64, group_std: f64) -> Option<f64> {
        if group_std == 0.0 {
            None
        } else {
            Some((value - group_mean) / group_std)
        }
    }

    /// Week-over-week change of total load, in percent.
    pub fn variation_pct(current: f64, previous: Option<f64>) -> Option<f64> {
        match previous {
            Some(prev) if prev != 0.0 => Some((current - prev) / prev * 100.0),
            _ => None,
        }
    }

    /// Sum of loads dated within `days` calendar days ending on `as_of`.
    pub fn rolling_sum(daily_loads: &[(NaiveDate, f64)], as_of: NaiveDate, days: u32) -> f64 {
        if days == 0 {
            return 0.0;
        }
        let first = as_of
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .unwrap_or(NaiveDate::MIN);
        daily_loads
            .iter()
            .filter(|(date, _)| *date >= first && *date <= as_of)
            .map(|(_, load)| *load)
            .sum()
    }

    /// Acute load: sum over the acute window ending on `as_of`.
    pub fn acute_load(&self, daily_loads: &[(NaiveDate, f64)], as_of: NaiveDate) -> f64 {
        Self::rolling_sum(daily_loads, as_of, self.config.acute_days)
    }

    /// Chronic load: chronic-window sum scaled to one acute window.
    ///
    /// With the default 7/28 windows this is the average weekly load over
    /// the last four weeks.
    pub fn chronic_load(&self, daily_loads: &[(NaiveDate, f64)], as_of: NaiveDate) -> f64 {
        if self.config.acute_days == 0 {
            return 0.0;
        }
        let total = Self::rolling_sum(daily_loads, as_of, self.config.chronic_days);
        let windows = f64::from(self.config.chronic_days) / f64::from(self.config.acute_days);
        total / windows
    }
}

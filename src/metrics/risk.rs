//! Risk band classification for weekly load metrics.
//!
//! Maps monotony, strain and ACWR onto green / yellow / red bands using
//! fixed threshold tables. Thresholds are plain data so they can be tuned
//! from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk band, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Load within the expected range.
    Green,
    /// Elevated, monitor the athlete.
    Yellow,
    /// High injury risk (or, for ACWR, detraining).
    Red,
}

impl RiskLevel {
    /// Stable lowercase name used for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Green => "green",
            RiskLevel::Yellow => "yellow",
            RiskLevel::Red => "red",
        }
    }

    /// Get recommendation text.
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Green => "Load is within the expected range.",
            RiskLevel::Yellow => "Load is elevated. Monitor wellness and session RPE closely.",
            RiskLevel::Red => "High risk. Review planned load with the medical staff.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(RiskLevel::Green),
            "yellow" => Ok(RiskLevel::Yellow),
            "red" => Ok(RiskLevel::Red),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

/// Upper bounds for a metric where higher values mean higher risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    /// Values strictly below this are green.
    pub green_below: f64,
    /// Values strictly below this (and not green) are yellow; the rest red.
    pub yellow_below: f64,
}

impl BandThresholds {
    fn classify(&self, value: f64) -> RiskLevel {
        if value < self.green_below {
            RiskLevel::Green
        } else if value < self.yellow_below {
            RiskLevel::Yellow
        } else {
            RiskLevel::Red
        }
    }
}

/// ACWR bands: too low and too high are both red.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcwrThresholds {
    /// Below this the athlete is detraining (red).
    pub detraining_below: f64,
    /// Inclusive upper bound of the green "sweet spot".
    pub optimal_max: f64,
    /// Above this the athlete is overtraining (red); up to it, yellow.
    pub overtraining_above: f64,
}

/// Threshold tables for every classified metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub monotony: BandThresholds,
    pub strain: BandThresholds,
    pub acwr: AcwrThresholds,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            monotony: BandThresholds {
                green_below: 1.5,
                yellow_below: 2.0,
            },
            strain: BandThresholds {
                green_below: 4000.0,
                yellow_below: 6000.0,
            },
            acwr: AcwrThresholds {
                detraining_below: 0.8,
                optimal_max: 1.3,
                overtraining_above: 1.5,
            },
        }
    }
}

/// Classifies metric values into risk bands.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    /// Create with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom thresholds.
    pub fn with_thresholds(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Monotony: green < 1.5, yellow < 2.0, else red.
    pub fn risk_level_for_monotony(&self, monotony: Option<f64>) -> Option<RiskLevel> {
        monotony.map(|m| self.thresholds.monotony.classify(m))
    }

    /// Strain: green < 4000, yellow < 6000, else red.
    pub fn risk_level_for_strain(&self, strain: Option<f64>) -> Option<RiskLevel> {
        strain.map(|s| self.thresholds.strain.classify(s))
    }

    /// ACWR: red < 0.8, green 0.8..=1.3, yellow up to 1.5 inclusive, red above.
    pub fn risk_level_for_acwr(&self, acwr: Option<f64>) -> Option<RiskLevel> {
        let t = &self.thresholds.acwr;
        acwr.map(|ratio| {
            if ratio < t.detraining_below || ratio > t.overtraining_above {
                RiskLevel::Red
            } else if ratio <= t.optimal_max {
                RiskLevel::Green
            } else {
                RiskLevel::Yellow
            }
        })
    }

    /// Most severe of the defined levels.
    pub fn overall(levels: &[Option<RiskLevel>]) -> Option<RiskLevel> {
        levels.iter().flatten().copied().max()
    }
}

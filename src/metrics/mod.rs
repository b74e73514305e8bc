//! Metrics module for training-load calculations and risk bands.

pub mod calculator;
pub mod risk;
pub mod stats;

pub use calculator::{CalculatorConfig, MetricsCalculator};
pub use risk::{AcwrThresholds, BandThresholds, RiskClassifier, RiskLevel, RiskThresholds};

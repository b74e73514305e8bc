//! Load record and weekly metric types.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::metrics::RiskLevel;

/// Lowest valid session RPE.
pub const MIN_RATING: u8 = 1;
/// Highest valid session RPE.
pub const MAX_RATING: u8 = 10;

/// Errors raised when building a load record.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("Invalid rating {0}: session RPE must be between 1 and 10")]
    InvalidRating(u8),

    #[error("Invalid duration {0}: minutes must be positive")]
    InvalidDuration(f64),
}

/// One session's internal load for one athlete.
///
/// Load is session-RPE × duration in minutes (arbitrary units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Athlete this session belongs to
    pub athlete_id: Uuid,
    /// Session date
    pub date: NaiveDate,
    /// Session RPE (1-10)
    pub rating: u8,
    /// Session duration in minutes
    pub duration_minutes: f64,
}

impl LoadRecord {
    /// Create a validated load record.
    pub fn new(
        athlete_id: Uuid,
        date: NaiveDate,
        rating: u8,
        duration_minutes: f64,
    ) -> Result<Self, LoadError> {
        Self::validate(rating, duration_minutes)?;
        Ok(Self {
            id: Uuid::new_v4(),
            athlete_id,
            date,
            rating,
            duration_minutes,
        })
    }

    /// Check rating and duration.
    pub fn validate(rating: u8, duration_minutes: f64) -> Result<(), LoadError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(LoadError::InvalidRating(rating));
        }
        if !duration_minutes.is_finite() || duration_minutes <= 0.0 {
            return Err(LoadError::InvalidDuration(duration_minutes));
        }
        Ok(())
    }

    /// Session load (rating × duration).
    pub fn load_value(&self) -> f64 {
        f64::from(self.rating) * self.duration_minutes
    }

    /// Monday of this record's week.
    pub fn week_start(&self) -> NaiveDate {
        week_start(self.date)
    }
}

/// Monday of the ISO week containing `date`.
///
/// Clamped to `NaiveDate::MIN` for the first, partial week of the calendar.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(
        date.weekday().num_days_from_monday(),
    )))
    .unwrap_or(NaiveDate::MIN)
}

/// Sunday closing the week that starts on `week_start`.
///
/// Clamped to `NaiveDate::MAX` for the last, partial week of the calendar.
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX)
}

/// Derived load metrics for one athlete and one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMetric {
    pub athlete_id: Uuid,
    /// Monday of the week
    pub week_start: NaiveDate,
    /// Sessions recorded in the week
    pub session_count: u32,
    /// Sum of session loads in the week
    pub total_load: f64,
    /// Mean session load in the week
    pub mean_load: Option<f64>,
    /// Sample standard deviation of session loads in the week
    pub std_dev: Option<f64>,
    /// Mean / std over the last 7 workouts up to the week's end
    pub monotony: Option<f64>,
    /// total_load × monotony
    pub strain: Option<f64>,
    /// 7-day rolling load at the week's end
    pub acute_load: f64,
    /// 28-day rolling load at the week's end, per week
    pub chronic_load: f64,
    /// acute / chronic
    pub acwr: Option<f64>,
    /// Change of total load versus the previous week (%)
    pub variation_pct: Option<f64>,
    pub monotony_risk: Option<RiskLevel>,
    pub strain_risk: Option<RiskLevel>,
    pub acwr_risk: Option<RiskLevel>,
    /// Most severe of the per-metric levels
    pub overall_risk: Option<RiskLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_load_value() {
        let record = LoadRecord::new(Uuid::new_v4(), date(2024, 1, 10), 6, 90.0).unwrap();
        assert_eq!(record.load_value(), 540.0);
    }

    #[test]
    fn test_validation() {
        let athlete = Uuid::new_v4();
        let day = date(2024, 1, 10);
        assert_eq!(
            LoadRecord::new(athlete, day, 0, 60.0),
            Err(LoadError::InvalidRating(0))
        );
        assert_eq!(
            LoadRecord::new(athlete, day, 11, 60.0),
            Err(LoadError::InvalidRating(11))
        );
        assert_eq!(
            LoadRecord::new(athlete, day, 5, 0.0),
            Err(LoadError::InvalidDuration(0.0))
        );
        assert!(LoadRecord::new(athlete, day, 5, -30.0).is_err());
        assert!(LoadRecord::new(athlete, day, 5, f64::NAN).is_err());
        assert!(LoadRecord::new(athlete, day, 10, 1.0).is_ok());
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-01-10 is a Wednesday
        assert_eq!(week_start(date(2024, 1, 10)), date(2024, 1, 8));
        assert_eq!(week_start(date(2024, 1, 8)), date(2024, 1, 8));
        // Sunday belongs to the preceding Monday
        assert_eq!(week_start(date(2024, 1, 14)), date(2024, 1, 8));
        // Across a year boundary
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 30));
        assert_eq!(week_end(date(2024, 1, 8)), date(2024, 1, 14));
    }

    #[test]
    fn test_week_bounds_clamp_at_calendar_limits() {
        assert!(week_start(NaiveDate::MIN) <= NaiveDate::MIN + Duration::days(6));
        assert_eq!(week_end(week_start(NaiveDate::MAX)), NaiveDate::MAX);

        let record = LoadRecord::new(Uuid::new_v4(), date(2024, 1, 10), 6, 90.0).unwrap();
        assert_eq!(record.week_start(), date(2024, 1, 8));
    }
}

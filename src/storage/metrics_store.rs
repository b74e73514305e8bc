//! Weekly metric storage operations.
//!
//! Rows are derived data: they are only written by recomputation and are
//! replaced wholesale per athlete.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::load::{TeamWeekStats, WeeklyMetric, WeeklyZScores};
use crate::metrics::RiskLevel;
use crate::storage::database::{parse_date, parse_uuid, DatabaseError, DATE_FORMAT};

const SELECT_COLUMNS: &str = "SELECT athlete_id, week_start, session_count, total_load, mean_load, std_dev,
        monotony, strain, acute_load, chronic_load, acwr, variation_pct,
        monotony_risk, strain_risk, acwr_risk, overall_risk
 FROM weekly_metrics";

/// Store for persisting weekly metrics.
pub struct MetricsStore<'a> {
    conn: &'a Connection,
}

impl<'a> MetricsStore<'a> {
    /// Create a new metrics store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Save or update weekly metric rows.
    pub fn save_weekly_metrics(&self, metrics: &[WeeklyMetric]) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let mut stmt = self
            .conn
            .prepare(
                r#"
                INSERT INTO weekly_metrics (athlete_id, week_start, session_count, total_load,
                    mean_load, std_dev, monotony, strain, acute_load, chronic_load, acwr,
                    variation_pct, monotony_risk, strain_risk, acwr_risk, overall_risk, computed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
                ON CONFLICT(athlete_id, week_start) DO UPDATE SET
                    session_count = excluded.session_count,
                    total_load = excluded.total_load,
                    mean_load = excluded.mean_load,
                    std_dev = excluded.std_dev,
                    monotony = excluded.monotony,
                    strain = excluded.strain,
                    acute_load = excluded.acute_load,
                    chronic_load = excluded.chronic_load,
                    acwr = excluded.acwr,
                    variation_pct = excluded.variation_pct,
                    monotony_risk = excluded.monotony_risk,
                    strain_risk = excluded.strain_risk,
                    acwr_risk = excluded.acwr_risk,
                    overall_risk = excluded.overall_risk,
                    computed_at = excluded.computed_at
                "#,
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        for m in metrics {
            stmt.execute(params![
                m.athlete_id.to_string(),
                m.week_start.format(DATE_FORMAT).to_string(),
                m.session_count,
                m.total_load,
                m.mean_load,
                m.std_dev,
                m.monotony,
                m.strain,
                m.acute_load,
                m.chronic_load,
                m.acwr,
                m.variation_pct,
                m.monotony_risk.map(|r| r.as_str()),
                m.strain_risk.map(|r| r.as_str()),
                m.acwr_risk.map(|r| r.as_str()),
                m.overall_risk.map(|r| r.as_str()),
                now,
            ])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        }

        Ok(())
    }

    /// Load all weekly rows for an athlete, oldest week first.
    pub fn load_weekly_metrics(&self, athlete_id: &Uuid) -> Result<Vec<WeeklyMetric>, DatabaseError> {
        let sql = format!("{} WHERE athlete_id = ?1 ORDER BY week_start", SELECT_COLUMNS);
        self.query_metrics(&sql, &[&athlete_id.to_string()])
    }

    /// Load one athlete's row for a week.
    pub fn load_athlete_week(
        &self,
        athlete_id: &Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyMetric>, DatabaseError> {
        let sql = format!("{} WHERE athlete_id = ?1 AND week_start = ?2", SELECT_COLUMNS);
        let mut rows = self.query_metrics(
            &sql,
            &[
                &athlete_id.to_string(),
                &week_start.format(DATE_FORMAT).to_string(),
            ],
        )?;
        Ok(rows.pop())
    }

    /// Load every athlete's row for a week.
    pub fn load_week(&self, week_start: NaiveDate) -> Result<Vec<WeeklyMetric>, DatabaseError> {
        let sql = format!("{} WHERE week_start = ?1 ORDER BY athlete_id", SELECT_COLUMNS);
        self.query_metrics(&sql, &[&week_start.format(DATE_FORMAT).to_string()])
    }

    /// Squad statistics for a week, computed from the stored rows.
    pub fn team_week_stats(&self, week_start: NaiveDate) -> Result<TeamWeekStats, DatabaseError> {
        let rows = self.load_week(week_start)?;
        Ok(TeamWeekStats::from_metrics(week_start, &rows))
    }

    /// Z-scores of every athlete for a week.
    pub fn week_z_scores(&self, week_start: NaiveDate) -> Result<Vec<WeeklyZScores>, DatabaseError> {
        let rows = self.load_week(week_start)?;
        Ok(TeamWeekStats::from_metrics(week_start, &rows).z_scores(&rows))
    }

    /// Delete all rows for an athlete. Returns the number of rows removed.
    pub fn delete_athlete_metrics(&self, athlete_id: &Uuid) -> Result<usize, DatabaseError> {
        self.conn
            .execute(
                "DELETE FROM weekly_metrics WHERE athlete_id = ?1",
                params![athlete_id.to_string()],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    fn query_metrics(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<WeeklyMetric>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params, WeeklyMetricRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut metrics = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            metrics.push(row.into_metric()?);
        }

        Ok(metrics)
    }
}

/// Raw weekly metric row from the database.
struct WeeklyMetricRow {
    athlete_id: String,
    week_start: String,
    session_count: u32,
    total_load: f64,
    mean_load: Option<f64>,
    std_dev: Option<f64>,
    monotony: Option<f64>,
    strain: Option<f64>,
    acute_load: f64,
    chronic_load: f64,
    acwr: Option<f64>,
    variation_pct: Option<f64>,
    monotony_risk: Option<String>,
    strain_risk: Option<String>,
    acwr_risk: Option<String>,
    overall_risk: Option<String>,
}

impl WeeklyMetricRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            athlete_id: row.get(0)?,
            week_start: row.get(1)?,
            session_count: row.get(2)?,
            total_load: row.get(3)?,
            mean_load: row.get(4)?,
            std_dev: row.get(5)?,
            monotony: row.get(6)?,
            strain: row.get(7)?,
            acute_load: row.get(8)?,
            chronic_load: row.get(9)?,
            acwr: row.get(10)?,
            variation_pct: row.get(11)?,
            monotony_risk: row.get(12)?,
            strain_risk: row.get(13)?,
            acwr_risk: row.get(14)?,
            overall_risk: row.get(15)?,
        })
    }

    fn into_metric(self) -> Result<WeeklyMetric, DatabaseError> {
        Ok(WeeklyMetric {
            athlete_id: parse_uuid(&self.athlete_id)?,
            week_start: parse_date(&self.week_start)?,
            session_count: self.session_count,
            total_load: self.total_load,
            mean_load: self.mean_load,
            std_dev: self.std_dev,
            monotony: self.monotony,
            strain: self.strain,
            acute_load: self.acute_load,
            chronic_load: self.chronic_load,
            acwr: self.acwr,
            variation_pct: self.variation_pct,
            monotony_risk: parse_risk(self.monotony_risk)?,
            strain_risk: parse_risk(self.strain_risk)?,
            acwr_risk: parse_risk(self.acwr_risk)?,
            overall_risk: parse_risk(self.overall_risk)?,
        })
    }
}

fn parse_risk(value: Option<String>) -> Result<Option<RiskLevel>, DatabaseError> {
    value
        .map(|s| s.parse::<RiskLevel>())
        .transpose()
        .map_err(DatabaseError::DeserializationError)
}

//! Database operations using rusqlite.
//!
//! Owns the SQLite connection, applies schema migrations on open, and
//! provides the load-record source plus the batch recomputation that
//! replaces an athlete's weekly metric rows.

use crate::load::{LoadRecord, WeeklyAggregator, WeeklyMetric};
use crate::storage::metrics_store::MetricsStore;
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, TransactionBehavior};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> Result<rusqlite::Transaction<'_>, DatabaseError> {
        self.conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))
    }

    // ========== Load Records ==========

    /// Insert a load record.
    pub fn insert_load_record(&self, record: &LoadRecord) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO load_records (id, athlete_id, session_date, rating, duration_minutes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id.to_string(),
                    record.athlete_id.to_string(),
                    record.date.format(DATE_FORMAT).to_string(),
                    record.rating,
                    record.duration_minutes,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    DatabaseError::ConstraintViolation(format!("load record {}", record.id))
                }
                other => DatabaseError::QueryFailed(other.to_string()),
            })?;

        Ok(())
    }

    /// Load all records for an athlete in chronological order.
    pub fn load_records_for_athlete(
        &self,
        athlete_id: &Uuid,
    ) -> Result<Vec<LoadRecord>, DatabaseError> {
        records_for_athlete(&self.conn, athlete_id)
    }

    /// Load all records dated within `[start, end]`, ordered by athlete then date.
    pub fn load_records_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LoadRecord>, DatabaseError> {
        query_records(
            &self.conn,
            "SELECT id, athlete_id, session_date, rating, duration_minutes FROM load_records
             WHERE session_date >= ?1 AND session_date <= ?2
             ORDER BY athlete_id, session_date, rowid",
            &[
                &start.format(DATE_FORMAT).to_string(),
                &end.format(DATE_FORMAT).to_string(),
            ],
        )
    }

    /// Distinct athlete IDs with at least one load record.
    pub fn athlete_ids(&self) -> Result<Vec<Uuid>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT athlete_id FROM load_records ORDER BY athlete_id")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut ids = Vec::new();
        for row in rows {
            let id_str = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            ids.push(parse_uuid(&id_str)?);
        }

        Ok(ids)
    }

    // ========== Weekly Recomputation ==========

    /// Recompute an athlete's weekly metrics and replace the stored rows.
    ///
    /// The source records are read, and the rows replaced, inside one
    /// immediate transaction, so no writer can commit between the read and
    /// the write.
    pub fn recompute_athlete(
        &mut self,
        athlete_id: &Uuid,
        aggregator: &WeeklyAggregator,
    ) -> Result<Vec<WeeklyMetric>, DatabaseError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        let metrics = recompute_in(&tx, athlete_id, aggregator)?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(metrics)
    }

    /// Recompute weekly metrics for every athlete with load records.
    ///
    /// Returns the number of rows written per athlete.
    pub fn recompute_all(
        &mut self,
        aggregator: &WeeklyAggregator,
    ) -> Result<Vec<(Uuid, usize)>, DatabaseError> {
        let mut summary = Vec::new();
        for athlete_id in self.athlete_ids()? {
            let metrics = self.recompute_athlete(&athlete_id, aggregator)?;
            summary.push((athlete_id, metrics.len()));
        }
        Ok(summary)
    }
}

/// Read an athlete's records and rewrite their weekly rows through `conn`.
fn recompute_in(
    conn: &Connection,
    athlete_id: &Uuid,
    aggregator: &WeeklyAggregator,
) -> Result<Vec<WeeklyMetric>, DatabaseError> {
    let records = records_for_athlete(conn, athlete_id)?;
    let metrics = aggregator.aggregate_athlete(*athlete_id, &records);

    let store = MetricsStore::new(conn);
    store.delete_athlete_metrics(athlete_id)?;
    store.save_weekly_metrics(&metrics)?;

    tracing::info!(
        "Recomputed {} weekly rows from {} sessions for athlete {}",
        metrics.len(),
        records.len(),
        athlete_id
    );

    Ok(metrics)
}

fn records_for_athlete(
    conn: &Connection,
    athlete_id: &Uuid,
) -> Result<Vec<LoadRecord>, DatabaseError> {
    query_records(
        conn,
        "SELECT id, athlete_id, session_date, rating, duration_minutes FROM load_records
         WHERE athlete_id = ?1 ORDER BY session_date, rowid",
        &[&athlete_id.to_string()],
    )
}

fn query_records(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<LoadRecord>, DatabaseError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    let rows = stmt
        .query_map(params, |row| {
            Ok(LoadRecordRow {
                id: row.get(0)?,
                athlete_id: row.get(1)?,
                session_date: row.get(2)?,
                rating: row.get(3)?,
                duration_minutes: row.get(4)?,
            })
        })
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        records.push(row.into_record()?);
    }

    Ok(records)
}

/// Raw load record row from the database.
struct LoadRecordRow {
    id: String,
    athlete_id: String,
    session_date: String,
    rating: u8,
    duration_minutes: f64,
}

impl LoadRecordRow {
    fn into_record(self) -> Result<LoadRecord, DatabaseError> {
        Ok(LoadRecord {
            id: parse_uuid(&self.id)?,
            athlete_id: parse_uuid(&self.athlete_id)?,
            date: parse_date(&self.session_date)?,
            rating: self.rating,
            duration_minutes: self.duration_minutes,
        })
    }
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::DeserializationError(e.to_string()))
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DatabaseError::DeserializationError(e.to_string()))
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

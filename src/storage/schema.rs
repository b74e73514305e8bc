//! Database schema definitions for the load risk engine.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Session load records (immutable once recorded)
CREATE TABLE IF NOT EXISTS load_records (
    id TEXT PRIMARY KEY,
    athlete_id TEXT NOT NULL,
    session_date TEXT NOT NULL,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 10),
    duration_minutes REAL NOT NULL CHECK (duration_minutes > 0),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_load_records_athlete ON load_records(athlete_id, session_date);

-- Derived weekly metrics, one row per athlete-week
CREATE TABLE IF NOT EXISTS weekly_metrics (
    athlete_id TEXT NOT NULL,
    week_start TEXT NOT NULL,
    session_count INTEGER NOT NULL,
    total_load REAL NOT NULL,
    mean_load REAL,
    std_dev REAL,
    monotony REAL,
    strain REAL,
    acute_load REAL NOT NULL,
    chronic_load REAL NOT NULL,
    acwr REAL,
    variation_pct REAL,
    monotony_risk TEXT,
    strain_risk TEXT,
    acwr_risk TEXT,
    overall_risk TEXT,
    computed_at TEXT NOT NULL,
    PRIMARY KEY (athlete_id, week_start)
);

CREATE INDEX IF NOT EXISTS idx_weekly_metrics_week ON weekly_metrics(week_start);
"#;

/// Schema version table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;

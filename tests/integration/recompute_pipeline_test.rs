//! End-to-end recomputation against a file-backed database.
//!
//! Records are inserted, weekly metrics recomputed, and the stored rows
//! checked against a direct aggregation and the squad statistics.

use chrono::NaiveDate;
use loadrisk::load::WeeklyAggregator;
use loadrisk::storage::config::{load_config_from, save_config_to};
use loadrisk::storage::MetricsStore;
use loadrisk::{AppConfig, Database, LoadRecord, RiskLevel, TeamWeekStats};
use uuid::Uuid;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

/// Four weeks of a regular microcycle: MD-4, MD-3, MD-2, MD-1, match day.
fn microcycle(athlete: Uuid, scale: f64) -> Vec<LoadRecord> {
    let mondays = [date(1, 8), date(1, 15), date(1, 22), date(1, 29)];
    let sessions = [(0, 6, 75.0), (1, 7, 80.0), (2, 4, 60.0), (3, 3, 45.0), (5, 9, 95.0)];

    let mut records = Vec::new();
    for monday in mondays {
        for (offset, rating, minutes) in sessions {
            let day = monday + chrono::Duration::days(offset);
            records.push(LoadRecord::new(athlete, day, rating, minutes * scale).unwrap());
        }
    }
    records
}

#[test]
fn test_recompute_from_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        database_path: dir.path().join("data").join("squad.db"),
        ..Default::default()
    };
    let config_path = dir.path().join("config.toml");
    save_config_to(&config, &config_path).unwrap();
    let config = load_config_from(&config_path).unwrap();

    let steady = Uuid::new_v4();
    let heavy = Uuid::new_v4();
    let mut all_records = microcycle(steady, 1.0);
    all_records.extend(microcycle(heavy, 1.2));
    // Extra spike session for the heavy athlete in the last week
    all_records.push(LoadRecord::new(heavy, date(2, 1), 10, 120.0).unwrap());

    {
        let db = Database::open(&config.database_path).unwrap();
        for record in &all_records {
            db.insert_load_record(record).unwrap();
        }
    }

    let mut db = Database::open(&config.database_path).unwrap();
    let aggregator = config.aggregator();
    let summary = db.recompute_all(&aggregator).unwrap();
    assert_eq!(summary.len(), 2);
    assert!(summary.iter().all(|(_, weeks)| *weeks == 4));

    let store = MetricsStore::new(db.connection());
    let stored = store.load_weekly_metrics(&steady).unwrap();
    let expected = WeeklyAggregator::new().aggregate_athlete(steady, &all_records);
    assert_eq!(stored, expected);

    // A regular microcycle repeats: from week 2 on, variation is zero.
    assert_eq!(stored[1].variation_pct, Some(0.0));
    assert_eq!(stored[0].variation_pct, None);

    // By week four the chronic window covers the whole block.
    let last = &stored[3];
    assert_eq!(last.acute_load, last.chronic_load);
    assert_eq!(last.acwr, Some(1.0));
    assert_eq!(last.acwr_risk, Some(RiskLevel::Green));
    assert!(last.monotony.is_some());
    assert_eq!(
        last.strain,
        last.monotony.map(|m| m * last.total_load)
    );

    let heavy_last = store
        .load_athlete_week(&heavy, date(1, 29))
        .unwrap()
        .expect("heavy athlete has a last week");
    assert!(heavy_last.acwr.unwrap() > 1.0);
    assert!(heavy_last.total_load > last.total_load);

    let stats = store.team_week_stats(date(1, 29)).unwrap();
    assert_eq!(stats.athlete_count, 2);
    let z = store.week_z_scores(date(1, 29)).unwrap();
    let heavy_z = z.iter().find(|row| row.athlete_id == heavy).unwrap();
    let steady_z = z.iter().find(|row| row.athlete_id == steady).unwrap();
    assert!(heavy_z.total_load_z.unwrap() > 0.0);
    assert!(steady_z.total_load_z.unwrap() < 0.0);
}

#[test]
fn test_new_records_trigger_recomputed_rows() {
    let mut db = Database::open_in_memory().unwrap();
    let athlete = Uuid::new_v4();
    let aggregator = WeeklyAggregator::new();

    for record in microcycle(athlete, 1.0).into_iter().take(5) {
        db.insert_load_record(&record).unwrap();
    }
    let before = db.recompute_athlete(&athlete, &aggregator).unwrap();
    assert_eq!(before.len(), 1);

    db.insert_load_record(&LoadRecord::new(athlete, date(1, 13), 8, 90.0).unwrap())
        .unwrap();
    let after = db.recompute_athlete(&athlete, &aggregator).unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].total_load, before[0].total_load + 720.0);
    assert_eq!(after[0].session_count, 6);

    let stored = MetricsStore::new(db.connection())
        .load_weekly_metrics(&athlete)
        .unwrap();
    assert_eq!(stored, after);
}

#[test]
fn test_weekly_metric_json_uses_null_for_undefined() {
    let athlete = Uuid::new_v4();
    let records = vec![LoadRecord::new(athlete, date(1, 10), 5, 60.0).unwrap()];
    let week = &WeeklyAggregator::new().aggregate_athlete(athlete, &records)[0];

    let json = serde_json::to_value(week).unwrap();
    assert_eq!(json["week_start"], "2024-01-08");
    assert_eq!(json["total_load"], 300.0);
    assert!(json["monotony"].is_null());
    assert!(json["strain"].is_null());
    assert!(json["monotony_risk"].is_null());

    // Single week: acute 300, chronic 75 -> 4.0, overtraining
    assert_eq!(json["acwr_risk"], "red");
    assert_eq!(json["overall_risk"], "red");

    let stats = TeamWeekStats::from_metrics(week.week_start, std::slice::from_ref(week));
    let stats_json = serde_json::to_value(&stats).unwrap();
    assert!(stats_json["total_load"]["std"].is_null());
}

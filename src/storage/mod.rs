//! Storage module for database and configuration.

pub mod config;
pub mod database;
pub mod metrics_store;
pub mod schema;

pub use config::{AppConfig, ConfigError};
pub use database::{Database, DatabaseError};
pub use metrics_store::MetricsStore;

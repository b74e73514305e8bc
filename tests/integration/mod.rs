//! Integration test modules.

mod recompute_pipeline_test;
mod risk_properties_test;

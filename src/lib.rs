#![doc(test(attr(deny(warnings))))]

//! FinMate Core offers the budget analysis and forecasting primitives that
//! power higher level dashboards and report generators: rule-based merchant
//! categorization, period aggregation, savings-goal advice, spending
//! forecasts, and budget/badge evaluation.

pub mod engine;
pub mod errors;
pub mod evaluate;
pub mod forecast;
pub mod goals;
pub mod ingest;
pub mod report;
pub mod rules;
pub mod storage;
pub mod summary;
pub mod transaction;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("FinMate Core tracing initialized.");
    });
}

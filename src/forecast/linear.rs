//! Deterministic run-rate extrapolation.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::transaction::CategorizedTransaction;

/// Result of the linear run-rate forecast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearForecast {
    pub spent_so_far: f64,
    pub avg_daily_spending: f64,
    pub days_passed: i64,
    pub remaining_days: i64,
    pub forecasted_total: f64,
}

/// Extrapolates remaining-month spend from the elapsed daily run rate.
///
/// `days_passed` counts from the earliest transaction to `as_of`; when it is
/// zero the average is defined as zero instead of dividing by zero. The month
/// length comes from the month containing the latest transaction (or `as_of`
/// when the slice is empty). A forecast is producible from any input,
/// including a single transaction or none at all.
pub fn run_rate(transactions: &[CategorizedTransaction], as_of: NaiveDate) -> LinearForecast {
    let spent_so_far: f64 = transactions.iter().map(|t| t.amount()).sum();
    let earliest = transactions.iter().map(|t| t.date()).min();
    let latest = transactions.iter().map(|t| t.date()).max();

    let days_passed = earliest
        .map(|start| (as_of - start).num_days().max(0))
        .unwrap_or(0);

    let avg_daily_spending = if days_passed == 0 {
        0.0
    } else {
        spent_so_far / days_passed as f64
    };

    let month_anchor = latest.unwrap_or(as_of);
    let remaining_days = (days_in_month(month_anchor) as i64 - days_passed).max(0);

    LinearForecast {
        spent_so_far,
        avg_daily_spending,
        days_passed,
        remaining_days,
        forecasted_total: spent_so_far + avg_daily_spending * remaining_days as f64,
    }
}

/// Calendar length of the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(date.year(), date.month(), 28).unwrap());
    (first_next - Duration::days(1)).day()
}

//! Feature engineering for the regression model.
//!
//! One feature row per transaction, in ingestion order: calendar signals
//! plus two lag features. Lags are zero-filled when no prior observation
//! exists (the first row has no lag-1, the first seven have no lag-7), so
//! short histories degrade gracefully instead of failing.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::transaction::CategorizedTransaction;

pub const FEATURE_COUNT: usize = 5;

/// Predictive inputs derived from one transaction and its predecessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRow {
    /// Day of week, 0 = Monday through 6 = Sunday.
    pub day_of_week: f64,
    /// ISO week of year.
    pub week_of_year: f64,
    pub month: f64,
    /// Amount of the immediately preceding transaction, 0 when absent.
    pub amount_lag1: f64,
    /// Amount of the transaction seven rows back, 0 when absent.
    pub amount_lag7: f64,
}

impl FeatureRow {
    pub fn as_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.day_of_week,
            self.week_of_year,
            self.month,
            self.amount_lag1,
            self.amount_lag7,
        ]
    }
}

/// Builds feature rows and their targets (each row's own amount).
pub fn feature_rows(transactions: &[CategorizedTransaction]) -> (Vec<FeatureRow>, Vec<f64>) {
    let mut rows = Vec::with_capacity(transactions.len());
    let mut targets = Vec::with_capacity(transactions.len());

    for (idx, transaction) in transactions.iter().enumerate() {
        rows.push(row_at(transactions, idx));
        targets.push(transaction.amount());
    }
    (rows, targets)
}

/// The feature row for the most recent transaction, used for next-period
/// prediction. `None` on an empty history.
pub fn latest_row(transactions: &[CategorizedTransaction]) -> Option<FeatureRow> {
    if transactions.is_empty() {
        return None;
    }
    Some(row_at(transactions, transactions.len() - 1))
}

fn row_at(transactions: &[CategorizedTransaction], idx: usize) -> FeatureRow {
    let date = transactions[idx].date();
    let lag = |offset: usize| {
        idx.checked_sub(offset)
            .map(|prior| transactions[prior].amount())
            .unwrap_or(0.0)
    };
    FeatureRow {
        day_of_week: date.weekday().num_days_from_monday() as f64,
        week_of_year: date.iso_week().week() as f64,
        month: date.month() as f64,
        amount_lag1: lag(1),
        amount_lag7: lag(7),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use crate::transaction::Transaction;
    use chrono::NaiveDate;

    fn history(amounts: &[f64]) -> Vec<CategorizedTransaction> {
        let rules = RuleSet::default();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let batch = amounts
            .iter()
            .enumerate()
            .map(|(day, amount)| {
                let date = start + chrono::Duration::days(day as i64);
                Transaction::new(date, "Swiggy Order", *amount).unwrap()
            })
            .collect();
        rules.categorize_all(batch)
    }

    #[test]
    fn calendar_features_follow_the_date() {
        // 2024-01-01 is a Monday in ISO week 1.
        let transactions = history(&[100.0]);
        let (rows, targets) = feature_rows(&transactions);
        assert_eq!(rows[0].day_of_week, 0.0);
        assert_eq!(rows[0].week_of_year, 1.0);
        assert_eq!(rows[0].month, 1.0);
        assert_eq!(targets[0], 100.0);
    }

    #[test]
    fn lags_are_zero_filled_until_available() {
        let amounts: Vec<f64> = (1..=9).map(|n| n as f64 * 10.0).collect();
        let transactions = history(&amounts);
        let (rows, _) = feature_rows(&transactions);

        assert_eq!(rows[0].amount_lag1, 0.0);
        assert_eq!(rows[0].amount_lag7, 0.0);
        assert_eq!(rows[1].amount_lag1, 10.0);
        assert_eq!(rows[6].amount_lag7, 0.0);
        assert_eq!(rows[7].amount_lag7, 10.0);
        assert_eq!(rows[8].amount_lag7, 20.0);
    }

    #[test]
    fn latest_row_matches_the_last_transaction() {
        let transactions = history(&[10.0, 20.0, 30.0]);
        let row = latest_row(&transactions).unwrap();
        assert_eq!(row.amount_lag1, 20.0);
        assert_eq!(latest_row(&[]), None);
    }
}

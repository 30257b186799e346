//! Output contract for the excluded report-generation layer.
//!
//! A flat value bundle sufficient to populate a document without the report
//! layer re-deriving any aggregate itself.

use serde::{Deserialize, Serialize};

use crate::summary::PeriodSummary;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub total_spent: f64,
    pub monthly_budget: f64,
    pub savings_goal: u64,
    /// Category label → total, in aggregation order.
    pub category_totals: Vec<(String, f64)>,
    pub top_merchant: Option<String>,
    pub top_merchant_amount: f64,
}

impl ReportSummary {
    pub fn build(summary: &PeriodSummary, monthly_budget: f64, savings_goal: u64) -> Self {
        Self {
            total_spent: summary.total_spent,
            monthly_budget,
            savings_goal,
            category_totals: summary
                .per_category
                .iter()
                .map(|entry| (entry.category.name().to_string(), entry.total))
                .collect(),
            top_merchant: summary
                .max_transaction
                .as_ref()
                .map(|max| max.merchant.clone()),
            top_merchant_amount: summary
                .max_transaction
                .as_ref()
                .map(|max| max.amount)
                .unwrap_or(0.0),
        }
    }
}

//! Aggregation of categorized transactions into period summaries.
//!
//! Summaries are derived values recomputed on demand; the evaluator and the
//! forecaster both call in here with different filter scopes within one
//! session, so aggregation stays a cheap single pass.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::transaction::{CategorizedTransaction, Category};

/// Selects the transactions an analysis looks at: a month (`None` = all)
/// and optionally a single category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryFilter {
    pub month: Option<(i32, u32)>,
    pub category: Option<Category>,
}

impl SummaryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_month(year: i32, month: u32) -> Self {
        Self {
            month: Some((year, month)),
            category: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, transaction: &CategorizedTransaction) -> bool {
        if let Some((year, month)) = self.month {
            let date = transaction.date();
            if date.year() != year || date.month() != month {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &transaction.category != category {
                return false;
            }
        }
        true
    }

    /// Returns the owned subset of transactions this filter selects,
    /// preserving input order.
    pub fn apply(&self, transactions: &[CategorizedTransaction]) -> Vec<CategorizedTransaction> {
        transactions
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// The merchant and amount of the single largest transaction in a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaxTransaction {
    pub merchant: String,
    pub amount: f64,
}

/// Derived spending aggregates for one filtered period.
///
/// An empty filtered set is a defined outcome: zero totals and no
/// superlatives, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub total_spent: f64,
    /// Per-category sums in first-encountered aggregation order; categories
    /// with zero spend are absent.
    pub per_category: Vec<CategoryTotal>,
    /// Per-date sums in ascending date order.
    pub per_date: Vec<DateTotal>,
    /// Highest-spend category; ties keep the first-encountered one.
    pub top_category: Option<Category>,
    pub max_transaction: Option<MaxTransaction>,
    /// Highest-spend date; ties keep the earliest date.
    pub busiest_date: Option<NaiveDate>,
}

impl PeriodSummary {
    /// The summed spend for one category, 0 when absent from the period.
    pub fn category_total(&self, category: &Category) -> f64 {
        self.per_category
            .iter()
            .find(|entry| &entry.category == category)
            .map(|entry| entry.total)
            .unwrap_or(0.0)
    }
}

/// Groups the filtered transactions by category and date and derives the
/// period aggregates in one pass over the data.
pub fn summarize(
    transactions: &[CategorizedTransaction],
    filter: &SummaryFilter,
) -> PeriodSummary {
    let mut total_spent = 0.0;
    let mut per_category: Vec<CategoryTotal> = Vec::new();
    let mut per_date: Vec<DateTotal> = Vec::new();
    let mut max_transaction: Option<MaxTransaction> = None;

    for transaction in transactions.iter().filter(|t| filter.matches(t)) {
        let amount = transaction.amount();
        total_spent += amount;

        match per_category
            .iter_mut()
            .find(|entry| entry.category == transaction.category)
        {
            Some(entry) => entry.total += amount,
            None => per_category.push(CategoryTotal {
                category: transaction.category.clone(),
                total: amount,
            }),
        }

        let date = transaction.date();
        match per_date.binary_search_by_key(&date, |entry| entry.date) {
            Ok(idx) => per_date[idx].total += amount,
            Err(idx) => per_date.insert(
                idx,
                DateTotal {
                    date,
                    total: amount,
                },
            ),
        }

        let is_new_max = max_transaction
            .as_ref()
            .map(|current| amount > current.amount)
            .unwrap_or(true);
        if is_new_max {
            max_transaction = Some(MaxTransaction {
                merchant: transaction.merchant().to_string(),
                amount,
            });
        }
    }

    // Strict comparisons preserve the documented tie-breaks: first category
    // encountered, earliest date.
    let top_category = per_category
        .iter()
        .fold(None::<&CategoryTotal>, |best, entry| match best {
            Some(current) if entry.total > current.total => Some(entry),
            Some(current) => Some(current),
            None => Some(entry),
        })
        .map(|entry| entry.category.clone());

    let busiest_date = per_date
        .iter()
        .fold(None::<&DateTotal>, |best, entry| match best {
            Some(current) if entry.total > current.total => Some(entry),
            Some(current) => Some(current),
            None => Some(entry),
        })
        .map(|entry| entry.date);

    PeriodSummary {
        total_spent,
        per_category,
        per_date,
        top_category,
        max_transaction,
        busiest_date,
    }
}

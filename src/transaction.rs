use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, Result};

/// A single spending record as handed over by the ingestion layer.
///
/// Identity in the source export is positional, so every transaction is
/// assigned an internal id at construction for stable joins across
/// re-aggregation. Records are never mutated after categorization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub merchant: String,
    pub amount: f64,
}

impl Transaction {
    /// Creates a transaction, rejecting negative or non-finite amounts.
    pub fn new(date: NaiveDate, merchant: impl Into<String>, amount: f64) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "transaction amount must be a non-negative number, got {amount}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            date,
            merchant: merchant.into(),
            amount,
        })
    }
}

/// A transaction plus the category label the rule engine assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: Category,
}

impl CategorizedTransaction {
    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }

    pub fn amount(&self) -> f64 {
        self.transaction.amount
    }

    pub fn merchant(&self) -> &str {
        &self.transaction.merchant
    }
}

/// Spending category labels.
///
/// The known variants cover the built-in rule set; `Custom` lets external
/// rule files extend the set without a code change. Labels serialize as
/// their display strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Shopping,
    Transport,
    Utilities,
    Housing,
    Groceries,
    Entertainment,
    Others,
    Custom(String),
}

impl Category {
    pub fn name(&self) -> &str {
        match self {
            Category::Food => "Food",
            Category::Shopping => "Shopping",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Housing => "Housing",
            Category::Groceries => "Groceries",
            Category::Entertainment => "Entertainment",
            Category::Others => "Others",
            Category::Custom(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Food" => Category::Food,
            "Shopping" => Category::Shopping,
            "Transport" => Category::Transport,
            "Utilities" => Category::Utilities,
            "Housing" => Category::Housing,
            "Groceries" => Category::Groceries,
            "Entertainment" => Category::Entertainment,
            "Others" => Category::Others,
            _ => Category::Custom(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_amounts_are_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = Transaction::new(date, "Swiggy Order", -10.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn transactions_get_unique_ids() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = Transaction::new(date, "Swiggy Order", 300.0).unwrap();
        let b = Transaction::new(date, "Swiggy Order", 300.0).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn category_labels_roundtrip_through_strings() {
        let known = Category::from("Groceries".to_string());
        assert_eq!(known, Category::Groceries);
        let custom = Category::from("Pets".to_string());
        assert_eq!(custom, Category::Custom("Pets".into()));
        assert_eq!(custom.name(), "Pets");
    }
}

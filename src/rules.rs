//! Rule-based merchant categorizer.
//!
//! Rules are data, not code: an ordered list of keyword → category pairs
//! evaluated top to bottom, first match wins. The order is the tie-break
//! (a merchant can match several keywords), so rules live in a `Vec` and
//! never in a keyed map whose iteration order is incidental.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::transaction::{CategorizedTransaction, Category, Transaction};

/// One keyword rule. Matching is a case-insensitive substring test against
/// the merchant string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: Category,
}

impl CategoryRule {
    pub fn new(keyword: impl Into<String>, category: Category) -> Self {
        Self {
            keyword: keyword.into(),
            category,
        }
    }

    fn matches(&self, merchant_lower: &str) -> bool {
        merchant_lower.contains(&self.keyword.to_lowercase())
    }
}

/// An ordered rule list with an `Others` fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl RuleSet {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Loads a rule list from a JSON file, preserving file order.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let rules: Vec<CategoryRule> = serde_json::from_str(&data)?;
        tracing::debug!(count = rules.len(), path = %path.display(), "Loaded category rules");
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Assigns a category to a merchant string. Total and deterministic:
    /// no match is a defined outcome (`Others`), not a failure.
    pub fn categorize(&self, merchant: &str) -> Category {
        let lowered = merchant.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.category.clone())
            .unwrap_or(Category::Others)
    }

    /// Labels every transaction, consuming the batch.
    pub fn categorize_all(&self, transactions: Vec<Transaction>) -> Vec<CategorizedTransaction> {
        transactions
            .into_iter()
            .map(|transaction| {
                let category = self.categorize(&transaction.merchant);
                CategorizedTransaction {
                    transaction,
                    category,
                }
            })
            .collect()
    }
}

/// The built-in rule list, in its original precedence order.
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("swiggy", Category::Food),
        CategoryRule::new("zomato", Category::Food),
        CategoryRule::new("amazon", Category::Shopping),
        CategoryRule::new("flipkart", Category::Shopping),
        CategoryRule::new("uber", Category::Transport),
        CategoryRule::new("ola", Category::Transport),
        CategoryRule::new("bescom", Category::Utilities),
        CategoryRule::new("electricity", Category::Utilities),
        CategoryRule::new("water", Category::Utilities),
        CategoryRule::new("rent", Category::Housing),
        CategoryRule::new("housing", Category::Housing),
        CategoryRule::new("bigbasket", Category::Groceries),
        CategoryRule::new("groceries", Category::Groceries),
        CategoryRule::new("netflix", Category::Entertainment),
        CategoryRule::new("prime", Category::Entertainment),
    ]
}

//! Budget state derivation and badge awarding.
//!
//! Both are pure functions of the current aggregates: re-running evaluation
//! on the same data yields the same states and badges, with no history kept.

use serde::{Deserialize, Serialize};

use crate::forecast::ForecastReport;
use crate::summary::PeriodSummary;
use crate::transaction::Category;

const NEARING_RATIO: f64 = 0.8;

/// Three-level budget adherence signal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetStatus {
    Ok,
    Nearing,
    Over,
}

/// Spend measured against one limit (the whole period or one category).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetState {
    pub limit: f64,
    pub spent: f64,
    pub status: BudgetStatus,
}

impl BudgetState {
    /// Derives the status invariant: `Over` iff spent > limit, `Nearing`
    /// iff 0.8·limit < spent ≤ limit, `Ok` otherwise (including a zero
    /// limit with zero spend).
    pub fn from_parts(limit: f64, spent: f64) -> Self {
        let status = if spent > limit {
            BudgetStatus::Over
        } else if spent > NEARING_RATIO * limit {
            BudgetStatus::Nearing
        } else {
            BudgetStatus::Ok
        };
        Self {
            limit,
            spent,
            status,
        }
    }

    /// Percent of the limit consumed; 0 when the limit is 0 rather than a
    /// division error.
    pub fn percent_used(&self) -> f64 {
        if self.limit == 0.0 {
            0.0
        } else {
            (self.spent / self.limit) * 100.0
        }
    }
}

/// A user-assigned spending cap for one category. Categories without an
/// assigned limit are skipped during evaluation, not defaulted to zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryLimit {
    pub category: Category,
    pub limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBudgetState {
    pub category: Category,
    pub state: BudgetState,
}

/// A configurable category saver badge: awarded when the category's spend
/// stays under the threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BadgeRule {
    pub name: String,
    pub category: Category,
    pub threshold: f64,
}

impl BadgeRule {
    pub fn new(name: impl Into<String>, category: Category, threshold: f64) -> Self {
        Self {
            name: name.into(),
            category,
            threshold,
        }
    }
}

/// The built-in category badge list.
pub fn default_badge_rules() -> Vec<BadgeRule> {
    vec![BadgeRule::new(
        "Entertainment Saver",
        Category::Entertainment,
        500.0,
    )]
}

/// An achievement flag derived purely from current aggregate state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Badge {
    BudgetMaster,
    SavingsGuru,
    CategorySaver(String),
}

impl Badge {
    pub fn name(&self) -> &str {
        match self {
            Badge::BudgetMaster => "Budget Master",
            Badge::SavingsGuru => "Savings Guru",
            Badge::CategorySaver(name) => name,
        }
    }
}

/// Budget states and badges for one analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub overall: BudgetState,
    pub per_category: Vec<CategoryBudgetState>,
    pub badges: Vec<Badge>,
}

/// Evaluates spend against the overall budget and each assigned category
/// limit, then awards whichever badges the current aggregates earn.
pub fn evaluate(
    summary: &PeriodSummary,
    monthly_budget: f64,
    category_limits: &[CategoryLimit],
    goal: u64,
    forecast: &ForecastReport,
    badge_rules: &[BadgeRule],
) -> Evaluation {
    let overall = BudgetState::from_parts(monthly_budget, summary.total_spent);

    let per_category = category_limits
        .iter()
        .map(|limit| CategoryBudgetState {
            category: limit.category.clone(),
            state: BudgetState::from_parts(limit.limit, summary.category_total(&limit.category)),
        })
        .collect();

    let mut badges = Vec::new();
    if summary.total_spent < monthly_budget {
        badges.push(Badge::BudgetMaster);
    }
    if goal > 0 && forecast.linear.forecasted_total < goal as f64 {
        badges.push(Badge::SavingsGuru);
    }
    for rule in badge_rules {
        if summary.category_total(&rule.category) < rule.threshold {
            badges.push(Badge::CategorySaver(rule.name.clone()));
        }
    }

    Evaluation {
        overall,
        per_category,
        badges,
    }
}

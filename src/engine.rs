//! One analysis invocation from end to end.
//!
//! The request object carries everything a run needs (transactions, filter,
//! budget inputs, strategy choices) instead of process-wide session state,
//! so each invocation owns its data and concurrent sessions simply use
//! separate requests. Model training is deliberately not on this path: it
//! is a discrete batch step (`SpendingModel::train` + `ModelStore::save`)
//! so a slow fit never blocks re-aggregation of already-available data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::evaluate::{evaluate, BadgeRule, CategoryLimit, Evaluation};
use crate::forecast::{run_rate, ForecastReport, ModelPrediction, SpendingModel};
use crate::goals::GoalStrategy;
use crate::report::ReportSummary;
use crate::summary::{summarize, PeriodSummary, SummaryFilter};
use crate::transaction::CategorizedTransaction;

/// The full input set for one analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    pub transactions: Vec<CategorizedTransaction>,
    pub filter: SummaryFilter,
    pub as_of: NaiveDate,
    pub monthly_budget: f64,
    pub category_limits: Vec<CategoryLimit>,
    pub goal_strategy: GoalStrategy,
    pub badge_rules: Vec<BadgeRule>,
}

impl AnalysisRequest {
    pub fn new(transactions: Vec<CategorizedTransaction>, as_of: NaiveDate) -> Self {
        Self {
            transactions,
            filter: SummaryFilter::all(),
            as_of,
            monthly_budget: 0.0,
            category_limits: Vec::new(),
            goal_strategy: GoalStrategy::default(),
            badge_rules: crate::evaluate::default_badge_rules(),
        }
    }

    pub fn with_filter(mut self, filter: SummaryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_budget(mut self, monthly_budget: f64) -> Self {
        self.monthly_budget = monthly_budget;
        self
    }

    pub fn with_category_limits(mut self, limits: Vec<CategoryLimit>) -> Self {
        self.category_limits = limits;
        self
    }

    pub fn with_goal_strategy(mut self, strategy: GoalStrategy) -> Self {
        self.goal_strategy = strategy;
        self
    }
}

/// Everything one invocation produces for the presentation and report
/// layers: plain structured values, no rendering concerns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisOutcome {
    pub summary: PeriodSummary,
    pub goal: u64,
    pub forecast: ForecastReport,
    pub evaluation: Evaluation,
    pub report: ReportSummary,
}

/// Recomputes the aggregates and every dependent result from scratch.
///
/// When a trained model is supplied its next-period estimate is attached to
/// the forecast; otherwise the forecast carries the linear figure alone.
/// The two are reported side by side and never reconciled, so the caller
/// always knows which estimate it received.
pub fn run(request: &AnalysisRequest, model: Option<&SpendingModel>) -> AnalysisOutcome {
    let scoped = request.filter.apply(&request.transactions);
    let summary = summarize(&scoped, &SummaryFilter::all());
    let goal = request.goal_strategy.suggest(summary.total_spent);

    let linear = run_rate(&scoped, request.as_of);
    let prediction = model.and_then(|model| match model.predict_next(&request.transactions) {
        Ok(next_amount) => Some(ModelPrediction {
            next_amount,
            r_squared: model.r_squared,
            trained_at: model.trained_at,
        }),
        Err(error) => {
            tracing::warn!(%error, "Model prediction skipped");
            None
        }
    });
    let forecast = ForecastReport {
        linear,
        model: prediction,
    };

    let evaluation = evaluate(
        &summary,
        request.monthly_budget,
        &request.category_limits,
        goal,
        &forecast,
        &request.badge_rules,
    );
    let report = ReportSummary::build(&summary, request.monthly_budget, goal);

    tracing::debug!(
        total_spent = summary.total_spent,
        goal,
        badges = evaluation.badges.len(),
        "Analysis invocation complete"
    );

    AnalysisOutcome {
        summary,
        goal,
        forecast,
        evaluation,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::BudgetStatus;
    use crate::rules::RuleSet;
    use crate::transaction::{Category, Transaction};

    fn reference_transactions() -> Vec<CategorizedTransaction> {
        let rules = RuleSet::default();
        let batch = vec![
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                "Swiggy Order",
                300.0,
            )
            .unwrap(),
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                "Amazon India",
                1200.0,
            )
            .unwrap(),
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                "Uber Trip",
                250.0,
            )
            .unwrap(),
        ];
        rules.categorize_all(batch)
    }

    #[test]
    fn filter_scopes_every_dependent_result() {
        let rules = RuleSet::default();
        let batch = vec![
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                "Swiggy Order",
                300.0,
            )
            .unwrap(),
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
                "Amazon India",
                9000.0,
            )
            .unwrap(),
        ];
        let request = AnalysisRequest::new(
            rules.categorize_all(batch),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .with_filter(SummaryFilter::for_month(2024, 1))
        .with_budget(2000.0);

        let outcome = run(&request, None);
        assert!((outcome.summary.total_spent - 300.0).abs() < 1e-6);
        assert_eq!(outcome.summary.top_category, Some(Category::Food));
        assert!((outcome.forecast.linear.spent_so_far - 300.0).abs() < 1e-6);
    }

    #[test]
    fn without_a_model_the_forecast_is_linear_only() {
        let request = AnalysisRequest::new(
            reference_transactions(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .with_budget(2000.0);
        let outcome = run(&request, None);
        assert!(outcome.forecast.model.is_none());
    }

    #[test]
    fn with_a_model_both_estimates_are_reported() {
        let transactions = reference_transactions();
        let model = SpendingModel::train(&transactions).expect("train");
        let request =
            AnalysisRequest::new(transactions, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap())
                .with_budget(2000.0);
        let outcome = run(&request, Some(&model));

        let prediction = outcome.forecast.model.expect("model estimate attached");
        assert!(prediction.next_amount >= 0.0);
        // The linear figure is untouched by the model's presence.
        let linear_only = run(&request, None);
        assert_eq!(outcome.forecast.linear, linear_only.forecast.linear);
    }

    #[test]
    fn reference_scenario_end_to_end() {
        let request = AnalysisRequest::new(
            reference_transactions(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .with_budget(2000.0);
        let outcome = run(&request, None);

        assert!((outcome.summary.total_spent - 1750.0).abs() < 1e-6);
        assert_eq!(outcome.evaluation.overall.status, BudgetStatus::Nearing);
        assert_eq!(outcome.summary.top_category, Some(Category::Shopping));
        assert_eq!(outcome.goal, 500);
        assert_eq!(outcome.report.top_merchant.as_deref(), Some("Amazon India"));
    }

    #[test]
    fn empty_request_yields_the_defined_zero_outcome() {
        let request = AnalysisRequest::new(vec![], NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
            .with_budget(5000.0);
        let outcome = run(&request, None);

        assert_eq!(outcome.summary.total_spent, 0.0);
        assert_eq!(outcome.evaluation.overall.status, BudgetStatus::Ok);
        assert_eq!(outcome.summary.top_category, None);
        assert_eq!(outcome.goal, 0);
        assert_eq!(outcome.forecast.linear.forecasted_total, 0.0);
    }
}

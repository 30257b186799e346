//! Spending forecasts.
//!
//! Two estimators live here and stay architecturally independent: the
//! deterministic linear run-rate extrapolation and an optional trained
//! regression model. A report carries both (the model side only when a
//! trained artifact was supplied), so callers always know which estimate
//! they received; the two are never reconciled or silently swapped.

pub mod features;
pub mod linear;
pub mod model;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use features::FeatureRow;
pub use linear::{run_rate, LinearForecast};
pub use model::SpendingModel;

/// A next-period point estimate from the trained regression model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelPrediction {
    pub next_amount: f64,
    /// Held-out R² recorded at training time. A quality signal only;
    /// prediction is never blocked on a minimum score.
    pub r_squared: f64,
    pub trained_at: DateTime<Utc>,
}

/// The combined forecast handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastReport {
    pub linear: LinearForecast,
    pub model: Option<ModelPrediction>,
}

impl ForecastReport {
    pub fn linear_only(linear: LinearForecast) -> Self {
        Self {
            linear,
            model: None,
        }
    }
}

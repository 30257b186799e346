//! Trained regression forecaster.
//!
//! An ordinary-least-squares linear regression over the calendar and lag
//! features, fit offline as a discrete batch step so a slow training run
//! never blocks the interactive aggregation path. The fit uses a fixed-seed
//! 80/20 train/test split and records the held-out R² as a quality signal;
//! prediction is never blocked on a minimum score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::transaction::CategorizedTransaction;

use super::features::{feature_rows, latest_row, FeatureRow, FEATURE_COUNT};

const SPLIT_SEED: u64 = 42;
const TRAIN_FRACTION: f64 = 0.8;
// Intercept plus one weight per feature.
const WEIGHT_COUNT: usize = FEATURE_COUNT + 1;

/// A trained spending model: regression weights plus training metadata.
/// This is the single persisted artifact of the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingModel {
    weights: Vec<f64>,
    pub r_squared: f64,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
}

impl SpendingModel {
    /// Fits the regression on the transaction history.
    ///
    /// Histories shorter than the lag horizon still train (the lag features
    /// are zero-filled); only an empty history is an error. When the normal
    /// equations are singular (degenerate features, e.g. a one-row split)
    /// the fit falls back to predicting the training mean.
    pub fn train(transactions: &[CategorizedTransaction]) -> Result<Self> {
        if transactions.is_empty() {
            return Err(EngineError::InvalidInput(
                "cannot train a spending model on an empty transaction history".into(),
            ));
        }

        let (rows, targets) = feature_rows(transactions);
        let n = rows.len();
        let indices = shuffled_indices(n, SPLIT_SEED);
        let train_len = (((n as f64) * TRAIN_FRACTION).round() as usize).clamp(1, n);
        let (train_idx, test_idx) = indices.split_at(train_len);

        let weights = fit_least_squares(&rows, &targets, train_idx);
        let model = Self {
            weights,
            r_squared: 0.0,
            trained_at: Utc::now(),
            training_rows: train_len,
        };
        let r_squared = model.score(&rows, &targets, test_idx);
        tracing::info!(
            rows = n,
            train = train_len,
            r_squared,
            "Trained spending model"
        );
        Ok(Self { r_squared, ..model })
    }

    /// Evaluates one feature row. Estimates clamp at zero since transaction
    /// amounts are non-negative.
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        let features = row.as_vector();
        let estimate = self.weights[0]
            + self
                .weights[1..]
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        estimate.max(0.0)
    }

    /// Point estimate for the next transaction amount, scored on the most
    /// recent feature row of the history.
    pub fn predict_next(&self, transactions: &[CategorizedTransaction]) -> Result<f64> {
        let row = latest_row(transactions).ok_or_else(|| {
            EngineError::InvalidInput(
                "cannot predict from an empty transaction history".into(),
            )
        })?;
        Ok(self.predict(&row))
    }

    /// Held-out R². Guards the zero-variance denominator to 0 instead of
    /// dividing by zero; an empty test split also scores 0.
    fn score(&self, rows: &[FeatureRow], targets: &[f64], test_idx: &[usize]) -> f64 {
        if test_idx.is_empty() {
            return 0.0;
        }
        let mean = test_idx.iter().map(|&i| targets[i]).sum::<f64>() / test_idx.len() as f64;
        let ss_tot: f64 = test_idx.iter().map(|&i| (targets[i] - mean).powi(2)).sum();
        if ss_tot == 0.0 {
            return 0.0;
        }
        let ss_res: f64 = test_idx
            .iter()
            .map(|&i| (targets[i] - self.predict(&rows[i])).powi(2))
            .sum();
        1.0 - ss_res / ss_tot
    }
}

/// Solves the normal equations over the selected rows, with an intercept
/// column prepended. Falls back to a mean predictor on a singular system.
fn fit_least_squares(rows: &[FeatureRow], targets: &[f64], train_idx: &[usize]) -> Vec<f64> {
    let mut xtx = [[0.0f64; WEIGHT_COUNT]; WEIGHT_COUNT];
    let mut xty = [0.0f64; WEIGHT_COUNT];

    for &i in train_idx {
        let features = rows[i].as_vector();
        let mut design = [1.0f64; WEIGHT_COUNT];
        design[1..].copy_from_slice(&features);
        for (r, &dr) in design.iter().enumerate() {
            for (c, &dc) in design.iter().enumerate() {
                xtx[r][c] += dr * dc;
            }
            xty[r] += dr * targets[i];
        }
    }

    match solve(xtx, xty) {
        Some(weights) => weights,
        None => {
            let mean =
                train_idx.iter().map(|&i| targets[i]).sum::<f64>() / train_idx.len() as f64;
            tracing::warn!("Normal equations singular; falling back to mean predictor");
            let mut weights = vec![0.0; WEIGHT_COUNT];
            weights[0] = mean;
            weights
        }
    }
}

/// Gaussian elimination with partial pivoting. `None` on a singular matrix.
fn solve(
    mut a: [[f64; WEIGHT_COUNT]; WEIGHT_COUNT],
    mut b: [f64; WEIGHT_COUNT],
) -> Option<Vec<f64>> {
    for col in 0..WEIGHT_COUNT {
        let pivot = (col..WEIGHT_COUNT)
            .max_by(|&r1, &r2| {
                a[r1][col]
                    .abs()
                    .partial_cmp(&a[r2][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-10 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..WEIGHT_COUNT {
            let factor = a[row][col] / a[col][col];
            for k in col..WEIGHT_COUNT {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; WEIGHT_COUNT];
    for row in (0..WEIGHT_COUNT).rev() {
        let tail: f64 = ((row + 1)..WEIGHT_COUNT).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Deterministic Fisher-Yates shuffle of row indices (xorshift64, fixed
/// seed) so retraining on the same data reproduces the same split.
fn shuffled_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    let mut indices: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = (next() % (i as u64 + 1)) as usize;
        indices.swap(i, j);
    }
    indices
}

//! estimator.rs
//!
//! Advisory booking-confirmation estimator.
//!
//! The model is a three-feature logistic regression (days booked in advance,
//! weekend flag, ticket price) trained once at start-up on a synthetic
//! booking history. It is a pure function once trained: the booking handlers
//! never consult it, clients call it separately for a probability preview.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use csv::Writer as CsvWriter;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::config::EstimatorConfig;

const BASE_PRICE: f64 = 650.0;
const WEEKEND_MARKUP: f64 = 120.0;
const SHORT_NOTICE_MARKUP: f64 = 220.0;
const HOLDOUT_FRACTION: f64 = 0.25;
const SPLIT_SEED: u64 = 7;
/// Inverse L2 regularisation strength, same meaning as `C` in scikit-learn.
const INVERSE_REGULARISATION: f64 = 1.0;

#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("training set is empty")]
    EmptyDataset,
    #[error("training set contains only one outcome class")]
    SingleClass,
    #[error("training diverged, model weights are not finite")]
    Diverged,
    #[error("failed to write dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// One historical booking of the synthetic dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingSample {
    pub days_in_advance: i64,
    pub is_weekend: bool,
    pub price: i64,
    pub confirmed: bool,
}

impl BookingSample {
    fn features(&self) -> [f64; 3] {
        features(self.days_in_advance, self.is_weekend, self.price)
    }
}

fn features(days_in_advance: i64, is_weekend: bool, price: i64) -> [f64; 3] {
    [days_in_advance as f64, if is_weekend { 1.0 } else { 0.0 }, price as f64]
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Box-Muller draw from N(0, 1).
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Generates the mock booking history. Earlier bookings confirm more often,
/// weekend demand and higher prices lower the odds. Deterministic per seed.
pub fn generate_history(rows: usize, seed: u64) -> Vec<BookingSample> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..rows)
        .map(|_| {
            let days_in_advance: i64 = rng.gen_range(0..=30);
            let is_weekend: bool = rng.gen_bool(0.5);
            let weekend = if is_weekend { 1.0 } else { 0.0 };
            let short_notice = if days_in_advance <= 2 { 1.0 } else { 0.0 };

            let price = (BASE_PRICE
                + weekend * WEEKEND_MARKUP
                + short_notice * SHORT_NOTICE_MARKUP
                + 45.0 * standard_normal(&mut rng))
            .round();

            let score = 1.1 + 0.06 * days_in_advance as f64 - 0.55 * weekend - 0.0028 * (price - BASE_PRICE)
                + 0.35 * standard_normal(&mut rng);
            let confirmed = rng.gen::<f64>() < sigmoid(score);

            BookingSample {
                days_in_advance,
                is_weekend,
                price: price as i64,
                confirmed,
            }
        })
        .collect()
}

/// Writes the history as `days_in_advance,is_weekend,price,confirmed`,
/// flags encoded as 0/1.
pub fn write_history_csv(path: &Path, samples: &[BookingSample]) -> Result<(), EstimatorError> {
    let mut wtr = CsvWriter::from_writer(File::create(path)?);
    wtr.write_record(["days_in_advance", "is_weekend", "price", "confirmed"])?;
    for s in samples {
        wtr.write_record([
            s.days_in_advance.to_string(),
            u8::from(s.is_weekend).to_string(),
            s.price.to_string(),
            u8::from(s.confirmed).to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Per-feature standardisation: zero mean, unit (population) variance.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; 3],
    scale: [f64; 3],
}

impl StandardScaler {
    pub fn fit(rows: &[[f64; 3]]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = [0.0; 3];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x / n;
            }
        }
        let mut scale = [0.0; 3];
        for row in rows {
            for i in 0..3 {
                scale[i] += (row[i] - mean[i]).powi(2) / n;
            }
        }
        // Constant columns keep unit scale.
        for s in scale.iter_mut() {
            *s = if *s > 0.0 { s.sqrt() } else { 1.0 };
        }
        Self { mean, scale }
    }

    pub fn transform(&self, row: &[f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for i in 0..3 {
            out[i] = (row[i] - self.mean[i]) / self.scale[i];
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    weights: [f64; 3],
    bias: f64,
}

impl LogisticModel {
    /// Full-batch gradient descent on the L2-regularised log-loss.
    pub fn fit(x: &[[f64; 3]], y: &[bool], learning_rate: f64, epochs: usize) -> Self {
        let n = x.len() as f64;
        let mut weights = [0.0; 3];
        let mut bias = 0.0;

        for _ in 0..epochs {
            let mut grad_w = [0.0; 3];
            let mut grad_b = 0.0;
            for (row, &label) in x.iter().zip(y) {
                let err = sigmoid(dot(&weights, row) + bias) - if label { 1.0 } else { 0.0 };
                for i in 0..3 {
                    grad_w[i] += err * row[i];
                }
                grad_b += err;
            }
            for i in 0..3 {
                let penalty = weights[i] / (INVERSE_REGULARISATION * n);
                weights[i] -= learning_rate * (grad_w[i] / n + penalty);
            }
            bias -= learning_rate * grad_b / n;
        }

        Self { weights, bias }
    }

    pub fn predict_proba(&self, row: &[f64; 3]) -> f64 {
        sigmoid(dot(&self.weights, row) + self.bias)
    }

    pub fn weights(&self) -> [f64; 3] {
        self.weights
    }

    pub fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Trained scaler + model pair.
#[derive(Debug, Clone)]
pub struct ConfirmationEstimator {
    scaler: StandardScaler,
    model: LogisticModel,
    holdout_accuracy: f64,
    training_rows: usize,
}

impl ConfirmationEstimator {
    /// Generates the synthetic history (exporting it when a path is
    /// configured) and trains on it.
    pub fn train(config: &EstimatorConfig) -> Result<Self, EstimatorError> {
        let history = generate_history(config.dataset_rows, config.random_seed);
        if let Some(path) = &config.dataset_path {
            write_history_csv(path, &history)?;
            info!("Synthetic booking history written to {}", path.display());
        }
        Self::fit(&history, config.learning_rate, config.epochs)
    }

    pub fn fit(samples: &[BookingSample], learning_rate: f64, epochs: usize) -> Result<Self, EstimatorError> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(EstimatorError::InvalidInput(format!(
                "learning rate must be a positive finite number, got {}",
                learning_rate
            )));
        }
        if epochs == 0 {
            return Err(EstimatorError::InvalidInput("epochs must be greater than zero".to_string()));
        }
        if samples.is_empty() {
            return Err(EstimatorError::EmptyDataset);
        }
        let positives = samples.iter().filter(|s| s.confirmed).count();
        if positives == 0 || positives == samples.len() {
            return Err(EstimatorError::SingleClass);
        }

        let mut order: Vec<usize> = (0..samples.len()).collect();
        order.shuffle(&mut StdRng::seed_from_u64(SPLIT_SEED));
        let holdout = ((samples.len() as f64) * HOLDOUT_FRACTION).round() as usize;
        let (test_idx, train_idx) = order.split_at(holdout.min(samples.len() - 1));

        let train_rows: Vec<[f64; 3]> = train_idx.iter().map(|&i| samples[i].features()).collect();
        let train_labels: Vec<bool> = train_idx.iter().map(|&i| samples[i].confirmed).collect();

        let scaler = StandardScaler::fit(&train_rows);
        let scaled: Vec<[f64; 3]> = train_rows.iter().map(|r| scaler.transform(r)).collect();
        let model = LogisticModel::fit(&scaled, &train_labels, learning_rate, epochs);
        if !model.is_finite() {
            return Err(EstimatorError::Diverged);
        }

        let holdout_accuracy = if test_idx.is_empty() {
            0.0
        } else {
            let correct = test_idx
                .iter()
                .filter(|&&i| {
                    let p = model.predict_proba(&scaler.transform(&samples[i].features()));
                    (p >= 0.5) == samples[i].confirmed
                })
                .count();
            correct as f64 / test_idx.len() as f64
        };

        info!(
            "Confirmation estimator trained on {} rows, holdout accuracy {:.3}",
            train_idx.len(),
            holdout_accuracy
        );

        Ok(Self {
            scaler,
            model,
            holdout_accuracy,
            training_rows: train_idx.len(),
        })
    }

    /// Probability in `[0, 1]` that a booking with these features confirms.
    pub fn estimate(&self, days_in_advance: i64, is_weekend: bool, price: i64) -> Result<f64, EstimatorError> {
        if days_in_advance < 0 {
            return Err(EstimatorError::InvalidInput("days_in_advance must not be negative".to_string()));
        }
        if price <= 0 {
            return Err(EstimatorError::InvalidInput("price must be positive".to_string()));
        }
        let row = self.scaler.transform(&features(days_in_advance, is_weekend, price));
        let p = self.model.predict_proba(&row);
        if p.is_nan() {
            return Err(EstimatorError::Diverged);
        }
        Ok(p.clamp(0.0, 1.0))
    }

    pub fn holdout_accuracy(&self) -> f64 {
        self.holdout_accuracy
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }
}

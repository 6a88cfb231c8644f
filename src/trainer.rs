//! Cross-validated diagnostics for the focus classifier.
//!
//! 1. Stratified-prior baseline scored by k-fold macro F1.
//! 2. Balanced logistic regression scored the same way.
//! 3. The same model fit on every sample; intercept and coefficients reported.
use anyhow::{bail, ensure, Result};
use ndarray::Array1;
use tracing::info;

use crate::config::TrainerConfig;
use crate::dataset::Dataset;
use crate::ml::{cross_val_score, f1_macro, Classifier, LogisticRegression, StratifiedDummy, StratifiedKFold};

/// Everything the trainer reports.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Per-fold macro F1 of the baseline.
    pub dummy_scores: Vec<f64>,
    /// Per-fold macro F1 of the logistic model.
    pub model_scores: Vec<f64>,
    pub intercept: f64,
    pub coefficients: Array1<f64>,
}

fn mean(v: &[f64]) -> f64 {
    if v.is_empty() { 0.0 } else { v.iter().sum::<f64>() / v.len() as f64 }
}

impl TrainingReport {
    pub fn dummy_mean(&self) -> f64 {
        mean(&self.dummy_scores)
    }

    pub fn model_mean(&self) -> f64 {
        mean(&self.model_scores)
    }
}

/// Run the baseline and model evaluations, then fit on all data.
///
/// Fails on an empty dataset, a single-class dataset, or when no class has
/// at least `cfg.folds` members.
pub fn train(dataset: &Dataset, cfg: &TrainerConfig) -> Result<TrainingReport> {
    let (x, y) = dataset.to_arrays()?;
    let splits = StratifiedKFold::new(cfg.folds).split(y.view())?;

    let dummy = StratifiedDummy::new(cfg.seed);
    let dummy_scores = cross_val_score(&dummy, x.view(), y.view(), &splits, cfg.n_jobs, f1_macro)?;
    info!("Dummy Scores: {dummy_scores:?}");

    let model = LogisticRegression::new(cfg.c, cfg.max_iter, cfg.tol);
    let model_scores = cross_val_score(&model, x.view(), y.view(), &splits, cfg.n_jobs, f1_macro)?;
    info!("Scores: {model_scores:?}");

    let mut full = model;
    full.fit(x.view(), y.view())?;
    let (Some(intercept), Some(coefficients)) = (full.intercept(), full.coefficients()) else {
        bail!("model produced no parameters");
    };
    let coefficients = coefficients.to_owned();
    ensure!(coefficients.len() == x.ncols(), "coefficient count does not match feature count");
    info!("Intercept: {intercept}");
    info!("Coefficients: {coefficients}");

    Ok(TrainingReport { dummy_scores, model_scores, intercept, coefficients })
}

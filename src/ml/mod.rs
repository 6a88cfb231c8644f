//! Minimal supervised-learning toolkit for the focus classifier.
//!
//! - [`Classifier`]: fit / predict on `[N, D]` features with `u8` labels
//! - [`StratifiedDummy`]: prior-sampling baseline
//! - [`LogisticRegression`]: L2 logistic regression with balanced class weights
//! - [`StratifiedKFold`] + [`cross_val_score`]: fold evaluation on a rayon pool
//! - [`f1_macro`]: class-balanced score

pub mod cv;
pub mod dummy;
pub mod logistic;
pub mod metrics;

use anyhow::Result;
use ndarray::{Array1, ArrayView1, ArrayView2};

pub use cv::{cross_val_score, CvSplit, StratifiedKFold};
pub use dummy::StratifiedDummy;
pub use logistic::LogisticRegression;
pub use metrics::{f1_macro, f1_score};

/// A binary/multiclass classifier over dense `f64` features.
pub trait Classifier: Clone + Send + Sync {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<u8>) -> Result<()>;

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<u8>>;

    /// Unfitted copy used to evaluate cross-validation fold `fold`.
    ///
    /// Randomised models derive a per-fold seed here.
    fn for_fold(&self, _fold: usize) -> Self {
        self.clone()
    }
}

//! Stratified k-fold cross-validation.
//!
//! Folds are built without shuffling: each class's samples keep their
//! dataset order and are dealt to folds 0, 1, … in contiguous runs, with
//! per-fold class counts balanced by dealing the sorted label vector
//! round-robin.
use anyhow::{bail, ensure, Context, Result};
use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use tracing::warn;

use super::Classifier;

/// One train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Stratified k-fold splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedKFold {
    pub n_splits: usize,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// Fold id of every sample.
    pub fn test_folds(&self, y: ArrayView1<u8>) -> Result<Vec<usize>> {
        let k = self.n_splits;
        let n = y.len();
        if k < 2 {
            bail!("n_splits must be at least 2, got {k}");
        }
        if k > n {
            bail!("cannot have n_splits={k} greater than the number of samples: n_samples={n}");
        }

        // Classes numbered in order of first appearance.
        let mut classes: Vec<u8> = Vec::new();
        let encoded: Vec<usize> = y
            .iter()
            .map(|&label| match classes.iter().position(|&c| c == label) {
                Some(i) => i,
                None => {
                    classes.push(label);
                    classes.len() - 1
                }
            })
            .collect();

        let mut counts = vec![0usize; classes.len()];
        for &c in &encoded {
            counts[c] += 1;
        }
        if counts.iter().all(|&c| c < k) {
            bail!("n_splits={k} cannot be greater than the number of members in each class");
        }
        if let Some(&min) = counts.iter().min() {
            if min < k {
                warn!("the least populated class has only {min} members, fewer than n_splits={k}");
            }
        }

        let mut sorted = encoded.clone();
        sorted.sort_unstable();
        let mut allocation = vec![vec![0usize; classes.len()]; k];
        for (j, &c) in sorted.iter().enumerate() {
            allocation[j % k][c] += 1;
        }

        let mut folds = vec![0usize; n];
        for class in 0..classes.len() {
            let mut dealt = allocation
                .iter()
                .enumerate()
                .flat_map(|(fold, per_class)| std::iter::repeat(fold).take(per_class[class]));
            for (i, _) in encoded.iter().enumerate().filter(|&(_, &c)| c == class) {
                folds[i] = dealt.next().context("fold allocation exhausted")?;
            }
        }
        Ok(folds)
    }

    pub fn split(&self, y: ArrayView1<u8>) -> Result<Vec<CvSplit>> {
        let folds = self.test_folds(y)?;
        Ok((0..self.n_splits)
            .map(|fold| {
                let (test_indices, train_indices) = (0..folds.len()).partition(|&i| folds[i] == fold);
                CvSplit { train_indices, test_indices }
            })
            .collect())
    }
}

/// Score `clf` on every split, fitting a fresh copy per fold.
///
/// Folds run on a dedicated pool of `n_jobs` threads (`0` = rayon's
/// default); scores come back in fold order.
pub fn cross_val_score<C, S>(
    clf: &C,
    x: ArrayView2<f64>,
    y: ArrayView1<u8>,
    splits: &[CvSplit],
    n_jobs: usize,
    score: S,
) -> Result<Vec<f64>>
where
    C: Classifier,
    S: Fn(ArrayView1<u8>, ArrayView1<u8>) -> f64 + Sync,
{
    if x.nrows() != y.len() {
        bail!("{} feature rows for {} labels", x.nrows(), y.len());
    }
    let pool = rayon::ThreadPoolBuilder::new().num_threads(n_jobs).build()?;
    pool.install(|| {
        splits
            .par_iter()
            .enumerate()
            .map(|(fold, split)| {
                let mut model = clf.for_fold(fold);
                let x_train = x.select(Axis(0), &split.train_indices);
                let y_train = y.select(Axis(0), &split.train_indices);
                model
                    .fit(x_train.view(), y_train.view())
                    .with_context(|| format!("fitting fold {fold}"))?;
                let x_test = x.select(Axis(0), &split.test_indices);
                let y_test = y.select(Axis(0), &split.test_indices);
                let y_pred = model.predict(x_test.view())?;
                ensure!(
                    y_pred.len() == y_test.len(),
                    "fold {fold}: {} predictions for {} test samples",
                    y_pred.len(),
                    y_test.len()
                );
                Ok(score(y_test.view(), y_pred.view()))
            })
            .collect()
    })
}

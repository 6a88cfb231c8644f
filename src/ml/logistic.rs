//! L2-regularised binary logistic regression.
//!
//! Minimises
//!
//! ```text
//! ½‖β‖² + C · Σᵢ sᵢ · log(1 + exp(−tᵢ · β·x̃ᵢ))
//! ```
//!
//! where `x̃ = [x, 1]` (the intercept is a regularised bias column),
//! `tᵢ ∈ {−1, +1}` and `sᵢ` is the balanced weight of sample `i`'s class,
//! `n / (2 · n_class)`.  Solved by Newton steps with backtracking.
use anyhow::{bail, ensure, Result};
use ndarray::{concatenate, s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use tracing::debug;

use super::Classifier;

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    /// Fitted `[coefficients…, intercept]`.
    beta: Option<Array1<f64>>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(1.0, 3000, 1e-4)
    }
}

fn log1p_exp(z: f64) -> f64 {
    if z > 0.0 { z + (-z).exp().ln_1p() } else { z.exp().ln_1p() }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn new(c: f64, max_iter: usize, tol: f64) -> Self {
        Self { c, max_iter, tol, beta: None }
    }

    pub fn is_fitted(&self) -> bool {
        self.beta.is_some()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.beta.as_ref().and_then(|b| b.last().copied())
    }

    pub fn coefficients(&self) -> Option<ArrayView1<f64>> {
        self.beta.as_ref().map(|b| b.slice(s![..b.len() - 1]))
    }

    /// `β·x̃` for each row.
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let Some(beta) = &self.beta else {
            bail!("LogisticRegression used before fit");
        };
        let d = beta.len() - 1;
        ensure!(x.ncols() == d, "expected {d} features, got {}", x.ncols());
        Ok(x.dot(&beta.slice(s![..d])) + beta[d])
    }

    fn objective(&self, xa: &Array2<f64>, t: &Array1<f64>, s: &Array1<f64>, beta: &Array1<f64>) -> f64 {
        let margins = xa.dot(beta) * t;
        let loss: f64 = margins.iter().zip(s).map(|(&m, &w)| w * log1p_exp(-m)).sum();
        0.5 * beta.dot(beta) + self.c * loss
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<u8>) -> Result<()> {
        let n = y.len();
        ensure!(n > 0, "cannot fit on an empty dataset");
        ensure!(x.nrows() == n, "{} feature rows for {n} labels", x.nrows());
        if let Some(&bad) = y.iter().find(|&&v| v > 1) {
            bail!("binary labels expected, got {bad}");
        }
        let n_pos = y.iter().filter(|&&v| v == 1).count();
        if n_pos == 0 || n_pos == n {
            bail!(
                "this solver needs samples of at least 2 classes in the data, but the data contains only one class: {}",
                y[0]
            );
        }

        let w_pos = n as f64 / (2.0 * n_pos as f64);
        let w_neg = n as f64 / (2.0 * (n - n_pos) as f64);
        let t: Array1<f64> = y.mapv(|v| if v == 1 { 1.0 } else { -1.0 });
        let s: Array1<f64> = y.mapv(|v| if v == 1 { w_pos } else { w_neg });
        let bias = Array2::<f64>::ones((n, 1));
        let xa = concatenate(Axis(1), &[x.view(), bias.view()])?;
        let dim = xa.ncols();

        let mut beta = Array1::<f64>::zeros(dim);
        let mut f = self.objective(&xa, &t, &s, &beta);
        for iter in 0..self.max_iter {
            let z = xa.dot(&beta);
            // ∂/∂z of the weighted loss, and its curvature.
            let mut dz = Array1::<f64>::zeros(n);
            let mut curv = Array1::<f64>::zeros(n);
            for i in 0..n {
                let p = sigmoid(t[i] * z[i]);
                dz[i] = self.c * s[i] * (p - 1.0) * t[i];
                curv[i] = self.c * s[i] * p * (1.0 - p);
            }
            let grad = &beta + &xa.t().dot(&dz);
            let gnorm = grad.dot(&grad).sqrt();
            if gnorm <= self.tol {
                debug!("logistic regression converged after {iter} iterations");
                break;
            }

            let weighted = &xa * &curv.view().insert_axis(Axis(1));
            let mut hess = xa.t().dot(&weighted);
            for j in 0..dim {
                hess[[j, j]] += 1.0;
            }
            let step = cholesky_solve(&hess, &grad.mapv(|g| -g))?;

            // Backtracking line search (Armijo).
            let slope = grad.dot(&step);
            let mut alpha = 1.0;
            loop {
                let candidate = &beta + &(&step * alpha);
                let f_new = self.objective(&xa, &t, &s, &candidate);
                if f_new <= f + 1e-4 * alpha * slope || alpha < 1e-10 {
                    beta = candidate;
                    f = f_new;
                    break;
                }
                alpha *= 0.5;
            }
        }

        self.beta = Some(beta);
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<u8>> {
        Ok(self.decision_function(x)?.mapv(|z| u8::from(z > 0.0)))
    }

    fn for_fold(&self, _fold: usize) -> Self {
        Self::new(self.c, self.max_iter, self.tol)
    }
}

/// Solve `a · x = b` for symmetric positive-definite `a`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                ensure!(sum > 0.0, "Hessian is not positive definite");
                l[[i, i]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }

    // L·y = b, then Lᵀ·x = y.
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let s: f64 = (0..i).map(|k| l[[i, k]] * y[k]).sum();
        y[i] = (b[i] - s) / l[[i, i]];
    }
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let s: f64 = (i + 1..n).map(|k| l[[k, i]] * x[k]).sum();
        x[i] = (y[i] - s) / l[[i, i]];
    }
    Ok(x)
}

//! Chance-level baseline: predictions drawn from the training class priors.
use anyhow::{bail, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Classifier;

#[derive(Debug, Clone)]
pub struct StratifiedDummy {
    seed: u64,
    /// `(class, prior)` in ascending class order.
    priors: Vec<(u8, f64)>,
}

impl StratifiedDummy {
    pub fn new(seed: u64) -> Self {
        Self { seed, priors: Vec::new() }
    }

    pub fn priors(&self) -> &[(u8, f64)] {
        &self.priors
    }
}

impl Classifier for StratifiedDummy {
    fn fit(&mut self, _x: ArrayView2<f64>, y: ArrayView1<u8>) -> Result<()> {
        if y.is_empty() {
            bail!("cannot fit on an empty label vector");
        }
        let mut counts = [0usize; 256];
        for &label in y {
            counts[label as usize] += 1;
        }
        let n = y.len() as f64;
        self.priors = counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(class, &c)| (class as u8, c as f64 / n))
            .collect();
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<u8>> {
        let Some(&(last, _)) = self.priors.last() else {
            bail!("StratifiedDummy used before fit");
        };
        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok((0..x.nrows())
            .map(|_| {
                let u: f64 = rng.gen();
                let mut acc = 0.0;
                for &(class, p) in &self.priors {
                    acc += p;
                    if u < acc {
                        return class;
                    }
                }
                last
            })
            .collect())
    }

    fn for_fold(&self, fold: usize) -> Self {
        Self::new(self.seed.wrapping_add(fold as u64))
    }
}

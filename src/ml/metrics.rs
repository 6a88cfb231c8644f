//! Classification scores.
use ndarray::ArrayView1;

/// Per-class `(tp, fp, fn)` for `class`.
fn confusion(y_true: ArrayView1<u8>, y_pred: ArrayView1<u8>, class: u8) -> (usize, usize, usize) {
    let (mut tp, mut fp, mut fn_) = (0, 0, 0);
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        match (t == class, p == class) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }
    (tp, fp, fn_)
}

/// F1 of one class; 0 when the class is neither predicted nor present.
pub fn f1_score(y_true: ArrayView1<u8>, y_pred: ArrayView1<u8>, class: u8) -> f64 {
    let (tp, fp, fn_) = confusion(y_true, y_pred, class);
    let denom = 2 * tp + fp + fn_;
    if denom == 0 { 0.0 } else { 2.0 * tp as f64 / denom as f64 }
}

/// Unweighted mean of per-class F1 over every class seen in either vector.
///
/// Both vectors must have the same length; callers check this.
///
/// ```
/// use eegfocus::ml::f1_macro;
/// use ndarray::array;
/// let s = f1_macro(array![0, 0, 1, 1].view(), array![0, 1, 1, 1].view());
/// assert!((s - (2.0 / 3.0 + 0.8) / 2.0).abs() < 1e-12);
/// ```
pub fn f1_macro(y_true: ArrayView1<u8>, y_pred: ArrayView1<u8>) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len(), "label vectors differ in length");
    let mut classes: Vec<u8> = y_true.iter().chain(y_pred.iter()).copied().collect();
    classes.sort_unstable();
    classes.dedup();
    if classes.is_empty() {
        return 0.0;
    }
    classes.iter().map(|&c| f1_score(y_true, y_pred, c)).sum::<f64>() / classes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn perfect_prediction_scores_one() {
        let y = array![0u8, 1, 1, 0, 1];
        approx::assert_abs_diff_eq!(f1_macro(y.view(), y.view()), 1.0);
    }

    #[test]
    fn minority_class_weighs_equally() {
        // Majority-only prediction: class 0 F1 = 18/19, class 1 F1 = 0.
        let mut y_true = vec![0u8; 9];
        y_true.push(1);
        let y_true = ndarray::Array1::from(y_true);
        let y_pred = ndarray::Array1::from(vec![0u8; 10]);
        let s = f1_macro(y_true.view(), y_pred.view());
        approx::assert_abs_diff_eq!(s, (18.0 / 19.0) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn all_wrong_scores_zero() {
        let s = f1_macro(array![0u8, 0, 1].view(), array![1u8, 1, 0].view());
        assert_eq!(s, 0.0);
    }
}

//! Constant detrend.
//!
//! `detrend_constant_inplace`: for each channel: `x[ch, :] -= mean(x[ch, :])`
use ndarray::ArrayViewMut2;

/// Remove the per-channel mean of a `[C, T]` window.
pub fn detrend_constant_inplace(mut data: ArrayViewMut2<f64>) {
    for mut row in data.rows_mut() {
        let m = row.mean().unwrap_or(0.0);
        row.mapv_inplace(|v| v - m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn removes_per_channel_mean() {
        let mut data = Array2::from_shape_fn((4, 256), |(c, t)| {
            c as f64 * 5.0 + 1.0 + (t as f64 * 0.3).sin()
        });
        detrend_constant_inplace(data.view_mut());
        for row in data.rows() {
            approx::assert_abs_diff_eq!(row.mean().unwrap(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn constant_signal_becomes_zero() {
        let mut data = Array2::from_elem((2, 64), 7.0);
        detrend_constant_inplace(data.view_mut());
        assert!(data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_window_no_panic() {
        let mut data = Array2::<f64>::zeros((3, 0));
        detrend_constant_inplace(data.view_mut());
        assert_eq!(data.dim(), (3, 0));
    }
}

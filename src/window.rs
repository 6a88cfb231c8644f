//! Overlapping analysis windows.
//!
//! A [`WindowPlan`] is one [`WindowScale`] resolved to integer sample counts
//! for a given sampling rate and label: windows of `len` samples start at
//! `lead_in`, `lead_in + step`, … while the window still ends inside the
//! recording.
use ndarray::{s, Array2, ArrayView2, Axis};

use crate::config::{LeadIn, WindowScale};
use crate::label::Label;

/// Integer window layout for one scale, rate and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    pub lead_in: usize,
    pub len: usize,
    pub step: usize,
}

impl WindowPlan {
    pub fn new(scale: &WindowScale, lead: &LeadIn, label: Label, sampling_rate: u32) -> Self {
        Self {
            lead_in: lead.samples(label, sampling_rate),
            len: scale.window_samples(sampling_rate),
            step: scale.step_samples(sampling_rate),
        }
    }

    /// A plan with a zero-length window or zero step yields nothing.
    pub fn is_degenerate(&self) -> bool {
        self.len == 0 || self.step == 0
    }

    /// Start indices of every window fitting in `n_samples`.
    pub fn starts(&self, n_samples: usize) -> impl Iterator<Item = usize> {
        let count = self.count(n_samples);
        let (lead_in, step) = (self.lead_in, self.step);
        (0..count).map(move |i| lead_in + i * step)
    }

    /// Number of windows, `floor((N − K − L) / step) + 1` when `N − K ≥ L`.
    ///
    /// ```
    /// use eegfocus::window::WindowPlan;
    /// let plan = WindowPlan { lead_in: 300, len: 400, step: 200 };
    /// assert_eq!(plan.count(3000), 12);
    /// assert_eq!(plan.count(699), 0);
    /// ```
    pub fn count(&self, n_samples: usize) -> usize {
        if self.is_degenerate() {
            return 0;
        }
        match self
            .lead_in
            .checked_add(self.len)
            .and_then(|span| n_samples.checked_sub(span))
        {
            Some(room) => room / self.step + 1,
            None => 0,
        }
    }
}

/// Copy `data[channels, start..start + len]` into a `[channels.len(), len]` window.
///
/// Panics if the range or a channel is out of bounds; callers validate both.
pub fn slice_window(data: ArrayView2<f64>, channels: &[usize], start: usize, len: usize) -> Array2<f64> {
    data.slice(s![.., start..start + len]).select(Axis(0), channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focused_and_relaxed_first_start() {
        let scale = WindowScale::new(4.0, 0.5);
        let lead = LeadIn::default();
        let focused = WindowPlan::new(&scale, &lead, Label::Focused, 250);
        let relaxed = WindowPlan::new(&scale, &lead, Label::Relaxed, 250);
        assert_eq!(focused.starts(100_000).next(), Some(2500));
        assert_eq!(relaxed.starts(100_000).next(), Some(750));
        assert_eq!(focused.len, 1000);
        assert_eq!(focused.step, 500);
    }

    #[test]
    fn twelve_windows_in_3000_samples() {
        let plan = WindowPlan { lead_in: 300, len: 400, step: 200 };
        let starts: Vec<usize> = plan.starts(3000).collect();
        assert_eq!(starts.first(), Some(&300));
        assert_eq!(starts.last(), Some(&2500));
        assert_eq!(starts.len(), 12);
    }

    #[test]
    fn last_window_may_end_exactly_at_n() {
        let plan = WindowPlan { lead_in: 300, len: 400, step: 200 };
        assert_eq!(plan.count(2900), 12);
        let last = plan.starts(2900).last().unwrap();
        assert_eq!(last + plan.len, 2900);
        assert_eq!(plan.count(2899), 11);
    }

    #[test]
    fn huge_lead_in_yields_no_windows() {
        let plan = WindowPlan { lead_in: usize::MAX, len: 400, step: 200 };
        assert_eq!(plan.count(3000), 0);
        assert_eq!(plan.starts(3000).count(), 0);
    }

    #[test]
    fn too_short_recording_yields_nothing() {
        let plan = WindowPlan { lead_in: 1000, len: 400, step: 200 };
        assert_eq!(plan.count(1399), 0);
        assert_eq!(plan.count(1400), 1);
        assert_eq!(plan.count(0), 0);
    }

    #[test]
    fn zero_step_is_degenerate() {
        let plan = WindowPlan::new(&WindowScale::new(0.1, 0.1), &LeadIn::default(), Label::Relaxed, 5);
        assert!(plan.is_degenerate());
        assert_eq!(plan.count(1_000_000), 0);
    }

    #[test]
    fn slice_selects_rows_in_channel_order() {
        let data = Array2::from_shape_fn((4, 10), |(r, t)| (r * 100 + t) as f64);
        let w = slice_window(data.view(), &[3, 1], 2, 5);
        assert_eq!(w.dim(), (2, 5));
        assert_eq!(w[[0, 0]], 302.0);
        assert_eq!(w[[1, 4]], 106.0);
    }
}

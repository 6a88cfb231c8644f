use eegfocus::window::slice_window;
use eegfocus::{Label, LeadIn, WindowPlan, WindowScale, config::DEFAULT_SCALES};
use ndarray::Array2;

#[test]
fn count_matches_enumerated_starts() {
    for scale in DEFAULT_SCALES {
        for label in Label::ALL {
            for rate in [100u32, 125, 200, 250, 256] {
                let plan = WindowPlan::new(&scale, &LeadIn::default(), label, rate);
                for n in [0usize, 500, 2999, 3000, 5000, 12_345, 60_000] {
                    let starts: Vec<usize> = plan.starts(n).collect();
                    assert_eq!(starts.len(), plan.count(n), "{plan:?} n={n}");
                    if let Some(&last) = starts.last() {
                        assert!(last + plan.len <= n);
                        assert!(last + plan.step + plan.len > n);
                    }
                }
            }
        }
    }
}

#[test]
fn focused_and_relaxed_lead_ins_differ() {
    let scale = WindowScale::new(4.0, 0.5);
    let relaxed = WindowPlan::new(&scale, &LeadIn::default(), Label::Relaxed, 250);
    let focused = WindowPlan::new(&scale, &LeadIn::default(), Label::Focused, 250);
    assert_eq!(relaxed.starts(10_000).next(), Some(750));
    assert_eq!(focused.starts(10_000).next(), Some(2500));
    assert_eq!((relaxed.len, relaxed.step), (1000, 500));
}

#[test]
fn fractional_sample_counts_truncate() {
    // 6 s × 0.45 × 125 Hz = 337.5 samples.
    let plan = WindowPlan::new(&WindowScale::new(6.0, 0.45), &LeadIn::default(), Label::Relaxed, 125);
    assert_eq!(plan.step, 337);
    assert_eq!(plan.len, 750);
    assert_eq!(plan.lead_in, 375);
}

#[test]
fn window_keeps_selected_rows_in_order() {
    let data = Array2::from_shape_fn((4, 20), |(r, t)| (r * 100 + t) as f64);
    let w = slice_window(data.view(), &[3, 1], 5, 4);
    assert_eq!(w.dim(), (2, 4));
    assert_eq!(w.row(0).to_vec(), vec![305.0, 306.0, 307.0, 308.0]);
    assert_eq!(w.row(1).to_vec(), vec![105.0, 106.0, 107.0, 108.0]);
}

mod common;
use common::{boards, one_scale_config, put, scenario_tree, sine_recording, BETA_HZ};
use eegfocus::{train, Dataset, DatasetBuilder, Label, TrainerConfig};

fn small_trainer() -> TrainerConfig {
    TrainerConfig { n_jobs: 2, ..TrainerConfig::default() }
}

#[test]
fn separable_recordings_score_high() {
    let tmp = tempfile::tempdir().unwrap();
    scenario_tree(tmp.path());
    let ds = DatasetBuilder::new(one_scale_config())
        .unwrap()
        .with_boards(boards())
        .build(tmp.path())
        .unwrap();

    let report = train(&ds, &small_trainer()).unwrap();

    assert_eq!(report.dummy_scores.len(), 5);
    assert_eq!(report.model_scores.len(), 5);
    assert_eq!(report.coefficients.len(), 4);
    assert!(report.model_mean() > 0.95, "model scores {:?}", report.model_scores);
    assert!(report.model_mean() > report.dummy_mean());
    // Relative alpha pushes toward relaxed (0), relative beta toward focused (1).
    assert!(report.coefficients[0] < 0.0 && report.coefficients[1] < 0.0);
    assert!(report.coefficients[2] > 0.0 && report.coefficients[3] > 0.0);
}

#[test]
fn training_is_reproducible() {
    let mut ds = Dataset::new();
    for i in 0..40 {
        let label = if i % 3 == 0 { Label::Focused } else { Label::Relaxed };
        let x = i as f64 * 0.1;
        ds.push(vec![x.sin(), x.cos() + label.as_u8() as f64], label).unwrap();
    }
    let a = train(&ds, &small_trainer()).unwrap();
    let b = train(&ds, &small_trainer()).unwrap();
    assert_eq!(a.dummy_scores, b.dummy_scores);
    assert_eq!(a.model_scores, b.model_scores);
    approx::assert_abs_diff_eq!(a.intercept, b.intercept);
}

#[test]
fn single_class_dataset_fails() {
    let tmp = tempfile::tempdir().unwrap();
    put(tmp.path(), "focused", "7", "f.csv", &sine_recording(2, 5000, BETA_HZ));
    let ds = DatasetBuilder::new(one_scale_config())
        .unwrap()
        .with_boards(boards())
        .build(tmp.path())
        .unwrap();
    assert_eq!(ds.len(), 19);

    assert!(train(&ds, &small_trainer()).is_err());
}

#[test]
fn fewer_samples_than_folds_fails() {
    let mut ds = Dataset::new();
    ds.push(vec![0.0, 1.0], Label::Relaxed).unwrap();
    ds.push(vec![1.0, 0.0], Label::Focused).unwrap();
    ds.push(vec![0.1, 0.9], Label::Relaxed).unwrap();
    assert!(train(&ds, &small_trainer()).is_err());
}

use super::*;

use crate::matrix::ExprMatrix;

fn labels(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

fn matrix(n_genes: usize, n_patients: usize, data: Vec<f64>) -> ExprMatrix {
    ExprMatrix::new(labels("G", n_genes), labels("P", n_patients), data)
}

#[test]
fn test_mean_and_sample_stddev() {
    // Column 0 holds 10, 20, 30: mean 20, sample variance 100.
    let m = matrix(3, 2, vec![10.0, 1.0, 20.0, 1.0, 30.0, 7.0]);
    let stats = run_stage1(&m, 2);

    assert!((stats.mean[0] - 20.0).abs() < 1e-12);
    assert!((stats.stddev[0] - 10.0).abs() < 1e-12);
    assert!((stats.mean[1] - 3.0).abs() < 1e-12);
    // Column 1 holds 1, 1, 7: sample variance 12.
    assert!((stats.stddev[1] - 12.0f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_zero_variance_clamps_to_one() {
    let m = matrix(3, 1, vec![5.0, 5.0, 5.0]);
    let stats = run_stage1(&m, 1);
    assert_eq!(stats.mean[0], 5.0);
    assert_eq!(stats.stddev[0], 1.0);
}

#[test]
fn test_single_row_clamps_every_column() {
    let m = matrix(1, 3, vec![4.0, -2.0, 9.5]);
    let stats = run_stage1(&m, 2);
    assert_eq!(stats.mean, vec![4.0, -2.0, 9.5]);
    assert_eq!(stats.stddev, vec![1.0, 1.0, 1.0]);
}

#[test]
fn test_worker_count_does_not_change_results() {
    let data: Vec<f64> = (0..60).map(|i| ((i * 37) % 11) as f64 - 3.0).collect();
    let m = matrix(12, 5, data);

    let reference = run_stage1(&m, 1);
    for workers in [2, 3, 5, 16] {
        let stats = run_stage1(&m, workers);
        assert_eq!(stats.mean, reference.mean, "workers={workers}");
        assert_eq!(stats.stddev, reference.stddev, "workers={workers}");
    }
}

#[test]
fn test_more_workers_than_columns() {
    let m = matrix(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
    let stats = run_stage1(&m, 64);
    assert_eq!(stats.mean, vec![2.0, 3.0]);
}

use rayon::prelude::*;

use crate::matrix::ExprMatrix;

/// Per-patient (column) normalization statistics. `stddev` is the sample
/// standard deviation (denominator `n_genes - 1`); a column with zero
/// variance is clamped to 1.0 so normalization stays well-defined and those
/// cells come out as `raw - mean`.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub mean: Vec<f64>,
    pub stddev: Vec<f64>,
}

/// Computes mean and sample stddev for every column. Columns are split
/// evenly across workers in fixed blocks: every column costs the same two
/// passes over `n_genes`, so a static partition has no balancing downside.
///
/// Caller must have rejected an empty matrix already; `n_genes == 0` would
/// make the mean undefined.
pub fn run_stage1(matrix: &ExprMatrix, workers: usize) -> ColumnStats {
    let n_cols = matrix.n_patients;
    let block = n_cols.div_ceil(workers.max(1)).max(1);

    let mut mean = vec![0.0f64; n_cols];
    let mut stddev = vec![0.0f64; n_cols];

    mean.par_chunks_mut(block)
        .zip(stddev.par_chunks_mut(block))
        .enumerate()
        .for_each(|(blk, (mean_blk, stddev_blk))| {
            let base = blk * block;
            for (off, (m, s)) in mean_blk.iter_mut().zip(stddev_blk.iter_mut()).enumerate() {
                let (cm, cs) = column_moments(matrix, base + off);
                *m = cm;
                *s = cs;
            }
        });

    ColumnStats { mean, stddev }
}

/// Two-pass moments for one column: sum for the mean, then squared
/// deviations for the variance.
fn column_moments(matrix: &ExprMatrix, col: usize) -> (f64, f64) {
    let n = matrix.n_genes;
    let stride = matrix.n_patients;

    let mut sum = 0.0f64;
    for i in 0..n {
        sum += matrix.data[i * stride + col];
    }
    let mean = sum / n as f64;

    let mut sum_sq = 0.0f64;
    for i in 0..n {
        let d = matrix.data[i * stride + col] - mean;
        sum_sq += d * d;
    }
    let variance = if n > 1 { sum_sq / (n - 1) as f64 } else { 0.0 };

    let mut stddev = variance.sqrt();
    if stddev == 0.0 {
        stddev = 1.0;
    }
    (mean, stddev)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_stats.rs"]
mod tests;

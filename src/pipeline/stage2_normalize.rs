use rayon::prelude::*;

use crate::matrix::ExprMatrix;
use crate::pipeline::stage1_stats::ColumnStats;

/// One cell whose raw (pre-normalization) value exceeded the threshold.
/// Captured before the cell is overwritten; afterwards the raw value exists
/// nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub gene: String,
    pub patient: String,
    pub value: f64,
}

/// Rewrites every cell to its column z-score in place and collects threshold
/// hits. Work is partitioned by whole rows: `par_chunks_mut(n_patients)`
/// hands each worker exclusive, non-overlapping row slices, so the shared
/// buffer needs no per-cell locking, and rayon's work stealing rebalances
/// rows dynamically (the hit branch makes per-row cost irregular).
///
/// Each partition accumulates hits into a private `Vec` and the partials are
/// merged pairwise after the fact — one merge per partition, never one per
/// hit.
pub fn run_stage2(matrix: &mut ExprMatrix, stats: &ColumnStats, threshold: f64) -> Vec<Hit> {
    let n_patients = matrix.n_patients;
    let genes = &matrix.genes;
    let patients = &matrix.patients;

    matrix
        .data
        .par_chunks_mut(n_patients)
        .enumerate()
        .fold(Vec::new, |mut local_hits: Vec<Hit>, (gene, row)| {
            for (patient, cell) in row.iter_mut().enumerate() {
                let raw = *cell;
                if raw > threshold {
                    local_hits.push(Hit {
                        gene: genes[gene].clone(),
                        patient: patients[patient].clone(),
                        value: raw,
                    });
                }
                *cell = (raw - stats.mean[patient]) / stats.stddev[patient];
            }
            local_hits
        })
        .reduce(Vec::new, |mut a, mut b| {
            a.append(&mut b);
            a
        })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_normalize.rs"]
mod tests;

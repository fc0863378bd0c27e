use std::time::Instant;

use thiserror::Error;

pub mod stage1_stats;
pub mod stage2_normalize;
pub mod stage3_topk;

use crate::matrix::ExprMatrix;
use stage1_stats::ColumnStats;
use stage2_normalize::Hit;
use stage3_topk::TopEntry;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("matrix is empty ({n_genes} genes x {n_patients} patients); statistics are undefined")]
    EmptyMatrix { n_genes: usize, n_patients: usize },
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone)]
pub struct EngineParams {
    pub workers: usize,
    pub threshold: f64,
    pub top_k: usize,
}

#[derive(Debug)]
pub struct EngineOutput {
    pub stats: ColumnStats,
    pub hits: Vec<Hit>,
    /// `top_k[col]` holds `min(top_k, n_genes)` entries, descending.
    pub top_k: Vec<Vec<TopEntry>>,
    pub compute_seconds: f64,
}

/// Runs the three fork-join phases over the in-memory matrix on a fixed-size
/// worker pool:
///
/// 1. column statistics (parallel over columns, even static split),
/// 2. in-place z-score normalization plus threshold-hit capture (parallel
///    over rows, dynamic split, destructive),
/// 3. per-column top-K selection (parallel over columns, dynamic split).
///
/// Each phase call returns only after every worker has finished it, so the
/// join at the end of phase 2 is the mandatory barrier before phase 3 reads
/// normalized values across row-partition boundaries. An empty matrix is
/// rejected up front, before any parallel work.
pub fn run_engine(matrix: &mut ExprMatrix, params: &EngineParams) -> Result<EngineOutput, EngineError> {
    if matrix.is_empty() {
        return Err(EngineError::EmptyMatrix {
            n_genes: matrix.n_genes,
            n_patients: matrix.n_patients,
        });
    }

    let workers = params.workers.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    let started = Instant::now();
    let (stats, hits, top_k) = pool.install(|| {
        let stats = stage1_stats::run_stage1(matrix, workers);
        tracing::info!(columns = stats.mean.len(), "column statistics done");

        let hits = stage2_normalize::run_stage2(matrix, &stats, params.threshold);
        tracing::info!(hits = hits.len(), "normalization done, matrix now holds z-scores");

        // Phase 2 has fully joined by this point; every row is normalized.
        let top_k = stage3_topk::run_stage3(matrix, params.top_k);
        tracing::info!(k = params.top_k, "top-k selection done");

        (stats, hits, top_k)
    });
    let compute_seconds = started.elapsed().as_secs_f64();

    Ok(EngineOutput {
        stats,
        hits,
        top_k,
        compute_seconds,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/engine.rs"]
mod tests;

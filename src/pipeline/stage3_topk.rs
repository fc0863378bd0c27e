use std::cmp::Ordering;

use rayon::prelude::*;

use crate::matrix::ExprMatrix;

/// One ranked entry of a column's top-K: the normalized score and the index
/// of the gene (row) it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopEntry {
    pub score: f64,
    pub gene_index: usize,
}

/// Descending by score; equal scores rank the lower gene index first. Total
/// order, so selection is deterministic regardless of worker count.
fn rank_order(a: &TopEntry, b: &TopEntry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.gene_index.cmp(&b.gene_index))
}

/// For each column of the (already normalized) matrix, selects the
/// `min(k, n_genes)` largest values, sorted descending. Columns are handed
/// to rayon's work-stealing scheduler; each costs nominally the same but
/// the selection pivoting varies with the data.
///
/// Must only run once stage 2 has completed for every row: a column's
/// entries come from rows that belonged to different workers. The caller's
/// fork-join sequencing is the barrier.
pub fn run_stage3(matrix: &ExprMatrix, k: usize) -> Vec<Vec<TopEntry>> {
    (0..matrix.n_patients)
        .into_par_iter()
        .map(|col| top_of_column(matrix, col, k))
        .collect()
}

/// Bounded partial selection: `select_nth_unstable_by` partitions the K
/// largest to the front in O(n), then only that prefix is sorted. For
/// k >= n it degenerates to a plain sort of the whole column.
fn top_of_column(matrix: &ExprMatrix, col: usize, k: usize) -> Vec<TopEntry> {
    let mut entries: Vec<TopEntry> = (0..matrix.n_genes)
        .map(|gene| TopEntry {
            score: matrix.get(gene, col),
            gene_index: gene,
        })
        .collect();

    let k = k.min(entries.len());
    if k == 0 {
        return Vec::new();
    }
    if k < entries.len() {
        entries.select_nth_unstable_by(k - 1, rank_order);
        entries.truncate(k);
    }
    entries.sort_unstable_by(rank_order);
    entries
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_topk.rs"]
mod tests;

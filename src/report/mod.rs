use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

pub mod summary;

use crate::matrix::ExprMatrix;
use crate::pipeline::EngineOutput;
use summary::RunSummary;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("summary serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the three run artifacts into `out_dir`: the hit table, the top-K
/// table, and the machine-readable run summary.
pub fn write_reports(
    matrix: &ExprMatrix,
    output: &EngineOutput,
    summary: &RunSummary,
    out_dir: &Path,
) -> Result<(), ReportError> {
    fs::create_dir_all(out_dir)?;

    write_hits_csv(output, &out_dir.join("search_hits.csv"))?;
    write_topk_csv(matrix, output, &out_dir.join("topk_results.csv"))?;
    summary::write_summary(summary, &out_dir.join("summary.json"))?;

    Ok(())
}

/// One record per threshold hit, unordered. Values are the raw
/// pre-normalization cell values.
fn write_hits_csv(output: &EngineOutput, path: &Path) -> Result<(), ReportError> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(b"Gene,Patient,Value\n")?;
    for hit in &output.hits {
        writeln!(w, "{},{},{}", hit.gene, hit.patient, hit.value)?;
    }
    w.flush()?;
    Ok(())
}

/// One record per (patient, rank), rank running 1..=min(K, n_genes) in
/// descending z-score order.
fn write_topk_csv(
    matrix: &ExprMatrix,
    output: &EngineOutput,
    path: &Path,
) -> Result<(), ReportError> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(b"Patient,Rank,Gene,Z_Score\n")?;
    for (col, entries) in output.top_k.iter().enumerate() {
        for (rank, entry) in entries.iter().enumerate() {
            writeln!(
                w,
                "{},{},{},{}",
                matrix.patients[col],
                rank + 1,
                matrix.genes[entry.gene_index],
                entry.score
            )?;
        }
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;

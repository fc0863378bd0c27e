use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::report::ReportError;

/// Machine-readable record of one run, written next to the CSV outputs.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub version: String,
    pub input: String,
    pub n_genes: usize,
    pub n_patients: usize,
    pub workers: usize,
    pub threshold: f64,
    pub top_k: usize,
    pub row_limit: Option<usize>,
    pub n_hits: usize,
    pub compute_seconds: f64,
}

pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let mut json = serde_json::to_string_pretty(summary)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

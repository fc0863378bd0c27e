mod input;
mod matrix;
mod pipeline;
mod report;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::input::InputError;
use crate::pipeline::{EngineError, EngineParams, run_engine};
use crate::report::ReportError;
use crate::report::summary::RunSummary;

#[derive(Debug, Parser)]
#[command(name = "expr-zscan", version, about = "Parallel z-score normalization, threshold search, and top-K ranking for dense gene expression tables")]
struct Cli {
    /// Tab-delimited expression table (.tsv or .tsv.gz): header row of
    /// patient labels, then one gene per row.
    #[arg(long)]
    input: PathBuf,

    /// Directory for search_hits.csv, topk_results.csv, and summary.json.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Worker count for the parallel engine.
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// Raw values strictly above this are recorded as hits.
    #[arg(long, default_value_t = 1000.0)]
    threshold: f64,

    /// Stop reading after this many data rows.
    #[arg(long)]
    row_limit: Option<usize>,

    /// Entries to keep per patient in the top-K table.
    #[arg(long, default_value_t = 10)]
    top_k: usize,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("{0}")]
    Input(#[from] InputError),
    #[error("{0}")]
    Engine(#[from] EngineError),
    #[error("{0}")]
    Report(#[from] ReportError),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), RunError> {
    let load_started = Instant::now();
    let mut matrix = input::load_table(&cli.input, cli.row_limit)?;
    info!(
        genes = matrix.n_genes,
        patients = matrix.n_patients,
        seconds = load_started.elapsed().as_secs_f64(),
        "table loaded"
    );

    let params = EngineParams {
        workers: cli.threads,
        threshold: cli.threshold,
        top_k: cli.top_k,
    };
    info!(workers = params.workers, threshold = params.threshold, "processing");
    let output = run_engine(&mut matrix, &params)?;
    info!(seconds = output.compute_seconds, "compute finished");

    let summary = RunSummary {
        tool: "expr-zscan".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        input: cli.input.display().to_string(),
        n_genes: matrix.n_genes,
        n_patients: matrix.n_patients,
        workers: params.workers,
        threshold: params.threshold,
        top_k: params.top_k,
        row_limit: cli.row_limit,
        n_hits: output.hits.len(),
        compute_seconds: output.compute_seconds,
    };
    report::write_reports(&matrix, &output, &summary, &cli.out)?;
    info!(out = %cli.out.display(), hits = output.hits.len(), "reports written");

    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::matrix::ExprMatrix;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InputError::MissingInput(format!("cannot open {}", path.display()))
        } else {
            InputError::Io(e)
        }
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Missing-cell policy: empty fields, the usual missing-value spellings, and
/// anything that fails (or parses non-finite) load as 0.0, never as an error.
pub fn parse_cell(token: &str) -> f64 {
    let token = token.strip_suffix('\r').unwrap_or(token);
    if token.is_empty() {
        return 0.0;
    }
    match token {
        "NA" | "na" | "null" | "NaN" => 0.0,
        _ => token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
    }
}

/// Reads a tab-delimited expression table (plain or gzipped). The first line
/// is a header whose first field (the gene-label column header) is discarded
/// and whose remaining fields become the patient labels; each data line is a
/// gene label followed by one value per patient. `row_limit` caps the number
/// of data rows read.
pub fn load_table(path: &Path, row_limit: Option<usize>) -> Result<ExprMatrix, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();

    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse(format!(
            "{} is empty (no header line)",
            path.display()
        )));
    }
    let header = buf.trim_end_matches(['\n', '\r']);
    let mut fields = header.split('\t');
    fields.next(); // gene-label column header
    let patients: Vec<String> = fields.map(|s| s.to_string()).collect();
    let n_patients = patients.len();

    let mut genes: Vec<String> = Vec::new();
    let mut data: Vec<f64> = Vec::new();
    let mut ragged_rows = 0usize;

    loop {
        if let Some(limit) = row_limit {
            if genes.len() >= limit {
                break;
            }
        }
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        let line = buf.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            continue;
        }
        let Some((label, rest)) = line.split_once('\t') else {
            continue;
        };
        genes.push(label.to_string());

        let before = data.len();
        for token in rest.split('\t').take(n_patients) {
            data.push(parse_cell(token));
        }
        let got = data.len() - before;
        if got != n_patients {
            // Short row: pad with the missing-cell default.
            ragged_rows += 1;
            data.resize(before + n_patients, 0.0);
        } else if rest.split('\t').nth(n_patients).is_some() {
            ragged_rows += 1;
        }
    }

    if ragged_rows > 0 {
        tracing::warn!(
            rows = ragged_rows,
            "data rows did not match the header width; padded/truncated to {} columns",
            n_patients
        );
    }

    Ok(ExprMatrix::new(genes, patients, data))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;

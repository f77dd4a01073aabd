//! Sequential batch preprocessing over payload files

use super::read_payload;
use anyhow::Result;
use clap::Args;
use photo_tensor_preprocess::preprocess_batch;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Args)]
pub struct BatchCommand {
    /// Files containing base64 payloads
    #[arg(value_name = "PAYLOADS", required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BatchReport {
    attempted: usize,
    succeeded: usize,
    succeeded_files: Vec<PathBuf>,
    failures: Vec<(PathBuf, String)>,
}

impl BatchCommand {
    pub fn execute(self) -> Result<()> {
        let report = run(&self.inputs);
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

/// Read and preprocess every file; unreadable files fail with their I/O error
fn run(inputs: &[PathBuf]) -> BatchReport {
    let mut payloads = Vec::with_capacity(inputs.len());
    // Input index of each entry in `payloads`
    let mut positions = Vec::with_capacity(inputs.len());
    let mut failures: Vec<(usize, String)> = Vec::new();

    for (index, path) in inputs.iter().enumerate() {
        match read_payload(path) {
            Ok(payload) => {
                payloads.push(payload);
                positions.push(index);
            }
            Err(e) => {
                warn!("{:#}", e);
                failures.push((index, format!("{e:#}")));
            }
        }
    }

    let result = preprocess_batch(&payloads);

    failures.extend(
        result
            .failures
            .iter()
            .map(|f| (positions[f.index], f.error.to_string())),
    );
    failures.sort_by_key(|(index, _)| *index);

    let path_at = |index: usize| inputs[index].clone();

    BatchReport {
        attempted: inputs.len(),
        succeeded: result.succeeded,
        succeeded_files: result
            .items
            .iter()
            .map(|item| path_at(positions[item.index]))
            .collect(),
        failures: failures
            .into_iter()
            .map(|(index, error)| (path_at(index), error))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn payload_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_unreadable_file_reports_io_error() {
        let good = payload_file("AAECAwQF");
        let bad = payload_file("%%%");
        let missing = PathBuf::from("/nonexistent/payload.b64");
        let inputs = vec![
            good.path().to_path_buf(),
            missing.clone(),
            bad.path().to_path_buf(),
        ];

        let report = run(&inputs);
        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.succeeded_files, vec![good.path().to_path_buf()]);

        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].0, missing);
        assert!(report.failures[0].1.contains("Failed to read payload"));
        assert!(!report.failures[0].1.contains("empty"));
        assert_eq!(report.failures[1].0, bad.path());
    }
}

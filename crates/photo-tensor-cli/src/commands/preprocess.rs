//! Single-payload preprocessing

use super::read_payload;
use anyhow::{Context as _, Result};
use clap::Args;
use photo_tensor_preprocess::{preprocess_with_outcome, Tier};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Args)]
pub struct PreprocessCommand {
    /// File containing the base64 payload
    #[arg(value_name = "PAYLOAD")]
    input: PathBuf,

    /// Write the full tensor as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct FailureReport {
    tier: Tier,
    error: String,
}

#[derive(Serialize)]
struct PreprocessReport {
    tier: Tier,
    degraded: bool,
    failures: Vec<FailureReport>,
    dtype: String,
    shape: [usize; 4],
    channel_means: [f32; 3],
    elapsed_ms: f64,
}

impl PreprocessCommand {
    pub fn execute(self) -> Result<()> {
        let payload = read_payload(&self.input)?;

        let start = Instant::now();
        let outcome = preprocess_with_outcome(&payload);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        if let Some(path) = &self.output {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            serde_json::to_writer(std::io::BufWriter::new(file), &outcome.tensor)
                .context("Failed to write tensor JSON")?;
            info!("Tensor written to {}", path.display());
        }

        let report = PreprocessReport {
            tier: outcome.tier,
            degraded: outcome.is_degraded(),
            failures: outcome
                .failures
                .iter()
                .map(|f| FailureReport {
                    tier: f.tier,
                    error: f.error.to_string(),
                })
                .collect(),
            dtype: outcome.tensor.dtype().to_string(),
            shape: outcome.tensor.shape(),
            channel_means: outcome.tensor.channel_means(),
            elapsed_ms,
        };

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

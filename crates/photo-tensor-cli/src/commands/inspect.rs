//! Payload statistics report

use super::read_payload;
use anyhow::{Context as _, Result};
use clap::Args;
use photo_tensor_preprocess::{extract_bytes, ContentSeed, ImageStatistics};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectCommand {
    /// File containing the base64 payload
    #[arg(value_name = "PAYLOAD")]
    input: PathBuf,
}

#[derive(Serialize)]
struct InspectReport {
    payload_chars: usize,
    decoded_bytes: usize,
    seed: ContentSeed,
    statistics: ImageStatistics,
}

impl InspectCommand {
    pub fn execute(self) -> Result<()> {
        let payload = read_payload(&self.input)?;
        let bytes = extract_bytes(&payload)
            .with_context(|| format!("Cannot decode payload: {}", self.input.display()))?;

        let report = InspectReport {
            payload_chars: payload.len(),
            decoded_bytes: bytes.len(),
            seed: ContentSeed::from_payload(&payload),
            statistics: ImageStatistics::analyze(bytes.as_slice()),
        };

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

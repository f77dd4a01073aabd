//! Photo Tensor CLI - Turn photo payloads into model-ready tensors
//!
//! Command-line harness around the preprocessing pipeline.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::batch::BatchCommand;
use commands::encode::EncodeCommand;
use commands::inspect::InspectCommand;
use commands::preprocess::PreprocessCommand;

#[derive(Parser)]
#[command(
    name = "photo-tensor",
    version,
    about = "Preprocess photo payloads into normalized model tensors",
    long_about = "Turn base64 photo payloads into [1, 3, 224, 224] float32 tensors with ImageNet\n\
                  normalization. Malformed payloads degrade through simulated and constant\n\
                  fallback tiers instead of failing.",
    after_help = "EXAMPLES:\n  \
                  # Resize and encode a photo as a base64 payload\n  \
                  photo-tensor encode meal.jpg --output meal.b64\n\n  \
                  # Show byte statistics, entropy and dominant colors\n  \
                  photo-tensor inspect meal.b64\n\n  \
                  # Build the tensor and write it as JSON\n  \
                  photo-tensor preprocess meal.b64 --output meal.tensor.json\n\n  \
                  # Sequential batch over several payloads\n  \
                  photo-tensor batch breakfast.b64 lunch.b64 dinner.b64"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize an image to 224x224 and write it as a base64 PNG payload
    Encode(EncodeCommand),

    /// Print payload statistics as JSON
    Inspect(InspectCommand),

    /// Run the fallback chain on one payload
    Preprocess(PreprocessCommand),

    /// Preprocess several payloads sequentially
    Batch(BatchCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Encode(cmd) => cmd.execute(),
        Commands::Inspect(cmd) => cmd.execute(),
        Commands::Preprocess(cmd) => cmd.execute(),
        Commands::Batch(cmd) => cmd.execute(),
    }
}

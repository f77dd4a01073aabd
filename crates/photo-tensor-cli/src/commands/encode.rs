//! Resize/encode step that produces payloads for the pipeline

use anyhow::{Context as _, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Args;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use photo_tensor_common::INPUT_SIZE;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct EncodeCommand {
    /// Input image (JPEG or PNG)
    #[arg(value_name = "IMAGE")]
    input: PathBuf,

    /// Write the payload to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prefix the payload with `data:image/png;base64,`
    #[arg(long, default_value = "false")]
    data_uri: bool,
}

impl EncodeCommand {
    pub fn execute(self) -> Result<()> {
        let img = image::open(&self.input)
            .with_context(|| format!("Failed to open image: {}", self.input.display()))?;
        let (width, height) = (img.width(), img.height());

        let payload = encode_image(&img, self.data_uri)?;
        info!(
            "Encoded {} ({}x{} -> {}x{}, {} base64 chars)",
            self.input.display(),
            width,
            height,
            INPUT_SIZE,
            INPUT_SIZE,
            payload.len()
        );

        match self.output {
            Some(path) => std::fs::write(&path, &payload)
                .with_context(|| format!("Failed to write payload: {}", path.display()))?,
            None => println!("{payload}"),
        }
        Ok(())
    }
}

/// Resize to 224x224 and encode as a base64 PNG payload
pub fn encode_image(img: &DynamicImage, data_uri: bool) -> Result<String> {
    let rgb = img.to_rgb8();
    let resized = if rgb.dimensions() != (INPUT_SIZE, INPUT_SIZE) {
        image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
    } else {
        rgb
    };

    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(resized)
        .write_to(&mut png, ImageFormat::Png)
        .context("Failed to encode PNG")?;

    let encoded = STANDARD.encode(png.into_inner());
    Ok(if data_uri {
        format!("data:image/png;base64,{encoded}")
    } else {
        encoded
    })
}

//! Converts a PNG to JPEG, then asks ffmpeg to scale the result.
//!
//! Usage: `cargo run --example convert -- input.png output.jpg`

use anyhow::{Context, Result};
use imagerunner::{decode_image, ffmpeg_run, init, png_to_jpeg};

fn main() -> Result<()> {
    init()?;

    let mut args = std::env::args().skip(1);
    let input = args.next().context("missing input PNG path")?;
    let output = args.next().unwrap_or_else(|| "output.jpg".to_string());

    let png = std::fs::read(&input).with_context(|| format!("reading {}", input))?;
    let jpeg = png_to_jpeg(&png, Some(90))?;
    let pixels = decode_image(&jpeg)?;
    println!("Converted {} ({}x{})", input, pixels.dim().1, pixels.dim().0);

    // Feed the JPEG through stdin and let ffmpeg halve it
    ffmpeg_run(
        &[
            "-y", "-hide_banner", "-loglevel", "error", "-f", "jpeg_pipe", "-i", "-", "-vf",
            "scale=iw/2:ih/2", output.as_str(),
        ],
        Some(&jpeg),
    )?;
    println!("Wrote {}", output);

    Ok(())
}

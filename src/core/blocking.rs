//! Async wrappers that run the blocking helpers on tokio's blocking pool.

use tokio::task;

use super::codec::PixelArray;
use super::ffmpeg::Ffmpeg;
use super::runner::ImageRunner;
use crate::error::Result;

/// Decode an image off the async runtime
pub async fn decode_image(runner: ImageRunner, image_bytes: Vec<u8>) -> Result<PixelArray> {
    task::spawn_blocking(move || runner.decode_image(&image_bytes)).await?
}

/// Convert a PNG to an RGB JPEG off the async runtime
pub async fn png_to_jpeg(runner: ImageRunner, image_bytes: Vec<u8>, quality: u8) -> Result<Vec<u8>> {
    task::spawn_blocking(move || runner.png_to_jpeg(&image_bytes, quality)).await?
}

/// Convert a CMYK JPEG to an RGB JPEG off the async runtime
pub async fn jpeg_cmyk_to_rgb(
    runner: ImageRunner,
    image_bytes: Vec<u8>,
    quality: u8,
) -> Result<Vec<u8>> {
    task::spawn_blocking(move || runner.jpeg_cmyk_to_rgb(&image_bytes, quality)).await?
}

/// Run ffmpeg off the async runtime
pub async fn ffmpeg_run(ffmpeg: Ffmpeg, args: Vec<String>, stdin: Option<Vec<u8>>) -> Result<()> {
    task::spawn_blocking(move || ffmpeg.run(args.as_slice(), stdin.as_deref())).await?
}

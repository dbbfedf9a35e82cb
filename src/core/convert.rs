//! Decode and re-encode helpers built on [`ImageRunner`].
//!
//! Every helper is available as a method on a runner you own and as a free
//! function that uses [`ImageRunner::global`].

use super::codec::{Channels, JpegFormat, PixelArray};
use super::runner::ImageRunner;
use crate::error::Result;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

impl ImageRunner {
    /// Decode an encoded image of any supported format into pixels
    pub fn decode_image(&self, image_bytes: &[u8]) -> Result<PixelArray> {
        self.run("decode_image", |codec, bytes: &[u8]| codec.decode_image(bytes), image_bytes)
    }

    /// Convert a PNG to an RGB JPEG
    ///
    /// Alpha is dropped and grayscale is expanded before encoding.
    pub fn png_to_jpeg(&self, image_bytes: &[u8], quality: u8) -> Result<Vec<u8>> {
        let pixels = self.run(
            "decode_png",
            |codec, bytes: &[u8]| codec.decode_png(bytes, Channels::Rgb),
            image_bytes,
        )?;
        self.encode_rgb_jpeg(&pixels, quality)
    }

    /// Convert a CMYK JPEG to an RGB JPEG
    ///
    /// The input color space is not checked; ordinary JPEGs are re-encoded as RGB.
    pub fn jpeg_cmyk_to_rgb(&self, image_bytes: &[u8], quality: u8) -> Result<Vec<u8>> {
        let pixels = self.run(
            "decode_jpeg",
            |codec, bytes: &[u8]| codec.decode_jpeg(bytes, Channels::Rgb),
            image_bytes,
        )?;
        self.encode_rgb_jpeg(&pixels, quality)
    }

    fn encode_rgb_jpeg(&self, pixels: &PixelArray, quality: u8) -> Result<Vec<u8>> {
        self.run(
            "encode_jpeg",
            |codec, pixels: &PixelArray| codec.encode_jpeg(pixels, JpegFormat::Rgb, quality),
            pixels,
        )
    }
}

fn quality_or_default(quality: Option<u8>) -> u8 {
    quality.unwrap_or(crate::config::global().jpeg.default_quality)
}

/// Decode an encoded image with the shared runner
pub fn decode_image(image_bytes: &[u8]) -> Result<PixelArray> {
    ImageRunner::global().decode_image(image_bytes)
}

/// Convert a PNG to an RGB JPEG with the shared runner.
///
/// `None` quality uses the configured default (100 unless overridden).
pub fn png_to_jpeg(image_bytes: &[u8], quality: Option<u8>) -> Result<Vec<u8>> {
    ImageRunner::global().png_to_jpeg(image_bytes, quality_or_default(quality))
}

/// Convert a CMYK JPEG to an RGB JPEG with the shared runner.
///
/// `None` quality uses the configured default (100 unless overridden).
pub fn jpeg_cmyk_to_rgb(image_bytes: &[u8], quality: Option<u8>) -> Result<Vec<u8>> {
    ImageRunner::global().jpeg_cmyk_to_rgb(image_bytes, quality_or_default(quality))
}

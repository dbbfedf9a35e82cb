use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use ndarray::Array3;

use crate::error::{AppError, Result};

/// Decoded pixels laid out as height × width × channels.
pub type PixelArray = Array3<u8>;

/// Number of output channels requested from a decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channels {
    /// Keep whatever the encoded image stores
    #[default]
    Native,
    /// One channel
    Gray,
    /// Two channels
    GrayAlpha,
    /// Three channels
    Rgb,
    /// Four channels
    Rgba,
}

impl Channels {
    /// Map a channel count (0 meaning native) to a request
    pub fn from_count(count: u8) -> Result<Self> {
        match count {
            0 => Ok(Self::Native),
            1 => Ok(Self::Gray),
            2 => Ok(Self::GrayAlpha),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(AppError::InvalidInput(format!(
                "channels must be 0, 1, 2, 3 or 4, got {}",
                n
            ))),
        }
    }
}

/// Pixel layout tag for JPEG encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JpegFormat {
    /// Pick from the channel count of the input
    #[default]
    Auto,
    /// Single-channel input
    Grayscale,
    /// Three-channel input
    Rgb,
}

/// Image decode/encode capability used by [`ImageRunner`](super::runner::ImageRunner)
pub trait ImageCodec: Send + Sync {
    /// Decode any supported format, detected from the bytes
    fn decode_image(&self, bytes: &[u8]) -> Result<PixelArray>;

    /// Decode a PNG
    fn decode_png(&self, bytes: &[u8], channels: Channels) -> Result<PixelArray>;

    /// Decode a JPEG; CMYK input comes out as RGB
    fn decode_jpeg(&self, bytes: &[u8], channels: Channels) -> Result<PixelArray>;

    /// Encode pixels as JPEG at `quality` (0-100)
    fn encode_jpeg(&self, pixels: &PixelArray, format: JpegFormat, quality: u8) -> Result<Vec<u8>>;
}

/// [`ImageCodec`] backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec;

impl ImageCrateCodec {
    /// Create the codec
    pub fn new() -> Self {
        Self
    }

    fn decode_as(&self, bytes: &[u8], format: ImageFormat, channels: Channels) -> Result<PixelArray> {
        let img = image::load_from_memory_with_format(bytes, format)?;
        to_pixel_array(img, channels)
    }
}

impl ImageCodec for ImageCrateCodec {
    fn decode_image(&self, bytes: &[u8]) -> Result<PixelArray> {
        let img = image::load_from_memory(bytes)?;
        to_pixel_array(img, Channels::Native)
    }

    fn decode_png(&self, bytes: &[u8], channels: Channels) -> Result<PixelArray> {
        self.decode_as(bytes, ImageFormat::Png, channels)
    }

    fn decode_jpeg(&self, bytes: &[u8], channels: Channels) -> Result<PixelArray> {
        self.decode_as(bytes, ImageFormat::Jpeg, channels)
    }

    fn encode_jpeg(&self, pixels: &PixelArray, format: JpegFormat, quality: u8) -> Result<Vec<u8>> {
        if quality > 100 {
            return Err(AppError::InvalidInput(format!(
                "JPEG quality must be between 0 and 100, got {}",
                quality
            )));
        }

        let (height, width, depth) = pixels.dim();
        let color = match (format, depth) {
            (JpegFormat::Auto | JpegFormat::Grayscale, 1) => ColorType::L8,
            (JpegFormat::Auto | JpegFormat::Rgb, 3) => ColorType::Rgb8,
            (format, depth) => {
                return Err(AppError::InvalidInput(format!(
                    "cannot encode {}-channel pixels as {:?} JPEG",
                    depth, format
                )))
            }
        };

        let width = u32::try_from(width)
            .map_err(|_| AppError::InvalidInput(format!("image width {} too large", width)))?;
        let height = u32::try_from(height)
            .map_err(|_| AppError::InvalidInput(format!("image height {} too large", height)))?;

        let data = pixels.as_standard_layout();
        let raw = data
            .as_slice()
            .ok_or_else(|| AppError::Internal("pixel buffer is not contiguous".to_string()))?;

        let mut out = Cursor::new(Vec::new());
        // The encoder's scale starts at 1.
        JpegEncoder::new_with_quality(&mut out, quality.max(1)).encode(raw, width, height, color)?;
        Ok(out.into_inner())
    }
}

/// Convert a decoded image into an 8-bit HWC array
fn to_pixel_array(img: DynamicImage, channels: Channels) -> Result<PixelArray> {
    let channels = match channels {
        Channels::Native => match img.color().channel_count() {
            1 => Channels::Gray,
            2 => Channels::GrayAlpha,
            3 => Channels::Rgb,
            _ => Channels::Rgba,
        },
        forced => forced,
    };

    let (width, height) = img.dimensions();
    let (width, height) = (width as usize, height as usize);
    let (depth, raw) = match channels {
        Channels::Gray => (1, img.into_luma8().into_raw()),
        Channels::GrayAlpha => (2, img.into_luma_alpha8().into_raw()),
        Channels::Rgb => (3, img.into_rgb8().into_raw()),
        Channels::Rgba | Channels::Native => (4, img.into_rgba8().into_raw()),
    };

    Array3::from_shape_vec((height, width, depth), raw)
        .map_err(|e| AppError::Internal(format!("pixel buffer shape mismatch: {}", e)))
}

#![doc(html_root_url = "https://docs.rs/imagerunner/0.1.0")]
#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

//! # imagerunner
//!
//! Small helpers for decoding and re-encoding images outside of any larger
//! processing graph, plus a runner for the external `ffmpeg` binary.
//!
//! ## Features
//!
//! - **Shared execution context**: one lazily built [`ImageRunner`] reused by every call
//! - **Image helpers**: generic decode, PNG → JPEG, CMYK JPEG → RGB JPEG
//! - **ffmpeg runner**: blocking subprocess calls with uniform errors
//! - **Async wrappers** (`async` feature): the same helpers on tokio's blocking pool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imagerunner::{decode_image, ffmpeg_run, png_to_jpeg, Result};
//!
//! fn main() -> Result<()> {
//!     let png = std::fs::read("input.png")?;
//!     let jpeg = png_to_jpeg(&png, Some(90))?;
//!     let pixels = decode_image(&jpeg)?;
//!     println!("decoded {:?}", pixels.dim());
//!
//!     ffmpeg_run(&["-y", "-i", "in.mp4", "out.webm"], None)?;
//!     Ok(())
//! }
//! ```

/// Runtime configuration loaded from the environment or a JSON file.
pub mod config;
pub mod core;
/// Defines the crate's error types and result aliases.
pub mod error;

/// Build-time information generated by `built`.
#[allow(missing_docs, unreachable_pub, dead_code)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

// Public API exports
pub use crate::{
    config::Config,
    core::codec::{Channels, ImageCodec, ImageCrateCodec, JpegFormat, PixelArray},
    core::convert::{decode_image, jpeg_cmyk_to_rgb, png_to_jpeg, DEFAULT_JPEG_QUALITY},
    core::ffmpeg::{check_ffmpeg_installed, ffmpeg_output, ffmpeg_run, Ffmpeg, FfmpegOutput},
    core::runner::ImageRunner,
    error::{AppError, Result},
};

/// Initialize logging and configuration
///
/// Loads `.env`, installs `env_logger` (default level `info`), reads the
/// configuration and warns if ffmpeg is unavailable. Safe to call more than
/// once; only the first call installs the logger.
///
/// # Errors
///
/// Returns an error if the environment holds an invalid configuration.
///
/// # Example
///
/// ```no_run
/// use imagerunner::init;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     init()?;
///     // Application code here
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let env = env_logger::Env::default()
        .default_filter_or("info")
        .default_write_style_or("auto");

    // Already installed by an earlier call or the host application
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    log::info!("Initializing imagerunner {}", built_info::PKG_VERSION);

    let config = Config::from_env()?;
    if let Err(e) = config::install(config) {
        log::debug!("Keeping existing configuration: {}", e);
    }

    if let Err(e) = check_ffmpeg_installed() {
        log::warn!("FFmpeg is not usable: {}", e);
        log::warn!("Media conversion through ffmpeg will not be available");
    }

    // Build the shared runner now instead of on the first image call
    let _ = ImageRunner::global();

    log::info!("imagerunner initialized successfully");
    Ok(())
}

//! Core functionality: image codec context and the ffmpeg process runner

/// Async wrappers around the blocking helpers.
#[cfg(feature = "async")]
pub mod blocking;
/// The image codec capability and its default implementation.
pub mod codec;
/// PNG/JPEG conversion helpers.
pub mod convert;
/// Runs the external ffmpeg binary.
pub mod ffmpeg;
/// The shared execution context for image operations.
pub mod runner;

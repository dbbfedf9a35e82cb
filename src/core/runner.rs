use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::Lazy;

use super::codec::{ImageCodec, ImageCrateCodec};
use crate::error::Result;

static GLOBAL: Lazy<ImageRunner> = Lazy::new(|| {
    log::debug!("Creating shared image runner");
    ImageRunner::new()
});

/// Execution context for image operations.
///
/// Wraps a codec and runs one unary operation at a time against it. Build one
/// at startup and pass it around, or use [`ImageRunner::global`].
#[derive(Clone)]
pub struct ImageRunner {
    codec: Arc<dyn ImageCodec>,
}

impl fmt::Debug for ImageRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRunner").finish_non_exhaustive()
    }
}

impl Default for ImageRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageRunner {
    /// Create a runner backed by the `image` crate
    pub fn new() -> Self {
        Self::with_codec(Arc::new(ImageCrateCodec::new()))
    }

    /// Create a runner around any codec
    pub fn with_codec(codec: Arc<dyn ImageCodec>) -> Self {
        Self { codec }
    }

    /// The process-wide runner, created on first call.
    ///
    /// Every call returns the same instance.
    pub fn global() -> &'static ImageRunner {
        &GLOBAL
    }

    /// The codec operations run against
    pub fn codec(&self) -> &dyn ImageCodec {
        self.codec.as_ref()
    }

    /// Run a single operation on `input` and return its output
    pub fn run<I, O, F>(&self, name: &str, op: F, input: I) -> Result<O>
    where
        F: FnOnce(&dyn ImageCodec, I) -> Result<O>,
    {
        let start = Instant::now();
        let result = op(self.codec.as_ref(), input);
        log::debug!(
            "{} finished in {:?} ({})",
            name,
            start.elapsed(),
            if result.is_ok() { "ok" } else { "error" }
        );
        result
    }
}

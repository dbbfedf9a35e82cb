use serde::Serialize;

/// Main error type for the crate
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// I/O errors (spawning processes, reading config files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode errors raised by the codec
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An external command exited with a nonzero status
    #[error(
        "Command {command:?} returned error code {code}:\nstdout={}\nstderr={}\n",
        String::from_utf8_lossy(.stdout),
        String::from_utf8_lossy(.stderr)
    )]
    CommandFailed {
        /// Full argument vector, binary first.
        command: Vec<String>,
        /// Exit code, or the negated signal number if the process was killed.
        code: i32,
        /// Captured standard output.
        stdout: Vec<u8>,
        /// Captured standard error.
        stderr: Vec<u8>,
    },

    /// The ffmpeg binary could not be found on the search path
    #[error(
        "It seems that ffmpeg is not installed on the system. Please follow \
         the instructions at https://ffmpeg.org/. Original error: {source}"
    )]
    FfmpegNotFound {
        /// The spawn error reported by the OS.
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Serializable error report for higher layers
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Short machine-readable error kind
    pub kind: &'static str,
    /// Error message
    pub message: String,
    /// Exit code of the failed command, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl AppError {
    /// Short machine-readable name of the error variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Image(_) => "image",
            Self::Json(_) => "json",
            Self::CommandFailed { .. } => "command_failed",
            Self::FfmpegNotFound { .. } => "ffmpeg_not_found",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }

    /// Convert the error to a JSON-serializable report
    pub fn to_json(&self) -> ErrorResponse {
        let code = match self {
            Self::CommandFailed { code, .. } => Some(*code),
            _ => None,
        };

        ErrorResponse {
            kind: self.kind(),
            message: self.to_string(),
            code,
        }
    }
}

#[cfg(feature = "async")]
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task join error: {}", err))
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, AppError>;

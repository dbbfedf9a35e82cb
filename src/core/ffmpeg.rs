use std::io::{ErrorKind, Write};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::FfmpegConfig;
use crate::error::{AppError, Result};

/// Captured output of a successful ffmpeg run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FfmpegOutput {
    /// Everything written to standard output
    pub stdout: Vec<u8>,
    /// Everything written to standard error
    pub stderr: Vec<u8>,
}

/// Runs the external ffmpeg binary
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: String,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new()
    }
}

impl Ffmpeg {
    /// Use `ffmpeg` from the system path
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    /// Use a specific binary name or path
    pub fn with_binary<S: Into<String>>(binary: S) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Use the binary named in a configuration
    pub fn from_config(config: &FfmpegConfig) -> Self {
        Self::with_binary(config.binary.clone())
    }

    /// The binary this runner invokes
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run ffmpeg with `args`, optionally piping `stdin` into it.
    ///
    /// Blocks until the process exits. Output is captured and discarded.
    ///
    /// # Errors
    ///
    /// * [`AppError::CommandFailed`] if the process exits with a nonzero status
    /// * [`AppError::FfmpegNotFound`] if the binary cannot be found
    /// * [`AppError::Io`] for any other spawn or pipe failure
    pub fn run<S: AsRef<str>>(&self, args: &[S], stdin: Option<&[u8]>) -> Result<()> {
        self.output(args, stdin).map(|_| ())
    }

    /// Like [`Ffmpeg::run`], but hands back the captured output on success
    pub fn output<S: AsRef<str>>(&self, args: &[S], stdin: Option<&[u8]>) -> Result<FfmpegOutput> {
        let command: Vec<String> = std::iter::once(self.binary.clone())
            .chain(args.iter().map(|a| a.as_ref().to_string()))
            .collect();
        log::debug!("Running {:?}", command);

        let mut child = Command::new(&self.binary)
            .args(&command[1..])
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AppError::FfmpegNotFound { source: e },
                _ => AppError::Io(e),
            })?;

        let pipe = child.stdin.take();
        // Feed stdin from a second thread so a full stdout pipe cannot deadlock us.
        let (output, written) = std::thread::scope(|s| {
            let writer = match (stdin, pipe) {
                (Some(data), Some(mut pipe)) => Some(s.spawn(move || pipe.write_all(data))),
                _ => None,
            };
            let output = child.wait_with_output();
            let written = writer.map(|w| w.join());
            (output, written)
        });
        let output = output?;

        match written {
            None | Some(Ok(Ok(()))) => {}
            Some(Ok(Err(e))) if e.kind() == ErrorKind::BrokenPipe => {
                log::debug!("{} closed stdin early", self.binary);
            }
            Some(Ok(Err(e))) => return Err(AppError::Io(e)),
            Some(Err(_)) => return Err(AppError::Internal("stdin writer panicked".to_string())),
        }

        if !output.status.success() {
            return Err(AppError::CommandFailed {
                command,
                code: exit_code(output.status),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(FfmpegOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Exit code, or the negated signal number when the process was killed
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

fn configured() -> Ffmpeg {
    Ffmpeg::from_config(&crate::config::global().ffmpeg)
}

/// Run the configured ffmpeg binary with `args` and optional `stdin`
pub fn ffmpeg_run<S: AsRef<str>>(args: &[S], stdin: Option<&[u8]>) -> Result<()> {
    configured().run(args, stdin)
}

/// Run the configured ffmpeg binary and return its captured output
pub fn ffmpeg_output<S: AsRef<str>>(args: &[S], stdin: Option<&[u8]>) -> Result<FfmpegOutput> {
    configured().output(args, stdin)
}

/// Checks if FFmpeg is installed and available in the system path
pub fn check_ffmpeg_installed() -> Result<()> {
    ffmpeg_run(&["-version"], None)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_success_discards_output() {
        let sh = Ffmpeg::with_binary("sh");
        assert!(sh.run(&["-c", "echo hello"], None).is_ok());
    }

    #[test]
    fn test_output_captures_streams() {
        let sh = Ffmpeg::with_binary("sh");
        let out = sh.output(&["-c", "echo out; echo err >&2"], None).unwrap();
        assert_eq!(out.stdout, b"out\n");
        assert_eq!(out.stderr, b"err\n");
    }

    #[test]
    fn test_stdin_is_piped() {
        let cat = Ffmpeg::with_binary("cat");
        let data = vec![42u8; 256 * 1024];
        let no_args: [&str; 0] = [];
        let out = cat.output(&no_args, Some(&data)).unwrap();
        assert_eq!(out.stdout, data);
    }

    #[test]
    fn test_stdin_closed_early_uses_exit_status() {
        let sh = Ffmpeg::with_binary("sh");
        let data = vec![0u8; 4 * 1024 * 1024];
        assert!(sh.run(&["-c", "exit 0"], Some(&data)).is_ok());
    }

    #[test]
    fn test_nonzero_exit() {
        let sh = Ffmpeg::with_binary("sh");
        let err = sh
            .run(&["-c", "echo partial; echo broken >&2; exit 3"], None)
            .unwrap_err();

        match err {
            AppError::CommandFailed { ref command, code, ref stdout, ref stderr } => {
                assert_eq!(command, &["sh", "-c", "echo partial; echo broken >&2; exit 3"]);
                assert_eq!(code, 3);
                assert_eq!(stdout, b"partial\n");
                assert_eq!(stderr, b"broken\n");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("returned error code 3"));
    }

    #[test]
    fn test_killed_by_signal() {
        let sh = Ffmpeg::with_binary("sh");
        let err = sh.run(&["-c", "kill -9 $$"], None).unwrap_err();
        assert!(matches!(err, AppError::CommandFailed { code: -9, .. }));
    }

    #[test]
    fn test_missing_binary() {
        let missing = Ffmpeg::with_binary("/nonexistent/bin/ffmpeg");
        let err = missing.run(&["-version"], None).unwrap_err();
        assert!(matches!(err, AppError::FfmpegNotFound { .. }));
        assert!(err.to_string().contains("ffmpeg.org"));
    }
}

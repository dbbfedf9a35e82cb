use std::ffi::OsString;
use std::io::Cursor;

use assert_fs::TempDir;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imagerunner::{decode_image, AppError, Ffmpeg};
use predicates::prelude::*;
use serial_test::serial;

/// Restores `PATH` when dropped
struct PathGuard(Option<OsString>);

impl PathGuard {
    fn set(path: &std::path::Path) -> Self {
        let old = std::env::var_os("PATH");
        std::env::set_var("PATH", path);
        Self(old)
    }
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        match self.0.take() {
            Some(old) => std::env::set_var("PATH", old),
            None => std::env::remove_var("PATH"),
        }
    }
}

fn ffmpeg_available() -> bool {
    Ffmpeg::new().run(&["-version"], None).is_ok()
}

/// True when `test` has to be skipped; says so on stderr
fn skip_without_ffmpeg(test: &str) -> bool {
    if ffmpeg_available() {
        return false;
    }
    eprintln!("SKIPPED {}: ffmpeg not found on PATH", test);
    true
}

#[test]
#[serial]
fn test_missing_ffmpeg_on_empty_path() {
    let empty = TempDir::new().unwrap();
    let result = {
        let _guard = PathGuard::set(empty.path());
        Ffmpeg::new().run(&["-version"], None)
    };

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::FfmpegNotFound { .. }));

    let message = err.to_string();
    assert!(predicate::str::contains("ffmpeg.org").eval(&message));
    assert!(predicate::str::contains("not installed").eval(&message));
}

#[test]
#[serial]
fn test_rejected_flag_reports_command() {
    if skip_without_ffmpeg("test_rejected_flag_reports_command") {
        return;
    }

    let args = ["-hide_banner", "-this-flag-does-not-exist"];
    let err = Ffmpeg::new().run(&args, None).unwrap_err();

    match &err {
        AppError::CommandFailed { command, code, .. } => {
            assert_eq!(command[0], "ffmpeg");
            assert_eq!(&command[1..], &args);
            assert_ne!(*code, 0);
        }
        other => panic!("unexpected error: {other}"),
    }

    let message = err.to_string();
    assert!(predicate::str::contains("-this-flag-does-not-exist").eval(&message));
    assert!(predicate::str::contains("returned error code").eval(&message));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_rejected_args_reported_with_stand_in() {
    // `sh` rejects the flag the way ffmpeg would, so this runs everywhere
    let args = [
        "-c",
        "echo \"Unrecognized option '$1'\" >&2; exit 8",
        "sh",
        "-this-flag-does-not-exist",
    ];
    let err = Ffmpeg::with_binary("sh").run(&args, None).unwrap_err();

    match &err {
        AppError::CommandFailed { command, code, stderr, .. } => {
            assert_eq!(&command[1..], &args);
            assert_eq!(*code, 8);
            assert_eq!(stderr, b"Unrecognized option '-this-flag-does-not-exist'\n");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(predicate::str::contains("returned error code 8").eval(&err.to_string()));
}

#[test]
#[serial]
fn test_png_through_stdin() {
    if skip_without_ffmpeg("test_png_through_stdin") {
        return;
    }

    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 16, Rgb([0, 128, 255])))
        .write_to(&mut png, ImageFormat::Png)
        .unwrap();

    let out = Ffmpeg::new()
        .output(
            &[
                "-hide_banner", "-loglevel", "error", "-f", "png_pipe", "-i", "-", "-c:v",
                "mjpeg", "-f", "image2pipe", "-",
            ],
            Some(png.get_ref()),
        )
        .unwrap();

    assert_eq!(decode_image(&out.stdout).unwrap().dim(), (16, 32, 3));
}

#[test]
#[serial]
fn test_check_ffmpeg_installed_matches_version_call() {
    assert_eq!(imagerunner::check_ffmpeg_installed().is_ok(), ffmpeg_available());
}

#[cfg(feature = "async")]
#[test]
#[serial]
fn test_async_missing_ffmpeg() {
    let empty = TempDir::new().unwrap();
    let _guard = PathGuard::set(empty.path());

    let result = tokio_test::block_on(imagerunner::core::blocking::ffmpeg_run(
        Ffmpeg::new(),
        vec!["-version".to_string()],
        None,
    ));
    assert!(matches!(result, Err(AppError::FfmpegNotFound { .. })));
}

//! ffmpeg discovery and argument construction.
//!
//! Discovery checks the usual install locations before searching PATH, so the
//! binary is found even when launched from an environment with a sparse PATH.

use super::filter::WaveformFilter;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Locates the ffmpeg binary on the system.
///
/// Checks in this order:
/// 1. macOS homebrew locations: `/opt/homebrew/bin/ffmpeg`, `/usr/local/bin/ffmpeg`
/// 2. Linux standard locations: `/usr/bin/ffmpeg`, `/usr/local/bin/ffmpeg`, `/snap/bin/ffmpeg`
/// 3. Windows standard locations: `C:\ffmpeg\bin\ffmpeg.exe`
/// 4. PATH search via `which` or `where`
///
/// Returns `None` when nothing is found.
pub fn find_ffmpeg() -> Option<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/opt/homebrew/bin/ffmpeg",
            "/usr/local/bin/ffmpeg",
            "/usr/bin/ffmpeg",
        ]
    } else if cfg!(target_os = "linux") {
        &["/usr/bin/ffmpeg", "/usr/local/bin/ffmpeg", "/snap/bin/ffmpeg"]
    } else if cfg!(target_os = "windows") {
        &[
            "C:\\ffmpeg\\bin\\ffmpeg.exe",
            "C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe",
        ]
    } else {
        &[]
    };

    if let Some(path) = candidates.iter().map(PathBuf::from).find(|p| p.exists()) {
        tracing::debug!("Found ffmpeg at: {}", path.display());
        return Some(path);
    }

    let path = find_in_path("ffmpeg")?;
    tracing::debug!("Found ffmpeg in PATH at: {}", path.display());
    Some(path)
}

/// Searches for a binary in the system PATH using `which` or `where`.
fn find_in_path(binary_name: &str) -> Option<PathBuf> {
    let search_cmd = if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    };

    let output = std::process::Command::new(search_cmd)
        .arg(binary_name)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next()?.trim();
    (!first.is_empty()).then(|| PathBuf::from(first))
}

/// Picks the binary to launch: an explicit override, a discovered path, or bare
/// `ffmpeg` so a missing install surfaces as a launch failure.
pub fn resolve_binary(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    find_ffmpeg().unwrap_or_else(|| {
        tracing::warn!("ffmpeg not found in standard locations or PATH; trying 'ffmpeg'");
        PathBuf::from("ffmpeg")
    })
}

/// Which argument shape to hand to ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// `-y -i IN -filter_complex showwavespic=size=..:colors=.. OUT`
    Direct,
    /// Every filter parameter spelled out, single output frame.
    Extended,
}

/// Builds ffmpeg's argument list for one render.
pub fn build_args(
    invocation: Invocation,
    input: &Path,
    output: &Path,
    filter: &WaveformFilter,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
    match invocation {
        Invocation::Direct => {
            args.push("-filter_complex".into());
            args.push(filter.expression().into());
        }
        Invocation::Extended => {
            args.push("-filter_complex".into());
            args.push(filter.extended_expression().into());
            args.push("-frames:v".into());
            args.push("1".into());
        }
    }
    args.push(output.into());
    args
}

/// Renders an argument list the way it would be typed in a shell, for logging.
pub fn display_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

//! Filesystem checks performed before ffmpeg is launched.

use super::error::{RenderError, RenderResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// How the caller intends to use a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Ensures the directory containing `path` exists and, for writes, accepts new files.
///
/// The directory is created recursively when missing, and a directory created
/// here has its permissions relaxed on a best-effort basis. In `Write` mode a
/// probe file is created and removed again. The file at `path` itself is never
/// inspected; for inputs, ffmpeg reports a missing file on its own.
///
/// # Errors
/// - If the directory cannot be created
/// - If the probe file cannot be written or removed
pub fn validate_path(path: &Path, mode: AccessMode) -> RenderResult<()> {
    let dir = containing_dir(path);
    let path_error = |source| RenderError::Path {
        path: dir.clone(),
        source,
    };

    if !dir.is_dir() {
        fs::create_dir_all(&dir).map_err(path_error)?;
        if let Err(e) = relax_permissions(&dir) {
            tracing::warn!("Could not set permissions for {}: {e}", dir.display());
        }
    }

    if mode == AccessMode::Write {
        let probe = dir.join(probe_file_name());
        fs::write(&probe, b"probe").map_err(path_error)?;
        fs::remove_file(&probe).map_err(path_error)?;
    }

    tracing::debug!("{} - {mode} access verified", path.display());
    Ok(())
}

/// Parent directory of `path`; a bare file name lives in the current directory.
fn containing_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn probe_file_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!(".wavepic-probe-{}-{nanos}", std::process::id())
}

#[cfg(unix)]
fn relax_permissions(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o777))
}

#[cfg(not(unix))]
fn relax_permissions(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("a").join("b").join("waveform.png");

        validate_path(&output, AccessMode::Write).unwrap();

        assert!(output.parent().unwrap().is_dir());
        assert!(!output.exists());
        // probe file is cleaned up
        assert_eq!(fs::read_dir(output.parent().unwrap()).unwrap().count(), 0);
    }

    #[test]
    fn test_read_does_not_require_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("audio").join("missing.mp3");

        validate_path(&input, AccessMode::Read).unwrap();

        assert!(input.parent().unwrap().is_dir());
        assert!(!input.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_directory_permissions_untouched() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("out");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o750)).unwrap();

        validate_path(&dir.join("waveform.png"), AccessMode::Write).unwrap();

        let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        assert_eq!(containing_dir(Path::new("out.png")), PathBuf::from("."));
    }

    #[test]
    fn test_parent_is_a_file_fails_with_path_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = validate_path(&blocker.join("out.png"), AccessMode::Write).unwrap_err();
        assert!(matches!(err, RenderError::Path { .. }), "got {err:?}");
    }
}

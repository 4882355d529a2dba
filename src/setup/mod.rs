//! First-run setup.
//!
//! Writes the default configuration file when none exists yet.

use std::path::Path;

/// Embedded default configuration template.
pub const DEFAULT_CONFIG: &str = include_str!("../../environments/wavepic.toml");

/// Writes the default config to `config_path` if the file is missing.
///
/// Returns `true` when a new file was written.
///
/// # Errors
/// Returns an error if the directory or file cannot be created.
pub fn ensure_config(config_path: &Path) -> anyhow::Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }
    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    tracing::info!("Wrote default configuration to {}", config_path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wavepic").join("wavepic.toml");

        assert!(ensure_config(&path).unwrap());
        std::fs::write(&path, "# edited\n").unwrap();
        assert!(!ensure_config(&path).unwrap());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited\n");
    }
}

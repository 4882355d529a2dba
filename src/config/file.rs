//! Configuration file management for wavepic.
//!
//! Configuration lives in `~/.config/wavepic/wavepic.toml`. Every key is optional;
//! a missing file means built-in defaults.

use crate::render::{AmplitudeScale, DrawMode, PeakFilter, DEFAULT_COLORS, DEFAULT_RESOLUTION};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default rendering parameters.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Output size as `WIDTHxHEIGHT`
    pub resolution: Option<String>,
    /// Colour list, `|`-separated
    pub colors: Option<String>,
    pub split_channels: Option<bool>,
    pub scale: Option<AmplitudeScale>,
    pub draw: Option<DrawMode>,
    pub filter: Option<PeakFilter>,
}

impl RenderConfig {
    pub fn resolution(&self) -> &str {
        self.resolution.as_deref().unwrap_or(DEFAULT_RESOLUTION)
    }

    pub fn colors(&self) -> &str {
        self.colors.as_deref().unwrap_or(DEFAULT_COLORS)
    }
}

/// Location of the ffmpeg binary.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FfmpegConfig {
    pub binary: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WavepicConfig {
    pub render: RenderConfig,
    pub ffmpeg: FfmpegConfig,
}

impl WavepicConfig {
    /// Loads configuration from the user's config directory, or defaults if absent.
    ///
    /// # Errors
    /// - If the home directory cannot be determined
    /// - If the file exists but cannot be read or parsed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Loads configuration from an explicit path, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: WavepicConfig = toml::from_str(&content)
            .with_context(|| format!("Malformed config file {}", path.display()))?;
        Ok(config)
    }
}

/// Retrieves the path to the config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("wavepic").join("wavepic.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = WavepicConfig::load_from(&temp_dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, WavepicConfig::default());
        assert_eq!(config.render.resolution(), "1920x1080");
        assert_eq!(config.render.colors(), "blue");
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wavepic.toml");
        fs::write(
            &path,
            "[render]\ncolors = \"red|green\"\nscale = \"log\"\n\n[ffmpeg]\nbinary = \"/opt/ffmpeg\"\n",
        )
        .unwrap();

        let config = WavepicConfig::load_from(&path).unwrap();
        assert_eq!(config.render.resolution(), "1920x1080");
        assert_eq!(config.render.colors(), "red|green");
        assert_eq!(config.render.scale, Some(AmplitudeScale::Log));
        assert_eq!(config.ffmpeg.binary, Some(PathBuf::from("/opt/ffmpeg")));
    }

    #[test]
    fn test_embedded_template_parses() {
        let config: WavepicConfig = toml::from_str(crate::setup::DEFAULT_CONFIG).unwrap();
        assert_eq!(config.render.resolution(), DEFAULT_RESOLUTION);
        assert_eq!(config.render.colors(), DEFAULT_COLORS);
        assert_eq!(config.ffmpeg.binary, None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wavepic.toml");
        fs::write(&path, "[render\nresolution = 5").unwrap();
        assert!(WavepicConfig::load_from(&path).is_err());
    }
}

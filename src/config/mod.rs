//! Configuration management for wavepic.
//!
//! Loads rendering defaults and the ffmpeg location from a TOML file in the
//! user's config directory.

pub mod file;

pub use file::{get_config_path, RenderConfig, WavepicConfig};

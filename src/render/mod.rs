//! Waveform rendering through ffmpeg.
//!
//! Validates the output location, builds a `showwavespic` filter expression and
//! runs ffmpeg as a child process. All decoding and drawing happens in ffmpeg.

pub mod error;
pub mod ffmpeg;
pub mod filter;
pub mod paths;
pub mod runner;

pub use error::RenderResult;
pub use filter::{
    AmplitudeScale, ColorList, DrawMode, PeakFilter, Resolution, WaveformFilter,
    DEFAULT_COLORS, DEFAULT_RESOLUTION,
};
pub use runner::{RenderRequest, Runner, Strategy};

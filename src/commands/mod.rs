//! Application command handlers for wavepic.
//!
//! # Commands
//! - `render`: render a waveform from command-line arguments
//! - `interactive`: prompt for paths and parameters, then render (default)
//! - `sample`: render the bundled sample paths
//! - `config`: open the configuration file in the user's editor
//! - `logs`: display recent log entries

pub mod config;
pub mod interactive;
pub mod logs;
pub mod render;

pub use config::handle_config;
pub use interactive::handle_interactive;
pub use logs::handle_logs;
pub use render::{handle_render, handle_sample, RenderOptions};

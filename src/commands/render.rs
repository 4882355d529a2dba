//! Render a waveform image from command-line arguments.

use crate::config::{RenderConfig, WavepicConfig};
use crate::render::{
    AmplitudeScale, DrawMode, PeakFilter, RenderRequest, RenderResult, Runner, Strategy,
    WaveformFilter,
};
use std::path::{Path, PathBuf};

/// Fixed sample input, relative to the working directory.
pub const SAMPLE_INPUT: &str = "audio/input.mp3";
/// Fixed sample output, relative to the working directory.
pub const SAMPLE_OUTPUT: &str = "output/waveform.png";

/// Rendering options as given on the command line. Unset values come from config.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub resolution: Option<String>,
    pub colors: Option<String>,
    pub split_channels: bool,
    pub scale: Option<AmplitudeScale>,
    pub draw: Option<DrawMode>,
    pub filter: Option<PeakFilter>,
    /// Use the extended invocation even without extended options.
    pub extended: bool,
}

impl RenderOptions {
    /// Merges these options over config defaults into a validated filter and strategy.
    pub fn resolve(&self, defaults: &RenderConfig) -> RenderResult<(WaveformFilter, Strategy)> {
        let resolution = self.resolution.as_deref().unwrap_or(defaults.resolution());
        let colors = self.colors.as_deref().unwrap_or(defaults.colors());

        let mut filter = WaveformFilter::parse(resolution, colors)?;
        filter.split_channels = if self.split_channels {
            Some(true)
        } else {
            defaults.split_channels
        };
        filter.scale = self.scale.or(defaults.scale);
        filter.draw = self.draw.or(defaults.draw);
        filter.filter = self.filter.or(defaults.filter);

        let strategy = if self.extended || filter.has_extended_options() {
            Strategy::Extended
        } else {
            Strategy::Direct
        };
        Ok((filter, strategy))
    }
}

/// Renders `input` into `output` with the given options.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If a rendering parameter is invalid
/// - If path validation, launching or running ffmpeg fails
pub async fn handle_render(
    input: PathBuf,
    output: PathBuf,
    options: RenderOptions,
) -> Result<(), anyhow::Error> {
    tracing::debug!("=== wavepic Render Command ===");

    let config = WavepicConfig::load()?;
    let (filter, strategy) = options.resolve(&config.render)?;
    let request = RenderRequest {
        input: absolute(&input)?,
        output: absolute(&output)?,
        filter,
        strategy,
    };

    run_request(&config, &request).await?;
    println!("Waveform generated at: {}", request.output.display());
    Ok(())
}

/// Renders the bundled sample `audio/input.mp3` into `output/waveform.png`.
pub async fn handle_sample() -> Result<(), anyhow::Error> {
    tracing::debug!("=== wavepic Sample Command ===");

    let config = WavepicConfig::load()?;
    let request = RenderRequest {
        input: absolute(Path::new(SAMPLE_INPUT))?,
        output: absolute(Path::new(SAMPLE_OUTPUT))?,
        filter: WaveformFilter::default(),
        strategy: Strategy::Direct,
    };

    run_request(&config, &request).await?;
    println!("Waveform generated at: {}", request.output.display());
    Ok(())
}

/// Runs a request with the configured ffmpeg binary.
pub async fn run_request(
    config: &WavepicConfig,
    request: &RenderRequest,
) -> Result<(), anyhow::Error> {
    let runner = Runner::discover(config.ffmpeg.binary.as_deref());
    tracing::info!(
        "Rendering {} -> {} ({:?})",
        request.input.display(),
        request.output.display(),
        request.strategy
    );
    tracing::debug!("Using ffmpeg at {}", runner.program().display());
    runner.render(request).await.map_err(|e| {
        match e.exit_code() {
            Some(code) => tracing::error!(code, "Waveform generation failed: {e}"),
            None => tracing::error!("Waveform generation failed: {e}"),
        }
        anyhow::Error::new(e).context("Waveform generation failed")
    })
}

/// Makes a path absolute against the current directory.
pub fn absolute(path: &Path) -> Result<PathBuf, anyhow::Error> {
    std::path::absolute(path)
        .map_err(|e| anyhow::anyhow!("Could not resolve path '{}': {e}", path.display()))
}

//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands::interactive::PromptCancelled;
use crate::commands::{self, RenderOptions};
use crate::config::get_config_path;
use crate::logging;
use crate::render::{AmplitudeScale, DrawMode, PeakFilter};
use crate::setup;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// Render waveform images from audio files with ffmpeg
#[derive(Parser)]
#[command(name = "wavepic")]
#[command(version)]
#[command(about = "Render waveform images from audio files with ffmpeg")]
#[command(long_about = "Render waveform images from audio files with ffmpeg's showwavespic filter.\n\nDEFAULT COMMAND:\n    If no command is specified, 'interactive' is used by default.\n\nEXAMPLES:\n    # Answer prompts for input, output, resolution and colors\n    $ wavepic\n\n    # Render directly\n    $ wavepic render song.mp3 song.png -r 1200x300 -c '#3b82f6'\n\n    # One colour per channel, logarithmic scale\n    $ wavepic render song.flac song.png --split-channels -c 'red|green' --scale log\n\n    # Render audio/input.mp3 into output/waveform.png\n    $ wavepic sample")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/wavepic/wavepic.toml\n    Logs:               ~/.local/state/wavepic/wavepic.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for paths, resolution and colors, then render (default)
    #[command(visible_alias = "i")]
    Interactive {
        /// Pass every filter option to ffmpeg, falling back to the plain form if rejected
        #[arg(long)]
        extended: bool,
    },

    /// Render a waveform image from an audio file
    ///
    /// Uses `showwavespic=size=WxH:colors=C` unless an extended option is given.
    #[command(visible_alias = "r")]
    Render {
        /// Input audio file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output image file (overwritten if it exists)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Image size as WIDTHxHEIGHT [default: 1920x1080]
        #[arg(short, long, value_name = "WxH")]
        resolution: Option<String>,

        /// Colour name or hex, one per channel separated by '|' [default: blue]
        #[arg(short, long)]
        colors: Option<String>,

        /// Draw each channel separately
        #[arg(long)]
        split_channels: bool,

        /// Amplitude scale
        #[arg(long, value_enum)]
        scale: Option<AmplitudeScale>,

        /// Draw mode
        #[arg(long, value_enum)]
        draw: Option<DrawMode>,

        /// Sample reduction filter
        #[arg(long, value_enum)]
        filter: Option<PeakFilter>,

        /// Pass every filter option to ffmpeg, falling back to the plain form if rejected
        #[arg(long)]
        extended: bool,
    },

    /// Render audio/input.mp3 into output/waveform.png
    Sample,

    /// Open configuration file in your preferred editor
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries
    Logs,

    /// Generate shell completion script
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Writes the default config on first run.
fn check_and_run_setup() -> Result<(), anyhow::Error> {
    let config_path = get_config_path()?;
    if setup::ensure_config(&config_path)? {
        tracing::info!("First run: created {}", config_path.display());
    } else {
        tracing::debug!("Config present at {}", config_path.display());
    }
    Ok(())
}

/// Whether an error came from the user dismissing a prompt.
fn is_cancellation(e: &anyhow::Error) -> bool {
    e.downcast_ref::<PromptCancelled>().is_some()
}

/// Runs the main application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: Validation, launch or ffmpeg failure
/// - 2: Usage error (invalid arguments)
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "wavepic", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;

    if let Err(e) = check_and_run_setup() {
        tracing::warn!("Setup skipped: {e}");
    }

    match cli.command {
        None => run_interactive(false).await?,
        Some(Commands::Interactive { extended }) => run_interactive(extended).await?,
        Some(Commands::Render {
            input,
            output,
            resolution,
            colors,
            split_channels,
            scale,
            draw,
            filter,
            extended,
        }) => {
            let options = RenderOptions {
                resolution,
                colors,
                split_channels,
                scale,
                draw,
                filter,
                extended,
            };
            commands::handle_render(input, output, options).await?;
        }
        Some(Commands::Sample) => commands::handle_sample().await?,
        Some(Commands::Config) => commands::handle_config()?,
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

async fn run_interactive(extended: bool) -> Result<(), anyhow::Error> {
    if let Err(e) = commands::handle_interactive(extended).await {
        if is_cancellation(&e) {
            // cliclack already reported the cancellation
            process::exit(0);
        }
        return Err(e);
    }
    Ok(())
}

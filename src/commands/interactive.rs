//! Interactive rendering: prompt for paths, resolution and colours.

use crate::commands::render::{absolute, run_request, RenderOptions};
use crate::config::{RenderConfig, WavepicConfig};
use crate::render::{ColorList, RenderRequest, Resolution, DEFAULT_COLORS, DEFAULT_RESOLUTION};
use cliclack::{input, intro, outro};
use console::style;
use std::io;
use std::path::PathBuf;

/// The user dismissed a prompt (Esc or Ctrl-C).
#[derive(thiserror::Error, Debug)]
#[error("Input cancelled")]
pub struct PromptCancelled;

/// Cancellation becomes `PromptCancelled`; anything else is a real prompt failure.
fn prompt_error(e: io::Error) -> anyhow::Error {
    if e.kind() == io::ErrorKind::Interrupted {
        PromptCancelled.into()
    } else {
        anyhow::anyhow!("Prompt failed: {e}")
    }
}

/// Answers collected from the prompts, defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub input: PathBuf,
    pub output: PathBuf,
    pub resolution: String,
    pub colors: String,
}

/// Substitutes `default` for an empty answer.
pub fn or_default(answer: &str, default: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    }
}

/// Prompts for input path, output path, resolution and colours, then renders.
///
/// Empty answers take the literal defaults `1920x1080` and `blue`; the config file
/// only supplies the ffmpeg location here. With `extended`, the request goes through the extended invocation and falls
/// back to the direct one if ffmpeg rejects it.
///
/// # Errors
/// - If a prompt is cancelled
/// - If the configuration cannot be loaded
/// - If rendering fails
pub async fn handle_interactive(extended: bool) -> Result<(), anyhow::Error> {
    tracing::debug!("=== wavepic Interactive Command ===");

    ctrlc::set_handler(move || {})?;

    let config = WavepicConfig::load()?;

    intro(style(" wavepic ").on_white().black())?;
    let answers = prompt(DEFAULT_RESOLUTION, DEFAULT_COLORS)?;

    let (filter, strategy) =
        interactive_options(&answers, extended).resolve(&RenderConfig::default())?;
    let request = RenderRequest {
        input: absolute(&answers.input)?,
        output: absolute(&answers.output)?,
        filter,
        strategy,
    };

    run_request(&config, &request).await?;
    outro(format!(
        "Waveform generated successfully: {}",
        request.output.display()
    ))?;
    Ok(())
}

/// Options for an interactive render. Only `extended` selects the extended strategy.
fn interactive_options(answers: &Answers, extended: bool) -> RenderOptions {
    RenderOptions {
        resolution: Some(answers.resolution.clone()),
        colors: Some(answers.colors.clone()),
        extended,
        ..Default::default()
    }
}

fn prompt(default_resolution: &str, default_colors: &str) -> Result<Answers, anyhow::Error> {
    let input_path: String = input("Enter input audio path:")
        .placeholder("audio/input.mp3")
        .validate(|s: &String| non_empty(s))
        .interact()
        .map_err(prompt_error)?;

    let output_path: String = input("Enter output image path:")
        .placeholder("output/waveform.png")
        .validate(|s: &String| non_empty(s))
        .interact()
        .map_err(prompt_error)?;

    let resolution: String = input(format!("Enter resolution (default: {default_resolution}):"))
        .placeholder(default_resolution)
        .required(false)
        .validate(|s: &String| {
            optional(s, |v| v.parse::<Resolution>().map(|_| ()).map_err(|e| e.to_string()))
        })
        .interact()
        .map_err(prompt_error)?;

    let colors: String = input(format!("Enter colors (default: {default_colors}):"))
        .placeholder(default_colors)
        .required(false)
        .validate(|s: &String| {
            optional(s, |v| v.parse::<ColorList>().map(|_| ()).map_err(|e| e.to_string()))
        })
        .interact()
        .map_err(prompt_error)?;

    Ok(Answers {
        input: PathBuf::from(input_path.trim()),
        output: PathBuf::from(output_path.trim()),
        resolution: or_default(&resolution, default_resolution),
        colors: or_default(&colors, default_colors),
    })
}

fn non_empty(s: &str) -> Result<(), &'static str> {
    if s.trim().is_empty() {
        Err("Please enter a path.")
    } else {
        Ok(())
    }
}

/// Empty answers are fine (the default applies); anything else must pass `check`.
fn optional(s: &str, check: impl Fn(&str) -> Result<(), String>) -> Result<(), String> {
    let s = s.trim();
    if s.is_empty() {
        Ok(())
    } else {
        check(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Strategy;

    fn answers(resolution: &str, colors: &str) -> Answers {
        Answers {
            input: PathBuf::from("in.mp3"),
            output: PathBuf::from("out.png"),
            resolution: or_default(resolution, DEFAULT_RESOLUTION),
            colors: or_default(colors, DEFAULT_COLORS),
        }
    }

    #[test]
    fn test_empty_answers_render_literal_default_expression() {
        let (filter, strategy) = interactive_options(&answers("", ""), false)
            .resolve(&RenderConfig::default())
            .unwrap();
        assert_eq!(filter.expression(), "showwavespic=size=1920x1080:colors=blue");
        assert_eq!(strategy, Strategy::Direct);
    }

    #[test]
    fn test_only_extended_flag_selects_extended_strategy() {
        let options = interactive_options(&answers("800x200", "red"), true);
        let (filter, strategy) = options.resolve(&RenderConfig::default()).unwrap();
        assert_eq!(strategy, Strategy::Extended);
        assert!(!filter.has_extended_options());
    }

    #[test]
    fn test_interrupted_prompt_is_cancellation() {
        let cancelled = prompt_error(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert!(cancelled.downcast_ref::<PromptCancelled>().is_some());

        let broken = prompt_error(io::Error::new(io::ErrorKind::BrokenPipe, "not a tty"));
        assert!(broken.downcast_ref::<PromptCancelled>().is_none());
    }

    #[test]
    fn test_empty_answers_take_literal_defaults() {
        assert_eq!(or_default("", DEFAULT_RESOLUTION), "1920x1080");
        assert_eq!(or_default("   ", DEFAULT_COLORS), "blue");
    }

    #[test]
    fn test_given_answers_are_kept() {
        assert_eq!(or_default(" 800x200 ", DEFAULT_RESOLUTION), "800x200");
        assert_eq!(or_default("red|green", DEFAULT_COLORS), "red|green");
    }

    #[test]
    fn test_optional_validation() {
        let check = |v: &str| v.parse::<Resolution>().map(|_| ()).map_err(|e| e.to_string());
        assert!(optional("", check).is_ok());
        assert!(optional("640x480", check).is_ok());
        assert!(optional("640x", check).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(non_empty("a.mp3").is_ok());
        assert!(non_empty("  ").is_err());
    }
}

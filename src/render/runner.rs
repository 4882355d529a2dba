//! Runs ffmpeg for a render request and turns its exit status into a result.

use super::error::{RenderError, RenderResult};
use super::ffmpeg::{self, Invocation};
use super::filter::WaveformFilter;
use super::paths::{validate_path, AccessMode};
use std::collections::VecDeque;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Number of trailing stderr lines kept to classify a failure.
const DIAGNOSTIC_TAIL: usize = 20;

/// ffmpeg's wording when it refuses an option value.
const INVALID_ARGUMENT: &str = "Invalid argument";

/// How a request is handed to ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Size and colours only.
    #[default]
    Direct,
    /// Every filter parameter; falls back to `Direct` once if ffmpeg rejects the arguments.
    Extended,
}

/// Everything needed to render one waveform image.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub filter: WaveformFilter,
    pub strategy: Strategy,
}

/// Progress of a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Spawned,
    Succeeded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Spawned => write!(f, "spawned"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Launches ffmpeg. One runner can serve any number of sequential requests.
#[derive(Debug, Clone)]
pub struct Runner {
    program: PathBuf,
}

impl Runner {
    /// Runner for an explicit ffmpeg binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runner for the configured binary, or whatever discovery finds.
    pub fn discover(configured: Option<&Path>) -> Self {
        Self::new(ffmpeg::resolve_binary(configured))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Validates the paths, runs ffmpeg and waits for it to exit.
    ///
    /// # Errors
    /// - `Path` if the output directory cannot be created or written
    /// - `Spawn` if ffmpeg cannot be launched
    /// - `Process` if ffmpeg exits with a non-zero code, including after a fallback
    pub async fn render(&self, request: &RenderRequest) -> RenderResult<()> {
        let mut stage = Stage::Idle;
        let result = self.render_inner(request, &mut stage).await;
        let stage = if result.is_ok() {
            Stage::Succeeded
        } else {
            Stage::Failed
        };
        tracing::debug!(%stage, output = %request.output.display(), "Render finished");
        result
    }

    async fn render_inner(&self, request: &RenderRequest, stage: &mut Stage) -> RenderResult<()> {
        advance(stage, Stage::Validating);
        validate_path(&request.input, AccessMode::Read)?;
        validate_path(&request.output, AccessMode::Write)?;

        match request.strategy {
            Strategy::Direct => self.invoke(Invocation::Direct, request, stage).await,
            Strategy::Extended => {
                match self.invoke(Invocation::Extended, request, stage).await {
                    Err(RenderError::InvalidArgument { code }) => {
                        tracing::warn!(
                            "ffmpeg rejected extended arguments (code {code}); retrying with direct invocation"
                        );
                        self.invoke(Invocation::Direct, request, stage).await
                    }
                    other => other,
                }
            }
        }
    }

    async fn invoke(
        &self,
        invocation: Invocation,
        request: &RenderRequest,
        stage: &mut Stage,
    ) -> RenderResult<()> {
        let args = ffmpeg::build_args(invocation, &request.input, &request.output, &request.filter);
        tracing::info!("Command: {}", ffmpeg::display_command(&self.program, &args));
        self.run(invocation, &args, stage).await
    }

    async fn run(
        &self,
        invocation: Invocation,
        args: &[OsString],
        stage: &mut Stage,
    ) -> RenderResult<()> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        advance(stage, Stage::Spawned);

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (status, _, tail) = tokio::join!(
            child.wait(),
            forward_lines(stdout, "stdout", 0),
            forward_lines(stderr, "stderr", DIAGNOSTIC_TAIL),
        );
        let status = status?;

        if status.success() {
            tracing::info!("Waveform generation completed successfully");
            return Ok(());
        }

        let code = status.code().unwrap_or(-1);
        let error = classify_failure(invocation, code, &tail);
        tracing::error!("{error}");
        Err(error)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::trace!(from = %stage, to = %next, "Render stage");
    *stage = next;
}

/// Forwards each line of a child stream to the log as it arrives, keeping the
/// last `keep` lines.
///
/// Output is decoded lossily since ffmpeg echoes file names byte for byte. A read
/// failure stops forwarding but never the wait on the child.
async fn forward_lines<R>(stream: Option<R>, name: &'static str, keep: usize) -> VecDeque<String>
where
    R: AsyncRead + Unpin,
{
    let mut tail = VecDeque::with_capacity(keep);
    let Some(stream) = stream else {
        return tail;
    };

    let mut lines = BufReader::new(stream).split(b'\n');
    loop {
        let bytes = match lines.next_segment().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Stopped reading ffmpeg {name}: {e}");
                break;
            }
        };
        let line = String::from_utf8_lossy(&bytes);
        let line = line.trim_end_matches('\r');
        tracing::info!(target: "wavepic::ffmpeg", stream = name, "{line}");
        if keep > 0 {
            if tail.len() == keep {
                tail.pop_front();
            }
            tail.push_back(line.to_string());
        }
    }
    tail
}

/// Maps a non-zero exit to a typed error using ffmpeg's final diagnostics.
///
/// Only the extended invocation can be rejected as `InvalidArgument`, since that
/// is what triggers the fallback. Every other failure is a plain `Process` error.
fn classify_failure(
    invocation: Invocation,
    code: i32,
    diagnostics: &VecDeque<String>,
) -> RenderError {
    let rejected = diagnostics.iter().any(|line| line.contains(INVALID_ARGUMENT));
    if invocation == Invocation::Extended && rejected {
        RenderError::InvalidArgument { code }
    } else {
        RenderError::Process { code }
    }
}

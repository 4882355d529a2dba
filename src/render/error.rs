//! Error type for the render pipeline.

use std::io;
use std::path::PathBuf;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The output location could not be created or written to.
    #[error("path error for '{}': {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// ffmpeg could not be launched at all.
    #[error("failed to launch '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// ffmpeg ran and exited with a non-zero status.
    #[error("ffmpeg failed with code {code}")]
    Process { code: i32 },

    /// ffmpeg rejected the arguments it was given.
    #[error("ffmpeg rejected its arguments (Invalid argument), exit code {code}")]
    InvalidArgument { code: i32 },

    /// A rendering parameter did not pass validation.
    #[error("invalid {name}: '{value}'")]
    InvalidParameter { name: &'static str, value: String },

    #[error("failed to read ffmpeg output: {0}")]
    Io(#[from] io::Error),
}

impl RenderError {
    pub fn invalid_parameter(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
        }
    }

    /// Exit code reported by ffmpeg, if the failure came from a finished process.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Process { code } | Self::InvalidArgument { code } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_error_carries_code() {
        let err = RenderError::Process { code: 1 };
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(err.to_string(), "ffmpeg failed with code 1");
    }

    #[test]
    fn test_path_error_names_the_path() {
        let err = RenderError::Path {
            path: PathBuf::from("/nope/out.png"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/out.png"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = RenderError::invalid_parameter("resolution", "abc");
        assert_eq!(err.to_string(), "invalid resolution: 'abc'");
    }
}

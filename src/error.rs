use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a pipeline run.
///
/// Usage errors (`MissingArgument`, `UnusedArguments`) are raised while
/// parsing, before any collaborator is launched.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing argument for operation `{operation}`")]
    MissingArgument { operation: String },

    #[error("Unused arguments: {}", format_leftovers(.leftovers))]
    UnusedArguments { leftovers: Vec<PathBuf> },

    #[error("Workspace error at {}: {source}", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation `{operation}` failed: {message}")]
    CollaboratorFailed { operation: String, message: String },

    #[error("Interrupted by user")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Workspace {
            path: path.into(),
            source,
        }
    }

    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// True for errors caused by a malformed token sequence.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingArgument { .. } | PipelineError::UnusedArguments { .. }
        )
    }
}

fn format_leftovers(leftovers: &[PathBuf]) -> String {
    leftovers
        .iter()
        .map(|path| format!("'{}'", path.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PipelineError>;

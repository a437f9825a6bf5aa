//! Error handling utilities

use crate::error::PipelineError;
use tracing::debug;

pub const TOOL_NAME: &str = "atto-pipe";

/// Render a fatal error the way it is shown to the user.
pub fn format_fatal_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<PipelineError>() {
        Some(pipeline_err) => format!("{TOOL_NAME}: Error: {pipeline_err}"),
        None => format!("{TOOL_NAME}: Error: {error:#}"),
    }
}

/// Exit status for a fatal error.
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<PipelineError>()
        .map(PipelineError::exit_code)
        .unwrap_or(1)
}

/// Handle fatal errors and exit with appropriate status code
///
/// - `verbose = 0`: one line naming the problem
/// - `verbose >= 1`: the full error chain as well
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    debug!("Fatal error: {:?}", error);

    eprintln!("{}", format_fatal_error(&error));

    if let Some(pipeline_err) = error.downcast_ref::<PipelineError>() {
        if pipeline_err.is_usage() {
            eprintln!("Usage: {TOOL_NAME} [OPTIONS] <TOKEN>...");
        }
    }

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code_for(&error))
}

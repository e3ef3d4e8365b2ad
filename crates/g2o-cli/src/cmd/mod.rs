pub mod completions;
pub mod config;
pub mod diff;
pub mod sync;

use g2o_core::error::ErrorCode;

use crate::output::{CliError, OutputMode, render_error};

/// Render a coded error to stderr, then fail the command with `message`.
pub fn fail<T>(output: OutputMode, code: ErrorCode, message: impl Into<String>) -> anyhow::Result<T> {
    let error = CliError::coded(code, message);
    render_error(output, &error)?;
    anyhow::bail!("{}", error.message)
}

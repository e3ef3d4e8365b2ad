//! How commands print: pretty, text or JSON on stdout, errors on stderr.
//!
//! The mode comes from, in order: `--format`, the hidden `--json` flag, the
//! `FORMAT` environment variable, and finally whether stdout is a terminal
//! (pretty) or a pipe (text). Logs are written to stderr, never stdout.

use clap::ValueEnum;
use g2o_core::error::ErrorCode;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

const RULE: &str = "------------------------------------------------------------------------";
const KEY_WIDTH: usize = 24;

/// Heading underlined with a rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}\n{RULE}")
}

/// `key:` padded to a fixed column, then the value.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    let label = format!("{key}:");
    writeln!(w, "{label:<KEY_WIDTH$} {}", value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sections and summaries for people.
    Pretty,
    /// One tab-separated record per line.
    Text,
    Json,
}

impl OutputMode {
    /// Parse a `FORMAT` value; anything unrecognised is `None`.
    fn from_env_value(value: &str) -> Option<Self> {
        Self::from_str(value.trim(), true).ok()
    }
}

fn choose_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    stdout_is_tty: bool,
) -> OutputMode {
    format_flag
        .or_else(|| json_flag.then_some(OutputMode::Json))
        .or_else(|| format_env.and_then(OutputMode::from_env_value))
        .unwrap_or(if stdout_is_tty {
            OutputMode::Pretty
        } else {
            OutputMode::Text
        })
}

/// Resolve the output mode for this process.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let format_env = std::env::var("FORMAT").ok();
    choose_mode(
        format_flag,
        json_flag,
        format_env.as_deref(),
        io::stdout().is_terminal(),
    )
}

/// Print `value` to stdout: serialized in JSON mode, otherwise through the
/// matching writer.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// A failure as shown to the operator.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// `E####`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Print `error` to stderr.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    write_error(&mut io::stderr().lock(), mode, error)
}

fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut *out, &serde_json::json!({ "error": error }))?;
        writeln!(out)?;
        return Ok(());
    }

    match &error.error_code {
        Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
        None => writeln!(out, "error: {}", error.message)?,
    }
    if let Some(suggestion) = &error.suggestion {
        writeln!(out, "  suggestion: {suggestion}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_beats_everything() {
        let mode = choose_mode(Some(OutputMode::Text), true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_flag_beats_env() {
        assert_eq!(choose_mode(None, true, Some("text"), true), OutputMode::Json);
    }

    #[test]
    fn env_value_ignores_case_and_whitespace() {
        assert_eq!(choose_mode(None, false, Some(" JSON "), true), OutputMode::Json);
        assert_eq!(choose_mode(None, false, Some("Text"), true), OutputMode::Text);
    }

    #[test]
    fn unknown_env_falls_back_to_terminal_check() {
        assert_eq!(choose_mode(None, false, Some("yaml"), true), OutputMode::Pretty);
        assert_eq!(choose_mode(None, false, Some("yaml"), false), OutputMode::Text);
        assert_eq!(choose_mode(None, false, None, false), OutputMode::Text);
    }

    #[test]
    fn kv_pads_key_column() {
        let mut buf = Vec::new();
        pretty_kv(&mut buf, "desired", "3").expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), format!("{:<24} 3\n", "desired:"));
    }

    #[test]
    fn coded_error_carries_code_and_hint() {
        let err = CliError::coded(ErrorCode::MissingToken, "profile work has no token");
        assert_eq!(err.error_code.as_deref(), Some("E1004"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn text_error_shows_code() {
        let err = CliError::coded(ErrorCode::ApplyFailed, "add a/b#1 failed");
        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Text, &err).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("error[E5001]: add a/b#1 failed"));
        assert!(text.contains("suggestion:"));
    }

    #[test]
    fn json_error_is_wrapped() {
        let err = CliError::coded(ErrorCode::ConfigNotFound, "missing");
        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Json, &err).expect("write");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(value["error"]["error_code"], "E1001");
    }
}

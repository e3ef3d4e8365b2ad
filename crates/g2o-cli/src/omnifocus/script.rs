use anyhow::{Context as _, Result};
use std::process::{Command, Stdio};
use tracing::trace;

/// Runs a JXA script with one JSON argument and returns its stdout.
pub trait ScriptRunner {
    /// # Errors
    ///
    /// Returns an error if the script cannot be started or exits non-zero.
    fn run(&self, script: &str, arg: &str) -> Result<String>;
}

/// Runs scripts through macOS `osascript -l JavaScript`.
#[derive(Debug, Clone, Default)]
pub struct Osascript;

impl ScriptRunner for Osascript {
    fn run(&self, script: &str, arg: &str) -> Result<String> {
        trace!(arg, "running osascript");
        let output = Command::new("osascript")
            .args(["-l", "JavaScript", "-e", script, arg])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .context("Failed to spawn osascript")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("osascript exited with {}: {}", output.status, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

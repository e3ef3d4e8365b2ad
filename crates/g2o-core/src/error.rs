use std::fmt;

/// Machine-readable error codes surfaced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigNotFound,
    ConfigParseError,
    UnknownProfile,
    MissingToken,
    GitHubRequestFailed,
    ScriptFailed,
    SnapshotReadFailed,
    ApplyFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::UnknownProfile => "E1003",
            Self::MissingToken => "E1004",
            Self::GitHubRequestFailed => "E2001",
            Self::ScriptFailed => "E3001",
            Self::SnapshotReadFailed => "E4001",
            Self::ApplyFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigNotFound => "Config file not found",
            Self::ConfigParseError => "Config file parse error",
            Self::UnknownProfile => "Unknown profile",
            Self::MissingToken => "No GitHub access token",
            Self::GitHubRequestFailed => "GitHub API request failed",
            Self::ScriptFailed => "OmniFocus script failed",
            Self::SnapshotReadFailed => "Snapshot file could not be read",
            Self::ApplyFailed => "Applying a change to OmniFocus failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint for the operator.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound => Some(
                "Create ~/.config/github2omnifocus/config.toml with a [profiles.<name>] table, or pass --config.",
            ),
            Self::ConfigParseError => Some("Fix the TOML syntax in the config file and retry."),
            Self::UnknownProfile => Some("Run `github2omnifocus config show` to list profiles."),
            Self::MissingToken => {
                Some("Set access_token in the profile or export GITHUB_TOKEN.")
            }
            Self::GitHubRequestFailed => {
                Some("Check api_url, network access and that the token is still valid.")
            }
            Self::ScriptFailed => Some(
                "Make sure OmniFocus is running and the terminal may control it (System Settings > Privacy > Automation).",
            ),
            Self::SnapshotReadFailed => Some("Snapshot files must be JSON arrays."),
            Self::ApplyFailed => {
                Some("Nothing is retried; the next run recomputes the changes from scratch.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

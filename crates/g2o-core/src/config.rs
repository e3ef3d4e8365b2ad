use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;
use crate::model::Category;

/// Directory under the platform config dir holding the config file.
pub const CONFIG_DIR_NAME: &str = "github2omnifocus";
/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
/// Environment variable that overrides the config file name.
pub const CONFIG_FILE_ENV: &str = "G2O_CONFIG";
/// Environment variable used when a profile has no `access_token`.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

const REDACTED: &str = "*****";

/// Errors raised while locating or parsing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config directory could be determined for this platform")]
    NoConfigDir,

    #[error("expected config file at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("no profiles defined; add a [profiles.<name>] table")]
    NoProfiles,

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NoConfigDir | Self::NotFound(_) => ErrorCode::ConfigNotFound,
            Self::Read { .. } | Self::Parse { .. } | Self::NoProfiles => ErrorCode::ConfigParseError,
            Self::UnknownProfile(_) => ErrorCode::UnknownProfile,
        }
    }
}

/// Top-level config: one profile per GitHub instance to mirror.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// Everything needed to mirror one GitHub instance into OmniFocus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Tag applied to every task this tool manages, so other tasks are never touched.
    #[serde(default = "default_app_tag")]
    pub app_tag: String,
    #[serde(default = "default_assigned_project")]
    pub assigned_project: String,
    #[serde(default = "default_assigned_tag")]
    pub assigned_tag: String,
    #[serde(default = "default_review_project")]
    pub review_project: String,
    #[serde(default = "default_review_tag")]
    pub review_tag: String,
    #[serde(default = "default_authored_project")]
    pub authored_project: String,
    #[serde(default = "default_authored_tag")]
    pub authored_tag: String,
    #[serde(default = "default_notifications_project")]
    pub notifications_project: String,
    #[serde(default = "default_notification_tag")]
    pub notification_tag: String,
    #[serde(default)]
    pub set_notifications_due_date: bool,
    #[serde(default)]
    pub set_taskmaster_due_date: bool,
    #[serde(default = "default_taskmaster_tag")]
    pub taskmaster_task_tag: String,
    /// Extra local-only tags to ignore when comparing tag sets.
    #[serde(default)]
    pub ignore_tags: Vec<String>,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            access_token: None,
            app_tag: default_app_tag(),
            assigned_project: default_assigned_project(),
            assigned_tag: default_assigned_tag(),
            review_project: default_review_project(),
            review_tag: default_review_tag(),
            authored_project: default_authored_project(),
            authored_tag: default_authored_tag(),
            notifications_project: default_notifications_project(),
            notification_tag: default_notification_tag(),
            set_notifications_due_date: false,
            set_taskmaster_due_date: false,
            taskmaster_task_tag: default_taskmaster_tag(),
            ignore_tags: Vec::new(),
            categories: default_categories(),
        }
    }
}

impl ProfileConfig {
    /// OmniFocus project holding a category's tasks.
    #[must_use]
    pub fn project(&self, category: Category) -> &str {
        match category {
            Category::Assigned => &self.assigned_project,
            Category::Review => &self.review_project,
            Category::Authored => &self.authored_project,
            Category::Notifications => &self.notifications_project,
        }
    }

    /// OmniFocus tag marking a category's tasks.
    #[must_use]
    pub fn category_tag(&self, category: Category) -> &str {
        match category {
            Category::Assigned => &self.assigned_tag,
            Category::Review => &self.review_tag,
            Category::Authored => &self.authored_tag,
            Category::Notifications => &self.notification_tag,
        }
    }

    /// Configured token, falling back to the `GITHUB_TOKEN` environment variable.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        resolve_token(self.access_token.as_deref(), env::var(TOKEN_ENV).ok())
    }

    /// Copy of this profile safe to print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            access_token: self.access_token.as_ref().map(|_| REDACTED.to_string()),
            ..self.clone()
        }
    }
}

impl Config {
    /// Profiles to run: the named one, or all of them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] when `name` is not defined and
    /// [`ConfigError::NoProfiles`] when the config defines none.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<(&str, &ProfileConfig)>, ConfigError> {
        if self.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        match name {
            Some(name) => self
                .profiles
                .get_key_value(name)
                .map(|(key, profile)| vec![(key.as_str(), profile)])
                .ok_or_else(|| ConfigError::UnknownProfile(name.to_string())),
            None => Ok(self
                .profiles
                .iter()
                .map(|(key, profile)| (key.as_str(), profile))
                .collect()),
        }
    }
}

/// Default config location, honouring `G2O_CONFIG` for the file name.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if the platform has no config directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    config_path_in(dirs::config_dir(), env::var(CONFIG_FILE_ENV).ok())
}

fn config_path_in(
    config_dir: Option<PathBuf>,
    file_override: Option<String>,
) -> Result<PathBuf, ConfigError> {
    let dir = config_dir.ok_or(ConfigError::NoConfigDir)?;
    let file = file_override
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    Ok(dir.join(CONFIG_DIR_NAME).join(file))
}

/// Load and parse a config file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or not valid TOML.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Parse config text.
///
/// # Errors
///
/// Returns the TOML error when `content` does not describe a [`Config`].
pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

fn resolve_token(configured: Option<&str>, env_token: Option<String>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| env_token.filter(|token| !token.trim().is_empty()))
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_app_tag() -> String {
    "github".to_string()
}

fn default_assigned_project() -> String {
    "GitHub Issues".to_string()
}

fn default_assigned_tag() -> String {
    "assigned".to_string()
}

fn default_review_project() -> String {
    "GitHub Reviews".to_string()
}

fn default_review_tag() -> String {
    "review".to_string()
}

fn default_authored_project() -> String {
    "GitHub Pull Requests".to_string()
}

fn default_authored_tag() -> String {
    "pending".to_string()
}

fn default_notifications_project() -> String {
    "GitHub Notifications".to_string()
}

fn default_notification_tag() -> String {
    "notification".to_string()
}

fn default_taskmaster_tag() -> String {
    "taskmaster".to_string()
}

fn default_categories() -> Vec<Category> {
    Category::ALL.to_vec()
}

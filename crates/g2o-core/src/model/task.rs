use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reconcile::Keyed;

/// A task that already exists in OmniFocus.
///
/// This is the current-state side of a reconciliation. The local adapter only
/// hands over incomplete tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub completed: bool,
    pub tags: Vec<String>,
}

impl Task {
    /// Key derived from the leading token of the task name.
    ///
    /// Tasks created by this tool are named `"<key> <title>"`. A name without
    /// a space yields the whole name.
    #[must_use]
    pub fn key_from_name(name: &str) -> &str {
        name.split_once(' ').map_or(name, |(key, _)| key)
    }
}

impl Keyed for Task {
    fn key(&self) -> &str {
        Self::key_from_name(&self.name)
    }

    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.key(), self.name)
    }
}

/// A request to create a task in OmniFocus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub project: String,
    pub name: String,
    pub tags: Vec<String>,
    pub note: String,
    pub due: Option<DateTime<Utc>>,
}

/// Selects the tasks owned by one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    pub project: String,
    /// A task must carry every one of these tags to match.
    pub tags: Vec<String>,
}

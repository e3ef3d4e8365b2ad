use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reconcile::Keyed;

/// Prefix applied to the tag derived from an issue's milestone.
pub const MILESTONE_TAG_PREFIX: &str = "milestone: ";

/// A normalized issue, pull request or notification from GitHub.
///
/// This is the desired-state side of a reconciliation: one snapshot per run,
/// never mutated after the source adapter builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Item {
    /// Stable identity shared with the matching local task (`owner/repo#123`).
    pub key: String,
    pub title: String,
    pub html_url: String,
    pub api_url: String,
    /// Notification thread id; empty for issues and pull requests.
    pub id: String,
    /// Repository full name (`owner/repo`).
    pub repo: String,
    pub labels: Vec<String>,
    pub milestone: Option<String>,
}

impl Item {
    /// Tag derived from the milestone, if the item has one.
    #[must_use]
    pub fn milestone_tag(&self) -> Option<String> {
        self.milestone
            .as_deref()
            .filter(|title| !title.is_empty())
            .map(|title| format!("{MILESTONE_TAG_PREFIX}{title}"))
    }

    /// Local task name: the key, a space, then the title.
    #[must_use]
    pub fn task_name(&self) -> String {
        format!("{} {}", self.key, self.title)
    }
}

impl Keyed for Item {
    fn key(&self) -> &str {
        &self.key
    }

    /// Labels, the repository name (when known) and the milestone tag.
    fn tags(&self) -> Vec<String> {
        let mut tags = self.labels.clone();
        if !self.repo.is_empty() {
            tags.push(self.repo.clone());
        }
        tags.extend(self.milestone_tag());
        tags
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {:?} ({})",
            self.key,
            self.title,
            self.tags(),
            self.html_url
        )
    }
}

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The four independent reconciliation namespaces.
///
/// A pull request that is both authored and awaiting review lives in two
/// categories and becomes two separate local tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Issues assigned to the authenticated user.
    Assigned,
    /// Open pull requests with a review requested from the user.
    Review,
    /// Open pull requests authored by the user.
    Authored,
    /// Unread notification threads.
    Notifications,
}

impl Category {
    /// Every category, in processing order.
    pub const ALL: [Self; 4] = [
        Self::Assigned,
        Self::Review,
        Self::Authored,
        Self::Notifications,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Review => "review",
            Self::Authored => "authored",
            Self::Notifications => "notifications",
        }
    }

    /// Human-facing label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assigned => "Assigned issues",
            Self::Review => "Review requests",
            Self::Authored => "Authored PRs",
            Self::Notifications => "Notifications",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a category name from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid category: '{got}' (expected assigned, review, authored or notifications)")]
pub struct ParseCategoryError {
    pub got: String,
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assigned" | "issues" => Ok(Self::Assigned),
            "review" | "reviews" => Ok(Self::Review),
            "authored" | "pending" => Ok(Self::Authored),
            "notifications" | "notification" => Ok(Self::Notifications),
            _ => Err(ParseCategoryError { got: s.to_string() }),
        }
    }
}

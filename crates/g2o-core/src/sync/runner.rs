use chrono::{DateTime, TimeZone};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::ports::{LocalStore, RemoteSource};
use crate::compose::{compose_task, ignore_tags, task_query};
use crate::config::ProfileConfig;
use crate::error::ErrorCode;
use crate::model::Category;
use crate::reconcile::{CategoryPlan, Operation, OperationKind, TaskOperation};

/// A sync run stopped at the first failure.
///
/// Nothing already applied is rolled back; the next run recomputes the
/// delta from both systems.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("fetching {category} items from GitHub failed")]
    Fetch {
        category: Category,
        #[source]
        source: anyhow::Error,
    },

    #[error("listing {category} tasks in OmniFocus failed")]
    Tasks {
        category: Category,
        #[source]
        source: anyhow::Error,
    },

    #[error("{kind} {key} ({category}) failed")]
    Apply {
        category: Category,
        kind: OperationKind,
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SyncError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Fetch { .. } => ErrorCode::GitHubRequestFailed,
            Self::Tasks { .. } => ErrorCode::ScriptFailed,
            Self::Apply { .. } => ErrorCode::ApplyFailed,
        }
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Fetch { category, .. }
            | Self::Tasks { category, .. }
            | Self::Apply { category, .. } => *category,
        }
    }
}

/// One add or remove, as planned or as applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub op: OperationKind,
    pub key: String,
    /// Task name, as created or as it was before completion.
    pub name: String,
}

impl From<&TaskOperation> for Change {
    fn from(operation: &TaskOperation) -> Self {
        let name = match operation {
            Operation::Add(item) => item.task_name(),
            Operation::Remove(task) => task.name.clone(),
        };
        Self {
            op: operation.kind(),
            key: operation.key().to_string(),
            name,
        }
    }
}

/// Outcome for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    pub desired: usize,
    pub current: usize,
    pub changes: Vec<Change>,
}

impl CategoryReport {
    #[must_use]
    pub fn count(&self, op: OperationKind) -> usize {
        self.changes.iter().filter(|change| change.op == op).count()
    }
}

/// Result of a sync run over one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// When true, `changes` were planned but not applied.
    pub dry_run: bool,
    pub categories: Vec<CategoryReport>,
}

impl SyncReport {
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.categories.iter().map(|report| report.changes.len()).sum()
    }
}

/// Drives fetch, reconcile and apply for one profile.
///
/// Categories are processed independently and in the order given. The first
/// failing fetch or apply aborts the run.
pub struct Synchronizer<'p, R, L> {
    profile: &'p ProfileConfig,
    remote: R,
    local: L,
    dry_run: bool,
}

impl<'p, R: RemoteSource, L: LocalStore> Synchronizer<'p, R, L> {
    pub const fn new(profile: &'p ProfileConfig, remote: R, local: L) -> Self {
        Self {
            profile,
            remote,
            local,
            dry_run: false,
        }
    }

    /// Plan without touching the local store.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub const fn local(&self) -> &L {
        &self.local
    }

    /// Fetch both sides of one category and reconcile them.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Fetch`] or [`SyncError::Tasks`] when a side
    /// cannot be read.
    pub fn plan(&self, category: Category) -> Result<CategoryPlan, SyncError> {
        let items = self
            .remote
            .fetch(category)
            .map_err(|source| SyncError::Fetch { category, source })?;
        let tasks = self
            .local
            .tasks(&task_query(category, self.profile))
            .map_err(|source| SyncError::Tasks { category, source })?;

        debug!(
            category = category.as_str(),
            desired = items.len(),
            current = tasks.len(),
            "fetched snapshots"
        );

        let ignore = ignore_tags(category, self.profile);
        Ok(CategoryPlan::build(category, items, tasks, &ignore))
    }

    /// Apply a plan's operations in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Apply`] naming the operation that failed.
    pub fn apply<Tz: TimeZone>(
        &mut self,
        plan: &CategoryPlan,
        now: &DateTime<Tz>,
    ) -> Result<Vec<Change>, SyncError> {
        let category = plan.category;
        let mut applied = Vec::with_capacity(plan.operations.len());

        for operation in &plan.operations {
            let change = Change::from(operation);
            info!(
                category = category.as_str(),
                op = change.op.as_str(),
                key = %change.key,
                dry_run = self.dry_run,
                "{}",
                change.name
            );

            if !self.dry_run {
                let result = match operation {
                    Operation::Add(item) => {
                        let task = compose_task(category, item, self.profile, now);
                        self.local.create(&task).map(|_| ())
                    }
                    Operation::Remove(task) => self.local.complete(task),
                };
                result.map_err(|source| SyncError::Apply {
                    category,
                    kind: change.op,
                    key: change.key.clone(),
                    source,
                })?;
            }

            applied.push(change);
        }

        Ok(applied)
    }

    /// Plan and apply every category in `categories`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyncError`] encountered.
    pub fn run<Tz: TimeZone>(
        &mut self,
        categories: &[Category],
        now: &DateTime<Tz>,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport {
            dry_run: self.dry_run,
            categories: Vec::with_capacity(categories.len()),
        };

        for &category in categories {
            let plan = self.plan(category)?;
            let changes = self.apply(&plan, now)?;
            info!(
                category = category.as_str(),
                added = plan.adds(),
                removed = plan.removes(),
                "category done"
            );
            report.categories.push(CategoryReport {
                category,
                desired: plan.desired,
                current: plan.current,
                changes,
            });
        }

        Ok(report)
    }
}

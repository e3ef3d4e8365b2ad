//! Per-category reconciliation plans.

use serde::Serialize;

use super::delta::{Operation, delta};
use super::keyed::keyed;
use super::tags::IgnoreTags;
use crate::model::{Category, Item, Task};

/// An operation on the concrete GitHub/OmniFocus snapshots.
pub type TaskOperation = Operation<Item, Task>;

/// The delta for one category, plus the sizes of the snapshots it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPlan {
    pub category: Category,
    /// Number of remote items fetched (before de-duplication by key).
    pub desired: usize,
    /// Number of local tasks fetched (before de-duplication by key).
    pub current: usize,
    pub operations: Vec<TaskOperation>,
}

impl CategoryPlan {
    /// Reconcile one category's snapshots.
    #[must_use]
    pub fn build(category: Category, items: Vec<Item>, tasks: Vec<Task>, ignore: &IgnoreTags) -> Self {
        let desired = items.len();
        let current = tasks.len();
        let operations = delta(keyed(items), keyed(tasks), ignore);
        Self {
            category,
            desired,
            current,
            operations,
        }
    }

    #[must_use]
    pub fn adds(&self) -> usize {
        self.operations.iter().filter(|op| op.is_add()).count()
    }

    #[must_use]
    pub fn removes(&self) -> usize {
        self.operations.iter().filter(|op| op.is_remove()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Plans for every category processed in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub categories: Vec<CategoryPlan>,
}

impl SyncPlan {
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.categories.iter().map(|plan| plan.operations.len()).sum()
    }

    #[must_use]
    pub fn get(&self, category: Category) -> Option<&CategoryPlan> {
        self.categories.iter().find(|plan| plan.category == category)
    }
}

//! Delta computation between a desired and a current keyed collection.
//!
//! # Semantics
//!
//! The returned operations, applied to `current`, make it hold the same keys
//! as `desired` with equivalent tag sets:
//!
//! - key only in `desired` → [`Operation::Add`]
//! - key only in `current` → [`Operation::Remove`]
//! - key in both, tag sets differ → [`Operation::Remove`] then
//!   [`Operation::Add`]. There is no in-place tag update, so a tag change is
//!   a full refresh and loses anything attached only to the local task.
//! - key in both, tag sets equal → nothing
//!
//! The function is pure and total. Keys are visited in sorted order, so the
//! output order is stable for a given input, but the operations are a set:
//! callers must not rely on ordering across keys.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::keyed::{Keyed, KeyedMap};
use super::tags::{IgnoreTags, equivalent};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Discriminant of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Remove,
}

impl OperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step towards the desired state.
///
/// `Add` carries the desired element so the executor can read its title and
/// URL; `Remove` carries the current element so the executor knows which
/// local task to complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "item", rename_all = "lowercase")]
pub enum Operation<D, C> {
    Add(D),
    Remove(C),
}

impl<D: Keyed, C: Keyed> Operation<D, C> {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Add(desired) => desired.key(),
            Self::Remove(current) => current.key(),
        }
    }

    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        match self {
            Self::Add(desired) => desired.tags(),
            Self::Remove(current) => current.tags(),
        }
    }
}

impl<D, C> Operation<D, C> {
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Add(_) => OperationKind::Add,
            Self::Remove(_) => OperationKind::Remove,
        }
    }

    #[must_use]
    pub const fn is_add(&self) -> bool {
        matches!(self, Self::Add(_))
    }

    #[must_use]
    pub const fn is_remove(&self) -> bool {
        matches!(self, Self::Remove(_))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the operations that bring `current` in line with `desired`.
///
/// `ignore` lists local bookkeeping tags that are stripped from the current
/// side before comparing tags.
///
/// # Examples
///
/// ```
/// use g2o_core::model::{Item, Task};
/// use g2o_core::reconcile::{IgnoreTags, delta, keyed};
///
/// let desired = keyed(vec![Item {
///     key: "a/b#1".to_string(),
///     repo: "a/b".to_string(),
///     ..Item::default()
/// }]);
/// let current = keyed(Vec::<Task>::new());
///
/// let ops = delta(desired, current, &IgnoreTags::new());
/// assert_eq!(ops.len(), 1);
/// assert!(ops[0].is_add());
/// ```
#[must_use]
pub fn delta<D, C>(
    desired: KeyedMap<D>,
    mut current: KeyedMap<C>,
    ignore: &IgnoreTags,
) -> Vec<Operation<D, C>>
where
    D: Keyed,
    C: Keyed,
{
    let mut ops = Vec::with_capacity(desired.len() + current.len());

    for (key, wanted) in desired {
        match current.remove(&key) {
            None => ops.push(Operation::Add(wanted)),
            Some(existing) => {
                if !equivalent(&wanted, &existing, ignore) {
                    ops.push(Operation::Remove(existing));
                    ops.push(Operation::Add(wanted));
                }
            }
        }
    }

    // Whatever is left in `current` has no desired counterpart.
    ops.extend(current.into_values().map(Operation::Remove));

    ops
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Reconciliation engine.
//!
//! Given the desired state (GitHub items) and the current state (OmniFocus
//! tasks) for one category, compute the add/remove operations that make the
//! current state mirror the desired one. Everything here is pure: no I/O, no
//! logging, no state kept between calls.

pub mod delta;
pub mod keyed;
pub mod plan;
pub mod tags;

pub use delta::{Operation, OperationKind, delta};
pub use keyed::{Keyed, KeyedMap, keyed};
pub use plan::{CategoryPlan, SyncPlan, TaskOperation};
pub use tags::{IgnoreTags, TagSet, current_tags, desired_tags, equivalent};

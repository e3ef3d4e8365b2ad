//! Sync orchestration over adapter ports.
//!
//! The engine in [`crate::reconcile`] is pure. This module is the executor
//! around it: it reads both sides through [`RemoteSource`] and
//! [`LocalStore`], plans each category, and applies the resulting adds
//! (task creation) and removes (task completion).

pub mod ports;
pub mod runner;

pub use ports::{LocalStore, RemoteSource};
pub use runner::{CategoryReport, Change, SyncError, SyncReport, Synchronizer};

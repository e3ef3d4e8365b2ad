//! g2o-core: reconcile GitHub work items into OmniFocus tasks.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per module, each mapping to an
//!   [`error::ErrorCode`]; `anyhow::Result` at adapter seams.
//! - **Logging**: `tracing` macros in [`sync`] only. The reconcile engine
//!   never logs.

pub mod compose;
pub mod config;
pub mod deadline;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod sync;

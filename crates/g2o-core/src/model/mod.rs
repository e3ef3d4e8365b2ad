//! Normalized snapshots exchanged between the adapters and the engine.

pub mod category;
pub mod item;
pub mod task;

pub use category::{Category, ParseCategoryError};
pub use item::Item;
pub use task::{NewTask, Task, TaskQuery};

//! Adapter seams between the engine and the outside world.

use anyhow::Result;

use crate::model::{Category, Item, NewTask, Task, TaskQuery};

/// Where desired state comes from (GitHub).
pub trait RemoteSource {
    /// Fetch every open item of one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cannot be reached or answers with
    /// something undecodable.
    fn fetch(&self, category: Category) -> Result<Vec<Item>>;
}

/// Where current state lives (OmniFocus).
pub trait LocalStore {
    /// Incomplete tasks in the query's project carrying all of its tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn tasks(&self, query: &TaskQuery) -> Result<Vec<Task>>;

    /// Create one task and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the task could not be created.
    fn create(&mut self, task: &NewTask) -> Result<Task>;

    /// Mark one task complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the task could not be completed.
    fn complete(&mut self, task: &Task) -> Result<()>;
}

impl<T: RemoteSource + ?Sized> RemoteSource for &T {
    fn fetch(&self, category: Category) -> Result<Vec<Item>> {
        (**self).fetch(category)
    }
}

impl<T: LocalStore + ?Sized> LocalStore for &mut T {
    fn tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        (**self).tasks(query)
    }

    fn create(&mut self, task: &NewTask) -> Result<Task> {
        (**self).create(task)
    }

    fn complete(&mut self, task: &Task) -> Result<()> {
        (**self).complete(task)
    }
}

//! OmniFocus adapter: the current state, read and written through JXA.

mod script;

pub use script::{Osascript, ScriptRunner};

use anyhow::{Context as _, Result};
use g2o_core::model::{NewTask, Task, TaskQuery};
use g2o_core::sync::LocalStore;
use serde::{Deserialize, Serialize};

const TASKS_SCRIPT: &str = include_str!("jxa/tasks.js");
const CREATE_SCRIPT: &str = include_str!("jxa/create.js");
const COMPLETE_SCRIPT: &str = include_str!("jxa/complete.js");

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryArg<'a> {
    project_name: &'a str,
    tags: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateArg<'a> {
    project_name: &'a str,
    name: &'a str,
    tags: &'a [String],
    note: &'a str,
    #[serde(rename = "dueDateMS", skip_serializing_if = "Option::is_none")]
    due_date_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
struct CompleteArg<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct Completed {
    completed: bool,
}

/// [`LocalStore`] backed by the OmniFocus scripting bridge.
pub struct Gateway<R = Osascript> {
    runner: R,
}

impl Gateway {
    pub const fn osascript() -> Self {
        Self { runner: Osascript }
    }
}

impl<R: ScriptRunner> Gateway<R> {
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    fn call<A: Serialize>(&self, script: &str, arg: &A) -> Result<String> {
        let arg = serde_json::to_string(arg).context("failed to encode script argument")?;
        self.runner.run(script, &arg)
    }
}

impl<R: ScriptRunner> LocalStore for Gateway<R> {
    fn tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let raw = self.call(
            TASKS_SCRIPT,
            &QueryArg {
                project_name: &query.project,
                tags: &query.tags,
            },
        )?;
        let tasks: Vec<Task> = serde_json::from_str(&raw)
            .with_context(|| format!("unexpected task list from OmniFocus: {raw}"))?;
        Ok(tasks.into_iter().filter(|task| !task.completed).collect())
    }

    fn create(&mut self, task: &NewTask) -> Result<Task> {
        let raw = self.call(
            CREATE_SCRIPT,
            &CreateArg {
                project_name: &task.project,
                name: &task.name,
                tags: &task.tags,
                note: &task.note,
                due_date_ms: task.due.map(|due| due.timestamp_millis()),
            },
        )?;
        serde_json::from_str(&raw)
            .with_context(|| format!("unexpected created task from OmniFocus: {raw}"))
    }

    fn complete(&mut self, task: &Task) -> Result<()> {
        let raw = self.call(COMPLETE_SCRIPT, &CompleteArg { id: &task.id })?;
        let reply: Completed = serde_json::from_str(&raw)
            .with_context(|| format!("unexpected completion reply from OmniFocus: {raw}"))?;
        if !reply.completed {
            anyhow::bail!("OmniFocus did not complete task {}", task.id);
        }
        Ok(())
    }
}

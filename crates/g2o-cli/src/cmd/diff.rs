//! `github2omnifocus diff`: reconcile two JSON snapshots offline.
//!
//! Neither GitHub nor OmniFocus is contacted. The desired file is a JSON
//! array of items, the current file a JSON array of tasks.

use anyhow::{Context as _, Result};
use clap::Args;
use g2o_core::error::ErrorCode;
use g2o_core::model::{Item, Task};
use g2o_core::reconcile::{IgnoreTags, OperationKind, TaskOperation, delta, keyed};
use g2o_core::sync::Change;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::fail;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// JSON array of items (the desired state).
    #[arg(long, value_name = "FILE")]
    pub desired: PathBuf,

    /// JSON array of tasks (the current state).
    #[arg(long, value_name = "FILE")]
    pub current: PathBuf,

    /// Local-only tag to leave out of comparisons. Repeatable.
    #[arg(long = "ignore-tag", value_name = "TAG")]
    pub ignore_tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DiffReport {
    pub desired: usize,
    pub current: usize,
    pub operations: Vec<TaskOperation>,
}

impl DiffReport {
    fn changes(&self) -> impl Iterator<Item = Change> + '_ {
        self.operations.iter().map(Change::from)
    }
}

pub fn run_diff(args: &DiffArgs, output: OutputMode) -> Result<()> {
    let items: Vec<Item> = match read_snapshot(&args.desired) {
        Ok(items) => items,
        Err(err) => return fail(output, ErrorCode::SnapshotReadFailed, format!("{err:#}")),
    };
    let tasks: Vec<Task> = match read_snapshot(&args.current) {
        Ok(tasks) => tasks,
        Err(err) => return fail(output, ErrorCode::SnapshotReadFailed, format!("{err:#}")),
    };

    let ignore: IgnoreTags = args.ignore_tags.iter().collect();
    let report = DiffReport {
        desired: items.len(),
        current: tasks.len(),
        operations: delta(keyed(items), keyed(tasks), &ignore),
    };

    render_mode(output, &report, write_text, write_pretty)
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_text(report: &DiffReport, w: &mut dyn Write) -> std::io::Result<()> {
    for change in report.changes() {
        writeln!(w, "{}\t{}\t{}", change.op, change.key, change.name)?;
    }
    Ok(())
}

fn write_pretty(report: &DiffReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Reconciliation")?;
    pretty_kv(w, "desired", report.desired.to_string())?;
    pretty_kv(w, "current", report.current.to_string())?;
    if report.operations.is_empty() {
        writeln!(w, "\nIn sync. Nothing to do.")?;
        return Ok(());
    }
    writeln!(w)?;
    for change in report.changes() {
        let marker = match change.op {
            OperationKind::Add => '+',
            OperationKind::Remove => '-',
        };
        writeln!(w, "{marker} {}", change.name)?;
    }
    Ok(())
}

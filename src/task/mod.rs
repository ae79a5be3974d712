//! Deferred build work bound to lifecycle events

pub mod actions;
pub mod queue;

pub use queue::{TaskContext, TaskQueue, TaskReport};

use crate::lifecycle::Event;
use serde::Serialize;
use std::path::PathBuf;

/// Inputs captured when a task is enqueued
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskData {
    /// Append content hashes to these files in the asset manifest
    Version { files: Vec<PathBuf> },
    /// Copy files; a single source may be copied to a file path
    Copy { from: Vec<PathBuf>, to: PathBuf },
    /// Mirror a whole directory tree
    CopyDirectory { from: PathBuf, to: PathBuf },
    /// Concatenate sources, in order, into one output
    Combine {
        sources: Vec<PathBuf>,
        output: PathBuf,
        babel: bool,
    },
    /// Write a `.min` sibling for each file
    Minify { files: Vec<PathBuf> },
}

impl TaskData {
    pub fn kind(&self) -> &'static str {
        match self {
            TaskData::Version { .. } => "version",
            TaskData::Copy { .. } => "copy",
            TaskData::CopyDirectory { .. } => "copy_directory",
            TaskData::Combine { .. } => "combine",
            TaskData::Minify { .. } => "minify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Executed,
}

/// A queued unit of work
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: usize,
    pub data: TaskData,
    #[serde(serialize_with = "serialize_event")]
    pub event: Event,
    /// A failing critical task aborts the remaining tasks of its firing
    pub critical: bool,
    /// Completed executions; watch-mode rebuilds run a task repeatedly
    pub runs: u32,
}

impl Task {
    pub fn name(&self) -> String {
        format!("{}#{}", self.data.kind(), self.id)
    }

    pub fn status(&self) -> TaskStatus {
        if self.runs == 0 {
            TaskStatus::Pending
        } else {
            TaskStatus::Executed
        }
    }
}

fn serialize_event<S: serde::Serializer>(event: &Event, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(event.name())
}

// Ordered task queue
use super::{Task, TaskData, actions};
use crate::config::Config;
use crate::error::Result;
use crate::lifecycle::Event;
use std::path::Path;
use tracing::{debug, warn};

/// What a task sees when it runs
pub struct TaskContext<'a> {
    pub root: &'a Path,
    pub config: &'a Config,
}

/// Outcome of running the tasks bound to one event firing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub executed: usize,
    pub failed: usize,
}

/// Tasks in enqueue order
#[derive(Debug, Default, Clone)]
pub struct TaskQueue {
    tasks: Vec<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a non-critical task bound to the `build` event
    pub fn push(&mut self, data: TaskData) -> &Task {
        self.push_with(data, Event::Build, false)
    }

    pub fn push_with(&mut self, data: TaskData, event: Event, critical: bool) -> &Task {
        let id = self.tasks.len();
        debug!("Enqueuing task {}#{} on '{}'", data.kind(), id, event);
        self.tasks.push(Task {
            id,
            data,
            event,
            critical,
            runs: 0,
        });
        &self.tasks[id]
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every queued task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Run every task bound to `event`, in enqueue order
    ///
    /// Events match by name, the same way listeners are looked up.
    ///
    /// Failures are logged and counted; a failing critical task stops the run
    /// and its error is returned.
    pub fn run(&mut self, event: &Event, ctx: &TaskContext<'_>) -> Result<TaskReport> {
        let mut report = TaskReport::default();

        for task in self.tasks.iter_mut().filter(|task| task.event.name() == event.name()) {
            debug!("Running task '{}'", task.name());
            let outcome = actions::execute(&task.data, ctx);
            task.runs += 1;

            match outcome {
                Ok(()) => report.executed += 1,
                Err(e) if task.critical => return Err(e),
                Err(e) => {
                    warn!("Task '{}' failed: {}", task.name(), e);
                    report.executed += 1;
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

//! A finalized build: read-only configuration, assembled graph, lifecycle

use crate::compiler::{CompileReport, Compiler};
use crate::config::Config;
use crate::error::Result;
use crate::graph::{Assembly, BuildGraph};
use crate::lifecycle::{Dispatcher, Event, EventContext};
use crate::task::{TaskContext, TaskQueue, TaskReport};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of finalizing the builder
pub enum Finalized {
    Ready(Session),
    /// Dependencies were freshly installed; re-run the process before building
    RestartRequired { installed: Vec<String> },
}

/// Owns everything needed to compile and fire lifecycle events
///
/// The configuration is only reachable by shared reference from here on, so
/// capabilities, tasks and listeners cannot change it during compilation.
pub struct Session {
    root: PathBuf,
    config: Config,
    graph: BuildGraph,
    hooks: Dispatcher,
    tasks: TaskQueue,
    listeners: Dispatcher,
    initialized: bool,
    builds: u32,
}

impl Session {
    pub(crate) fn new(
        root: PathBuf,
        config: Config,
        assembly: Assembly,
        tasks: TaskQueue,
        listeners: Dispatcher,
    ) -> Self {
        let mut hooks = Dispatcher::new();
        for (capability, hook) in assembly.hooks {
            hooks.subscribe(&hook.event, capability, hook.listener);
        }

        Self {
            root,
            config,
            graph: assembly.graph,
            hooks,
            tasks,
            listeners,
            initialized: false,
            builds: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn graph(&self) -> &BuildGraph {
        &self.graph
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// Completed compilations so far
    pub fn builds(&self) -> u32 {
        self.builds
    }

    /// Fire an event: capability hooks, then bound tasks in queue order, then
    /// caller listeners in subscription order
    pub fn fire(&mut self, event: &Event, report: Option<&CompileReport>) -> Result<TaskReport> {
        let Session {
            ref root,
            ref config,
            ref graph,
            ref hooks,
            ref mut tasks,
            ref listeners,
            ..
        } = *self;

        let ctx = EventContext {
            event,
            root,
            config,
            graph: Some(graph),
            report,
        };

        hooks.fire(&ctx);
        let task_report = tasks.run(event, &TaskContext { root, config })?;
        listeners.fire(&ctx);

        debug!(
            "Event '{}': {} tasks executed, {} failed",
            event, task_report.executed, task_report.failed
        );
        Ok(task_report)
    }

    /// Compile once, firing `init` before the first compilation and `build`
    /// after every successful one
    pub async fn run(&mut self, compiler: &dyn Compiler) -> Result<CompileReport> {
        if !self.initialized {
            self.fire(&Event::Init, None)?;
            self.initialized = true;
        }

        info!("Compiling with {}", compiler.name());
        let report = compiler.compile(&self.graph).await?;
        self.builds += 1;

        self.fire(&Event::Build, Some(&report))?;
        Ok(report)
    }
}

//! The external compiler seam

use crate::config::constants::GRAPH_FILE;
use crate::error::{MixError, Result};
use crate::graph::BuildGraph;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

/// What a successful compilation produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileReport {
    /// Emitted files relative to the public path
    pub assets: Vec<String>,
    pub duration_ms: u128,
}

/// Compiler engine consuming an assembled graph
#[async_trait]
pub trait Compiler: Send + Sync {
    fn name(&self) -> String;

    /// Compile once; failures surface as [`MixError::Compilation`]
    async fn compile(&self, graph: &BuildGraph) -> Result<CompileReport>;
}

/// Writes the graph to disk and runs an external bundler command on it
///
/// The graph file path is appended as the command's last argument.
pub struct CommandCompiler {
    root: PathBuf,
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    pub fn new(root: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from a shell-style command line such as `webpack --config`
    pub fn from_command_line(root: impl Into<PathBuf>, command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| MixError::validation("compiler command is empty"))?;
        Ok(Self {
            root: root.into(),
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl Compiler for CommandCompiler {
    fn name(&self) -> String {
        self.program.clone()
    }

    async fn compile(&self, graph: &BuildGraph) -> Result<CompileReport> {
        let started = Instant::now();
        let graph_path = self.root.join(GRAPH_FILE);
        if let Some(parent) = graph_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&graph_path, serde_json::to_string_pretty(&graph.to_json())?).await?;
        debug!("Build graph written to {:?}", graph_path);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&graph_path)
            .current_dir(&self.root)
            .status()
            .await
            .map_err(|e| MixError::compilation(format!("cannot run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(MixError::compilation(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        let report = CompileReport {
            assets: graph.assets.clone(),
            duration_ms: started.elapsed().as_millis(),
        };
        info!(
            "Compiled {} assets in {}ms",
            report.assets.len(),
            report.duration_ms
        );
        Ok(report)
    }
}

/// Reports the declared assets without invoking anything
pub struct DryRunCompiler;

#[async_trait]
impl Compiler for DryRunCompiler {
    fn name(&self) -> String {
        "dry-run".to_string()
    }

    async fn compile(&self, graph: &BuildGraph) -> Result<CompileReport> {
        info!(
            "Dry run: {} capabilities, {} plugins, {} assets",
            graph.capabilities.len(),
            graph.plugins.len(),
            graph.assets.len()
        );
        Ok(CompileReport {
            assets: graph.assets.clone(),
            duration_ms: 0,
        })
    }
}

use super::Installer;
use crate::error::{MixError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Installer backed by a node package manager
pub struct NpmInstaller {
    root: PathBuf,
    program: String,
}

impl NpmInstaller {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            program: "npm".to_string(),
        }
    }

    /// Use a different package manager binary (e.g. `yarn`-compatible wrappers)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl Installer for NpmInstaller {
    async fn is_present(&self, package: &str) -> Result<bool> {
        let manifest = self
            .root
            .join("node_modules")
            .join(package)
            .join("package.json");
        let present = tokio::fs::try_exists(&manifest).await?;
        debug!("Package '{}' present: {}", package, present);
        Ok(present)
    }

    async fn install(&self, packages: &[String]) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("install")
            .args(packages)
            .arg("--save-dev")
            .current_dir(&self.root)
            .status()
            .await
            .map_err(|e| MixError::resolution(format!("cannot run {}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(MixError::resolution(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}

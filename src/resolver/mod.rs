//! Dependency resolution for active capabilities

mod npm;

pub use npm::NpmInstaller;

use crate::capability::{Capability, CapabilityRegistry};
use crate::config::Config;
use crate::error::{MixError, Result};
use async_trait::async_trait;
use indexmap::IndexSet;
use tracing::{debug, info};

/// External presence check and installer for capability dependencies
#[async_trait]
pub trait Installer: Send + Sync {
    /// Whether a package is already available
    async fn is_present(&self, package: &str) -> Result<bool>;

    /// Install every given package in one invocation
    async fn install(&self, packages: &[String]) -> Result<()>;
}

/// Outcome of resolving dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Everything required was already present
    Satisfied,
    /// Packages were installed; the process must restart before assembling
    Installed(Vec<String>),
}

impl Resolution {
    pub fn requires_restart(&self) -> bool {
        matches!(self, Resolution::Installed(_))
    }
}

/// Deduplicated dependencies of the given capabilities, first-seen order
pub fn collect_dependencies<'a, I>(capabilities: I, config: &Config) -> Vec<String>
where
    I: IntoIterator<Item = &'a dyn Capability>,
{
    let mut seen = IndexSet::new();
    for capability in capabilities {
        for dependency in capability.dependencies(config) {
            seen.insert(dependency);
        }
    }
    seen.into_iter().collect()
}

/// Ensure the dependencies of every active capability are present
///
/// Inactive capabilities contribute nothing. Missing packages are installed
/// with a single installer call; a failed install is fatal.
pub async fn resolve(
    registry: &CapabilityRegistry,
    config: &Config,
    installer: &dyn Installer,
) -> Result<Resolution> {
    let required = collect_dependencies(registry.active(config), config);
    debug!("Required dependencies: {:?}", required);

    let mut missing = Vec::new();
    for package in required {
        if !installer.is_present(&package).await? {
            missing.push(package);
        }
    }

    if missing.is_empty() {
        debug!("All dependencies present");
        return Ok(Resolution::Satisfied);
    }

    info!("Installing missing dependencies: {}", missing.join(", "));
    installer
        .install(&missing)
        .await
        .map_err(|e| match e {
            MixError::Resolution(_) => e,
            other => MixError::resolution(format!("{}: {}", missing.join(", "), other)),
        })?;

    Ok(Resolution::Installed(missing))
}

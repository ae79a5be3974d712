//! Capabilities: independently activatable units of build behavior

pub mod components;
pub mod register;
pub mod registry;

pub use register::register_components;
pub use registry::CapabilityRegistry;

use crate::config::Config;
use crate::error::Result;
use crate::lifecycle::{Event, EventContext, Listener};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// A compiler plugin instance contributed to the build graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginInstance {
    pub name: String,
    pub options: Value,
}

impl PluginInstance {
    pub fn new(name: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// A lifecycle callback bound by a capability
#[derive(Clone)]
pub struct Hook {
    pub event: Event,
    pub listener: Listener,
}

/// What one active capability adds to the build graph
#[derive(Clone, Default)]
pub struct Contribution {
    /// Object merged into the graph settings
    pub fragment: Option<Value>,
    pub plugins: Vec<PluginInstance>,
    pub hooks: Vec<Hook>,
    /// Output files, relative to the public path
    pub assets: Vec<String>,
}

impl Contribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fragment(mut self, fragment: Value) -> Self {
        self.fragment = Some(fragment);
        self
    }

    pub fn with_plugin(mut self, plugin: PluginInstance) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_hook<F>(mut self, event: Event, callback: F) -> Self
    where
        F: Fn(&EventContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.push(Hook {
            event,
            listener: Arc::new(callback),
        });
        self
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.assets.push(asset.into());
        self
    }
}

/// Read-only view handed to a capability while the graph is assembled
pub struct AssemblyContext<'a> {
    pub root: &'a Path,
    pub config: &'a Config,
}

/// Capability interface
///
/// Implementations only ever receive the configuration by shared reference
/// and must not keep it beyond the call.
pub trait Capability: Send + Sync {
    fn name(&self) -> &str;

    /// Activation predicate; capabilities without one are always active
    fn is_active(&self, _config: &Config) -> bool {
        true
    }

    /// Package identifiers required while active
    fn dependencies(&self, _config: &Config) -> Vec<String> {
        Vec::new()
    }

    fn contribute(&self, ctx: &AssemblyContext<'_>) -> Result<Contribution>;
}

//! The assembled build graph handed to the compiler

pub mod assembler;
pub mod merge;

pub use assembler::{Assembly, assemble};

use crate::capability::PluginInstance;
use crate::graph::merge::deep_merge;
use serde::Serialize;
use serde_json::{Value, json};

/// Immutable compiler configuration produced by assembly
#[derive(Debug, Clone, Serialize)]
pub struct BuildGraph {
    /// Merged settings, excluding plugin instances
    pub settings: Value,
    /// Plugin instances in contribution order
    pub plugins: Vec<PluginInstance>,
    /// Names of the capabilities that contributed, in order
    pub capabilities: Vec<String>,
    /// Declared outputs relative to the public path
    pub assets: Vec<String>,
}

impl BuildGraph {
    /// Single configuration object with plugins folded in
    ///
    /// Plugins supplied through raw overrides follow the contributed ones.
    pub fn to_json(&self) -> Value {
        let mut out = json!({ "plugins": self.plugins });
        deep_merge(&mut out, &self.settings);
        out
    }

    pub fn setting(&self, pointer: &str) -> Option<&Value> {
        self.settings.pointer(pointer)
    }
}

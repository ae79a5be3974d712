// Folds the configuration record and capability contributions into one graph
use super::BuildGraph;
use super::merge::deep_merge;
use crate::capability::{AssemblyContext, CapabilityRegistry, Hook};
use crate::config::Config;
use crate::error::Result;
use crate::util::file::{resolve, to_slash};
use serde_json::{Value, json};
use std::path::Path;
use tracing::debug;

/// Result of assembly: the graph plus lifecycle hooks bound by capabilities
pub struct Assembly {
    pub graph: BuildGraph,
    /// `(capability name, hook)` in contribution order
    pub hooks: Vec<(String, Hook)>,
}

/// Static settings derived directly from the configuration record
fn base_settings(root: &Path, config: &Config) -> Value {
    let devtool = match &config.sourcemaps {
        Some(devtool) => Value::String(devtool.clone()),
        None => Value::Bool(false),
    };
    let public_url = if config.hmr { "http://localhost:8080/" } else { "/" };

    json!({
        "context": to_slash(root),
        "entry": {},
        "output": {
            "path": to_slash(&resolve(root, &config.public_path)),
            "filename": "[name].js",
            "chunkFilename": "[name].js",
            "publicPath": public_url
        },
        "module": { "rules": [] },
        "resolve": { "extensions": ["*", ".js", ".json", ".vue"] },
        "devtool": devtool,
        "performance": { "hints": false },
        "stats": { "hash": false, "version": false, "timings": false, "children": false }
    })
}

/// Assemble the build graph
///
/// Active capabilities contribute in registration order. Scalar collisions
/// are won by the later capability, lists are concatenated, and plugin
/// instances are appended as given. The caller's raw bundler overrides are
/// merged last.
pub fn assemble(root: &Path, config: &Config, registry: &CapabilityRegistry) -> Result<Assembly> {
    let ctx = AssemblyContext { root, config };
    let mut settings = base_settings(root, config);
    let mut plugins = Vec::new();
    let mut hooks = Vec::new();
    let mut capabilities = Vec::new();
    let mut assets = Vec::new();

    for capability in registry.active(config) {
        let name = capability.name().to_string();
        let contribution = capability.contribute(&ctx)?;

        debug!(
            "Capability '{}' contributes {} plugins, {} hooks",
            name,
            contribution.plugins.len(),
            contribution.hooks.len()
        );

        if let Some(fragment) = &contribution.fragment {
            deep_merge(&mut settings, fragment);
        }
        plugins.extend(contribution.plugins);
        hooks.extend(contribution.hooks.into_iter().map(|hook| (name.clone(), hook)));
        assets.extend(contribution.assets);
        capabilities.push(name);
    }

    deep_merge(&mut settings, &config.bundler_config);

    Ok(Assembly {
        graph: BuildGraph {
            settings,
            plugins,
            capabilities,
            assets,
        },
        hooks,
    })
}

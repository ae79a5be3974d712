// Unused selector removal
use crate::capability::{AssemblyContext, Capability, Contribution, PluginInstance};
use crate::config::Config;
use crate::error::Result;
use crate::util::file::{resolve, to_slash};
use crate::util::glob::{expand_glob, is_glob};
use serde_json::{Value, json};
use std::path::Path;
use tracing::debug;

/// Strips selectors not referenced by the configured templates
///
/// Glob paths are expanded here, at assembly time, so the plugin sees the
/// files that exist when the build runs.
pub struct PurifyCss;

impl Capability for PurifyCss {
    fn name(&self) -> &str {
        "purify-css"
    }

    fn is_active(&self, config: &Config) -> bool {
        config.purify_css.is_some()
    }

    fn dependencies(&self, _config: &Config) -> Vec<String> {
        vec!["purifycss-webpack".to_string(), "purify-css".to_string()]
    }

    fn contribute(&self, ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        let Some(options) = &ctx.config.purify_css else {
            return Ok(Contribution::new());
        };

        let mut paths = Vec::new();
        for path in &options.paths {
            if is_glob(path) {
                let matches = expand_glob(ctx.root, path)?;
                debug!("Purify pattern '{}' matched {} files", path, matches.len());
                paths.extend(matches.iter().map(|p| absolute(ctx.root, p)));
            } else {
                paths.push(absolute(ctx.root, Path::new(path)));
            }
        }

        let mut plugin_options = json!({
            "paths": paths,
            "minimize": ctx.config.production
        });
        if let Value::Object(map) = &mut plugin_options {
            for (key, value) in &options.extra {
                map.insert(key.clone(), value.clone());
            }
        }

        Ok(Contribution::new().with_plugin(PluginInstance::new("PurifyCSSPlugin", plugin_options)))
    }
}

fn absolute(root: &Path, path: &Path) -> Value {
    Value::String(to_slash(&resolve(root, path)))
}

// Output naming and size reduction
use crate::capability::{AssemblyContext, Capability, Contribution, PluginInstance};
use crate::config::Config;
use crate::error::Result;
use serde_json::json;

/// Cache-busting chunk names
pub struct Versioning;

impl Capability for Versioning {
    fn name(&self) -> &str {
        "versioning"
    }

    fn is_active(&self, config: &Config) -> bool {
        config.versioning
    }

    fn contribute(&self, _ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        Ok(Contribution::new().with_fragment(json!({
            "output": { "chunkFilename": "[name].js?id=[chunkhash]" }
        })))
    }
}

/// Minifies emitted bundles for production builds
pub struct Minification;

impl Capability for Minification {
    fn name(&self) -> &str {
        "minification"
    }

    fn is_active(&self, config: &Config) -> bool {
        config.production
    }

    fn contribute(&self, ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        Ok(Contribution::new()
            .with_fragment(json!({ "performance": { "hints": "warning" } }))
            .with_plugin(PluginInstance::new(
                "UglifyJsPlugin",
                json!({
                    "sourceMap": ctx.config.sourcemaps.is_some(),
                    "compress": { "warnings": false }
                }),
            )))
    }
}

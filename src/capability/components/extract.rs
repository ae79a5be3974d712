// Vendor code splitting
use crate::capability::{AssemblyContext, Capability, Contribution, PluginInstance};
use crate::config::Config;
use crate::error::Result;
use crate::util::file::{relative_to, to_slash};
use serde_json::{Map, Value, json};

/// Moves declared vendor libraries into their own chunk plus a runtime manifest chunk
pub struct Extract;

impl Capability for Extract {
    fn name(&self) -> &str {
        "extract"
    }

    fn is_active(&self, config: &Config) -> bool {
        !config.extract.is_empty()
    }

    fn contribute(&self, ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        let config = ctx.config;
        let mut entry = Map::new();
        let mut names = Vec::new();
        let mut contribution = Contribution::new();

        for chunk in &config.extract {
            let name = match &chunk.output {
                Some(output) => {
                    let relative = relative_to(&output.path, &config.public_path);
                    to_slash(&relative.with_extension(""))
                }
                None => "js/vendor".to_string(),
            };

            let libs: Vec<Value> = chunk.libs.iter().cloned().map(Value::String).collect();
            entry.insert(name.clone(), Value::Array(libs));
            contribution = contribution.with_asset(format!("{name}.js"));
            names.push(Value::String(name));
        }

        // The runtime chunk sits next to the first vendor chunk
        let runtime = names
            .first()
            .and_then(Value::as_str)
            .and_then(|first| first.rsplit_once('/'))
            .map(|(dir, _)| format!("{dir}/manifest"))
            .unwrap_or_else(|| "manifest".to_string());
        contribution = contribution.with_asset(format!("{runtime}.js"));
        names.push(Value::String(runtime));

        Ok(contribution
            .with_fragment(json!({ "entry": entry }))
            .with_plugin(PluginInstance::new(
                "CommonsChunkPlugin",
                json!({ "names": names, "minChunks": "Infinity" }),
            )))
    }
}

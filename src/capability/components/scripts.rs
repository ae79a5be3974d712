// Script bundles and their language flavors
use super::bundle_name;
use crate::capability::{AssemblyContext, Capability, Contribution};
use crate::config::Config;
use crate::error::Result;
use crate::util::file::to_slash;
use serde_json::{Map, Value, json};
use tracing::debug;

/// Compiles every declared script bundle through babel
pub struct JavaScript;

impl Capability for JavaScript {
    fn name(&self) -> &str {
        "javascript"
    }

    fn is_active(&self, config: &Config) -> bool {
        !config.js.is_empty()
    }

    fn contribute(&self, ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        let config = ctx.config;
        let mut entry = Map::new();
        let mut contribution = Contribution::new();

        for pair in &config.js {
            let name = bundle_name(&config.public_path, pair);
            let files: Vec<Value> = pair
                .entry
                .iter()
                .map(|file| Value::String(to_slash(&file.absolute)))
                .collect();

            debug!("Script bundle '{}' from {} entries", name, files.len());

            // Repeated outputs share one bundle
            match entry.get_mut(&name) {
                Some(Value::Array(existing)) => existing.extend(files),
                _ => {
                    entry.insert(name.clone(), Value::Array(files));
                    contribution = contribution.with_asset(format!("{name}.js"));
                }
            }
        }

        Ok(contribution.with_fragment(json!({
            "entry": entry,
            "module": {
                "rules": [{
                    "test": "\\.jsx?$",
                    "exclude": "(node_modules|bower_components)",
                    "loader": "babel-loader",
                    "options": config.babel()
                }]
            }
        })))
    }
}

/// JSX through the react babel preset
pub struct React;

impl Capability for React {
    fn name(&self) -> &str {
        "react"
    }

    fn is_active(&self, config: &Config) -> bool {
        config.react
    }

    fn dependencies(&self, _config: &Config) -> Vec<String> {
        vec!["babel-preset-react".to_string()]
    }

    fn contribute(&self, _ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        Ok(Contribution::new().with_fragment(json!({
            "resolve": { "extensions": [".jsx"] }
        })))
    }
}

/// JSX through the preact babel preset
pub struct Preact;

impl Capability for Preact {
    fn name(&self) -> &str {
        "preact"
    }

    fn is_active(&self, config: &Config) -> bool {
        config.preact
    }

    fn dependencies(&self, _config: &Config) -> Vec<String> {
        vec!["babel-preset-preact".to_string()]
    }

    fn contribute(&self, _ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        Ok(Contribution::new().with_fragment(json!({
            "resolve": { "extensions": [".jsx"] }
        })))
    }
}

pub struct TypeScript;

impl Capability for TypeScript {
    fn name(&self) -> &str {
        "typescript"
    }

    fn is_active(&self, config: &Config) -> bool {
        config.typescript
    }

    fn dependencies(&self, _config: &Config) -> Vec<String> {
        vec!["ts-loader".to_string(), "typescript".to_string()]
    }

    fn contribute(&self, _ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        Ok(Contribution::new().with_fragment(json!({
            "module": {
                "rules": [{
                    "test": "\\.tsx?$",
                    "loader": "ts-loader",
                    "exclude": "node_modules"
                }]
            },
            "resolve": { "extensions": [".ts", ".tsx"] }
        })))
    }
}

// Live reloading through a proxy server
use crate::capability::{AssemblyContext, Capability, Contribution, PluginInstance};
use crate::config::Config;
use crate::error::Result;
use serde_json::{Value, json};

pub struct BrowserSync;

impl Capability for BrowserSync {
    fn name(&self) -> &str {
        "browser-sync"
    }

    fn is_active(&self, config: &Config) -> bool {
        config.browser_sync.is_some()
    }

    fn dependencies(&self, _config: &Config) -> Vec<String> {
        vec![
            "browser-sync".to_string(),
            "browser-sync-webpack-plugin".to_string(),
        ]
    }

    fn contribute(&self, ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        let mut options = json!({
            "host": "localhost",
            "port": 3000,
            "proxy": "app.dev",
            "files": [
                "app/**/*.php",
                "resources/views/**/*.php",
                "public/js/**/*.js",
                "public/css/**/*.css"
            ]
        });

        // Caller options replace defaults key by key
        if let (Value::Object(defaults), Some(Value::Object(user))) =
            (&mut options, &ctx.config.browser_sync)
        {
            for (key, value) in user {
                defaults.insert(key.clone(), value.clone());
            }
        }

        Ok(Contribution::new().with_plugin(PluginInstance::new(
            "BrowserSyncPlugin",
            json!({ "options": options, "pluginOptions": { "reload": false } }),
        )))
    }
}

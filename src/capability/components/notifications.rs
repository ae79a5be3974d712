// Desktop notification on build completion
use crate::capability::{AssemblyContext, Capability, Contribution, PluginInstance};
use crate::config::Config;
use crate::error::Result;
use serde_json::json;

pub struct Notifications;

impl Capability for Notifications {
    fn name(&self) -> &str {
        "notifications"
    }

    fn is_active(&self, config: &Config) -> bool {
        config.notifications
    }

    fn dependencies(&self, _config: &Config) -> Vec<String> {
        vec!["webpack-notifier".to_string()]
    }

    fn contribute(&self, _ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        Ok(Contribution::new().with_plugin(PluginInstance::new(
            "WebpackNotifierPlugin",
            json!({ "title": "mixr", "alwaysNotify": true }),
        )))
    }
}

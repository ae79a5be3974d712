// Asset manifest written after each compilation
use crate::capability::{AssemblyContext, Capability, Contribution};
use crate::config::constants::MANIFEST_FILE;
use crate::error::Result;
use crate::lifecycle::Event;
use crate::manifest::AssetManifest;
use crate::util::file::resolve;
use tracing::debug;

/// Records every emitted asset in the public path manifest
pub struct Manifest;

impl Capability for Manifest {
    fn name(&self) -> &str {
        "manifest"
    }

    fn contribute(&self, _ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        Ok(Contribution::new().with_hook(Event::Build, |ctx| {
            let Some(report) = ctx.report else {
                return Ok(());
            };

            let path = resolve(ctx.root, &ctx.config.public_path).join(MANIFEST_FILE);
            let mut manifest = AssetManifest::new(path);
            for asset in &report.assets {
                let key = format!("/{}", asset.trim_start_matches('/'));
                manifest.insert(key.clone(), key);
            }

            debug!("Writing manifest with {} assets", manifest.len());
            manifest.save()
        }))
    }
}

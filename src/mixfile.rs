//! Declarative build description loaded from `mix.json`

use crate::builder::{Mix, Sources};
use crate::error::{MixError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// A single path or a list of paths
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Sources {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(path) => Sources::from(path),
            OneOrMany::Many(paths) => Sources::from(paths),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BundleSpec {
    pub entry: OneOrMany,
    pub output: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractSpec {
    pub libs: Vec<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CombineSpec {
    pub sources: OneOrMany,
    pub output: String,
    #[serde(default)]
    pub babel: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CopySpec {
    pub from: OneOrMany,
    pub to: String,
    /// Mirror the whole tree instead of top-level files
    #[serde(default)]
    pub directory: bool,
}

/// Source maps: `true`, `false`, or a devtool name
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceMapSpec {
    Enabled(bool),
    Devtool(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MixFile {
    pub public_path: Option<String>,
    pub resource_root: Option<String>,
    pub source_maps: Option<SourceMapSpec>,
    /// Keep source maps in production builds
    pub production_source_maps: Option<bool>,
    pub notifications: Option<bool>,
    pub options: Option<Value>,
    pub bundler_config: Option<Value>,
    pub babel_config: Option<Value>,
    pub browser_sync: Option<Value>,

    #[serde(default)]
    pub js: Vec<BundleSpec>,
    #[serde(default)]
    pub react: Vec<BundleSpec>,
    #[serde(default)]
    pub preact: Vec<BundleSpec>,
    #[serde(default)]
    pub ts: Vec<BundleSpec>,
    #[serde(default)]
    pub sass: Vec<BundleSpec>,
    #[serde(default)]
    pub less: Vec<BundleSpec>,
    #[serde(default)]
    pub stylus: Vec<BundleSpec>,
    #[serde(default)]
    pub extract: Vec<ExtractSpec>,

    #[serde(default)]
    pub combine: Vec<CombineSpec>,
    #[serde(default)]
    pub minify: Vec<OneOrMany>,
    #[serde(default)]
    pub copy: Vec<CopySpec>,
    pub version: Option<OneOrMany>,
}

impl MixFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MixError::validation(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Replay the description on a builder
    ///
    /// Order: paths and options, then bundles, then tasks.
    pub fn apply(self, mix: &mut Mix) -> Result<()> {
        if let Some(path) = &self.public_path {
            mix.set_public_path(path);
        }
        if let Some(root) = self.resource_root {
            mix.set_resource_root(root);
        }
        if self.notifications == Some(false) {
            mix.disable_notifications();
        }
        match self.source_maps {
            Some(SourceMapSpec::Enabled(true)) => {
                mix.source_maps(self.production_source_maps.unwrap_or(true), None);
            }
            Some(SourceMapSpec::Devtool(devtool)) => {
                mix.source_maps(self.production_source_maps.unwrap_or(true), Some(&devtool));
            }
            Some(SourceMapSpec::Enabled(false)) | None => {}
        }
        if let Some(options) = self.options {
            mix.options(options)?;
        }
        if let Some(config) = self.bundler_config {
            mix.bundler_config(config)?;
        }
        if let Some(config) = self.babel_config {
            mix.babel_config(config)?;
        }
        match self.browser_sync {
            Some(Value::String(proxy)) => {
                mix.browser_sync(proxy);
            }
            Some(options) => {
                mix.browser_sync_with(options)?;
            }
            None => {}
        }

        for bundle in self.js {
            mix.js(bundle.entry, bundle.output)?;
        }
        for bundle in self.react {
            mix.react(bundle.entry, bundle.output)?;
        }
        for bundle in self.preact {
            mix.preact(bundle.entry, bundle.output)?;
        }
        for bundle in self.ts {
            mix.ts(bundle.entry, bundle.output)?;
        }
        for bundle in self.sass {
            mix.sass(single_entry(bundle.entry, "sass")?, bundle.output)?;
        }
        for bundle in self.less {
            mix.less(single_entry(bundle.entry, "less")?, bundle.output)?;
        }
        for bundle in self.stylus {
            mix.stylus(single_entry(bundle.entry, "stylus")?, bundle.output)?;
        }
        for chunk in self.extract {
            mix.extract(chunk.libs, chunk.output.as_deref())?;
        }

        for combine in self.combine {
            if combine.babel {
                mix.babel(combine.sources, combine.output)?;
            } else {
                mix.combine(combine.sources, combine.output)?;
            }
        }
        for files in self.minify {
            mix.minify(files)?;
        }
        for copy in self.copy {
            if copy.directory {
                mix.copy_directory(single_entry(copy.from, "copy")?, copy.to)?;
            } else {
                mix.copy(copy.from, copy.to)?;
            }
        }
        if let Some(files) = self.version {
            mix.version(files)?;
        }

        debug!("Mix file applied: {} tasks queued", mix.tasks().len());
        Ok(())
    }
}

fn single_entry(value: OneOrMany, method: &str) -> Result<String> {
    match value {
        OneOrMany::One(path) => Ok(path),
        OneOrMany::Many(mut paths) if paths.len() == 1 => Ok(paths.remove(0)),
        OneOrMany::Many(_) => Err(MixError::validation(format!(
            "{method} accepts a single source path"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskData;
    use std::path::PathBuf;

    #[test]
    fn test_parse_and_apply() {
        let file = MixFile::parse(
            r#"{
                "publicPath": "dist/",
                "notifications": false,
                "sourceMaps": true,
                "js": [
                    { "entry": "resources/assets/js/app.js", "output": "dist/js" },
                    { "entry": ["one.js", "two.js"], "output": "dist/js" }
                ],
                "sass": [{ "entry": "resources/assets/sass/app.scss", "output": "dist/css" }],
                "options": { "foo": "bar" },
                "version": ["dist/js/app.js"]
            }"#,
        )
        .unwrap();

        let mut mix = Mix::new("/project");
        file.apply(&mut mix).unwrap();

        let config = mix.config();
        assert_eq!(config.public_path, PathBuf::from("dist"));
        assert!(!config.notifications);
        assert_eq!(config.sourcemaps.as_deref(), Some("eval-source-map"));
        assert_eq!(config.js.len(), 2);
        assert_eq!(config.js[1].entry.len(), 2);
        assert_eq!(config.sass.len(), 1);
        assert_eq!(config.option("foo"), Some(&Value::String("bar".to_string())));
        assert_eq!(
            mix.tasks().get(0).map(|t| &t.data),
            Some(&TaskData::Version {
                files: vec![PathBuf::from("dist/js/app.js")]
            })
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(MixFile::parse(r#"{ "scripts": [] }"#).is_err());
    }

    #[test]
    fn test_multiple_sass_sources_rejected() {
        let file = MixFile::parse(
            r#"{ "sass": [{ "entry": ["a.scss", "b.scss"], "output": "public/css" }] }"#,
        )
        .unwrap();
        let mut mix = Mix::new("/project");
        assert!(matches!(file.apply(&mut mix), Err(MixError::Validation(_))));
    }
}

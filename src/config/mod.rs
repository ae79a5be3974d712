//! The configuration record shared by the builder, resolver and assembler

pub mod constants;

use crate::graph::merge::deep_merge;
use crate::util::file::FileRef;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::path::PathBuf;

/// One declared bundle: ordered entry files emitted to one output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutput {
    pub entry: Vec<FileRef>,
    pub output: FileRef,
}

/// Vendor libraries split into their own chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractChunk {
    pub libs: Vec<String>,
    pub output: Option<FileRef>,
}

/// Options for the unused-selector purifier
///
/// `paths` may hold globs; they are expanded when the build graph is
/// assembled so the list reflects the filesystem at build time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurifyCssOptions {
    pub paths: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PurifyCssOptions {
    fn default() -> Self {
        Self {
            paths: constants::DEFAULT_PURIFY_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            extra: Map::new(),
        }
    }
}

/// All build options for one build process
///
/// Mutated through [`crate::builder::Mix`] during configuration. Once the
/// builder is finalized the record is moved into the session and only
/// shared by reference, so nothing can change it during compilation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub production: bool,
    pub hmr: bool,
    pub public_path: PathBuf,
    pub resource_root: String,

    pub js: Vec<EntryOutput>,
    pub sass: Vec<EntryOutput>,
    pub less: Vec<EntryOutput>,
    pub stylus: Vec<EntryOutput>,
    pub extract: Vec<ExtractChunk>,

    pub react: bool,
    pub preact: bool,
    pub typescript: bool,

    pub purify_css: Option<PurifyCssOptions>,
    pub browser_sync: Option<Value>,
    pub versioning: bool,
    /// Devtool name, `None` when source maps are disabled
    pub sourcemaps: Option<String>,
    pub notifications: bool,
    pub process_css_urls: bool,
    pub extract_vue_styles: bool,
    pub clear_console: bool,

    /// Raw overrides merged last into the build graph
    pub bundler_config: Value,
    pub babel_config: Value,
    /// Arbitrary keys set through `options()`
    pub extras: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            production: false,
            hmr: false,
            public_path: PathBuf::from("public"),
            resource_root: "/".to_string(),
            js: Vec::new(),
            sass: Vec::new(),
            less: Vec::new(),
            stylus: Vec::new(),
            extract: Vec::new(),
            react: false,
            preact: false,
            typescript: false,
            purify_css: None,
            browser_sync: None,
            versioning: false,
            sourcemaps: None,
            notifications: true,
            process_css_urls: true,
            extract_vue_styles: false,
            clear_console: true,
            bundler_config: Value::Object(Map::new()),
            babel_config: Value::Object(Map::new()),
            extras: Map::new(),
        }
    }
}

impl Config {
    /// Defaults, with the production flag taken from `NODE_ENV`
    pub fn from_env() -> Self {
        let production = std::env::var(constants::NODE_ENV)
            .map(|env| env == "production")
            .unwrap_or(false);
        Self {
            production,
            ..Self::default()
        }
    }

    /// Look up an arbitrary option set through `options()`
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Babel options: defaults merged with the caller's overrides
    pub fn babel(&self) -> Value {
        let mut presets = vec![json!([
            "env",
            {
                "modules": false,
                "targets": { "browsers": ["> 2%"] },
                "uglify": true
            }
        ])];
        if self.react {
            presets.push(json!("react"));
        }
        if self.preact {
            presets.push(json!("preact"));
        }

        let mut babel = json!({
            "cacheDirectory": true,
            "presets": presets,
            "plugins": ["transform-object-rest-spread"]
        });
        deep_merge(&mut babel, &self.babel_config);
        babel
    }

    /// Every declared style bundle across preprocessors
    pub fn style_bundles(&self) -> impl Iterator<Item = &EntryOutput> {
        self.sass.iter().chain(&self.less).chain(&self.stylus)
    }

    /// Whether any script or style bundle has been declared
    pub fn has_bundles(&self) -> bool {
        !self.js.is_empty() || self.style_bundles().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.public_path, PathBuf::from("public"));
        assert!(config.notifications);
        assert!(config.sourcemaps.is_none());
        assert!(!config.has_bundles());
    }

    #[test]
    fn test_babel_merges_plugins() {
        let mut config = Config::default();
        config.babel_config = json!({ "plugins": ["some-babel-plugin"] });

        let plugins = config.babel()["plugins"].as_array().unwrap().clone();
        assert_eq!(
            plugins,
            vec![json!("transform-object-rest-spread"), json!("some-babel-plugin")]
        );
    }

    #[test]
    fn test_babel_react_preset() {
        let config = Config {
            react: true,
            ..Config::default()
        };
        let presets = config.babel()["presets"].as_array().unwrap().clone();
        assert!(presets.contains(&json!("react")));
    }
}

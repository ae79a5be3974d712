// Stylesheet preprocessors
use super::bundle_name;
use crate::capability::{AssemblyContext, Capability, Contribution, PluginInstance};
use crate::config::{Config, EntryOutput};
use crate::error::Result;
use crate::util::file::to_slash;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleLang {
    Sass,
    Less,
    Stylus,
}

impl StyleLang {
    pub fn name(&self) -> &'static str {
        match self {
            StyleLang::Sass => "sass",
            StyleLang::Less => "less",
            StyleLang::Stylus => "stylus",
        }
    }

    fn test(&self) -> &'static str {
        match self {
            StyleLang::Sass => "\\.s[ac]ss$",
            StyleLang::Less => "\\.less$",
            StyleLang::Stylus => "\\.styl$",
        }
    }

    fn loader(&self) -> &'static str {
        match self {
            StyleLang::Sass => "sass-loader",
            StyleLang::Less => "less-loader",
            StyleLang::Stylus => "stylus-loader",
        }
    }

    fn bundles<'a>(&self, config: &'a Config) -> &'a [EntryOutput] {
        match self {
            StyleLang::Sass => &config.sass,
            StyleLang::Less => &config.less,
            StyleLang::Stylus => &config.stylus,
        }
    }
}

/// Compiles declared stylesheets of one language and extracts them to files
pub struct Preprocessor {
    lang: StyleLang,
}

impl Preprocessor {
    pub fn new(lang: StyleLang) -> Self {
        Self { lang }
    }
}

impl Capability for Preprocessor {
    fn name(&self) -> &str {
        self.lang.name()
    }

    fn is_active(&self, config: &Config) -> bool {
        !self.lang.bundles(config).is_empty()
    }

    fn dependencies(&self, _config: &Config) -> Vec<String> {
        match self.lang {
            // Bundled with the toolchain
            StyleLang::Sass => Vec::new(),
            StyleLang::Less => vec!["less-loader".to_string(), "less".to_string()],
            StyleLang::Stylus => vec!["stylus".to_string(), "stylus-loader".to_string()],
        }
    }

    fn contribute(&self, ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        let config = ctx.config;
        let mut entry = Map::new();
        let mut contribution = Contribution::new();

        for pair in self.lang.bundles(config) {
            let name = bundle_name(&config.public_path, pair);
            let files: Vec<Value> = pair
                .entry
                .iter()
                .map(|file| Value::String(to_slash(&file.absolute)))
                .collect();

            // Repeated outputs share one bundle and one extracted stylesheet
            match entry.get_mut(&name) {
                Some(Value::Array(existing)) => existing.extend(files),
                _ => {
                    entry.insert(name.clone(), Value::Array(files));
                    let filename = format!("{name}.css");
                    contribution = contribution
                        .with_plugin(PluginInstance::new(
                            "ExtractTextPlugin",
                            json!({ "filename": filename }),
                        ))
                        .with_asset(filename);
                }
            }
        }

        Ok(contribution.with_fragment(json!({
            "entry": entry,
            "module": {
                "rules": [{
                    "test": self.lang.test(),
                    "use": [
                        {
                            "loader": "css-loader",
                            "options": {
                                "url": config.process_css_urls,
                                "sourceMap": config.sourcemaps.is_some()
                            }
                        },
                        {
                            "loader": "resolve-url-loader",
                            "options": { "root": config.resource_root }
                        },
                        {
                            "loader": self.lang.loader(),
                            "options": { "sourceMap": true }
                        }
                    ]
                }]
            }
        })))
    }
}

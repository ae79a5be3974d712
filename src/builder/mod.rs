//! The fluent configuration API

mod sources;

pub use sources::Sources;

use crate::capability::CapabilityRegistry;
use crate::config::constants::{DEV_SOURCEMAP, PROD_SOURCEMAP};
use crate::config::{Config, EntryOutput, ExtractChunk, PurifyCssOptions};
use crate::error::{MixError, Result};
use crate::graph::assemble;
use crate::lifecycle::{Dispatcher, Event, EventContext};
use crate::resolver::{Installer, Resolution, resolve};
use crate::session::{Finalized, Session};
use crate::task::{TaskData, TaskQueue};
use crate::util::file::{FileRef, expand_paths, normalize_path};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fluent builder describing the desired build
///
/// Every method either overwrites an option, appends a bundle, or enqueues a
/// task, and hands the builder back for chaining. Methods that validate their
/// arguments return `Result<&mut Self>`.
#[derive(Debug)]
pub struct Mix {
    root: PathBuf,
    config: Config,
    tasks: TaskQueue,
    listeners: Dispatcher,
}

impl Mix {
    /// Builder with default options for a project rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, Config::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            tasks: TaskQueue::new(),
            listeners: Dispatcher::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn in_production(&self) -> bool {
        self.config.production
    }

    /// Toggle production mode
    pub fn production(&mut self, production: bool) -> &mut Self {
        self.config.production = production;
        self
    }

    fn file(&self, path: impl AsRef<Path>) -> FileRef {
        FileRef::new(&self.root, path)
    }

    fn entry_output(&self, method: &str, entry: Sources, output: &str) -> Result<EntryOutput> {
        if entry.is_empty() {
            return Err(MixError::validation(format!(
                "{method}() requires at least one entry path"
            )));
        }
        if entry.paths().iter().any(|p| p.trim().is_empty()) {
            return Err(MixError::validation(format!(
                "{method}() received an empty entry path"
            )));
        }
        if output.trim().is_empty() {
            return Err(MixError::validation(format!(
                "{method}() requires an output path"
            )));
        }

        Ok(EntryOutput {
            entry: entry.paths().iter().map(|p| self.file(p)).collect(),
            output: self.file(output),
        })
    }

    /// Declare a script bundle
    pub fn js(&mut self, entry: impl Into<Sources>, output: impl AsRef<str>) -> Result<&mut Self> {
        let pair = self.entry_output("js", entry.into(), output.as_ref())?;
        debug!("Adding script bundle -> {}", pair.output.display());
        self.config.js.push(pair);
        Ok(self)
    }

    /// Script bundle compiled with the react preset
    pub fn react(&mut self, entry: impl Into<Sources>, output: impl AsRef<str>) -> Result<&mut Self> {
        self.js(entry, output)?;
        self.config.react = true;
        Ok(self)
    }

    /// Script bundle compiled with the preact preset
    pub fn preact(&mut self, entry: impl Into<Sources>, output: impl AsRef<str>) -> Result<&mut Self> {
        self.js(entry, output)?;
        self.config.preact = true;
        Ok(self)
    }

    /// Script bundle with TypeScript sources
    pub fn ts(&mut self, entry: impl Into<Sources>, output: impl AsRef<str>) -> Result<&mut Self> {
        self.js(entry, output)?;
        self.config.typescript = true;
        Ok(self)
    }

    /// Alias of [`Mix::ts`]
    pub fn typescript(&mut self, entry: impl Into<Sources>, output: impl AsRef<str>) -> Result<&mut Self> {
        self.ts(entry, output)
    }

    pub fn sass(&mut self, src: impl AsRef<str>, output: impl AsRef<str>) -> Result<&mut Self> {
        let pair = self.entry_output("sass", Sources::from(src.as_ref()), output.as_ref())?;
        self.config.sass.push(pair);
        Ok(self)
    }

    pub fn less(&mut self, src: impl AsRef<str>, output: impl AsRef<str>) -> Result<&mut Self> {
        let pair = self.entry_output("less", Sources::from(src.as_ref()), output.as_ref())?;
        self.config.less.push(pair);
        Ok(self)
    }

    pub fn stylus(&mut self, src: impl AsRef<str>, output: impl AsRef<str>) -> Result<&mut Self> {
        let pair = self.entry_output("stylus", Sources::from(src.as_ref()), output.as_ref())?;
        self.config.stylus.push(pair);
        Ok(self)
    }

    /// Split vendor libraries into their own chunk
    pub fn extract(&mut self, libs: impl Into<Sources>, output: Option<&str>) -> Result<&mut Self> {
        let libs = libs.into();
        if libs.is_empty() {
            return Err(MixError::validation("extract() requires at least one library"));
        }

        let output = output.map(|o| self.file(o));
        self.config.extract.push(ExtractChunk {
            libs: libs.paths().to_vec(),
            output,
        });
        Ok(self)
    }

    fn push_combine(&mut self, sources: Sources, output: &str, babel: bool) -> Result<&mut Self> {
        if output.trim().is_empty() {
            return Err(MixError::validation("combine() requires an output path"));
        }

        let sources = expand_paths(&self.root, sources.paths())?;
        self.tasks.push(TaskData::Combine {
            sources,
            output: normalize_path(output),
            babel,
        });
        Ok(self)
    }

    /// Concatenate files, in order, into one output
    pub fn combine(&mut self, src: impl Into<Sources>, output: impl AsRef<str>) -> Result<&mut Self> {
        self.push_combine(src.into(), output.as_ref(), false)
    }

    /// Alias of [`Mix::combine`]
    pub fn scripts(&mut self, src: impl Into<Sources>, output: impl AsRef<str>) -> Result<&mut Self> {
        self.combine(src, output)
    }

    /// Combine, flagging the output for babel compilation
    pub fn babel(&mut self, src: impl Into<Sources>, output: impl AsRef<str>) -> Result<&mut Self> {
        self.push_combine(src.into(), output.as_ref(), true)
    }

    /// Write minified copies of the given files after each build
    pub fn minify(&mut self, src: impl Into<Sources>) -> Result<&mut Self> {
        let src = src.into();
        if src.is_empty() {
            return Err(MixError::validation("minify() requires at least one file"));
        }

        let files = expand_paths(&self.root, src.paths())?;
        self.tasks.push(TaskData::Minify { files });
        Ok(self)
    }

    /// Copy files; directories and globs are expanded now, not at build time
    pub fn copy(&mut self, from: impl Into<Sources>, to: impl AsRef<str>) -> Result<&mut Self> {
        let from = from.into();
        let to = to.as_ref();
        if from.is_empty() || to.trim().is_empty() {
            return Err(MixError::validation("copy() requires a source and a destination"));
        }

        let files = expand_paths(&self.root, from.paths())?;
        self.tasks.push(TaskData::Copy {
            from: files,
            to: normalize_path(to),
        });
        Ok(self)
    }

    /// Mirror a directory tree
    pub fn copy_directory(&mut self, from: impl AsRef<str>, to: impl AsRef<str>) -> Result<&mut Self> {
        let (from, to) = (from.as_ref(), to.as_ref());
        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(MixError::validation(
                "copy_directory() requires a source and a destination",
            ));
        }

        self.tasks.push(TaskData::CopyDirectory {
            from: normalize_path(from),
            to: normalize_path(to),
        });
        Ok(self)
    }

    /// Version files; a directory is replaced by its top-level files now
    pub fn version(&mut self, files: impl Into<Sources>) -> Result<&mut Self> {
        let files = expand_paths(&self.root, files.into().paths())?;
        self.config.versioning = true;
        self.tasks.push(TaskData::Version { files });
        Ok(self)
    }

    /// Proxy a local site through browser-sync
    pub fn browser_sync(&mut self, proxy: impl Into<String>) -> &mut Self {
        let mut options = Map::new();
        options.insert("proxy".to_string(), Value::String(proxy.into()));
        self.config.browser_sync = Some(Value::Object(options));
        self
    }

    pub fn browser_sync_with(&mut self, options: Value) -> Result<&mut Self> {
        if !options.is_object() {
            return Err(MixError::validation("browser_sync_with() expects an object"));
        }
        self.config.browser_sync = Some(options);
        Ok(self)
    }

    /// Set general options; unknown keys are kept as arbitrary options
    pub fn options(&mut self, options: Value) -> Result<&mut Self> {
        let Value::Object(options) = options else {
            return Err(MixError::validation("options() expects an object"));
        };

        for (key, value) in options {
            match key.as_str() {
                "purifyCss" => self.config.purify_css = purify_options(value)?,
                "processCssUrls" => self.config.process_css_urls = expect_bool(&key, &value)?,
                "extractVueStyles" => self.config.extract_vue_styles = expect_bool(&key, &value)?,
                "clearConsole" => self.config.clear_console = expect_bool(&key, &value)?,
                _ => {
                    self.config.extras.insert(key, value);
                }
            }
        }
        Ok(self)
    }

    pub fn set_public_path(&mut self, path: impl AsRef<str>) -> &mut Self {
        self.config.public_path = normalize_path(path.as_ref());
        self
    }

    pub fn set_resource_root(&mut self, root: impl Into<String>) -> &mut Self {
        self.config.resource_root = root.into();
        self
    }

    /// Enable source maps
    ///
    /// Production builds use `source-map` when `production_too` is set and
    /// disable maps otherwise; development uses `devtool` or `eval-source-map`.
    pub fn source_maps(&mut self, production_too: bool, devtool: Option<&str>) -> &mut Self {
        self.config.sourcemaps = if self.config.production {
            production_too.then(|| PROD_SOURCEMAP.to_string())
        } else {
            Some(devtool.unwrap_or(DEV_SOURCEMAP).to_string())
        };
        self
    }

    pub fn disable_notifications(&mut self) -> &mut Self {
        self.config.notifications = false;
        self
    }

    /// Raw settings merged over the assembled graph
    pub fn bundler_config(&mut self, config: Value) -> Result<&mut Self> {
        if !config.is_object() {
            return Err(MixError::validation("bundler_config() expects an object"));
        }
        self.config.bundler_config = config;
        Ok(self)
    }

    /// Raw settings computed from the current options
    pub fn bundler_config_with<F>(&mut self, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&Config) -> Value,
    {
        let config = build(&self.config);
        self.bundler_config(config)
    }

    /// Babel options merged over the defaults
    pub fn babel_config(&mut self, config: Value) -> Result<&mut Self> {
        if !config.is_object() {
            return Err(MixError::validation("babel_config() expects an object"));
        }
        self.config.babel_config = config;
        Ok(self)
    }

    /// Enqueue task data bound to any event
    ///
    /// A critical task aborts the firing it belongs to when it fails.
    pub fn task(&mut self, data: TaskData, event: impl Into<Event>, critical: bool) -> &mut Self {
        self.tasks.push_with(data, event.into(), critical);
        self
    }

    /// Run a callback after every build
    pub fn then<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.listen(&Event::Build, "then", move |_| {
            callback();
            Ok(())
        });
        self
    }

    /// Subscribe to any event, including custom ones
    pub fn listen<F>(&mut self, event: impl Into<Event>, callback: F) -> &mut Self
    where
        F: Fn(&EventContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let event = event.into();
        let label = format!("listener:{event}");
        self.listeners.listen(&event, label, callback);
        self
    }

    /// Fire caller listeners for an event before the build is finalized
    pub fn dispatch(&self, event: impl Into<Event>) -> usize {
        let event = event.into();
        self.listeners.fire(&EventContext {
            event: &event,
            root: &self.root,
            config: &self.config,
            graph: None,
            report: None,
        })
    }

    /// End the configuration phase
    ///
    /// Installs missing dependencies of active capabilities first; when
    /// anything was installed the process must restart and no graph is built.
    pub async fn finalize(
        self,
        registry: &CapabilityRegistry,
        installer: &dyn Installer,
    ) -> Result<Finalized> {
        if let Resolution::Installed(installed) = resolve(registry, &self.config, installer).await? {
            info!("Installed {} packages, restart required", installed.len());
            return Ok(Finalized::RestartRequired { installed });
        }

        let assembly = assemble(&self.root, &self.config, registry)?;
        info!(
            "Assembled build graph from {} capabilities",
            assembly.graph.capabilities.len()
        );

        Ok(Finalized::Ready(Session::new(
            self.root,
            self.config,
            assembly,
            self.tasks,
            self.listeners,
        )))
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| MixError::validation(format!("option '{key}' expects a boolean")))
}

fn purify_options(value: Value) -> Result<Option<PurifyCssOptions>> {
    match value {
        Value::Bool(false) | Value::Null => Ok(None),
        Value::Bool(true) => Ok(Some(PurifyCssOptions::default())),
        Value::Object(mut map) => {
            let paths = match map.remove("paths") {
                Some(Value::Array(paths)) => paths
                    .into_iter()
                    .map(|p| match p {
                        Value::String(p) => Ok(p),
                        _ => Err(MixError::validation("purifyCss.paths expects strings")),
                    })
                    .collect::<Result<Vec<_>>>()?,
                Some(_) => return Err(MixError::validation("purifyCss.paths expects a list")),
                None => PurifyCssOptions::default().paths,
            };
            Ok(Some(PurifyCssOptions { paths, extra: map }))
        }
        _ => Err(MixError::validation("option 'purifyCss' expects a boolean or an object")),
    }
}

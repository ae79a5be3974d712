//! Constants for mixr

/// Default mix file looked up by the CLI
pub const MIX_FILE: &str = "mix.json";

/// Manifest written into the public path after each build
pub const MANIFEST_FILE: &str = "mix-manifest.json";

/// Working directory used for logs and the serialized build graph
pub const WORK_DIR: &str = ".mixr";

/// Log directory, relative to the working directory
pub const LOG_DIR: &str = ".mixr/logs";

/// Serialized build graph handed to an external compiler
pub const GRAPH_FILE: &str = ".mixr/build-graph.json";

/// Devtool used for source maps during development
pub const DEV_SOURCEMAP: &str = "eval-source-map";

/// Devtool used for source maps in production
pub const PROD_SOURCEMAP: &str = "source-map";

/// Length of the content hash appended to versioned files
pub const VERSION_HASH_LEN: usize = 20;

/// Paths scanned for used selectors when purify-css is enabled without options
pub const DEFAULT_PURIFY_PATHS: &[&str] = &[
    "resources/views/**/*.php",
    "resources/assets/js/**/*.vue",
];

/// Environment variable that switches the build into production
pub const NODE_ENV: &str = "NODE_ENV";

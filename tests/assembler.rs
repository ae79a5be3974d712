// Integration tests for build graph assembly
use mixr::Mix;
use mixr::capability::{AssemblyContext, Capability, CapabilityRegistry, Contribution, PluginInstance};
use mixr::config::Config;
use mixr::error::Result;
use mixr::graph::assemble;
use mixr::task::TaskData;
use serde_json::{Value, json};
use std::path::Path;

// Test capability contributing a fixed fragment and plugin
struct Fixed {
    name: &'static str,
    fragment: Value,
    plugin: Option<&'static str>,
}

impl Capability for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn contribute(&self, _ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        let mut contribution = Contribution::new().with_fragment(self.fragment.clone());
        if let Some(plugin) = self.plugin {
            contribution = contribution.with_plugin(PluginInstance::new(plugin, json!({})));
        }
        Ok(contribution)
    }
}

fn fixed(name: &'static str, fragment: Value, plugin: Option<&'static str>) -> Fixed {
    Fixed {
        name,
        fragment,
        plugin,
    }
}

#[test]
fn test_later_capability_wins_scalars() {
    let mut registry = CapabilityRegistry::new();
    registry
        .register(fixed("first", json!({ "devtool": "eval" }), None))
        .register(fixed("second", json!({ "devtool": "source-map" }), None));

    let assembly = assemble(Path::new("/project"), &Config::default(), &registry).unwrap();
    assert_eq!(assembly.graph.setting("/devtool"), Some(&json!("source-map")));
}

#[test]
fn test_lists_concatenate_and_plugins_append() {
    let mut registry = CapabilityRegistry::new();
    registry
        .register(fixed(
            "first",
            json!({ "module": { "rules": [{ "loader": "a" }] } }),
            Some("APlugin"),
        ))
        .register(fixed(
            "second",
            json!({ "module": { "rules": [{ "loader": "b" }] } }),
            Some("BPlugin"),
        ));

    let assembly = assemble(Path::new("/project"), &Config::default(), &registry).unwrap();
    let graph = &assembly.graph;

    assert_eq!(
        graph.setting("/module/rules"),
        Some(&json!([{ "loader": "a" }, { "loader": "b" }]))
    );
    let plugins: Vec<_> = graph.plugins.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(plugins, vec!["APlugin", "BPlugin"]);
    assert_eq!(graph.capabilities, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn test_bundler_config_is_merged_last() {
    let mut registry = CapabilityRegistry::new();
    registry.register(fixed("first", json!({ "devtool": "eval" }), None));

    let mut mix = Mix::new("/project");
    mix.bundler_config(json!({
        "devtool": "inline-source-map",
        "resolve": { "extensions": [".coffee"] }
    }))
    .unwrap();

    let assembly = assemble(mix.root(), mix.config(), &registry).unwrap();
    let graph = &assembly.graph;
    assert_eq!(graph.setting("/devtool"), Some(&json!("inline-source-map")));
    assert_eq!(
        graph.setting("/resolve/extensions"),
        Some(&json!(["*", ".js", ".json", ".vue", ".coffee"]))
    );
}

#[test]
fn test_assembly_is_deterministic() {
    let registry = CapabilityRegistry::with_defaults();
    let mut mix = Mix::new("/project");
    mix.js("resources/assets/js/app.js", "public/js")
        .unwrap()
        .sass("resources/assets/sass/app.scss", "public/css")
        .unwrap()
        .extract(["vue"], None)
        .unwrap()
        .version(Vec::<String>::new())
        .unwrap();

    let first = assemble(mix.root(), mix.config(), &registry).unwrap();
    let second = assemble(mix.root(), mix.config(), &registry).unwrap();
    assert_eq!(first.graph.to_json(), second.graph.to_json());
}

#[test]
fn test_default_graph_for_script_and_style_bundles() {
    let registry = CapabilityRegistry::with_defaults();
    let mut mix = Mix::new("/project");
    mix.js("resources/assets/js/app.js", "public/js")
        .unwrap()
        .sass("resources/assets/sass/app.scss", "public/css")
        .unwrap();

    let assembly = assemble(mix.root(), mix.config(), &registry).unwrap();
    let graph = &assembly.graph;

    assert_eq!(
        graph.setting("/entry/js~1app"),
        Some(&json!(["/project/resources/assets/js/app.js"]))
    );
    assert_eq!(graph.setting("/output/path"), Some(&json!("/project/public")));
    assert_eq!(graph.setting("/devtool"), Some(&json!(false)));
    assert!(graph.assets.contains(&"js/app.js".to_string()));
    assert!(graph.assets.contains(&"css/app.css".to_string()));
    assert_eq!(
        graph.capabilities,
        vec![
            "javascript".to_string(),
            "sass".to_string(),
            "notifications".to_string(),
            "manifest".to_string(),
        ]
    );
    assert!(graph.plugins.iter().any(|p| p.name == "WebpackNotifierPlugin"));
    assert_eq!(assembly.hooks.len(), 1);
}

#[test]
fn test_production_adds_minification() {
    let registry = CapabilityRegistry::with_defaults();
    let mut mix = Mix::new("/project");
    mix.production(true).js("app.js", "public/js").unwrap();

    let graph = assemble(mix.root(), mix.config(), &registry).unwrap().graph;
    assert!(graph.capabilities.contains(&"minification".to_string()));
    assert_eq!(graph.setting("/performance/hints"), Some(&json!("warning")));

    // Plugins are folded into the single compiler object
    let json = graph.to_json();
    let plugins = json["plugins"].as_array().unwrap();
    assert_eq!(plugins.len(), graph.plugins.len());
}

#[test]
fn test_style_bundles_sharing_an_output_are_merged() {
    let registry = CapabilityRegistry::with_defaults();
    let mut mix = Mix::new("/project");
    mix.sass("resources/a.scss", "public/css/app.css")
        .unwrap()
        .sass("resources/b.scss", "public/css/app.css")
        .unwrap();

    let graph = assemble(mix.root(), mix.config(), &registry).unwrap().graph;
    assert_eq!(
        graph.setting("/entry/css~1app"),
        Some(&json!(["/project/resources/a.scss", "/project/resources/b.scss"]))
    );

    let extracted = graph
        .plugins
        .iter()
        .filter(|p| p.name == "ExtractTextPlugin")
        .count();
    assert_eq!(extracted, 1);
    assert_eq!(graph.assets, vec!["css/app.css".to_string()]);
}

fn purify_paths(graph: &mixr::graph::BuildGraph) -> Vec<String> {
    graph
        .plugins
        .iter()
        .find(|p| p.name == "PurifyCSSPlugin")
        .and_then(|p| p.options["paths"].as_array())
        .map(|paths| paths.iter().filter_map(|p| p.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[test]
fn test_purify_globs_expand_at_assembly_time() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("views")).unwrap();
    std::fs::write(dir.path().join("views/home.php"), "").unwrap();

    let registry = CapabilityRegistry::with_defaults();
    let mut mix = Mix::new(dir.path());
    mix.options(json!({ "purifyCss": { "paths": ["views/*.php"] } }))
        .unwrap()
        .copy("views", "public/views")
        .unwrap();

    // Created after configuration, before assembly
    std::fs::write(dir.path().join("views/late.php"), "").unwrap();

    let graph = assemble(mix.root(), mix.config(), &registry).unwrap().graph;
    let root = dir.path().to_string_lossy().replace('\\', "/");
    assert_eq!(
        purify_paths(&graph),
        vec![format!("{root}/views/home.php"), format!("{root}/views/late.php")]
    );

    let copied = match &mix.tasks().get(0).unwrap().data {
        TaskData::Copy { from, .. } => from.clone(),
        other => panic!("unexpected task {other:?}"),
    };
    assert_eq!(copied, vec![std::path::PathBuf::from("views/home.php")]);
}

#[test]
fn test_purify_absolute_globs_and_literal_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("views")).unwrap();
    std::fs::write(dir.path().join("views/home.php"), "").unwrap();
    let root = dir.path().to_string_lossy().replace('\\', "/");

    let registry = CapabilityRegistry::with_defaults();
    let mut mix = Mix::new(dir.path());
    mix.options(json!({
        "purifyCss": { "paths": [format!("{root}/views/*.php"), "templates/index.html"] }
    }))
    .unwrap();

    let graph = assemble(mix.root(), mix.config(), &registry).unwrap().graph;
    assert_eq!(
        purify_paths(&graph),
        vec![format!("{root}/views/home.php"), format!("{root}/templates/index.html")]
    );
}

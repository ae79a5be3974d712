// End-to-end: mix file to finalized build
use async_trait::async_trait;
use mixr::capability::CapabilityRegistry;
use mixr::cli::load_mix;
use mixr::compiler::DryRunCompiler;
use mixr::error::Result;
use mixr::manifest::AssetManifest;
use mixr::resolver::Installer;
use mixr::{Finalized, MixError};
use std::fs;
use std::path::Path;

struct Installed;

#[async_trait]
impl Installer for Installed {
    async fn is_present(&self, _package: &str) -> Result<bool> {
        Ok(true)
    }

    async fn install(&self, _packages: &[String]) -> Result<()> {
        Ok(())
    }
}

const MIX_JSON: &str = r#"{
    "publicPath": "dist",
    "notifications": false,
    "js": [{ "entry": "src/app.js", "output": "dist/js" }],
    "sass": [{ "entry": "src/app.scss", "output": "dist/css" }],
    "copy": [{ "from": "static", "to": "dist/static", "directory": true }],
    "version": ["dist/js/app.js"]
}"#;

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::create_dir_all(dir.path().join("static/img")).unwrap();
    fs::create_dir_all(dir.path().join("dist/js")).unwrap();
    fs::write(dir.path().join("src/app.js"), "let app;").unwrap();
    fs::write(dir.path().join("static/img/logo.svg"), "<svg/>").unwrap();
    fs::write(dir.path().join("dist/js/app.js"), "let app;").unwrap();
    fs::write(dir.path().join("mix.json"), MIX_JSON).unwrap();
    dir
}

#[tokio::test]
async fn test_mix_file_build() {
    let dir = project();
    let mix = load_mix(dir.path(), Path::new("mix.json"), false).unwrap();
    assert_eq!(mix.tasks().len(), 2);

    let registry = CapabilityRegistry::with_defaults();
    let Finalized::Ready(mut session) = mix.finalize(&registry, &Installed).await.unwrap() else {
        panic!("unexpected restart");
    };

    let report = session.run(&DryRunCompiler).await.unwrap();
    assert_eq!(report.assets, vec!["js/app.js".to_string(), "css/app.css".to_string()]);
    assert!(dir.path().join("dist/static/img/logo.svg").exists());

    let manifest = AssetManifest::load(dir.path().join("dist/mix-manifest.json")).unwrap();
    assert!(manifest.get("/css/app.css").is_some());
    assert!(manifest.get("/js/app.js").unwrap().starts_with("/js/app.js?id="));
}

#[test]
fn test_mix_file_production_flag() {
    let dir = project();
    let mix = load_mix(dir.path(), Path::new("mix.json"), true).unwrap();
    assert!(mix.in_production());
}

#[test]
fn test_mix_file_rejects_unknown_keys() {
    let dir = project();
    fs::write(dir.path().join("bad.json"), r#"{ "javascript": [] }"#).unwrap();

    let err = load_mix(dir.path(), Path::new("bad.json"), false).unwrap_err();
    assert!(matches!(err, MixError::Json(_)));
}

#[test]
fn test_mix_file_validation_errors_surface() {
    let dir = project();
    fs::write(
        dir.path().join("bad.json"),
        r#"{ "js": [{ "entry": [], "output": "dist/js" }] }"#,
    )
    .unwrap();

    let err = load_mix(dir.path(), Path::new("bad.json"), false).unwrap_err();
    assert!(matches!(err, MixError::Validation(_)));
}

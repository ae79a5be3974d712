// Integration tests for dependency resolution
use async_trait::async_trait;
use mixr::Mix;
use mixr::capability::CapabilityRegistry;
use mixr::config::Config;
use mixr::error::{MixError, Result};
use mixr::resolver::{Installer, Resolution, resolve};
use mixr::session::Finalized;
use std::collections::HashSet;
use std::sync::Mutex;

// Installer recording every call
#[derive(Default)]
struct MockInstaller {
    present: HashSet<String>,
    fail: bool,
    /// Fail with a resolution error like a package manager adapter does
    fail_resolution: bool,
    installs: Mutex<Vec<Vec<String>>>,
}

impl MockInstaller {
    fn with_present(packages: &[&str]) -> Self {
        Self {
            present: packages.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.installs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Installer for MockInstaller {
    async fn is_present(&self, package: &str) -> Result<bool> {
        Ok(self.present.contains(package))
    }

    async fn install(&self, packages: &[String]) -> Result<()> {
        self.installs.lock().unwrap().push(packages.to_vec());
        if self.fail_resolution {
            return Err(MixError::resolution("npm exited with status 1"));
        }
        if self.fail {
            return Err(MixError::other("npm exited with status 1"));
        }
        Ok(())
    }
}

fn config_with(setup: impl FnOnce(&mut Mix)) -> Config {
    let mut mix = Mix::new("/project");
    setup(&mut mix);
    mix.config().clone()
}

#[tokio::test]
async fn test_all_present_is_noop() {
    let registry = CapabilityRegistry::with_defaults();
    let installer = MockInstaller::with_present(&["webpack-notifier"]);

    let resolution = resolve(&registry, &Config::default(), &installer).await.unwrap();
    assert_eq!(resolution, Resolution::Satisfied);
    assert!(!resolution.requires_restart());
    assert!(installer.calls().is_empty());
}

#[tokio::test]
async fn test_missing_installed_in_one_batch() {
    let registry = CapabilityRegistry::with_defaults();
    let config = config_with(|mix| {
        mix.ts("app.ts", "public/js").unwrap();
        mix.less("app.less", "public/css").unwrap();
    });
    let installer = MockInstaller::with_present(&["typescript"]);

    let resolution = resolve(&registry, &config, &installer).await.unwrap();
    assert!(resolution.requires_restart());

    let calls = installer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec![
            "ts-loader".to_string(),
            "less-loader".to_string(),
            "less".to_string(),
            "webpack-notifier".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_inactive_capabilities_contribute_no_dependencies() {
    let registry = CapabilityRegistry::with_defaults();
    let config = config_with(|mix| {
        mix.disable_notifications();
    });
    let installer = MockInstaller::default();

    let resolution = resolve(&registry, &config, &installer).await.unwrap();
    assert_eq!(resolution, Resolution::Satisfied);
    assert!(installer.calls().is_empty());
}

#[tokio::test]
async fn test_shared_dependencies_are_deduplicated() {
    let registry = CapabilityRegistry::with_defaults();
    let config = config_with(|mix| {
        mix.react("a.jsx", "public/js").unwrap();
        mix.react("b.jsx", "public/js").unwrap();
        mix.disable_notifications();
    });
    let installer = MockInstaller::default();

    resolve(&registry, &config, &installer).await.unwrap();
    assert_eq!(installer.calls(), vec![vec!["babel-preset-react".to_string()]]);
}

#[tokio::test]
async fn test_install_failure_is_fatal() {
    let registry = CapabilityRegistry::with_defaults();
    let installer = MockInstaller {
        fail: true,
        ..MockInstaller::default()
    };

    let err = resolve(&registry, &Config::default(), &installer).await.unwrap_err();
    assert!(matches!(err, MixError::Resolution(_)));
    assert!(err.to_string().contains("webpack-notifier"));
}

#[tokio::test]
async fn test_finalize_signals_restart_without_graph() {
    let registry = CapabilityRegistry::with_defaults();
    let installer = MockInstaller::default();

    let mut mix = Mix::new("/project");
    mix.js("app.js", "public/js").unwrap();

    match mix.finalize(&registry, &installer).await.unwrap() {
        Finalized::RestartRequired { installed } => {
            assert_eq!(installed, vec!["webpack-notifier".to_string()]);
        }
        Finalized::Ready(_) => panic!("expected a restart"),
    }
}

#[tokio::test]
async fn test_finalize_aborts_on_install_failure() {
    let registry = CapabilityRegistry::with_defaults();
    let installer = MockInstaller {
        fail: true,
        ..MockInstaller::default()
    };

    let result = Mix::new("/project").finalize(&registry, &installer).await;
    assert!(matches!(result, Err(MixError::Resolution(_))));
}

#[tokio::test]
async fn test_installer_resolution_error_is_not_wrapped() {
    let registry = CapabilityRegistry::with_defaults();
    let installer = MockInstaller {
        fail_resolution: true,
        ..MockInstaller::default()
    };

    let err = resolve(&registry, &Config::default(), &installer).await.unwrap_err();
    assert_eq!(err.to_string(), "Dependency resolution failed: npm exited with status 1");
}

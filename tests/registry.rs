// Integration tests for the capability registry
use mixr::capability::components::{Manifest, Preprocessor, StyleLang};
use mixr::capability::{AssemblyContext, Capability, CapabilityRegistry, Contribution};
use mixr::config::Config;
use mixr::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// Test capability gated on the production flag
struct ProductionOnly {
    checks: Arc<AtomicUsize>,
}

impl Capability for ProductionOnly {
    fn name(&self) -> &str {
        "production-only"
    }

    fn is_active(&self, config: &Config) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        config.production
    }

    fn contribute(&self, _ctx: &AssemblyContext<'_>) -> Result<Contribution> {
        Ok(Contribution::new())
    }
}

#[test]
fn test_registry_new() {
    let registry = CapabilityRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn test_registry_preserves_registration_order() {
    let mut registry = CapabilityRegistry::new();
    registry
        .register(Preprocessor::new(StyleLang::Less))
        .register(Manifest)
        .register(Preprocessor::new(StyleLang::Sass));

    assert_eq!(
        registry.list_capabilities(),
        vec!["less".to_string(), "manifest".to_string(), "sass".to_string()]
    );
    assert!(registry.contains("manifest"));
    assert!(!registry.contains("stylus"));
}

#[test]
fn test_capability_without_predicate_is_always_active() {
    let mut registry = CapabilityRegistry::new();
    registry.register(Manifest);

    let config = Config::default();
    let active: Vec<_> = registry.active(&config).map(|c| c.name().to_string()).collect();
    assert_eq!(active, vec!["manifest".to_string()]);
}

#[test]
fn test_predicates_are_evaluated_against_current_config() {
    let checks = Arc::new(AtomicUsize::new(0));
    let mut registry = CapabilityRegistry::new();
    registry.register(ProductionOnly {
        checks: checks.clone(),
    });

    let mut config = Config::default();
    assert_eq!(registry.active(&config).count(), 0);

    config.production = true;
    assert_eq!(registry.active(&config).count(), 1);

    // Nothing is cached between queries
    assert_eq!(checks.load(Ordering::SeqCst), 2);
}

#[test]
fn test_defaults_only_activate_what_is_configured() {
    let registry = CapabilityRegistry::with_defaults();
    let config = Config::default();

    let active: Vec<_> = registry.active(&config).map(|c| c.name().to_string()).collect();
    assert_eq!(active, vec!["notifications".to_string(), "manifest".to_string()]);
    assert!(registry.len() > active.len());
}

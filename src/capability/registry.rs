// Ordered capability registry
use super::Capability;
use crate::config::Config;

/// Registry for capabilities
///
/// Registration order is kept and decides contribution order during assembly.
pub struct CapabilityRegistry {
    capabilities: Vec<Box<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            capabilities: Vec::new(),
        }
    }

    /// Create a registry holding every shipped component
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        super::register_components(&mut registry);
        registry
    }

    /// Register a capability after all existing ones
    pub fn register<C>(&mut self, capability: C) -> &mut Self
    where
        C: Capability + 'static,
    {
        self.capabilities.push(Box::new(capability));
        self
    }

    /// Capabilities whose predicate holds for the current configuration
    ///
    /// Evaluated on every call since the configuration may still change.
    pub fn active<'a>(&'a self, config: &'a Config) -> impl Iterator<Item = &'a dyn Capability> + 'a {
        self.capabilities
            .iter()
            .map(|capability| capability.as_ref())
            .filter(move |capability| capability.is_active(config))
    }

    /// Check if a capability is registered
    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.name() == name)
    }

    /// List all registered capability names in registration order
    pub fn list_capabilities(&self) -> Vec<String> {
        self.capabilities.iter().map(|c| c.name().to_string()).collect()
    }

    /// Get the number of registered capabilities
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

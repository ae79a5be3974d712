// Registration of the shipped components
use super::components::{
    BrowserSync, Extract, JavaScript, Manifest, Minification, Notifications, Preact,
    Preprocessor, PurifyCss, React, StyleLang, TypeScript, Versioning,
};
use super::registry::CapabilityRegistry;

/// Register all shipped components in contribution order
pub fn register_components(registry: &mut CapabilityRegistry) {
    // Scripts
    registry
        .register(JavaScript)
        .register(React)
        .register(Preact)
        .register(TypeScript);

    // Styles
    registry
        .register(Preprocessor::new(StyleLang::Sass))
        .register(Preprocessor::new(StyleLang::Less))
        .register(Preprocessor::new(StyleLang::Stylus));

    // Output shaping
    registry
        .register(Extract)
        .register(PurifyCss)
        .register(BrowserSync)
        .register(Notifications)
        .register(Versioning)
        .register(Minification)
        .register(Manifest);
}

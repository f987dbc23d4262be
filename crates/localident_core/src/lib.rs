//! localident - deterministic class names for CSS modules

pub mod class_map;
pub mod config;
pub mod deriver;
pub mod error;
pub mod grouping;
pub mod hash;
pub mod logging;
pub mod path;
pub mod scan;
pub mod template;

pub use class_map::{build_class_maps, build_project_class_maps, discover_style_modules, Manifest};
pub use config::{BuildConfig, LocalIdentConfig, Mode};
pub use deriver::{IdentifierDeriver, IdentifierRequest, NamingRules, DEFAULT_TEMPLATE};
pub use error::ConfigError;
pub use hash::{DigestEncoding, DigestOptions, HashAlgorithm, HashDigest};
pub use template::Template;

/// Derive one identifier with the default digest and naming rules.
pub fn get_local_ident(
    resource_path: &str,
    root_context: &str,
    local_name: &str,
    naming_template: &str,
) -> String {
    IdentifierDeriver::<DigestOptions>::default().derive(&IdentifierRequest {
        resource_path,
        root_context,
        local_name,
        naming_template,
    })
}

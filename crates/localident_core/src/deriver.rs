//! Deterministic local identifiers for style-module class names.
//!
//! An identifier is built in three steps:
//!
//! 1. pick the grouping key (folder for `index.module.*`, file name otherwise),
//! 2. hash the root-relative resource path followed by the local name,
//! 3. interpolate the naming template and flatten the first `.module_`.
//!
//! Nothing here touches the file system or any shared state, so a single
//! deriver can be shared freely between threads.

use serde::{Deserialize, Serialize};

use crate::grouping::GroupingRules;
use crate::hash::{DigestOptions, HashDigest};
use crate::path;
use crate::template::{Interpolation, Placeholder, Template};

pub const DEFAULT_TEMPLATE: &str = "[name]_[local]__[hash]";

/// One identifier to derive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdentifierRequest<'a> {
    /// Path of the stylesheet, absolute or relative to `root_context`.
    pub resource_path: &'a str,
    /// Absolute project root.
    pub root_context: &'a str,
    /// Class name as authored.
    pub local_name: &'a str,
    pub naming_template: &'a str,
}

/// Substitution rules applied on top of the template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingRules {
    pub grouping: GroupingRules,
    /// Replaced by a single `_` once, so `Card.module_title` reads `Card_title`.
    pub module_marker: String,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            grouping: GroupingRules::default(),
            module_marker: ".module_".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IdentifierDeriver<H = DigestOptions> {
    hasher: H,
    rules: NamingRules,
}

impl<H: HashDigest> IdentifierDeriver<H> {
    pub fn new(hasher: H, rules: NamingRules) -> Self {
        Self { hasher, rules }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn rules(&self) -> &NamingRules {
        &self.rules
    }

    pub fn derive(&self, request: &IdentifierRequest<'_>) -> String {
        let template = Template::parse(request.naming_template);
        self.derive_with(
            request.resource_path,
            request.root_context,
            request.local_name,
            &template,
        )
    }

    /// Same as [`derive`](Self::derive) with an already parsed template.
    pub fn derive_with(
        &self,
        resource_path: &str,
        root_context: &str,
        local_name: &str,
        template: &Template,
    ) -> String {
        let group = self
            .rules
            .grouping
            .select(resource_path)
            .resolve(resource_path);

        let relative = path::relative(root_context, resource_path);
        let hash = if template.uses(Placeholder::Hash) {
            self.digest(&relative, local_name)
        } else {
            String::new()
        };

        let dir = if template.uses(Placeholder::Path) {
            path::relative_dir(&relative)
        } else {
            String::new()
        };

        let ident = template.interpolate(&Interpolation {
            group: &group,
            local: local_name,
            hash: &hash,
            ext: path::extension(resource_path).unwrap_or(""),
            path: &dir,
        });

        self.strip_marker(ident)
    }

    /// Digest of the root-relative path immediately followed by the local name.
    pub fn digest(&self, relative_path: &str, local_name: &str) -> String {
        let mut input = String::with_capacity(relative_path.len() + local_name.len());
        input.push_str(relative_path);
        input.push_str(local_name);
        self.hasher.digest(input.as_bytes())
    }

    fn strip_marker(&self, ident: String) -> String {
        let marker = self.rules.module_marker.as_str();
        if marker.is_empty() {
            return ident;
        }
        match ident.find(marker) {
            Some(at) => {
                let mut out = String::with_capacity(ident.len());
                out.push_str(&ident[..at]);
                out.push('_');
                out.push_str(&ident[at + marker.len()..]);
                out
            }
            None => ident,
        }
    }
}

//! Choosing the readable prefix of a derived identifier.

use serde::{Deserialize, Serialize};

use crate::path;

/// Which part of the resource path names the identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupingKey {
    /// Name of the directory containing the file.
    Folder,
    /// The file's own name without its last extension.
    File,
}

impl GroupingKey {
    /// Resolve the key to text for `resource_path`.
    pub fn resolve(self, resource_path: &str) -> String {
        match self {
            GroupingKey::Folder => path::basename(&path::dirname(resource_path)).to_string(),
            GroupingKey::File => path::stem(resource_path).to_string(),
        }
    }
}

/// Rules that decide which files are grouped by folder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingRules {
    /// File name before the stylesheet extension, `index.module` by default.
    pub index_stem: String,
    /// Stylesheet extensions accepted after `index_stem`.
    pub style_extensions: Vec<String>,
}

impl Default for GroupingRules {
    fn default() -> Self {
        Self {
            index_stem: "index.module".to_string(),
            style_extensions: vec!["css".into(), "scss".into(), "sass".into()],
        }
    }
}

impl GroupingRules {
    /// Index style modules all share a file name, so only their folder tells
    /// them apart.
    pub fn select(&self, resource_path: &str) -> GroupingKey {
        let file_name = path::basename(resource_path);
        let is_index = file_name
            .strip_prefix(self.index_stem.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|ext| self.style_extensions.iter().any(|e| e == ext));

        if is_index {
            GroupingKey::Folder
        } else {
            GroupingKey::File
        }
    }
}

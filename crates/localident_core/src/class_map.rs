//! Class maps for every style module in a project.
//!
//! Each style module is read and scanned on its own task; the deriver is pure,
//! so tasks share it through an `Arc` without locking.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::config::LocalIdentConfig;
use crate::deriver::IdentifierDeriver;
use crate::hash::HashDigest;
use crate::path;
use crate::scan;
use crate::template::Template;

pub const STYLE_MODULE_SUFFIXES: [&str; 3] = [".module.css", ".module.scss", ".module.sass"];

/// Authored class name to derived identifier, for one file.
pub type ClassMap = BTreeMap<String, String>;

/// Class maps keyed by the file's root-relative, `/`-separated path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub modules: BTreeMap<String, ClassMap>,
}

/// One identifier produced by more than one `(file, class)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub ident: String,
    pub sources: Vec<(String, String)>,
}

impl Manifest {
    pub fn get(&self, relative_path: &str) -> Option<&ClassMap> {
        self.modules.get(relative_path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn collisions(&self) -> Vec<Collision> {
        let mut by_ident: BTreeMap<&str, Vec<(String, String)>> = BTreeMap::new();
        for (file, map) in &self.modules {
            for (local, ident) in map {
                by_ident
                    .entry(ident.as_str())
                    .or_default()
                    .push((file.clone(), local.clone()));
            }
        }

        by_ident
            .into_iter()
            .filter(|(_, sources)| sources.len() > 1)
            .map(|(ident, sources)| Collision {
                ident: ident.to_string(),
                sources,
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn is_style_module(file_name: &str) -> bool {
    STYLE_MODULE_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
}

/// All style modules under `root`, sorted. `node_modules` and hidden
/// directories are not entered.
pub async fn discover_style_modules(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut queue = VecDeque::from([root.to_path_buf()]);

    while let Some(dir) = queue.pop_front() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("failed to list {}", dir.display()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("failed to list {}", dir.display()))?
        {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let file_type = entry
                .file_type()
                .await
                .with_context(|| format!("failed to stat {}", entry.path().display()))?;

            if file_type.is_dir() {
                if name != "node_modules" && !name.starts_with('.') {
                    queue.push_back(entry.path());
                }
            } else if file_type.is_file() && is_style_module(&name) {
                found.push(entry.path());
            }
        }
    }

    found.sort();
    tracing::debug!(root = %root.display(), count = found.len(), "discovered style modules");
    Ok(found)
}

/// Derive identifiers for every class in `files`. Relative entries of `files`
/// are taken relative to `root`.
pub async fn build_class_maps<H>(
    root: &Path,
    files: &[PathBuf],
    deriver: Arc<IdentifierDeriver<H>>,
    template: &Template,
) -> Result<Manifest>
where
    H: HashDigest + 'static,
{
    let root_str: Arc<str> = root.to_string_lossy().into();
    let mut tasks = JoinSet::new();

    for file in files {
        let file = if file.is_absolute() {
            file.clone()
        } else {
            root.join(file)
        };
        let deriver = Arc::clone(&deriver);
        let template = template.clone();
        let root_str = Arc::clone(&root_str);

        tasks.spawn(async move {
            let source = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let resource = file.to_string_lossy();

            let map: ClassMap = scan::class_names_for_path(&resource, &source)
                .into_iter()
                .map(|local| {
                    let ident = deriver.derive_with(&resource, &root_str, &local, &template);
                    (local, ident)
                })
                .collect();

            let relative = path::relative(&root_str, &resource);
            tracing::debug!(file = %relative, classes = map.len(), "derived class map");
            Ok::<_, anyhow::Error>((relative, map))
        });
    }

    let mut manifest = Manifest::default();
    while let Some(joined) = tasks.join_next().await {
        let (relative, map) = joined.context("class map task failed")??;
        manifest.modules.insert(relative, map);
    }

    for collision in manifest.collisions() {
        tracing::warn!(
            ident = %collision.ident,
            sources = ?collision.sources,
            "derived identifier is not unique"
        );
    }

    tracing::info!(modules = manifest.len(), "built class maps");
    Ok(manifest)
}

/// Discover and map every style module under `root` using `config`.
pub async fn build_project_class_maps(root: &Path, config: &LocalIdentConfig) -> Result<Manifest> {
    let deriver = Arc::new(config.deriver()?);
    let files = discover_style_modules(root).await?;
    build_class_maps(root, &files, deriver, &config.parsed_template()).await
}

//! Sources — named root directories containing category subtrees.
//!
//! A source is `(name, base-path)`. Sources form an ordered list; earlier
//! sources win. Each type occupies exactly one directory at arbitrary depth
//! under its category subtree, and that directory holds the manifest file.

use crate::typepath::{Category, TypePath};
use std::path::{Path, PathBuf};

/// Directory names never walked into and never copied on install.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", ".DS_Store"];

pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

/// Manifest filenames probed inside a type directory, in order. The first
/// hit wins; this order is observable and must not change.
pub fn manifest_candidates(category: Category) -> [String; 3] {
    [
        "manifest.yaml".to_string(),
        "manifest.json".to_string(),
        format!("{}.yaml", category.singular()),
    ]
}

/// Probe a directory for its manifest file using the fallback order.
pub fn find_manifest_in(dir: &Path, category: Category) -> Option<PathBuf> {
    manifest_candidates(category)
        .into_iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

#[derive(Clone, Debug)]
pub struct Source {
    pub name: String,
    pub base: PathBuf,
}

impl Source {
    pub fn new(name: impl Into<String>, base: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
        }
    }

    /// The directory this source would hold the type in (whether or not it
    /// exists).
    pub fn type_dir(&self, type_path: &TypePath) -> PathBuf {
        self.base.join(type_path.as_str())
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.base.join(category.plural())
    }

    /// Manifest file for a type in this source, if present.
    pub fn find_manifest(&self, type_path: &TypePath) -> Option<PathBuf> {
        let dir = self.type_dir(type_path);
        if !dir.is_dir() {
            return None;
        }
        find_manifest_in(&dir, type_path.category())
    }
}

//! Discovery — walk every source's category subtrees and list all types.
//!
//! A directory with a manifest file is a type; its subtree below that point
//! is the type's contents, never further types. Across sources the first
//! occurrence of a type-path wins. Errors inside one source never abort the
//! walk.

use agentx_core::{
    find_manifest_in, is_excluded, manifest, Category, Manifest, Source, TypePath,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// One discovered type, enriched with its manifest header. Skills carry
/// their topic and declared CLI-dependency names for display and filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredType {
    pub type_path: TypePath,
    pub category: Category,
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vendor: Option<String>,
    /// Name of the source that provides this type.
    pub source: String,
    pub topic: Option<String>,
    #[serde(default)]
    pub cli_dependencies: Vec<String>,
}

/// Walk all sources in priority order and return the deduplicated type list.
pub fn discover_all(sources: &[Source]) -> Vec<DiscoveredType> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for source in sources {
        for category in Category::ALL {
            walk_category(source, category, &mut seen, &mut out);
        }
    }
    out
}

fn walk_category(
    source: &Source,
    category: Category,
    seen: &mut HashSet<String>,
    out: &mut Vec<DiscoveredType>,
) {
    let cat_dir = source.category_dir(category);
    if !cat_dir.is_dir() {
        return;
    }
    let mut walker = WalkDir::new(&cat_dir).min_depth(1).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(source = %source.name, error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir_name = entry.file_name().to_string_lossy();
        if is_excluded(&dir_name) {
            walker.skip_current_dir();
            continue;
        }
        let Some(manifest_path) = find_manifest_in(entry.path(), category) else {
            continue;
        };
        // A manifest marks a type; everything below is its contents.
        walker.skip_current_dir();

        let Some(type_path) = type_path_for(entry.path(), &source.base) else {
            tracing::warn!(dir = %entry.path().display(), "directory does not form a valid type path");
            continue;
        };
        // Priority dedup: a higher-priority source already claimed this path.
        if !seen.insert(type_path.as_str().to_string()) {
            continue;
        }
        match enrich(&type_path, category, &manifest_path, &source.name) {
            Some(discovered) => out.push(discovered),
            None => {}
        }
    }
}

fn type_path_for(dir: &Path, base: &Path) -> Option<TypePath> {
    let rel = dir.strip_prefix(base).ok()?;
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    TypePath::parse(&joined).ok()
}

fn enrich(
    type_path: &TypePath,
    category: Category,
    manifest_path: &Path,
    source_name: &str,
) -> Option<DiscoveredType> {
    let base = match manifest::parse_base(manifest_path) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(path = %manifest_path.display(), error = %e, "skipping unparseable manifest");
            return None;
        }
    };
    let mut discovered = DiscoveredType {
        type_path: type_path.clone(),
        category,
        name: base.name,
        version: base.version,
        description: base.description,
        tags: base.tags,
        vendor: base.vendor,
        source: source_name.to_string(),
        topic: None,
        cli_dependencies: Vec::new(),
    };
    if category == Category::Skill {
        match manifest::parse_typed(manifest_path) {
            Ok(Manifest::Skill(skill)) => {
                discovered.topic = Some(skill.topic);
                discovered.cli_dependencies =
                    skill.cli_dependencies.into_iter().map(|d| d.name).collect();
            }
            Ok(_) | Err(_) => {
                tracing::warn!(path = %manifest_path.display(), "skill manifest did not fully parse, keeping header only");
            }
        }
    }
    Some(discovered)
}

//! Install planning — flatten the dependency tree into topological order.
//!
//! The plan is inspection-only; it mutates nothing. Dependencies always
//! precede dependents in the flat list; deduped and already-installed nodes
//! are filtered out.

use crate::graph::{build_tree, DependencyNode};
use crate::resolver::{resolve, ResolvedType};
use agentx_core::{manifest, Category, Manifest, Result, Source, TypePath};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// One declared CLI dependency with its PATH availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliDepStatus {
    pub name: String,
    pub available: bool,
}

#[derive(Debug)]
pub struct InstallPlan {
    pub root: DependencyNode,
    /// Resolved types in install order (dependencies first).
    pub types: Vec<ResolvedType>,
    pub counts: BTreeMap<Category, usize>,
    /// Declared CLI deps of planned skills, first-encountered order.
    pub cli_deps: Vec<CliDepStatus>,
    /// Nodes already installed anywhere in the tree.
    pub skipped: usize,
}

/// Production PATH probe for CLI dependencies.
pub fn cli_on_path(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Compute the install plan for `root`. With `no_deps` the root alone is
/// planned (a forced reinstall resolves even an installed root); otherwise
/// the full tree is built and flattened.
pub fn plan(
    root: &TypePath,
    sources: &[Source],
    installed_root: &Path,
    no_deps: bool,
    is_on_path: &dyn Fn(&str) -> bool,
) -> Result<InstallPlan> {
    let (tree, types) = if no_deps {
        let resolved = resolve(root, sources)?;
        let installed = installed_root.join(root.as_str()).is_dir();
        let node = DependencyNode {
            type_path: root.clone(),
            category: root.category(),
            resolved: Some(resolved.clone()),
            children: Vec::new(),
            deduped: false,
            installed,
        };
        (node, vec![resolved])
    } else {
        let tree = build_tree(root, sources, installed_root)?;
        let mut types = Vec::new();
        let mut emitted = HashSet::new();
        flatten(&tree, &mut emitted, &mut types);
        (tree, types)
    };

    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for resolved in &types {
        *counts.entry(resolved.category).or_default() += 1;
    }

    let cli_deps = collect_cli_deps(&types, is_on_path)?;
    let skipped = tree.installed_count();

    Ok(InstallPlan {
        root: tree,
        types,
        counts,
        cli_deps,
        skipped,
    })
}

/// Depth-first post-order: children (dependencies) before the node itself.
fn flatten(node: &DependencyNode, emitted: &mut HashSet<String>, out: &mut Vec<ResolvedType>) {
    for child in &node.children {
        flatten(child, emitted, out);
    }
    if node.deduped || node.installed {
        return;
    }
    if !emitted.insert(node.type_path.as_str().to_string()) {
        return;
    }
    if let Some(resolved) = &node.resolved {
        out.push(resolved.clone());
    }
}

fn collect_cli_deps(
    types: &[ResolvedType],
    is_on_path: &dyn Fn(&str) -> bool,
) -> Result<Vec<CliDepStatus>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for resolved in types {
        if resolved.category != Category::Skill {
            continue;
        }
        let Manifest::Skill(skill) = manifest::parse_typed(&resolved.manifest_path)? else {
            continue;
        };
        for dep in skill.cli_dependencies {
            if seen.insert(dep.name.clone()) {
                out.push(CliDepStatus {
                    available: is_on_path(&dep.name),
                    name: dep.name,
                });
            }
        }
    }
    Ok(out)
}

//! Dependency graph builder — annotated tree for a root type.
//!
//! Edge kinds are fixed: prompt → {persona, context, skill, workflow},
//! workflow → skill, persona → context. Downward-only edges make the graph a
//! DAG by construction; the `seen` map keeps the dedup rule observable via
//! the `deduped` flag on repeat visits.

use crate::resolver::{resolve, ResolvedType};
use agentx_core::{manifest, Category, Error, Manifest, Result, Source, TypePath};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub type_path: TypePath,
    pub category: Category,
    /// Present on first visits; deduped leaves carry no resolution.
    pub resolved: Option<ResolvedType>,
    pub children: Vec<DependencyNode>,
    pub deduped: bool,
    pub installed: bool,
}

impl DependencyNode {
    /// Nodes marked installed anywhere in the tree.
    pub fn installed_count(&self) -> usize {
        usize::from(self.installed)
            + self
                .children
                .iter()
                .map(DependencyNode::installed_count)
                .sum::<usize>()
    }
}

/// Build the annotated dependency tree rooted at `root`. Fails fast: an
/// unresolvable dependency anywhere aborts the whole tree.
pub fn build_tree(
    root: &TypePath,
    sources: &[Source],
    installed_root: &Path,
) -> Result<DependencyNode> {
    let mut seen = HashSet::new();
    build_node(root, sources, installed_root, &mut seen)
}

fn build_node(
    type_path: &TypePath,
    sources: &[Source],
    installed_root: &Path,
    seen: &mut HashSet<String>,
) -> Result<DependencyNode> {
    if !seen.insert(type_path.as_str().to_string()) {
        return Ok(DependencyNode {
            type_path: type_path.clone(),
            category: type_path.category(),
            resolved: None,
            children: Vec::new(),
            deduped: true,
            installed: false,
        });
    }

    let resolved = resolve(type_path, sources)?;
    let installed = installed_root.join(type_path.as_str()).is_dir();
    let parsed = manifest::parse_typed(&resolved.manifest_path)?;

    let mut children = Vec::new();
    for dep in extract_dependencies(&parsed) {
        if dep == *type_path {
            return Err(Error::SelfDependency(type_path.to_string()));
        }
        children.push(build_node(&dep, sources, installed_root, seen)?);
    }

    Ok(DependencyNode {
        type_path: type_path.clone(),
        category: type_path.category(),
        resolved: Some(resolved),
        children,
        deduped: false,
        installed,
    })
}

/// Type-level outgoing edges, in manifest order. Workflow step duplicates
/// are preserved at this level; the tree marks repeats as deduped.
pub fn extract_dependencies(parsed: &Manifest) -> Vec<TypePath> {
    match parsed {
        Manifest::Prompt(p) => p
            .persona
            .iter()
            .chain(p.context.iter())
            .chain(p.skills.iter())
            .chain(p.workflows.iter())
            .cloned()
            .collect(),
        Manifest::Workflow(w) => w.steps.iter().map(|s| s.skill.clone()).collect(),
        Manifest::Persona(p) => p.context.clone(),
        Manifest::Context(_) | Manifest::Skill(_) | Manifest::Template(_) => Vec::new(),
    }
}

//! Type resolution — first source providing a type wins.
//!
//! Stateless: one probe per source in priority order, no recursion across
//! dependencies.

use agentx_core::{find_manifest_in, Category, Error, Result, Source, TypePath};
use std::path::PathBuf;

/// A type-path paired with the concrete source and manifest file providing
/// it. Lives only for the duration of a plan or install call.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub type_path: TypePath,
    pub manifest_path: PathBuf,
    pub source_dir: PathBuf,
    pub source_name: String,
    pub category: Category,
}

/// Locate the first source providing `type_path`, picking the canonical
/// manifest file among the fallbacks.
pub fn resolve(type_path: &TypePath, sources: &[Source]) -> Result<ResolvedType> {
    for source in sources {
        let dir = source.type_dir(type_path);
        if !dir.is_dir() {
            continue;
        }
        if let Some(manifest_path) = find_manifest_in(&dir, type_path.category()) {
            return Ok(ResolvedType {
                type_path: type_path.clone(),
                manifest_path,
                source_dir: dir,
                source_name: source.name.clone(),
                category: type_path.category(),
            });
        }
    }
    Err(Error::NotFound(type_path.to_string()))
}

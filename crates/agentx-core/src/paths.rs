//! Filesystem roots and source assembly — env-var driven, read at startup.
//!
//! Two modes: end-user (everything under `~/.agentx/`) and platform-team
//! (`AGENTX_HOME` points at a checkout holding `catalog/` and `extensions/`).
//! Every root can be overridden individually.

use crate::source::Source;
use std::env;
use std::path::{Path, PathBuf};

/// Resolved directory layout for one invocation.
#[derive(Debug, Clone)]
pub struct Paths {
    /// `~/.agentx`
    pub root: PathBuf,
    /// Materialized types, mirroring type-paths.
    pub installed: PathBuf,
    /// Per-user runtime state (env, profiles, skill registries).
    pub userdata: PathBuf,
    /// The catalog source base.
    pub catalog: PathBuf,
    /// Root whose subdirectories are extension sources.
    pub extensions: PathBuf,
    /// Discovery cache file.
    pub cache_file: PathBuf,
}

impl Paths {
    /// Resolve from the environment.
    pub fn from_env() -> Self {
        let root = default_root();
        let agentx_home = env::var("AGENTX_HOME").ok().map(|p| expand_tilde(&p));

        let userdata = env::var("AGENTX_USERDATA")
            .map(|p| expand_tilde(&p))
            .unwrap_or_else(|_| root.join("userdata"));
        let installed = env::var("AGENTX_INSTALLED")
            .map(|p| expand_tilde(&p))
            .unwrap_or_else(|_| root.join("installed"));

        let catalog = env::var("AGENTX_CATALOG")
            .map(|p| expand_tilde(&p))
            .unwrap_or_else(|_| match &agentx_home {
                Some(home) => home.join("catalog"),
                None => userdata
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone())
                    .join("catalog-repo")
                    .join("catalog"),
            });
        let extensions = env::var("AGENTX_EXTENSIONS")
            .map(|p| expand_tilde(&p))
            .unwrap_or_else(|_| match &agentx_home {
                Some(home) => home.join("extensions"),
                None => root.join("extensions"),
            });

        let cache_file = root.join("registry-cache.json");

        Self {
            root,
            installed,
            userdata,
            catalog,
            extensions,
            cache_file,
        }
    }

    /// End-user layout rooted somewhere explicit. Test fixtures use this.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            installed: root.join("installed"),
            userdata: root.join("userdata"),
            catalog: root.join("catalog-repo").join("catalog"),
            extensions: root.join("extensions"),
            cache_file: root.join("registry-cache.json"),
            root,
        }
    }

    /// Priority-ordered source list: the catalog first, then each
    /// subdirectory of the extensions root (name = directory name, in name
    /// order for determinism).
    pub fn sources(&self) -> Vec<Source> {
        let mut sources = vec![Source::new("catalog", self.catalog.clone())];
        let Ok(entries) = std::fs::read_dir(&self.extensions) else {
            return sources;
        };
        let mut extension_dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        extension_dirs.sort();
        for dir in extension_dirs {
            if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
                sources.push(Source::new(name, dir.clone()));
            }
        }
        sources
    }

    /// `userdata/skills/<path-without-category>` — a skill's registry dir.
    pub fn skill_registry_dir(&self, without_category: &str) -> PathBuf {
        self.userdata.join("skills").join(without_category)
    }
}

fn default_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".agentx")
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn with_root_layout() {
        let paths = Paths::with_root("/data/agentx");
        assert_eq!(paths.installed, PathBuf::from("/data/agentx/installed"));
        assert_eq!(paths.userdata, PathBuf::from("/data/agentx/userdata"));
        assert_eq!(
            paths.catalog,
            PathBuf::from("/data/agentx/catalog-repo/catalog")
        );
        assert_eq!(
            paths.cache_file,
            PathBuf::from("/data/agentx/registry-cache.json")
        );
    }

    #[test]
    fn sources_catalog_first_then_extensions_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_root(tmp.path());
        fs::create_dir_all(&paths.catalog).unwrap();
        fs::create_dir_all(paths.extensions.join("zeta")).unwrap();
        fs::create_dir_all(paths.extensions.join("acme")).unwrap();
        // stray files under extensions/ are not sources
        fs::write(paths.extensions.join("README.md"), "x").unwrap();

        let sources = paths.sources();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["catalog", "acme", "zeta"]);
        assert_eq!(sources[0].base, paths.catalog);
    }

    #[test]
    fn sources_without_extensions_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_root(tmp.path());
        let sources = paths.sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "catalog");
    }

    #[test]
    fn tilde_expansion() {
        let p = expand_tilde("/absolute/path");
        assert_eq!(p, PathBuf::from("/absolute/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x"), home.join("x"));
        }
    }
}

//! Project configuration — serde structs for `<project>/.agentx/project.yaml`
//!
//! Declares which providers get generated configs (`tools`) and which types
//! are linked (`active`). Writes are atomic (temp file + rename); every
//! mutation re-syncs the providers.

use crate::sync::{sync_project, ProviderSyncResult};
use agentx_core::{Category, Error, Result, TypePath};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_DIR: &str = ".agentx";
pub const PROJECT_FILE: &str = "project.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Provider ids to generate configuration for.
    pub tools: Vec<String>,
    pub active: ActiveTypes,
}

/// One ordered list per linkable kind. Templates are not linkable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveTypes {
    pub personas: Vec<TypePath>,
    pub context: Vec<TypePath>,
    pub skills: Vec<TypePath>,
    pub workflows: Vec<TypePath>,
    pub prompts: Vec<TypePath>,
}

impl ActiveTypes {
    fn list_mut(&mut self, category: Category) -> Option<&mut Vec<TypePath>> {
        match category {
            Category::Persona => Some(&mut self.personas),
            Category::Context => Some(&mut self.context),
            Category::Skill => Some(&mut self.skills),
            Category::Workflow => Some(&mut self.workflows),
            Category::Prompt => Some(&mut self.prompts),
            Category::Template => None,
        }
    }
}

pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join(PROJECT_FILE)
}

impl ProjectConfig {
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = config_path(project_root);
        let raw = fs::read_to_string(&path)?;
        serde_yaml::from_str(&raw).map_err(Error::from)
    }

    /// Atomic write: a half-written project.yaml must never be observable.
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let path = config_path(project_root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_yaml::to_string(self)?;
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Create `.agentx/project.yaml` with the given tools and empty active
/// lists, plus the sibling `overrides/` directory. Fails if the config
/// already exists.
pub fn init(project_root: &Path, tools: Vec<String>) -> Result<ProjectConfig> {
    let path = config_path(project_root);
    if path.exists() {
        return Err(Error::ProjectExists(path));
    }
    fs::create_dir_all(project_root.join(PROJECT_DIR).join("overrides"))?;
    let config = ProjectConfig {
        tools,
        active: ActiveTypes::default(),
    };
    config.save(project_root)?;
    Ok(config)
}

/// Link a type into the section matching its category, then re-sync.
pub fn add_type(
    project_root: &Path,
    type_ref: &TypePath,
    installed_root: &Path,
) -> Result<Vec<ProviderSyncResult>> {
    let mut config = ProjectConfig::load(project_root)?;
    let list = config
        .active
        .list_mut(type_ref.category())
        .ok_or_else(|| Error::NotLinkable(type_ref.category().to_string()))?;
    if list.contains(type_ref) {
        return Err(Error::AlreadyLinked(type_ref.to_string()));
    }
    list.push(type_ref.clone());
    config.save(project_root)?;
    sync_project(project_root, installed_root)
}

/// Unlink a type, then re-sync.
pub fn remove_type(
    project_root: &Path,
    type_ref: &TypePath,
    installed_root: &Path,
) -> Result<Vec<ProviderSyncResult>> {
    let mut config = ProjectConfig::load(project_root)?;
    let list = config
        .active
        .list_mut(type_ref.category())
        .ok_or_else(|| Error::NotLinkable(type_ref.category().to_string()))?;
    let Some(pos) = list.iter().position(|t| t == type_ref) else {
        return Err(Error::NotLinked(type_ref.to_string()));
    };
    list.remove(pos);
    config.save(project_root)?;
    sync_project(project_root, installed_root)
}

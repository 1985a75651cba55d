//! Staleness classification and symlink health per provider.
//!
//! Freshness is mtime-only: the project config file against the generated
//! main document. Content is never inspected.

use crate::project::{config_path, ProjectConfig};
use crate::providers::provider;
use agentx_core::Result;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    NotGenerated,
    Stale,
    UpToDate,
}

impl std::fmt::Display for ProviderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotGenerated => write!(f, "not-generated"),
            Self::Stale => write!(f, "stale"),
            Self::UpToDate => write!(f, "up-to-date"),
        }
    }
}

#[derive(Debug)]
pub struct ProviderStatus {
    pub provider: String,
    pub state: ProviderState,
    /// Entries present in the provider's context subdir.
    pub context_links: usize,
    /// How many of them resolve to an existing target.
    pub healthy_links: usize,
}

/// Classify every provider declared in the project.
pub fn status(project_root: &Path) -> Result<Vec<ProviderStatus>> {
    let config = ProjectConfig::load(project_root)?;
    let config_mtime = mtime(&config_path(project_root));

    let mut out = Vec::new();
    for tool in &config.tools {
        let Some(spec) = provider(tool) else {
            out.push(ProviderStatus {
                provider: tool.clone(),
                state: ProviderState::NotGenerated,
                context_links: 0,
                healthy_links: 0,
            });
            continue;
        };
        let config_dir = project_root.join(spec.config_dir);
        let main_path = if spec.main_doc_at_root {
            project_root.join(spec.main_doc)
        } else {
            config_dir.join(spec.main_doc)
        };

        let state = match mtime(&main_path) {
            None => ProviderState::NotGenerated,
            Some(doc_mtime) => match config_mtime {
                Some(cfg_mtime) if cfg_mtime > doc_mtime => ProviderState::Stale,
                _ => ProviderState::UpToDate,
            },
        };

        let (context_links, healthy_links) = link_health(&config_dir.join(spec.context_subdir));
        out.push(ProviderStatus {
            provider: tool.clone(),
            state,
            context_links,
            healthy_links,
        });
    }
    Ok(out)
}

/// Count context entries and how many resolve. Sidecar `.target` files from
/// the copy fallback are not entries.
fn link_health(context_dir: &Path) -> (usize, usize) {
    let Ok(entries) = fs::read_dir(context_dir) else {
        return (0, 0);
    };
    let mut total = 0;
    let mut healthy = 0;
    for entry in entries.flatten() {
        if entry.path().extension().is_some_and(|e| e == "target") {
            continue;
        }
        total += 1;
        // metadata() follows symlinks; a dangling link errors here
        if fs::metadata(entry.path()).is_ok() {
            healthy += 1;
        }
    }
    (total, healthy)
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

//! Link sync engine — regenerate every provider's artifacts.
//!
//! Reads linked manifests from the installed root, never writes there.
//! Missing manifests and missing symlink targets degrade to warnings; the
//! sync continues with whatever it can generate.

use crate::project::ProjectConfig;
use crate::providers::{provider, ProviderSpec};
use crate::templates::{render_command_doc, render_main_doc, LinkedItem};
use agentx_core::{Manifest, PersonaManifest, Result, Source, TypePath, Warning};
use agentx_core::manifest::parse_typed;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-provider outcome of one sync run.
#[derive(Debug, Default)]
pub struct ProviderSyncResult {
    pub provider: String,
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    pub symlinked: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

/// Regenerate artifacts for every provider in the project's `tools` list.
pub fn sync_project(project_root: &Path, installed_root: &Path) -> Result<Vec<ProviderSyncResult>> {
    let config = ProjectConfig::load(project_root)?;
    let installed = Source::new("installed", installed_root);
    let mut results = Vec::new();
    for tool in &config.tools {
        match provider(tool) {
            Some(spec) => results.push(sync_provider(spec, project_root, &config, &installed)?),
            None => {
                tracing::warn!(provider = %tool, "no spec for provider, skipping");
                results.push(ProviderSyncResult {
                    provider: tool.clone(),
                    warnings: vec![Warning::UnknownProvider {
                        provider: tool.clone(),
                    }],
                    ..Default::default()
                });
            }
        }
    }
    Ok(results)
}

fn sync_provider(
    spec: &ProviderSpec,
    project_root: &Path,
    config: &ProjectConfig,
    installed: &Source,
) -> Result<ProviderSyncResult> {
    let mut result = ProviderSyncResult {
        provider: spec.id.to_string(),
        ..Default::default()
    };
    let config_dir = project_root.join(spec.config_dir);
    fs::create_dir_all(&config_dir)?;

    let persona = config
        .active
        .personas
        .first()
        .and_then(|tp| load_persona(installed, tp, &mut result.warnings));

    let skills = if spec.renders_skills {
        load_items(installed, &config.active.skills, &mut result.warnings)
    } else {
        Vec::new()
    };
    let workflows = if spec.renders_workflows {
        load_items(installed, &config.active.workflows, &mut result.warnings)
    } else {
        Vec::new()
    };

    let main_path = if spec.main_doc_at_root {
        project_root.join(spec.main_doc)
    } else {
        config_dir.join(spec.main_doc)
    };
    let has_context = !config.active.context.is_empty();
    let body = render_main_doc(spec, persona.as_ref(), &skills, &workflows, has_context);
    write_artifact(&main_path, &body, &mut result)?;

    if spec.emits_commands {
        let commands_dir = config_dir.join("commands");
        if !skills.is_empty() || !workflows.is_empty() {
            fs::create_dir_all(&commands_dir)?;
        }
        for item in skills.iter().chain(workflows.iter()) {
            let path = commands_dir.join(format!("{}.md", item.name));
            let body = render_command_doc(item);
            write_artifact(&path, &body, &mut result)?;
        }
    }

    let context_dir = config_dir.join(spec.context_subdir);
    if has_context {
        fs::create_dir_all(&context_dir)?;
    }
    for tp in &config.active.context {
        let target = installed.base.join(tp.as_str());
        if !target.is_dir() {
            result.warnings.push(Warning::LinkTargetMissing {
                context_path: tp.to_string(),
            });
            continue;
        }
        let link = context_dir.join(tp.flattened());
        create_link(&target, &link)?;
        result.symlinked.push(link);
    }

    Ok(result)
}

/// Always rewrite (the mtime is what the staleness check reads), but report
/// `updated` only when the content actually changed.
fn write_artifact(path: &Path, body: &str, result: &mut ProviderSyncResult) -> Result<()> {
    let previous = fs::read_to_string(path).ok();
    fs::write(path, body)?;
    match previous {
        None => result.created.push(path.to_path_buf()),
        Some(prev) if prev != body => result.updated.push(path.to_path_buf()),
        Some(_) => {}
    }
    Ok(())
}

fn load_persona(
    installed: &Source,
    type_path: &TypePath,
    warnings: &mut Vec<Warning>,
) -> Option<PersonaManifest> {
    match load_manifest(installed, type_path) {
        Some(Manifest::Persona(p)) => Some(p),
        _ => {
            warnings.push(Warning::ManifestMissing {
                type_path: type_path.to_string(),
            });
            None
        }
    }
}

fn load_items(
    installed: &Source,
    refs: &[TypePath],
    warnings: &mut Vec<Warning>,
) -> Vec<LinkedItem> {
    let mut items = Vec::new();
    for tp in refs {
        let Some(parsed) = load_manifest(installed, tp) else {
            warnings.push(Warning::ManifestMissing {
                type_path: tp.to_string(),
            });
            continue;
        };
        let inputs = match &parsed {
            Manifest::Skill(skill) => skill
                .inputs
                .iter()
                .map(|input| {
                    let mut description = input.description.clone();
                    if input.required {
                        if !description.is_empty() {
                            description.push(' ');
                        }
                        description.push_str("(required)");
                    }
                    (input.name.clone(), description)
                })
                .collect(),
            Manifest::Workflow(workflow) => workflow
                .steps
                .iter()
                .map(|step| (step.id.clone(), format!("runs `{}`", step.skill)))
                .collect(),
            _ => Vec::new(),
        };
        items.push(LinkedItem {
            name: tp.name().to_string(),
            type_ref: tp.to_string(),
            description: parsed.description().to_string(),
            inputs,
        });
    }
    items
}

fn load_manifest(installed: &Source, type_path: &TypePath) -> Option<Manifest> {
    let manifest_path = installed.find_manifest(type_path)?;
    match parse_typed(&manifest_path) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(type_path = %type_path, error = %e, "installed manifest did not parse");
            None
        }
    }
}

/// Replace whatever sits at `link` with a symlink to `target`.
#[cfg(unix)]
pub fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    match link.symlink_metadata() {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(link)?,
        Ok(_) => fs::remove_file(link)?,
        Err(_) => {}
    }
    std::os::unix::fs::symlink(target, link)
}

/// Without symlinks: copy the directory and record the target in a sidecar
/// the staleness checker ignores.
#[cfg(not(unix))]
pub fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    match link.symlink_metadata() {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(link)?,
        Ok(_) => fs::remove_file(link)?,
        Err(_) => {}
    }
    copy_tree(target, link)?;
    fs::write(
        link.with_extension("target"),
        target.to_string_lossy().as_bytes(),
    )
}

#[cfg(not(unix))]
fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let to = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &to)?;
        } else if entry.file_type()?.is_file() {
            fs::copy(entry.path(), &to)?;
        }
    }
    Ok(())
}

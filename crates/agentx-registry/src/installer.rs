//! Installer — materialize resolved types under the installed root.
//!
//! Single-writer, straight-line execution in plan order. A destination is
//! removed before copying so an interrupted install retries cleanly. Install
//! and hook failures are reported per item; the loop continues.

use crate::planner::InstallPlan;
use crate::provisioner::{ensure_userdata_layout, provision};
use crate::resolver::ResolvedType;
use agentx_core::{is_excluded, manifest, Category, Error, Manifest, Result, TypePath, Warning};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Outcome of executing a plan. Failures and warnings are values the caller
/// renders; nothing here aborts the loop.
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<TypePath>,
    pub failures: Vec<(TypePath, Error)>,
    pub warnings: Vec<Warning>,
    pub skipped: usize,
}

/// Copy a resolved type's source directory to `<installed-root>/<type-path>`.
pub fn install(resolved: &ResolvedType, installed_root: &Path) -> Result<PathBuf> {
    let dest = installed_root.join(resolved.type_path.as_str());
    if dest.exists() {
        fs::remove_dir_all(&dest)
            .map_err(|e| Error::copy_failure(&resolved.source_dir, &dest, e.to_string()))?;
    }
    copy_dir(&resolved.source_dir, &dest)
        .map_err(|e| Error::copy_failure(&resolved.source_dir, &dest, e.to_string()))?;
    tracing::debug!(type_path = %resolved.type_path, dest = %dest.display(), "installed");
    Ok(dest)
}

/// Recursive copy preserving permission bits. Excluded names are skipped;
/// symlinks and other special files are silently skipped.
fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let name = entry.file_name();
        if is_excluded(&name.to_string_lossy()) {
            continue;
        }
        let file_type = entry.file_type()?;
        let to = dst.join(&name);
        if file_type.is_dir() {
            copy_dir(&entry.path(), &to)?;
        } else if file_type.is_file() {
            // fs::copy carries the source permission bits over
            fs::copy(entry.path(), &to)?;
        } else {
            tracing::debug!(path = %entry.path().display(), "skipping special file");
        }
    }
    Ok(())
}

/// Post-install hook: fetch language-runtime dependencies when the type
/// ships a `package.json`. A missing runtime is a warning, a failing package
/// manager is an error.
pub fn install_node_deps(type_path: &TypePath, type_dir: &Path) -> Result<Option<Warning>> {
    install_node_deps_with(type_path, type_dir, &crate::planner::cli_on_path)
}

pub fn install_node_deps_with(
    type_path: &TypePath,
    type_dir: &Path,
    is_on_path: &dyn Fn(&str) -> bool,
) -> Result<Option<Warning>> {
    if !type_dir.join("package.json").is_file() {
        return Ok(None);
    }
    if !is_on_path("node") || !is_on_path("npm") {
        return Ok(Some(Warning::RuntimeMissing {
            type_path: type_path.to_string(),
            runtime: "node".to_string(),
        }));
    }
    let output = Command::new("npm")
        .arg("install")
        .arg("--prefer-offline")
        .current_dir(type_dir)
        .output()
        .map_err(|e| Error::post_install(type_path.as_str(), e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::post_install(
            type_path.as_str(),
            stderr.trim().to_string(),
        ));
    }
    Ok(None)
}

/// Delete an installed type. Its skill registry, if any, is preserved.
pub fn remove(type_path: &TypePath, installed_root: &Path) -> Result<()> {
    let dir = installed_root.join(type_path.as_str());
    if !dir.is_dir() {
        return Err(Error::NotInstalled(type_path.to_string()));
    }
    fs::remove_dir_all(&dir)?;
    Ok(())
}

/// Execute a plan in order: copy, run the post-install hook, provision skill
/// registries. Per-item failures are recorded and the loop moves on.
pub fn install_plan(
    plan: &InstallPlan,
    installed_root: &Path,
    userdata: &Path,
    is_on_path: &dyn Fn(&str) -> bool,
) -> InstallReport {
    let mut report = InstallReport {
        skipped: plan.skipped,
        ..Default::default()
    };
    if let Err(e) = ensure_userdata_layout(userdata) {
        tracing::warn!(error = %e, "could not prepare userdata layout");
    }
    for resolved in &plan.types {
        let dest = match install(resolved, installed_root) {
            Ok(d) => d,
            Err(e) => {
                report.failures.push((resolved.type_path.clone(), e));
                continue;
            }
        };
        match install_node_deps_with(&resolved.type_path, &dest, is_on_path) {
            Ok(Some(warning)) => report.warnings.push(warning),
            Ok(None) => {}
            Err(e) => {
                report.failures.push((resolved.type_path.clone(), e));
                continue;
            }
        }
        if resolved.category == Category::Skill {
            if let Ok(Manifest::Skill(skill)) = manifest::parse_typed(&resolved.manifest_path) {
                match provision(&skill, &resolved.type_path, userdata) {
                    Ok(warnings) => report.warnings.extend(warnings),
                    Err(e) => {
                        report.failures.push((resolved.type_path.clone(), e));
                        continue;
                    }
                }
            }
        }
        report.installed.push(resolved.type_path.clone());
    }
    report
}

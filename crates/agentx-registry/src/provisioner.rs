//! Skill registry provisioner — per-skill runtime state under userdata.
//!
//! Runs after every skill install. Existing `tokens.env` and `config.yaml`
//! are user-owned once written; re-installs only fill gaps. Missing required
//! tokens are warnings, never failures.

use agentx_core::{Result, SkillManifest, TokenSpec, TypePath, Warning};
use std::fs;
use std::path::Path;

/// Provision the registry directory for one installed skill. Skills without
/// a `registry` block get nothing. Returns the collected warnings.
pub fn provision(
    skill: &SkillManifest,
    type_path: &TypePath,
    userdata: &Path,
) -> Result<Vec<Warning>> {
    let Some(registry) = &skill.registry else {
        return Ok(Vec::new());
    };
    let dir = userdata.join("skills").join(type_path.without_category());
    fs::create_dir_all(&dir)?;
    set_mode(&dir, 0o755)?;

    let mut warnings = Vec::new();

    let tokens_path = dir.join("tokens.env");
    if !tokens_path.exists() {
        fs::write(&tokens_path, render_tokens_env(&registry.tokens))?;
        set_mode(&tokens_path, 0o600)?;
        for token in &registry.tokens {
            if token.required && token.default.is_none() {
                warnings.push(Warning::MissingToken {
                    skill: type_path.to_string(),
                    token: token.name.clone(),
                });
            }
        }
    }

    let config_path = dir.join("config.yaml");
    if !config_path.exists() && !registry.config.is_empty() {
        let yaml = serde_yaml::to_string(&registry.config)?;
        let body = format!(
            "# Default configuration for {}\n# Values here are read by the skill at run time.\n{}",
            skill.name, yaml
        );
        fs::write(&config_path, body)?;
        set_mode(&config_path, 0o644)?;
    }

    if !registry.state.is_empty() {
        make_subdir(&dir, "state")?;
    }
    if registry.output.is_some() {
        make_subdir(&dir, "output")?;
    }
    if registry.templates.is_some() {
        make_subdir(&dir, "templates")?;
    }

    Ok(warnings)
}

/// Create the userdata skeleton: `env/` (0700, with `default.env`),
/// `profiles/` (0700), `skills/` (0755). Idempotent.
pub fn ensure_userdata_layout(userdata: &Path) -> Result<()> {
    fs::create_dir_all(userdata)?;
    set_mode(userdata, 0o755)?;

    let env_dir = userdata.join("env");
    fs::create_dir_all(&env_dir)?;
    set_mode(&env_dir, 0o700)?;
    let default_env = env_dir.join("default.env");
    if !default_env.exists() {
        fs::write(&default_env, "# Tokens for skills without a vendor\n")?;
        set_mode(&default_env, 0o600)?;
    }

    let profiles = userdata.join("profiles");
    fs::create_dir_all(&profiles)?;
    set_mode(&profiles, 0o700)?;

    let skills = userdata.join("skills");
    fs::create_dir_all(&skills)?;
    set_mode(&skills, 0o755)?;
    Ok(())
}

/// Generate the initial `tokens.env` body: one comment line per token, then
/// `NAME=<default-or-empty>`.
pub fn render_tokens_env(tokens: &[TokenSpec]) -> String {
    let mut out = String::new();
    for token in tokens {
        let label = token
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&token.name);
        out.push_str("# ");
        out.push_str(label);
        if token.required {
            out.push_str(" (required)");
        }
        out.push('\n');
        out.push_str(&token.name);
        out.push('=');
        out.push_str(token.default.as_deref().unwrap_or(""));
        out.push('\n');
    }
    out
}

/// Read the key/value pairs of a `tokens.env`, in file order. Comment and
/// blank lines are skipped.
pub fn parse_tokens_env(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .filter_map(|line| {
            line.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        })
        .collect()
}

/// Write pairs back out, order preserved.
pub fn serialize_tokens_env(pairs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

fn make_subdir(dir: &Path, name: &str) -> Result<()> {
    let sub = dir.join(name);
    fs::create_dir_all(&sub)?;
    set_mode(&sub, 0o755)?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

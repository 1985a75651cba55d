//! Manifest model — serde structs for the six type kinds.
//!
//! Pure types and parsing only. A manifest is immutable once parsed; nothing
//! outside this module ever sees an untyped map. Dispatch is on the top-level
//! `type` attribute. YAML is the preferred on-disk form, JSON is accepted for
//! `manifest.json`.

use crate::error::{Error, Result};
use crate::typepath::{Category, TypePath};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Canonical set of `type` attribute values.
pub const VALID_TYPES: &[&str] = &["context", "persona", "skill", "workflow", "prompt", "template"];

/// Cheap metadata header shared by every manifest kind. Used for discovery
/// and display; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Category,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vendor: Option<String>,
}

/// Fully typed manifest, discriminated on `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Manifest {
    Context(ContextManifest),
    Persona(PersonaManifest),
    Skill(SkillManifest),
    Workflow(WorkflowManifest),
    Prompt(PromptManifest),
    Template(TemplateManifest),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vendor: Option<String>,
    pub format: String,
    /// Relative file paths inside the type directory, in render order.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonaManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vendor: Option<String>,
    pub expertise: String,
    pub tone: String,
    pub conventions: String,
    /// Context type-paths this persona pulls in.
    #[serde(default)]
    pub context: Vec<TypePath>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vendor: Option<String>,
    pub runtime: Runtime,
    pub topic: String,
    #[serde(default)]
    pub cli_dependencies: Vec<CliDependency>,
    #[serde(default)]
    pub inputs: Vec<SkillInput>,
    #[serde(default)]
    pub outputs: Vec<SkillOutput>,
    pub registry: Option<RegistrySpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Node,
    Go,
}

impl Runtime {
    /// Executable expected on PATH for this runtime.
    pub fn binary(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Go => "go",
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.binary())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CliDependency {
    pub name: String,
    pub min_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillOutput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Per-skill runtime-state declaration. Drives the skill registry
/// provisioner: tokens become `tokens.env`, config becomes `config.yaml`,
/// `state` names files the skill keeps under `state/`, and `output` /
/// `templates` are presence markers for those subdirectories.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrySpec {
    #[serde(default)]
    pub tokens: Vec<TokenSpec>,
    /// Default config values, author key order preserved.
    #[serde(default)]
    pub config: serde_yaml::Mapping,
    #[serde(default)]
    pub state: Vec<String>,
    pub output: Option<serde_yaml::Value>,
    pub templates: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSpec {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub default: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vendor: Option<String>,
    pub runtime: Runtime,
    pub steps: Vec<WorkflowStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub skill: TypePath,
    #[serde(default)]
    pub inputs: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vendor: Option<String>,
    pub persona: Option<TypePath>,
    #[serde(default)]
    pub context: Vec<TypePath>,
    #[serde(default)]
    pub skills: Vec<TypePath>,
    #[serde(default)]
    pub workflows: Vec<TypePath>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vendor: Option<String>,
    pub format: String,
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub default: Option<String>,
}

impl Manifest {
    pub fn category(&self) -> Category {
        match self {
            Self::Context(_) => Category::Context,
            Self::Persona(_) => Category::Persona,
            Self::Skill(_) => Category::Skill,
            Self::Workflow(_) => Category::Workflow,
            Self::Prompt(_) => Category::Prompt,
            Self::Template(_) => Category::Template,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Context(m) => &m.name,
            Self::Persona(m) => &m.name,
            Self::Skill(m) => &m.name,
            Self::Workflow(m) => &m.name,
            Self::Prompt(m) => &m.name,
            Self::Template(m) => &m.name,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            Self::Context(m) => &m.version,
            Self::Persona(m) => &m.version,
            Self::Skill(m) => &m.version,
            Self::Workflow(m) => &m.version,
            Self::Prompt(m) => &m.version,
            Self::Template(m) => &m.version,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Context(m) => &m.description,
            Self::Persona(m) => &m.description,
            Self::Skill(m) => &m.description,
            Self::Workflow(m) => &m.description,
            Self::Prompt(m) => &m.description,
            Self::Template(m) => &m.description,
        }
    }

    pub fn vendor(&self) -> Option<&str> {
        match self {
            Self::Context(m) => m.vendor.as_deref(),
            Self::Persona(m) => m.vendor.as_deref(),
            Self::Skill(m) => m.vendor.as_deref(),
            Self::Workflow(m) => m.vendor.as_deref(),
            Self::Prompt(m) => m.vendor.as_deref(),
            Self::Template(m) => m.vendor.as_deref(),
        }
    }
}

/// Cheap metadata read for discovery and display.
pub fn parse_base(path: &Path) -> Result<BaseManifest> {
    let raw = read_manifest_file(path)?;
    decode(path, &raw)
}

/// Full typed parse used by the resolver and planner.
pub fn parse_typed(path: &Path) -> Result<Manifest> {
    let raw = read_manifest_file(path)?;
    decode(path, &raw)
}

fn read_manifest_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::malformed(path, e.to_string()))
}

fn decode<T: for<'de> Deserialize<'de>>(path: &Path, raw: &str) -> Result<T> {
    let is_json = path.extension().is_some_and(|e| e == "json");
    if is_json {
        serde_json::from_str(raw).map_err(|e| Error::malformed(path, e.to_string()))
    } else {
        serde_yaml::from_str(raw).map_err(|e| Error::malformed(path, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parse_base_reads_header_only() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "manifest.yaml",
            "type: skill\nname: commit-analyzer\nversion: 1.0.0\ndescription: Analyzes commits\nruntime: node\ntopic: scm\nunknown_field: ignored\n",
        );
        let base = parse_base(&path).unwrap();
        assert_eq!(base.name, "commit-analyzer");
        assert_eq!(base.kind, Category::Skill);
        assert_eq!(base.version, "1.0.0");
        assert!(base.tags.is_empty());
    }

    #[test]
    fn parse_base_rejects_unknown_type() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "manifest.yaml",
            "type: widget\nname: x\nversion: 1.0.0\ndescription: d\n",
        );
        let err = parse_base(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedManifest { .. }));
    }

    #[test]
    fn parse_typed_skill() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "manifest.yaml",
            concat!(
                "type: skill\n",
                "name: commit-analyzer\n",
                "version: 1.2.0\n",
                "description: Analyzes commit history\n",
                "vendor: github\n",
                "runtime: node\n",
                "topic: scm\n",
                "cli_dependencies:\n",
                "  - name: git\n",
                "    min_version: '2.30'\n",
                "inputs:\n",
                "  - name: repo\n",
                "    required: true\n",
                "registry:\n",
                "  tokens:\n",
                "    - name: GITHUB_TOKEN\n",
                "      required: true\n",
                "  config:\n",
                "    depth: 50\n",
                "  state: [seen.json]\n",
            ),
        );
        let m = parse_typed(&path).unwrap();
        assert_eq!(m.category(), Category::Skill);
        assert_eq!(m.version(), "1.2.0");
        let Manifest::Skill(skill) = m else { panic!("expected skill") };
        assert_eq!(skill.runtime, Runtime::Node);
        assert_eq!(skill.cli_dependencies[0].name, "git");
        let reg = skill.registry.unwrap();
        assert_eq!(reg.tokens[0].name, "GITHUB_TOKEN");
        assert!(reg.tokens[0].required);
        assert_eq!(reg.state, vec!["seen.json"]);
        assert!(reg.output.is_none());
    }

    #[test]
    fn parse_typed_missing_required_field() {
        let tmp = tempfile::tempdir().unwrap();
        // skill without runtime
        let path = write(
            tmp.path(),
            "manifest.yaml",
            "type: skill\nname: x\nversion: 1.0.0\ndescription: d\ntopic: t\n",
        );
        assert!(matches!(parse_typed(&path), Err(Error::MalformedManifest { .. })));
    }

    #[test]
    fn parse_typed_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "manifest.json",
            r#"{"type":"context","name":"security","version":"1.0.0","description":"d","format":"markdown","sources":["intro.md","rules.md"]}"#,
        );
        let Manifest::Context(ctx) = parse_typed(&path).unwrap() else { panic!("expected context") };
        assert_eq!(ctx.sources, vec!["intro.md", "rules.md"]);
    }

    #[test]
    fn parse_typed_workflow_steps_keep_order_and_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "workflow.yaml",
            concat!(
                "type: workflow\n",
                "name: release\n",
                "version: 0.1.0\n",
                "description: d\n",
                "runtime: node\n",
                "steps:\n",
                "  - id: one\n",
                "    skill: skills/scm/git/commit-analyzer\n",
                "  - id: two\n",
                "    skill: skills/scm/git/commit-analyzer\n",
                "    inputs:\n",
                "      depth: 10\n",
            ),
        );
        let Manifest::Workflow(wf) = parse_typed(&path).unwrap() else { panic!("expected workflow") };
        assert_eq!(wf.steps.len(), 2);
        assert_eq!(wf.steps[0].skill, wf.steps[1].skill);
        assert!(wf.steps[0].inputs.is_empty());
    }

    #[test]
    fn parse_typed_rejects_bad_dependency_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "manifest.yaml",
            "type: persona\nname: p\nversion: 1.0.0\ndescription: d\nexpertise: java\ntone: direct\nconventions: none\ncontext: [widgets/x]\n",
        );
        assert!(matches!(parse_typed(&path), Err(Error::MalformedManifest { .. })));
    }

    #[test]
    fn registry_config_preserves_key_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "manifest.yaml",
            concat!(
                "type: skill\nname: s\nversion: 1.0.0\ndescription: d\nruntime: go\ntopic: t\n",
                "registry:\n  config:\n    zebra: 1\n    alpha: 2\n    mike: 3\n",
            ),
        );
        let Manifest::Skill(skill) = parse_typed(&path).unwrap() else { panic!("expected skill") };
        let keys: Vec<String> = skill
            .registry
            .unwrap()
            .config
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["zebra", "alpha", "mike"]);
    }
}

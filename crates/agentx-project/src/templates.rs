//! Document templates for generated provider artifacts.
//!
//! Plain `{placeholder}` substitution; the section builders feed the main
//! document and per-command files from linked manifests.

use crate::providers::ProviderSpec;
use agentx_core::PersonaManifest;

/// A linked skill or workflow, reduced to what the templates need.
#[derive(Debug, Clone)]
pub struct LinkedItem {
    /// Last path segment; names the command file.
    pub name: String,
    pub type_ref: String,
    pub description: String,
    /// Argument name → description, in declaration order.
    pub inputs: Vec<(String, String)>,
}

const MAIN_HEADER: &str = "\
<!-- Generated by agentx link sync. Edit project.yaml and re-sync instead. -->

# Project assistant configuration

";

const PERSONA_SECTION: &str = "\
## Persona: {name}

{description}

- Expertise: {expertise}
- Tone: {tone}
- Conventions: {conventions}

";

const CONTEXT_SECTION: &str = "\
## Context

Linked context documents live under `{context_dir}/`. Read them before
working in the areas they cover.

";

const COMMAND_DOC: &str = "\
# {name}

{description}

Backed by `{type_ref}`.
";

fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// The provider's main document from `(persona, skills?, workflows?,
/// has-context)`.
pub fn render_main_doc(
    spec: &ProviderSpec,
    persona: Option<&PersonaManifest>,
    skills: &[LinkedItem],
    workflows: &[LinkedItem],
    has_context: bool,
) -> String {
    let mut out = String::from(MAIN_HEADER);

    if let Some(persona) = persona {
        out.push_str(&render_template(
            PERSONA_SECTION,
            &[
                ("name", persona.name.as_str()),
                ("description", persona.description.as_str()),
                ("expertise", persona.expertise.as_str()),
                ("tone", persona.tone.as_str()),
                ("conventions", persona.conventions.as_str()),
            ],
        ));
    }

    if has_context {
        let context_dir = format!("{}/{}", spec.config_dir, spec.context_subdir);
        out.push_str(&render_template(
            CONTEXT_SECTION,
            &[("context_dir", context_dir.as_str())],
        ));
    }

    if spec.renders_skills && !skills.is_empty() {
        out.push_str("## Skills\n\n");
        for item in skills {
            out.push_str(&format!("- `{}`: {}\n", item.type_ref, item.description));
        }
        out.push('\n');
    }

    if spec.renders_workflows && !workflows.is_empty() {
        out.push_str("## Workflows\n\n");
        for item in workflows {
            out.push_str(&format!("- `{}`: {}\n", item.type_ref, item.description));
        }
        out.push('\n');
    }

    out
}

/// One command file from `(description, ref, inputs)`.
pub fn render_command_doc(item: &LinkedItem) -> String {
    let mut out = render_template(
        COMMAND_DOC,
        &[
            ("name", item.name.as_str()),
            ("description", item.description.as_str()),
            ("type_ref", item.type_ref.as_str()),
        ],
    );
    if !item.inputs.is_empty() {
        out.push_str("\n## Arguments\n\n");
        for (name, description) in &item.inputs {
            out.push_str(&format!("- `{}`: {}\n", name, description));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::provider;

    fn persona() -> PersonaManifest {
        let yaml = "type: persona\nname: senior-java-dev\nversion: 1.0.0\ndescription: Seasoned backend engineer\nexpertise: Java and Spring\ntone: direct\nconventions: test-first\n";
        let agentx_core::Manifest::Persona(p) = serde_yaml::from_str(yaml).unwrap() else {
            panic!("expected persona");
        };
        p
    }

    #[test]
    fn main_doc_renders_all_sections() {
        let spec = provider("claude-code").unwrap();
        let skills = vec![LinkedItem {
            name: "commit-analyzer".into(),
            type_ref: "skills/scm/git/commit-analyzer".into(),
            description: "Analyzes commits".into(),
            inputs: vec![],
        }];
        let doc = render_main_doc(spec, Some(&persona()), &skills, &[], true);
        assert!(doc.contains("## Persona: senior-java-dev"));
        assert!(doc.contains("- Expertise: Java and Spring"));
        assert!(doc.contains("`.claude/context/`"));
        assert!(doc.contains("- `skills/scm/git/commit-analyzer`: Analyzes commits"));
        assert!(!doc.contains('{'), "unresolved placeholder in:\n{doc}");
    }

    #[test]
    fn non_rendering_provider_omits_skill_sections() {
        let spec = provider("copilot").unwrap();
        let skills = vec![LinkedItem {
            name: "s".into(),
            type_ref: "skills/s".into(),
            description: "d".into(),
            inputs: vec![],
        }];
        let doc = render_main_doc(spec, None, &skills, &[], false);
        assert!(!doc.contains("## Skills"));
        assert!(!doc.contains("## Context"));
    }

    #[test]
    fn command_doc_lists_arguments() {
        let item = LinkedItem {
            name: "commit-analyzer".into(),
            type_ref: "skills/scm/git/commit-analyzer".into(),
            description: "Analyzes commits".into(),
            inputs: vec![("repo".into(), "repository to scan (required)".into())],
        };
        let doc = render_command_doc(&item);
        assert!(doc.starts_with("# commit-analyzer\n"));
        assert!(doc.contains("Backed by `skills/scm/git/commit-analyzer`"));
        assert!(doc.contains("- `repo`: repository to scan (required)"));
    }
}

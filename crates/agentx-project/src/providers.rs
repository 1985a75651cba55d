//! Provider specs — the single source of truth for per-tool generation.
//!
//! A new provider is a new row here plus its templates; no new logic.

/// How one AI tool consumes generated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSpec {
    pub id: &'static str,
    /// Directory under the project root holding this provider's artifacts.
    pub config_dir: &'static str,
    pub main_doc: &'static str,
    /// Some providers want the main document at the project root instead of
    /// inside the config dir.
    pub main_doc_at_root: bool,
    pub emits_commands: bool,
    pub context_subdir: &'static str,
    pub renders_skills: bool,
    pub renders_workflows: bool,
}

pub const PROVIDERS: [ProviderSpec; 4] = [
    ProviderSpec {
        id: "claude-code",
        config_dir: ".claude",
        main_doc: "CLAUDE.md",
        main_doc_at_root: false,
        emits_commands: true,
        context_subdir: "context",
        renders_skills: true,
        renders_workflows: true,
    },
    ProviderSpec {
        id: "augment",
        config_dir: ".augment",
        main_doc: "augment-guidelines.md",
        main_doc_at_root: false,
        emits_commands: false,
        context_subdir: "context",
        renders_skills: false,
        renders_workflows: false,
    },
    ProviderSpec {
        id: "opencode",
        config_dir: ".opencode",
        main_doc: "AGENTS.md",
        main_doc_at_root: true,
        emits_commands: true,
        context_subdir: "context",
        renders_skills: true,
        renders_workflows: true,
    },
    ProviderSpec {
        id: "copilot",
        config_dir: ".github",
        main_doc: "copilot-instructions.md",
        main_doc_at_root: false,
        emits_commands: false,
        context_subdir: "copilot-context",
        renders_skills: false,
        renders_workflows: false,
    },
];

pub fn provider(id: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|p| p.id == id)
}

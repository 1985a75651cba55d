//! End-to-end tests for agentx-project: link, sync, and status flows

use agentx_core::TypePath;
use agentx_project::*;
use std::fs;
use std::path::{Path, PathBuf};

fn seed_installed(installed: &Path, type_path: &str, yaml: &str) {
    let dir = installed.join(type_path);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("manifest.yaml"), yaml).unwrap();
}

fn fixture(tmp: &Path) -> (PathBuf, PathBuf) {
    let project = tmp.join("project");
    let installed = tmp.join("installed");
    fs::create_dir_all(&project).unwrap();

    seed_installed(
        &installed,
        "personas/p",
        "type: persona\nname: p\nversion: 1.0.0\ndescription: Backend persona\nexpertise: Java\ntone: direct\nconventions: test-first\n",
    );
    seed_installed(
        &installed,
        "context/c",
        "type: context\nname: c\nversion: 1.0.0\ndescription: d\nformat: markdown\nsources: [a.md]\n",
    );
    seed_installed(
        &installed,
        "skills/s",
        "type: skill\nname: s\nversion: 1.0.0\ndescription: Does things\nruntime: node\ntopic: t\ninputs:\n  - name: repo\n    required: true\n",
    );
    (project, installed)
}

// ===========================================================================
// Scenario: full sync for claude-code + opencode
// ===========================================================================

#[test]
fn sync_generates_all_provider_artifacts() {
    let tmp = tempfile::tempdir().unwrap();
    let (project, installed) = fixture(tmp.path());
    init(&project, vec!["claude-code".into(), "opencode".into()]).unwrap();

    add_type(&project, &TypePath::parse("personas/p").unwrap(), &installed).unwrap();
    add_type(&project, &TypePath::parse("context/c").unwrap(), &installed).unwrap();
    let results = add_type(&project, &TypePath::parse("skills/s").unwrap(), &installed).unwrap();
    assert_eq!(results.len(), 2);

    // claude-code artifacts under .claude/
    assert!(project.join(".claude/CLAUDE.md").is_file());
    assert!(project.join(".claude/commands/s.md").is_file());
    let link = project.join(".claude/context/c");
    assert!(link.exists());
    if cfg!(unix) {
        assert_eq!(fs::read_link(&link).unwrap(), installed.join("context/c"));
    }

    // opencode puts the main doc at the project root
    assert!(project.join("AGENTS.md").is_file());
    assert!(!project.join(".opencode/AGENTS.md").exists());
    assert!(project.join(".opencode/commands/s.md").is_file());
    assert!(project.join(".opencode/context/c").exists());

    let claude_md = fs::read_to_string(project.join(".claude/CLAUDE.md")).unwrap();
    assert!(claude_md.contains("## Persona: p"));
    assert!(claude_md.contains("`skills/s`"));

    let command = fs::read_to_string(project.join(".claude/commands/s.md")).unwrap();
    assert!(command.contains("Backed by `skills/s`"));
    assert!(command.contains("- `repo`: (required)"));
}

// ===========================================================================
// Sync idempotence: second run updates, creates nothing
// ===========================================================================

#[test]
fn second_sync_creates_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let (project, installed) = fixture(tmp.path());
    init(&project, vec!["claude-code".into()]).unwrap();
    add_type(&project, &TypePath::parse("skills/s").unwrap(), &installed).unwrap();

    let first = sync_project(&project, &installed).unwrap();
    assert!(first[0].created.is_empty()); // add_type already synced
    assert!(first[0].updated.is_empty()); // content identical, mtime refreshed
    let second = sync_project(&project, &installed).unwrap();
    assert!(second[0].created.is_empty());
    assert!(second[0].updated.is_empty());
}

// ===========================================================================
// Providers that render nothing still get their main doc and context
// ===========================================================================

#[test]
fn copilot_gets_instructions_and_its_own_context_subdir() {
    let tmp = tempfile::tempdir().unwrap();
    let (project, installed) = fixture(tmp.path());
    init(&project, vec!["copilot".into(), "augment".into()]).unwrap();
    add_type(&project, &TypePath::parse("context/c").unwrap(), &installed).unwrap();
    add_type(&project, &TypePath::parse("skills/s").unwrap(), &installed).unwrap();

    assert!(project.join(".github/copilot-instructions.md").is_file());
    assert!(project.join(".github/copilot-context/c").exists());
    assert!(!project.join(".github/commands").exists());

    assert!(project.join(".augment/augment-guidelines.md").is_file());
    assert!(project.join(".augment/context/c").exists());
    assert!(!project.join(".augment/commands").exists());
}

// ===========================================================================
// Staleness classification across the whole project
// ===========================================================================

#[test]
fn status_tracks_sync_lifecycle() {
    let tmp = tempfile::tempdir().unwrap();
    let (project, installed) = fixture(tmp.path());
    init(&project, vec!["claude-code".into(), "opencode".into()]).unwrap();

    for s in status(&project).unwrap() {
        assert_eq!(s.state, ProviderState::NotGenerated);
    }

    add_type(&project, &TypePath::parse("context/c").unwrap(), &installed).unwrap();
    for s in status(&project).unwrap() {
        assert_eq!(s.state, ProviderState::UpToDate);
        assert_eq!(s.context_links, 1);
        assert_eq!(s.healthy_links, 1);
    }

    // removing the installed target makes the link unhealthy but not stale
    fs::remove_dir_all(installed.join("context/c")).unwrap();
    let statuses = status(&project).unwrap();
    assert_eq!(statuses[0].context_links, 1);
    assert_eq!(statuses[0].healthy_links, 0);
    assert_eq!(statuses[0].state, ProviderState::UpToDate);
}

// ===========================================================================
// Relink after target reappears
// ===========================================================================

#[test]
fn resync_replaces_existing_links() {
    let tmp = tempfile::tempdir().unwrap();
    let (project, installed) = fixture(tmp.path());
    init(&project, vec!["claude-code".into()]).unwrap();
    add_type(&project, &TypePath::parse("context/c").unwrap(), &installed).unwrap();

    let results = sync_project(&project, &installed).unwrap();
    assert_eq!(results[0].symlinked.len(), 1);
    let results = sync_project(&project, &installed).unwrap();
    assert_eq!(results[0].symlinked.len(), 1);
    assert!(project.join(".claude/context/c").exists());
    if cfg!(unix) {
        assert_eq!(
            fs::read_link(project.join(".claude/context/c")).unwrap(),
            installed.join("context/c")
        );
    }
}

//! AgentX Registry - discovery, resolution, planning, and installation

pub mod cache;
pub mod discover;
pub mod graph;
pub mod installer;
pub mod planner;
pub mod provisioner;
pub mod resolver;

pub use cache::{discover_cached, DiscoveryCache};
pub use discover::{discover_all, DiscoveredType};
pub use graph::{build_tree, extract_dependencies, DependencyNode};
pub use installer::{install, install_node_deps, install_plan, remove, InstallReport};
pub use planner::{cli_on_path, plan, CliDepStatus, InstallPlan};
pub use provisioner::{
    ensure_userdata_layout, parse_tokens_env, provision, render_tokens_env, serialize_tokens_env,
};
pub use resolver::{resolve, ResolvedType};

//! agentx — package manager and config compiler for AI assistant types
//!
//! Usage:
//!   agentx list                         → discover types across all sources
//!   agentx plan <type-path>             → show the install plan, touch nothing
//!   agentx install <type-path>          → install with dependencies
//!   agentx remove <type-path>           → delete an installed type
//!   agentx project init --tool <id>     → create .agentx/project.yaml
//!   agentx link add|remove|sync|status  → manage provider configs

use agentx_core::{Paths, TypePath};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "agentx",
    about = "Package manager and config compiler for AI assistant types",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every type discoverable across the configured sources
    List,
    /// Show the install plan for a type without touching disk
    Plan {
        type_path: String,
        /// Plan only the named type, ignoring its dependencies
        #[arg(long)]
        no_deps: bool,
    },
    /// Install a type, its dependencies first
    Install {
        type_path: String,
        /// Reinstall only the named type, ignoring its dependencies
        #[arg(long)]
        no_deps: bool,
    },
    /// Remove an installed type (its skill registry is kept)
    Remove { type_path: String },
    /// Project-level configuration
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage linked types and generated provider configs
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create .agentx/project.yaml in the current directory
    Init {
        /// Provider to generate configs for (repeatable)
        #[arg(long = "tool")]
        tools: Vec<String>,
    },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Link a type and re-sync all providers
    Add { type_ref: String },
    /// Unlink a type and re-sync all providers
    Remove { type_ref: String },
    /// Regenerate every provider's artifacts
    Sync,
    /// Show per-provider freshness and symlink health
    Status,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let paths = Paths::from_env();

    match cli.command {
        Commands::List => {
            let types = agentx_registry::discover_cached(&paths.sources(), &paths.cache_file);
            for t in &types {
                println!("{}\t{}\t{}\t[{}]", t.type_path, t.version, t.description, t.source);
            }
            println!("{} types", types.len());
        }

        Commands::Plan { type_path, no_deps } => {
            let tp = TypePath::parse(&type_path)?;
            let plan = agentx_registry::plan(
                &tp,
                &paths.sources(),
                &paths.installed,
                no_deps,
                &agentx_registry::cli_on_path,
            )?;
            for resolved in &plan.types {
                println!("install {} (from {})", resolved.type_path, resolved.source_name);
            }
            for dep in &plan.cli_deps {
                let state = if dep.available { "found" } else { "missing" };
                println!("requires {} ({})", dep.name, state);
            }
            if plan.skipped > 0 {
                println!("{} already installed", plan.skipped);
            }
        }

        Commands::Install { type_path, no_deps } => {
            let tp = TypePath::parse(&type_path)?;
            let plan = agentx_registry::plan(
                &tp,
                &paths.sources(),
                &paths.installed,
                no_deps,
                &agentx_registry::cli_on_path,
            )?;
            let report = agentx_registry::install_plan(
                &plan,
                &paths.installed,
                &paths.userdata,
                &agentx_registry::cli_on_path,
            );
            for installed in &report.installed {
                println!("installed {}", installed);
            }
            if report.skipped > 0 {
                println!("skipped {} already installed", report.skipped);
            }
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }
            for (type_path, error) in &report.failures {
                eprintln!("failed {}: {}", type_path, error);
            }
            if !report.failures.is_empty() {
                anyhow::bail!("{} of {} types failed", report.failures.len(), plan.types.len());
            }
        }

        Commands::Remove { type_path } => {
            let tp = TypePath::parse(&type_path)?;
            agentx_registry::remove(&tp, &paths.installed)?;
            println!("removed {}", tp);
        }

        Commands::Project {
            command: ProjectCommands::Init { tools },
        } => {
            let cwd = std::env::current_dir()?;
            agentx_project::init(&cwd, tools)?;
            println!("initialized {}", agentx_project::config_path(&cwd).display());
        }

        Commands::Link { command } => {
            let cwd = std::env::current_dir()?;
            match command {
                LinkCommands::Add { type_ref } => {
                    let tp = TypePath::parse(&type_ref)?;
                    let results = agentx_project::add_type(&cwd, &tp, &paths.installed)?;
                    print_sync(&results);
                }
                LinkCommands::Remove { type_ref } => {
                    let tp = TypePath::parse(&type_ref)?;
                    let results = agentx_project::remove_type(&cwd, &tp, &paths.installed)?;
                    print_sync(&results);
                }
                LinkCommands::Sync => {
                    let results = agentx_project::sync_project(&cwd, &paths.installed)?;
                    print_sync(&results);
                }
                LinkCommands::Status => {
                    for status in agentx_project::status(&cwd)? {
                        println!(
                            "{}\t{}\t{}/{} context links healthy",
                            status.provider, status.state, status.healthy_links, status.context_links
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_sync(results: &[agentx_project::ProviderSyncResult]) {
    for result in results {
        println!(
            "{}: {} created, {} updated, {} linked",
            result.provider,
            result.created.len(),
            result.updated.len(),
            result.symlinked.len()
        );
        for warning in &result.warnings {
            println!("warning: {}", warning);
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agentx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

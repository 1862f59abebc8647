use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::{self, ConfigError, DisplayConfig};
use crate::core::PackageKey;
use crate::error::{PipgraphError, Result};
use crate::graph::builder::{build, BuildOutcome};
use crate::graph::{viz, DepGraph};
use crate::source;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "pipgraph")]
#[command(about = "Package dependency graph viewer", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    #[arg(long, env = "PIPGRAPH_TOOL", default_value = source::DEFAULT_TOOL)]
    pub tool: String,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Show(ShowArgs),
    Deps(DepsArgs),
    Dependents(DependentsArgs),
    Orphans(OrphansArgs),
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[arg(long, default_value = "tree")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct DepsArgs {
    pub package: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DependentsArgs {
    pub package: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OrphansArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    #[arg(long)]
    pub force: bool,
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let command = cli.command.unwrap_or(Commands::Show(ShowArgs {
        format: "tree".to_string(),
    }));

    match command {
        Commands::Config(args) => handle_config(args, &config_path),
        command => {
            let graph = load_graph(cli.input.as_deref(), &cli.tool, cli.quiet)?;
            match command {
                Commands::Show(args) => handle_show(args, &graph, &config_path),
                Commands::Deps(args) => handle_deps(args, &graph),
                Commands::Dependents(args) => handle_dependents(args, &graph),
                Commands::Orphans(args) => handle_orphans(args, &graph),
                Commands::Config(_) => unreachable!("handled above"),
            }
        }
    }
}

fn load_graph(input: Option<&Path>, tool: &str, quiet: bool) -> Result<DepGraph> {
    let records = match input {
        Some(path) => source::load_from_file(path)?,
        None => source::load_from_tool(tool)?,
    };

    let BuildOutcome { graph, unresolved } = build(&records)?;
    if !quiet && !unresolved.is_empty() {
        output::warn(&format!(
            "dropped {} dependency reference(s) to packages outside the scanned set",
            unresolved.len()
        ));
    }
    Ok(graph)
}

fn handle_show(args: ShowArgs, graph: &DepGraph, config_path: &Path) -> Result<()> {
    match args.format.to_ascii_lowercase().as_str() {
        "tree" => {
            print!("{}", viz::render_tree(graph));
            Ok(())
        }
        "dot" => {
            print!("{}", viz::render_dot(graph));
            Ok(())
        }
        "json" => {
            let display = config::load_or_default(config_path)?;
            let payload = viz::render_payload(graph, &display);
            println!(
                "{}",
                serde_json::to_string_pretty(&payload)
                    .map_err(|err| PipgraphError::Other(anyhow::Error::new(err)))?
            );
            Ok(())
        }
        other => Err(PipgraphError::Other(anyhow::anyhow!(format!(
            "unknown graph format '{}'",
            other
        )))),
    }
}

fn handle_deps(args: DepsArgs, graph: &DepGraph) -> Result<()> {
    let key = known_package(graph, &args.package)?;
    let deps = sorted_keys(graph.successors(&key));

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&deps)
                .map_err(|err| PipgraphError::Other(anyhow::Error::new(err)))?
        );
        return Ok(());
    }

    println!("dependencies of {}:", args.package);
    for dep in deps {
        println!("{}", dep);
    }
    Ok(())
}

fn handle_dependents(args: DependentsArgs, graph: &DepGraph) -> Result<()> {
    let key = known_package(graph, &args.package)?;
    let dependents = sorted_keys(graph.predecessors(&key));

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&dependents)
                .map_err(|err| PipgraphError::Other(anyhow::Error::new(err)))?
        );
        return Ok(());
    }

    println!("dependents of {}:", args.package);
    for dependent in dependents {
        println!("{}", dependent);
    }
    Ok(())
}

fn handle_orphans(args: OrphansArgs, graph: &DepGraph) -> Result<()> {
    let mut orphans: Vec<String> = graph
        .orphans()
        .into_iter()
        .map(|node| node.id.as_str().to_string())
        .collect();
    orphans.sort();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&orphans)
                .map_err(|err| PipgraphError::Other(anyhow::Error::new(err)))?
        );
        return Ok(());
    }

    for orphan in orphans {
        println!("{}", orphan);
    }
    Ok(())
}

fn handle_config(args: ConfigArgs, config_path: &Path) -> Result<()> {
    match args.command {
        ConfigCommand::Init(init) => {
            if config_path.is_file() && !init.force {
                return Err(PipgraphError::Config(ConfigError::ConfigExists(
                    config_path.to_path_buf(),
                )));
            }
            config::save(&DisplayConfig::default(), config_path)?;
            output::info(&format!(
                "wrote default display config to {}",
                config_path.display()
            ));
            Ok(())
        }
    }
}

fn known_package(graph: &DepGraph, package: &str) -> Result<PackageKey> {
    let key = PackageKey::new(package);
    if !graph.contains(&key) {
        return Err(PipgraphError::Other(anyhow::anyhow!(format!(
            "unknown package {}",
            package
        ))));
    }
    Ok(key)
}

fn sorted_keys(keys: Vec<PackageKey>) -> Vec<String> {
    let mut out: Vec<String> = keys
        .into_iter()
        .map(|key| key.as_str().to_string())
        .collect();
    out.sort();
    out.dedup();
    out
}

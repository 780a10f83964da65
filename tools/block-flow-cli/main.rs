// Command-line entry point for block-flow.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use block_flow::categories::toolbox::Toolbox;
use block_flow::codegen;
use block_flow::editor::panels;
use block_flow::{BlockCatalog, EditorConfig, Runner, Workspace, WorkspaceValidator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Editor config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the block definitions and toolbox as JSON
    Catalog,

    /// Check a saved workspace against the generation gates
    Validate {
        /// Workspace file (JSON)
        file: PathBuf,
    },

    /// Print the program generated from a workspace
    Generate {
        /// Workspace file (JSON)
        file: PathBuf,

        /// Print the executable form instead of the display form
        #[arg(long)]
        wrapped: bool,
    },

    /// Generate and execute a workspace, printing the output panel
    Run {
        /// Workspace file (JSON)
        file: PathBuf,

        /// Time limit in seconds, overriding the config
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::from_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

fn load_workspace(catalog: &BlockCatalog, path: &Path) -> Result<Workspace> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workspace '{}'", path.display()))?;
    let mut workspace = Workspace::from_json(&json)
        .with_context(|| format!("Invalid workspace '{}'", path.display()))?;
    catalog.conform(&mut workspace);
    Ok(workspace)
}

/// Validate, printing the diagnostic on failure
fn check(workspace: &Workspace) -> bool {
    match WorkspaceValidator::validate(workspace) {
        Ok(()) => true,
        Err(diagnostic) => {
            eprintln!("{}", diagnostic.message);
            println!("{}", diagnostic.placeholder);
            false
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref())?;
    let catalog = BlockCatalog::standard();

    match cli.command {
        Command::Catalog => {
            let out = json!({
                "blocks": catalog.to_editor_json(),
                "toolbox": Toolbox::standard().to_editor_json(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Validate { file } => {
            let workspace = load_workspace(&catalog, &file)?;
            if !check(&workspace) {
                return Ok(ExitCode::FAILURE);
            }
            println!("ok");
        }
        Command::Generate { file, wrapped } => {
            let workspace = load_workspace(&catalog, &file)?;
            if !check(&workspace) {
                return Ok(ExitCode::FAILURE);
            }
            let program = codegen::generate(&workspace).context("Code generation failed")?;
            if wrapped {
                println!("{}", program.executable);
            } else {
                print!("{}", program.display);
            }
        }
        Command::Run { file, timeout } => {
            if let Some(secs) = timeout {
                config = config.with_timeout_secs(secs);
            }
            let workspace = load_workspace(&catalog, &file)?;
            if !check(&workspace) {
                return Ok(ExitCode::FAILURE);
            }
            let program = codegen::generate(&workspace).context("Code generation failed")?;
            let report = Runner::new(config.runner).run(&program).await;
            println!("{}", panels::render_report(&report));
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

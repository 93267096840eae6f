//! # Planner Host
//!
//! Entry point for the host process wrapped around the `motion` planning
//! core. Performs the same role for this workspace that `klipper-host`
//! performs for the firmware workspace: a CLI that either drops into an
//! interactive shell or runs a scenario once and prints its output.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use planner_host::session::Session;
use planner_host::{batch, config, repl};

/// Host process for the differential-drive path/velocity planner.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a scenario and drop into the interactive waypoint/robot shell.
    Run(RunArgs),
    /// Load a scenario, compute its profile once, and print the JSON wire format.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Path to the scenario TOML file.
    #[arg(short, long, default_value = "scenario.toml")]
    scenario_path: PathBuf,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Path to the scenario TOML file to process.
    #[arg(required = true)]
    scenario_path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run_interactive(args),
        Commands::Batch(args) => run_batch(args),
    }
}

fn run_interactive(args: RunArgs) -> Result<()> {
    info!(scenario_path = ?args.scenario_path, "loading scenario for interactive session");
    let scenario = config::load(&args.scenario_path)?;
    let mut session = Session::new(scenario.waypoints, scenario.robot);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    repl::run(&mut session, stdin.lock(), stdout.lock())
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let json = batch::run(&args.scenario_path)?;
    println!("{json}");
    Ok(())
}

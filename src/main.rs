//! Portalwar CLI - inspect boards, distances and combat from the command line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Portalwar - a two-player board of linked blocks and portals
#[derive(Parser, Debug)]
#[command(name = "portalwar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a scenario board
    Show {
        /// Scenario file (.json)
        #[arg(required = true)]
        scenario: PathBuf,

        /// Turn the board around to face the second player
        #[arg(long)]
        invert: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Moves from a cell to the nearest enemy castle
    Distance {
        /// Scenario file (.json)
        #[arg(required = true)]
        scenario: PathBuf,

        /// Block address as X,Y
        #[arg(long)]
        block: cli::CoordArg,

        /// Position inside the block as X,Y
        #[arg(long)]
        pos: cli::CoordArg,

        /// Player whose enemy castles are measured
        #[arg(long, default_value = "first")]
        owner: cli::PlayerArg,
    },

    /// Resolve a fight between two armies
    Fight {
        /// Winning army as SPEARMEN,ARCHERS,CAVALRY,EXPERIENCE
        #[arg(long)]
        winner: cli::ArmyArg,

        /// Losing army as SPEARMEN,ARCHERS,CAVALRY,EXPERIENCE
        #[arg(long)]
        loser: cli::ArmyArg,
    },

    /// Evaluate every single move of a player
    Evaluate {
        /// Scenario file (.json)
        #[arg(required = true)]
        scenario: PathBuf,

        /// Player to move
        #[arg(short, long, default_value = "first")]
        player: cli::PlayerArg,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Commands::Show {
            scenario,
            invert,
            format,
        } => cli::show::execute(&scenario, invert, format),

        Commands::Distance {
            scenario,
            block,
            pos,
            owner,
        } => cli::distance::execute(&scenario, block, pos, owner),

        Commands::Fight { winner, loser } => cli::fight::execute(winner, loser),

        Commands::Evaluate {
            scenario,
            player,
            format,
        } => cli::evaluate::execute(&scenario, player, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Runs Kaiju Cats simulations from layout and command grid files.
#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub(crate) log_level: String,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub(crate) enum Commands {
    /// Simulate one command grid and report the outcome.
    Simulate {
        #[command(flatten)]
        world: WorldArgs,

        /// Command grid to place before the first turn.
        #[arg(long)]
        commands: Option<PathBuf>,

        /// Writes the accepted command grid to this file.
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Evaluate many command grids against the same layout in parallel.
    Batch {
        #[command(flatten)]
        world: WorldArgs,

        /// Command grid files to evaluate.
        #[arg(required = true)]
        commands: Vec<PathBuf>,
    },
}

/// Options shared by every subcommand that builds a world.
#[derive(Args, Debug, PartialEq)]
pub(crate) struct WorldArgs {
    /// Layout file describing the board.
    #[arg(long)]
    pub(crate) layout: PathBuf,

    /// TOML file with world and run settings.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Overrides the placement budget.
    #[arg(long)]
    pub(crate) budget: Option<u32>,

    /// Overrides the number of turns to play.
    #[arg(long)]
    pub(crate) turn_limit: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub(crate) format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Plain,
    Json,
}

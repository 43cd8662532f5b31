#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Kaiju Cats simulations.

mod args;
mod config;
mod report;

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::Parser;
use kaiju_cats_system_driver::run;
use kaiju_cats_system_placement::{place_grid, CommandGrid};
use kaiju_cats_system_scoring::{ScoreReport, DEFAULT_DISTANCE_PENALTY};
use kaiju_cats_world::{query, World};
use log::{info, LevelFilter};
use rayon::prelude::*;

use crate::{
    args::{Cli, Commands, OutputFormat, WorldArgs},
    config::Settings,
    report::{BatchEntry, BatchOutput, SimulationOutput},
};

/// Entry point for the Kaiju Cats command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = LevelFilter::from_str(&cli.log_level).unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Simulate {
            world,
            commands,
            save,
        } => simulate(&world, commands.as_deref(), save.as_deref()),
        Commands::Batch { world, commands } => batch(&world, &commands),
    }
}

fn simulate(args: &WorldArgs, commands: Option<&Path>, save: Option<&Path>) -> Result<()> {
    let settings = Settings::resolve(args)?;
    let mut world = load_world(&args.layout, &settings)?;

    let rejected = match commands {
        Some(path) => {
            let grid = load_grid(path, &world)?;
            place_grid(&mut world, &grid).len()
        }
        None => 0,
    };
    info!(
        "placed {} commands, {} budget left",
        query::placed_commands(&world).len(),
        query::budget_remaining(&world)
    );

    if let Some(path) = save {
        fs::write(path, CommandGrid::from_world(&world).to_string())
            .with_context(|| format!("failed to save command grid to {}", path.display()))?;
    }

    let summary = run(&mut world, settings.run);
    let output = SimulationOutput::new(ScoreReport::from_world(&world), summary, rejected);
    match args.format {
        OutputFormat::Plain => print!("{}", output.to_plain()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn batch(args: &WorldArgs, files: &[PathBuf]) -> Result<()> {
    let settings = Settings::resolve(args)?;
    let template = load_world(&args.layout, &settings)?;

    let grids = files
        .iter()
        .map(|path| load_grid(path, &template).map(|grid| (path.clone(), grid)))
        .collect::<Result<Vec<_>>>()?;
    info!("evaluating {} command grids", grids.len());

    let entries: Vec<BatchEntry> = grids
        .into_par_iter()
        .map(|(file, grid)| {
            let mut world = template.clone();
            let rejected = place_grid(&mut world, &grid).len();
            let summary = run(&mut world, settings.run);
            let report = ScoreReport::from_world(&world);
            BatchEntry {
                file,
                score: summary.score,
                fitness: report.fitness(DEFAULT_DISTANCE_PENALTY),
                turns: summary.turns_played,
                rejected,
            }
        })
        .collect();

    let output = BatchOutput::new(entries);
    match args.format {
        OutputFormat::Plain => print!("{}", output.to_plain()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn load_world(path: &Path, settings: &Settings) -> Result<World> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    World::from_layout(&text, &settings.world)
        .with_context(|| format!("invalid layout {}", path.display()))
}

fn load_grid(path: &Path, world: &World) -> Result<CommandGrid> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read command grid {}", path.display()))?;
    CommandGrid::parse(&text, query::dimensions(world))
        .with_context(|| format!("invalid command grid {}", path.display()))
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation driver that keeps requesting turns until the run is over.

use kaiju_cats_core::{Command, Event};
use kaiju_cats_world::{self as world, query, World};
use log::debug;
use serde::{Deserialize, Serialize};

/// Number of turns a run lasts unless configured otherwise.
pub const DEFAULT_TURN_LIMIT: u32 = 15;

/// Parameters controlling how long a run lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum number of turns to resolve.
    pub turn_limit: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            turn_limit: DEFAULT_TURN_LIMIT,
        }
    }
}

/// Pure system that emits turn requests until the limit is reached or every
/// cat has settled.
#[derive(Debug)]
pub struct Driver {
    turn_limit: u32,
    turns_played: u32,
    settled: bool,
}

impl Driver {
    /// Creates a driver for a fresh run.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self {
            turn_limit: config.turn_limit,
            turns_played: 0,
            settled: false,
        }
    }

    /// Consumes world events and requests the next turn when the run goes on.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TurnAdvanced { turn } => {
                    self.turns_played = self.turns_played.saturating_add(1);
                    debug!("turn {turn} resolved");
                }
                Event::AllCatsSettled { turn } => {
                    self.settled = true;
                    debug!("all cats settled on turn {turn}");
                }
                _ => {}
            }
        }

        if !self.is_finished() {
            out.push(Command::AdvanceTurn);
        }
    }

    /// Reports whether the driver will stop requesting turns.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.settled || self.turns_played >= self.turn_limit
    }

    /// Turns observed since the driver was created.
    #[must_use]
    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }
}

/// Outcome of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Turns resolved during the run.
    pub turns_played: u32,
    /// Sum of power over every cat that was not defeated.
    pub score: u64,
    /// Whether every cat finished or was defeated before the limit.
    pub settled: bool,
}

/// Plays turns on the world until the driver stops, returning the outcome.
pub fn run(world: &mut World, config: RunConfig) -> RunSummary {
    let mut driver = Driver::new(config);
    let mut events = Vec::new();
    let mut commands = Vec::new();

    driver.handle(&events, &mut commands);
    while !commands.is_empty() {
        events.clear();
        for command in commands.drain(..) {
            world::apply(world, command, &mut events);
        }
        driver.handle(&events, &mut commands);
    }

    let summary = RunSummary {
        turns_played: driver.turns_played(),
        score: query::final_score(world),
        settled: query::is_settled(world),
    };
    debug!(
        "run finished after {} turns with score {}",
        summary.turns_played, summary.score
    );
    summary
}

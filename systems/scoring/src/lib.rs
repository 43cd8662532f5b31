#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score reports summarising how each cat fared.
//!
//! Besides the final score, a report carries the Manhattan distance from every
//! cat that did not finish to its bed. Search strategies use that distance to
//! reward command sets that bring cats closer to home.

use kaiju_cats_core::{CatColor, CatStatus, CellCoord};
use kaiju_cats_world::{query, World};
use serde::Serialize;

/// Penalty per cell of bed distance used by [`ScoreReport::fitness`] callers
/// that have no preference of their own.
pub const DEFAULT_DISTANCE_PENALTY: u64 = 100;

/// Outcome for a single cat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CatScore {
    /// Identity of the cat.
    pub color: CatColor,
    /// Lifecycle state at the end of the run.
    pub status: CatStatus,
    /// Final power.
    pub power: u64,
    /// Cell the cat ended on.
    pub cell: CellCoord,
    /// Manhattan distance to the cat's bed; zero once finished.
    pub distance_to_bed: Option<u32>,
    /// Whether the cat's power counts towards the score.
    pub counted: bool,
}

/// Summary of a world after a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    cats: Vec<CatScore>,
    score: u64,
    turns: u32,
    budget_spent: u32,
    budget_total: u32,
}

impl ScoreReport {
    /// Captures the current state of the world.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let cats = query::cat_view(world)
            .iter()
            .map(|cat| {
                let distance_to_bed = match cat.status {
                    CatStatus::Finished => Some(0),
                    _ => query::bed_cell(world, cat.color)
                        .map(|bed| cat.cell.manhattan_distance(bed)),
                };
                CatScore {
                    color: cat.color,
                    status: cat.status,
                    power: cat.power,
                    cell: cat.cell,
                    distance_to_bed,
                    counted: cat.status != CatStatus::Defeated,
                }
            })
            .collect();

        Self {
            cats,
            score: query::final_score(world),
            turns: query::turn(world),
            budget_spent: query::budget_spent(world),
            budget_total: query::budget_total(world),
        }
    }

    /// Per-cat outcomes in hierarchy order.
    #[must_use]
    pub fn cats(&self) -> &[CatScore] {
        &self.cats
    }

    /// Sum of power over every cat that was not defeated.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Turns resolved before the report was taken.
    #[must_use]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Budget consumed and budget available, as `(spent, total)`.
    #[must_use]
    pub fn budget(&self) -> (u32, u32) {
        (self.budget_spent, self.budget_total)
    }

    /// Sum of bed distances over every cat that has a bed.
    #[must_use]
    pub fn total_distance(&self) -> u32 {
        self.cats
            .iter()
            .filter_map(|cat| cat.distance_to_bed)
            .fold(0u32, u32::saturating_add)
    }

    /// Score minus `distance_penalty` for every cell between a cat and its bed.
    #[must_use]
    pub fn fitness(&self, distance_penalty: u64) -> i128 {
        i128::from(self.score) - i128::from(self.total_distance()) * i128::from(distance_penalty)
    }
}

use kaiju_cats_core::{CatColor, CatSnapshot, CatStatus, CellCoord, Direction};

use crate::config::RosterEntry;

/// Mutable per-cat state owned by the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Cat {
    pub(crate) color: CatColor,
    pub(crate) hierarchy: u32,
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
    power: u64,
    status: CatStatus,
}

impl Cat {
    pub(crate) fn spawn(entry: &RosterEntry, cell: CellCoord) -> Self {
        Self {
            color: entry.color,
            hierarchy: entry.hierarchy,
            cell,
            direction: entry.initial_direction,
            power: entry.initial_power,
            status: CatStatus::Active,
        }
    }

    pub(crate) const fn power(&self) -> u64 {
        self.power
    }

    pub(crate) const fn status(&self) -> CatStatus {
        self.status
    }

    /// Moves the cat through its lifecycle.
    ///
    /// # Panics
    ///
    /// Panics when the transition is not part of the lifecycle table; that is
    /// an engine defect, never a gameplay outcome.
    pub(crate) fn transition(&mut self, next: CatStatus) {
        assert!(
            transition_allowed(self.status, next),
            "cat {} cannot go from {:?} to {:?}",
            self.color,
            self.status,
            next
        );
        self.status = next;
    }

    pub(crate) fn add_power(&mut self, amount: u64) {
        self.power = self.power.saturating_add(amount);
    }

    pub(crate) fn multiply_power(&mut self, factor: u64) {
        self.power = self.power.saturating_mul(factor);
    }

    pub(crate) fn halve_power(&mut self) {
        self.power /= 2;
    }

    pub(crate) fn set_power(&mut self, power: u64) {
        self.power = power;
    }

    pub(crate) fn rebound(&mut self) {
        self.direction = self.direction.opposite();
    }

    pub(crate) fn snapshot(&self) -> CatSnapshot {
        CatSnapshot {
            color: self.color,
            hierarchy: self.hierarchy,
            cell: self.cell,
            direction: self.direction,
            power: self.power,
            status: self.status,
        }
    }
}

const fn transition_allowed(from: CatStatus, to: CatStatus) -> bool {
    use CatStatus::{Active, Defeated, Finished, Stomping, StuckInMud};

    matches!(
        (from, to),
        (Active, StuckInMud | Stomping | Finished | Defeated) | (StuckInMud | Stomping, Active)
    )
}

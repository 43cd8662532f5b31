//! Tunable parameters for building a world.
//!
//! Every struct deserializes with `#[serde(default)]`, so a configuration file
//! only needs to name the values it overrides.

use kaiju_cats_core::{ArrivalBonus, BuildingSize, CatColor, Direction};
use serde::{Deserialize, Serialize};

/// Budget available for command placement when nothing else is configured.
pub const DEFAULT_BUDGET: u32 = 200;

/// Everything a world needs besides its layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Total spend allowed for command placement.
    pub budget: u32,
    /// Cats that may appear in layouts, keyed by color letter.
    pub roster: Vec<RosterEntry>,
    /// Numeric rules applied by tile effects.
    pub rules: Rules,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            roster: default_roster(),
            rules: Rules::default(),
        }
    }
}

impl WorldConfig {
    /// Roster entry describing the cat with the provided color.
    #[must_use]
    pub fn roster_entry(&self, color: CatColor) -> Option<&RosterEntry> {
        self.roster.iter().find(|entry| entry.color == color)
    }
}

/// Starting parameters for one cat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Color letter identifying the cat in layouts.
    pub color: CatColor,
    /// Combat tie-break rank; lower wins.
    pub hierarchy: u32,
    /// Power the cat starts with.
    #[serde(default)]
    pub initial_power: u64,
    /// Heading the cat starts with.
    #[serde(default)]
    pub initial_direction: Direction,
}

impl RosterEntry {
    /// Creates an entry with zero starting power facing east.
    #[must_use]
    pub const fn new(color: CatColor, hierarchy: u32) -> Self {
        Self {
            color,
            hierarchy,
            initial_power: 0,
            initial_direction: Direction::East,
        }
    }

    /// Returns the entry with a different starting power.
    #[must_use]
    pub fn with_initial_power(mut self, initial_power: u64) -> Self {
        self.initial_power = initial_power;
        self
    }

    /// Returns the entry with a different starting heading.
    #[must_use]
    pub fn with_initial_direction(mut self, initial_direction: Direction) -> Self {
        self.initial_direction = initial_direction;
        self
    }
}

fn default_roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new(CatColor::RED, 1),
        RosterEntry::new(CatColor::GREEN, 2),
        RosterEntry::new(CatColor::BLUE, 3),
    ]
}

/// Numeric rules applied by tile effects and bed arrivals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Power granted per destroyed floor of a small building.
    pub small_building_power: u64,
    /// Power granted per destroyed floor of a large building.
    pub large_building_power: u64,
    /// Factor applied to a cat's power by an intact power source.
    pub power_source_multiplier: u64,
    /// Power added by a powerup directive.
    pub powerup_bonus: u64,
    /// Bonus tiers by global arrival order. Arrivals past the end get nothing.
    pub arrival_bonuses: Vec<ArrivalBonus>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            small_building_power: 250,
            large_building_power: 500,
            power_source_multiplier: 2,
            powerup_bonus: 1000,
            arrival_bonuses: vec![
                ArrivalBonus::Add(2000),
                ArrivalBonus::Multiply(3),
                ArrivalBonus::Multiply(5),
            ],
        }
    }
}

impl Rules {
    /// Power granted per floor for buildings of the provided size.
    #[must_use]
    pub const fn power_per_floor(&self, size: BuildingSize) -> u64 {
        match size {
            BuildingSize::Small => self.small_building_power,
            BuildingSize::Large => self.large_building_power,
        }
    }

    /// Bonus awarded to the cat arriving in the provided one-based position.
    #[must_use]
    pub fn arrival_bonus(&self, arrival: u32) -> Option<ArrivalBonus> {
        let index = usize::try_from(arrival.checked_sub(1)?).ok()?;
        self.arrival_bonuses.get(index).copied()
    }
}

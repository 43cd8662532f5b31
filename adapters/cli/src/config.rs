use std::{fs, path::Path};

use anyhow::{Context, Result};
use kaiju_cats_system_driver::RunConfig;
use kaiju_cats_world::WorldConfig;
use serde::Deserialize;

use crate::args::WorldArgs;

/// Settings file layout: a `[world]` table and a `[run]` table, both optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) world: WorldConfig,
    pub(crate) run: RunConfig,
}

impl Settings {
    /// Reads the configured file, if any, then applies command-line overrides.
    pub(crate) fn resolve(args: &WorldArgs) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(budget) = args.budget {
            settings.world.budget = budget;
        }
        if let Some(turn_limit) = args.turn_limit {
            settings.run.turn_limit = turn_limit;
        }
        Ok(settings)
    }

    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use frame_assault_core::{CellCoord, MechBlueprint, WeaponSpec};
use frame_assault_world::WorldConfig;
use serde::Deserialize;

/// Only scenario format understood by this runner.
pub(crate) const SCENARIO_VERSION: u32 = 1;

const DEFAULT_SEED: u64 = 0x0f4a_55a0;
const DEFAULT_TICKS: u64 = 120;
const DEFAULT_ENEMIES: usize = 8;
const DEFAULT_ENEMY_STRUCTURE: i32 = 10;
const DEFAULT_PLAYER_STRUCTURE: i32 = 10;
const DEFAULT_PLAYER_CELL: CellCoord = CellCoord::new(12, 8);

/// Complete description of a headless skirmish.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Format version of the file.
    pub(crate) version: u32,
    /// Seed of the simulation generator.
    pub(crate) seed: u64,
    /// Number of ticks to simulate.
    pub(crate) ticks: u64,
    /// Number of generated enemies.
    pub(crate) enemies: usize,
    /// Starting structure of every generated enemy.
    pub(crate) enemy_structure: i32,
    /// Player inputs, one symbol per tick.
    pub(crate) script: String,
    /// World tunables.
    pub(crate) world: WorldConfig,
    /// Player mech construction parameters.
    pub(crate) player: MechBlueprint,
    /// Cells blocked by static obstacles.
    pub(crate) obstacles: Vec<CellCoord>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            version: SCENARIO_VERSION,
            seed: DEFAULT_SEED,
            ticks: DEFAULT_TICKS,
            enemies: DEFAULT_ENEMIES,
            enemy_structure: DEFAULT_ENEMY_STRUCTURE,
            script: String::new(),
            world: WorldConfig::default(),
            player: MechBlueprint {
                name: "Player".to_owned(),
                structure: DEFAULT_PLAYER_STRUCTURE,
                cell: DEFAULT_PLAYER_CELL,
                loadout: vec![WeaponSpec::rifle()],
            },
            obstacles: Vec::new(),
        }
    }
}

impl Scenario {
    /// Reads and validates the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("invalid scenario {}", path.display()))
    }

    /// Parses and validates a scenario from TOML source.
    pub(crate) fn parse(source: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(source).context("malformed scenario TOML")?;
        if scenario.version != SCENARIO_VERSION {
            bail!(
                "unsupported scenario version {} (expected {SCENARIO_VERSION})",
                scenario.version
            );
        }
        Ok(scenario)
    }
}

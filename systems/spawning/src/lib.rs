#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy roster generation that emits spawn commands for autonomous mechs.
//!
//! Each enemy picks a random origin and tries a fixed set of patrol patterns
//! laid out around it. A pattern is kept when both of its waypoints lie in
//! the play area and on free cells. When every attempt fails the enemy
//! wanders with a random walk from the last origin tried.

use frame_assault_core::{
    CellCoord, Command, EnemyBlueprint, MechBlueprint, MovementPlan, PlayArea, WeaponSpec,
};
use rand::Rng;

const DEFAULT_ATTEMPTS: u32 = 10;
const DEFAULT_STRUCTURE: i32 = 10;
const ORIGIN_SPREAD: i32 = 15;

const BLOCK_MARGIN: i32 = 2;
const BLOCK_WIDTH: i32 = 8;
const BLOCK_HEIGHT: i32 = 6;

/// Waypoint offsets from the origin, tried in order.
const PATROL_PATTERNS: [[(i32, i32); 2]; 3] = [
    [(BLOCK_MARGIN, 1), (BLOCK_MARGIN + BLOCK_WIDTH, 1)],
    [(BLOCK_MARGIN, 0), (BLOCK_MARGIN, BLOCK_HEIGHT)],
    [(BLOCK_MARGIN, 1), (BLOCK_MARGIN + BLOCK_WIDTH / 2, BLOCK_HEIGHT / 2)],
];

/// Name and weapon preset of one roster slot.
#[derive(Clone, Copy, Debug)]
struct EnemyTemplate {
    name: &'static str,
    weapon: fn() -> WeaponSpec,
}

const ENEMY_TEMPLATES: [EnemyTemplate; 8] = [
    EnemyTemplate {
        name: "Mech A",
        weapon: WeaponSpec::rifle,
    },
    EnemyTemplate {
        name: "Mech B",
        weapon: WeaponSpec::rifle,
    },
    EnemyTemplate {
        name: "Mech C",
        weapon: WeaponSpec::shotgun,
    },
    EnemyTemplate {
        name: "Mech D",
        weapon: WeaponSpec::shotgun,
    },
    EnemyTemplate {
        name: "Mech E",
        weapon: WeaponSpec::sword,
    },
    EnemyTemplate {
        name: "Mech F",
        weapon: WeaponSpec::sword,
    },
    EnemyTemplate {
        name: "Mech G",
        weapon: WeaponSpec::fist,
    },
    EnemyTemplate {
        name: "Mech H",
        weapon: WeaponSpec::fist,
    },
];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    enemy_count: usize,
    structure: i32,
    attempts: u32,
}

impl Config {
    /// Creates a configuration that generates `enemy_count` enemies.
    #[must_use]
    pub const fn new(enemy_count: usize) -> Self {
        Self {
            enemy_count,
            structure: DEFAULT_STRUCTURE,
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    /// Overrides the starting structure of every generated enemy.
    #[must_use]
    pub const fn with_structure(mut self, structure: i32) -> Self {
        self.structure = structure;
        self
    }

    /// Overrides how many origins are tried before falling back.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

/// Pure system that emits one spawn command per generated enemy.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generates the enemy roster and appends the spawn commands to `out`.
    ///
    /// `is_occupied` reports cells already taken by obstacles or mechs.
    pub fn handle<R>(
        &self,
        area: PlayArea,
        is_occupied: impl Fn(CellCoord) -> bool,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: Rng + ?Sized,
    {
        for index in 0..self.config.enemy_count {
            let template = ENEMY_TEMPLATES[index % ENEMY_TEMPLATES.len()];
            let (cell, movement) = self.place(area, &is_occupied, rng);

            tracing::debug!(name = template.name, %cell, ?movement, "enemy generated");
            out.push(Command::SpawnEnemy {
                blueprint: EnemyBlueprint {
                    mech: MechBlueprint {
                        name: template.name.to_owned(),
                        structure: self.config.structure,
                        cell,
                        loadout: vec![(template.weapon)()],
                    },
                    movement,
                },
            });
        }
    }

    fn place<R>(
        &self,
        area: PlayArea,
        is_occupied: &impl Fn(CellCoord) -> bool,
        rng: &mut R,
    ) -> (CellCoord, MovementPlan)
    where
        R: Rng + ?Sized,
    {
        let mut origin = CellCoord::ORIGIN;
        for _ in 0..self.config.attempts {
            origin = random_origin(rng);
            if let Some(waypoints) = patrol_waypoints(origin, area, is_occupied) {
                return (origin, MovementPlan::Patrol { waypoints });
            }
        }

        tracing::warn!(
            attempts = self.config.attempts,
            %origin,
            "no valid patrol points found, using random walk"
        );
        (origin, MovementPlan::RandomWalk)
    }
}

fn random_origin<R>(rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    CellCoord::new(
        rng.gen_range(-ORIGIN_SPREAD..ORIGIN_SPREAD),
        rng.gen_range(-ORIGIN_SPREAD..ORIGIN_SPREAD),
    )
}

/// First patrol pattern around `origin` whose waypoints are in bounds and free.
fn patrol_waypoints(
    origin: CellCoord,
    area: PlayArea,
    is_occupied: &impl Fn(CellCoord) -> bool,
) -> Option<Vec<CellCoord>> {
    PATROL_PATTERNS.iter().find_map(|pattern| {
        let waypoints: Vec<CellCoord> = pattern
            .iter()
            .map(|&(dx, dy)| origin.offset(dx, dy))
            .collect();
        let usable = waypoints
            .iter()
            .all(|&cell| area.contains(cell) && !is_occupied(cell));
        usable.then_some(waypoints)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_valid_pattern_wins() {
        let origin = CellCoord::new(0, 0);
        let area = PlayArea::default();

        assert_eq!(
            patrol_waypoints(origin, area, &|_: CellCoord| false),
            Some(vec![CellCoord::new(2, 1), CellCoord::new(10, 1)])
        );

        let blocked = CellCoord::new(10, 1);
        assert_eq!(
            patrol_waypoints(origin, area, &|cell: CellCoord| cell == blocked),
            Some(vec![CellCoord::new(2, 0), CellCoord::new(2, 6)])
        );

        let blocked = [CellCoord::new(10, 1), CellCoord::new(2, 6)];
        assert_eq!(
            patrol_waypoints(origin, area, &|cell: CellCoord| blocked.contains(&cell)),
            Some(vec![CellCoord::new(2, 1), CellCoord::new(6, 3)])
        );
    }

    #[test]
    fn patterns_leaving_the_area_are_skipped() {
        let area = PlayArea::new(-5, 5, 5);
        assert_eq!(patrol_waypoints(CellCoord::new(0, 0), area, &|_: CellCoord| false), None);
        assert_eq!(
            patrol_waypoints(CellCoord::new(-4, -4), area, &|_: CellCoord| false),
            Some(vec![CellCoord::new(-2, -4), CellCoord::new(-2, 2)])
        );
    }
}

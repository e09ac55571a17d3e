#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Frame Assault engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Combat consumes the [`Target`] capability and reports
//! to a [`Notifier`]; every random draw goes through a [`RollSource`] so that
//! outcomes stay reproducible.

use std::{collections::VecDeque, fmt};

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Frame Assault.";

/// Seedable generator used for every random draw in the simulation.
pub type SimRng = rand_chacha::ChaCha8Rng;

/// Creates the simulation generator from a fixed seed.
#[must_use]
pub fn seeded_rng(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

/// Source of uniform random values consumed by weapons and movement.
pub trait RollSource {
    /// Draws the next value, uniform in `[0, 1)` for real generators.
    fn roll_unit(&mut self) -> f64;
}

impl RollSource for SimRng {
    fn roll_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Roll source that yields the same value on every draw.
///
/// Unlike a real generator it may return exactly `1.0`, which lets callers
/// force a miss against any hit rate below one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRoll(pub f64);

impl RollSource for FixedRoll {
    fn roll_unit(&mut self) -> f64 {
        self.0
    }
}

/// Location of a single grid cell. Coordinates may be negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Cell at the coordinate origin.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell, growing downwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell displaced by the provided amounts on each axis.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy)
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangular region mechs are allowed to occupy.
///
/// Both axes share the same lower bound; each axis has its own inclusive
/// upper bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayArea {
    min_coordinate: i32,
    max_x: i32,
    max_y: i32,
}

impl PlayArea {
    /// Creates a play area spanning `[min_coordinate, max_x] × [min_coordinate, max_y]`.
    #[must_use]
    pub const fn new(min_coordinate: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_coordinate,
            max_x,
            max_y,
        }
    }

    /// Lower bound shared by both axes.
    #[must_use]
    pub const fn min_coordinate(&self) -> i32 {
        self.min_coordinate
    }

    /// Inclusive upper bound of the horizontal axis.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Inclusive upper bound of the vertical axis.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Reports whether `cell` lies inside the area, bounds included.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x() >= self.min_coordinate
            && cell.x() <= self.max_x
            && cell.y() >= self.min_coordinate
            && cell.y() <= self.max_y
    }

    /// Moves `cell` onto the nearest cell inside the area.
    #[must_use]
    pub fn clamp(&self, cell: CellCoord) -> CellCoord {
        CellCoord::new(
            cell.x().max(self.min_coordinate).min(self.max_x),
            cell.y().max(self.min_coordinate).min(self.max_y),
        )
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::new(-60, 60, 40)
    }
}

/// Cardinal directions produced by directional input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing `y`.
    Up,
    /// Movement toward increasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
}

impl Direction {
    /// Unit displacement associated with the direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Unique identifier assigned to a mech by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MechId(u32);

impl MechId {
    /// Creates a new mech identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Distinguishes the two actor variants living in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MechKind {
    /// Mech driven by a movement strategy.
    Autonomous,
    /// Mech driven by player input.
    Player,
}

/// The eight letter keys reserved for attack commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttackKey {
    /// Letter `A`.
    A,
    /// Letter `B`.
    B,
    /// Letter `C`.
    C,
    /// Letter `D`.
    D,
    /// Letter `E`.
    E,
    /// Letter `F`.
    F,
    /// Letter `G`.
    G,
    /// Letter `H`.
    H,
}

impl AttackKey {
    /// Every attack key in alphabetical order.
    pub const ALL: [AttackKey; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// Maps a typed character onto its attack key, ignoring case.
    #[must_use]
    pub fn from_char(letter: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.letter() == letter.to_ascii_uppercase())
    }

    /// Upper-case letter bound to the key.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::H => 'H',
        }
    }

    /// Name suffix an enemy must carry to be targeted by the key.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
        }
    }
}

/// Discrete input delivered to the player-driven mech.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerInput {
    /// Move one cell in the given direction.
    Move(Direction),
    /// Attack the enemy bound to the given key.
    Attack(AttackKey),
}

/// Reasons a weapon specification may be rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WeaponSpecError {
    /// The hit probability is not a finite value inside `[0, 1]`.
    #[error("weapon `{name}` has hit rate {hit_rate}, expected a value in [0, 1]")]
    HitRateOutOfRange {
        /// Name of the offending weapon.
        name: String,
        /// Rejected hit probability.
        hit_rate: f64,
    },
}

/// Immutable configuration of a weapon.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawWeaponSpec")]
pub struct WeaponSpec {
    name: String,
    max_range: u32,
    damage: u32,
    hit_rate: f64,
}

impl WeaponSpec {
    /// Creates a weapon specification, validating the hit rate.
    pub fn new(
        name: impl Into<String>,
        max_range: u32,
        damage: u32,
        hit_rate: f64,
    ) -> Result<Self, WeaponSpecError> {
        let name = name.into();
        if !hit_rate.is_finite() || !(0.0..=1.0).contains(&hit_rate) {
            return Err(WeaponSpecError::HitRateOutOfRange { name, hit_rate });
        }
        Ok(Self {
            name,
            max_range,
            damage,
            hit_rate,
        })
    }

    /// Long-range weapon with modest damage.
    #[must_use]
    pub fn rifle() -> Self {
        Self::preset("Rifle", 10, 2, 0.6)
    }

    /// Mid-range weapon trading accuracy for damage.
    #[must_use]
    pub fn shotgun() -> Self {
        Self::preset("Shotgun", 5, 4, 0.7)
    }

    /// Melee weapon that hits hard.
    #[must_use]
    pub fn sword() -> Self {
        Self::preset("Sword", 1, 6, 0.8)
    }

    /// Melee weapon of last resort.
    #[must_use]
    pub fn fist() -> Self {
        Self::preset("Fist", 1, 2, 0.9)
    }

    fn preset(name: &str, max_range: u32, damage: u32, hit_rate: f64) -> Self {
        Self {
            name: name.to_owned(),
            max_range,
            damage,
            hit_rate,
        }
    }

    /// Display name of the weapon.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Furthest Manhattan range, in cells, the weapon can reach.
    #[must_use]
    pub const fn max_range(&self) -> u32 {
        self.max_range
    }

    /// Damage applied whole on a hit.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Per-shot probability of connecting, in `[0, 1]`.
    #[must_use]
    pub const fn hit_rate(&self) -> f64 {
        self.hit_rate
    }
}

#[derive(Deserialize)]
struct RawWeaponSpec {
    name: String,
    max_range: u32,
    damage: u32,
    hit_rate: f64,
}

impl TryFrom<RawWeaponSpec> for WeaponSpec {
    type Error = WeaponSpecError;

    fn try_from(raw: RawWeaponSpec) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.max_range, raw.damage, raw.hit_rate)
    }
}

/// Movement behaviour requested for an autonomous mech.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementPlan {
    /// Wander in a slowly changing random direction.
    RandomWalk,
    /// Walk between the listed waypoints in order, wrapping around.
    Patrol {
        /// Ordered waypoints of the route.
        waypoints: Vec<CellCoord>,
    },
}

/// Construction parameters shared by every mech.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MechBlueprint {
    /// Display name, immutable after creation.
    pub name: String,
    /// Starting and maximum structure.
    pub structure: i32,
    /// Starting cell.
    pub cell: CellCoord,
    /// Weapons in firing order.
    #[serde(default)]
    pub loadout: Vec<WeaponSpec>,
}

/// Construction parameters of an autonomous mech.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBlueprint {
    /// Shared mech parameters.
    pub mech: MechBlueprint,
    /// Requested movement behaviour.
    pub movement: MovementPlan,
}

/// Result of applying damage to a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitOutcome {
    /// The target was already destroyed and nothing changed.
    Ignored,
    /// The target took damage and survived.
    Damaged {
        /// Structure left after the hit.
        remaining: i32,
    },
    /// The target took damage and was destroyed by it.
    Destroyed {
        /// Structure left after the hit, zero or negative.
        remaining: i32,
    },
}

/// Result of a single weapon discharge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShotOutcome {
    /// The target was beyond the weapon's range; nothing was attempted.
    OutOfRange,
    /// The shot was attempted and missed.
    Miss,
    /// The shot connected and produced the contained hit outcome.
    Hit(HitOutcome),
}

impl ShotOutcome {
    /// Reports whether the shot connected.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Reasons a candidate move may be rejected by the validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveRejection {
    /// The candidate cell lies outside the play area.
    OutOfBounds,
    /// Another tracked entity occupies the candidate cell.
    Occupied,
}

/// Anything weapons can be fired at.
pub trait Target {
    /// Display name of the target.
    fn name(&self) -> &str;

    /// Cell currently occupied by the target.
    fn cell(&self) -> CellCoord;

    /// Reports whether the target has been destroyed.
    fn is_destroyed(&self) -> bool;

    /// Applies `damage`, reporting combat messages to `notifier`.
    fn hit(&mut self, damage: u32, notifier: &mut dyn Notifier) -> HitOutcome;
}

/// Message sink that combat events are reported to for display.
pub trait Notifier {
    /// Records a single human-readable message.
    fn add_message(&mut self, text: &str);
}

impl Notifier for Vec<String> {
    fn add_message(&mut self, text: &str) {
        self.push(text.to_owned());
    }
}

/// Bounded notifier that keeps only the most recent messages.
#[derive(Clone, Debug)]
pub struct MessageLog {
    capacity: usize,
    entries: VecDeque<String>,
}

impl MessageLog {
    /// Creates a log retaining at most `capacity` messages.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Iterator over retained messages, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Most recently recorded message, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Number of retained messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no message is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Notifier for MessageLog {
    fn add_message(&mut self, text: &str) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(text.to_owned());
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one fixed-rate tick.
    Tick,
    /// Adds a static physical entity occupying a single cell.
    PlaceObstacle {
        /// Cell the obstacle occupies.
        cell: CellCoord,
    },
    /// Creates the player-driven mech.
    SpawnPlayer {
        /// Construction parameters of the player mech.
        blueprint: MechBlueprint,
    },
    /// Creates an autonomous mech.
    SpawnEnemy {
        /// Construction parameters of the enemy mech.
        blueprint: EnemyBlueprint,
    },
    /// Replaces the list of enemies the player can target.
    SetEnemyRoster {
        /// Enemies in resolution order.
        enemies: Vec<MechId>,
    },
    /// Delivers a discrete input event to the player-driven mech.
    Input {
        /// Input received this frame.
        input: PlayerInput,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started.
        tick: u64,
    },
    /// Confirms that an obstacle was added to the world.
    ObstaclePlaced {
        /// Cell the obstacle occupies.
        cell: CellCoord,
    },
    /// Confirms that a mech joined the active entity set.
    MechSpawned {
        /// Identifier assigned to the mech.
        mech: MechId,
        /// Actor variant of the mech.
        kind: MechKind,
        /// Cell the mech occupies after spawning.
        cell: CellCoord,
    },
    /// Reports that a patrol route was rejected and a random walk substituted.
    PatrolFallback {
        /// Mech that received the fallback strategy.
        mech: MechId,
        /// Human-readable description of the rejected route.
        reason: String,
    },
    /// Confirms that a mech moved between two cells.
    MechMoved {
        /// Identifier of the mech that moved.
        mech: MechId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Reports that a candidate move was rejected and skipped.
    MoveRejected {
        /// Identifier of the mech that attempted the move.
        mech: MechId,
        /// Cell the mech remains in.
        from: CellCoord,
        /// Candidate cell that was refused.
        to: CellCoord,
        /// Why the validator refused the candidate.
        reason: MoveRejection,
    },
    /// Reports the outcome of one weapon discharge.
    ShotResolved {
        /// Mech that fired.
        attacker: MechId,
        /// Mech that was fired at.
        target: MechId,
        /// Name of the weapon that fired.
        weapon: String,
        /// Manhattan range to the target at the time of firing.
        range: u32,
        /// What the shot achieved.
        outcome: ShotOutcome,
    },
    /// Reports that a mech lost structure.
    MechDamaged {
        /// Mech that was damaged.
        mech: MechId,
        /// Damage applied.
        damage: u32,
        /// Structure left after the hit.
        remaining: i32,
    },
    /// Reports that a mech's structure dropped to zero or below.
    MechDestroyed {
        /// Mech that was destroyed.
        mech: MechId,
    },
    /// Confirms that a destroyed mech left the active entity set.
    MechRemoved {
        /// Mech that was removed.
        mech: MechId,
    },
}

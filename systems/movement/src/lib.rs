#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement strategies that propose the next cell for autonomous mechs.
//!
//! Strategies accumulate fractional progress each call and only emit whole
//! cell displacements once an axis has built up a full step. This yields
//! slow, smooth movement on a grid with single-cell resolution. Strategies
//! never validate their proposals; the world decides whether a candidate is
//! committed.

use std::f64::consts::TAU;

use frame_assault_core::{CellCoord, MovementPlan, PlayArea, RollSource};
use thiserror::Error;

/// Fraction of a cell covered by a single call.
const MOVE_STEP: f64 = 0.1;
/// Probability that a random walk picks a new heading on any call.
const DIRECTION_CHANGE_CHANCE: f64 = 0.1;
/// Accumulated magnitude required before a whole cell is emitted.
const STEP_THRESHOLD: f64 = 1.0;

/// Reasons a patrol route may be rejected at construction.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PatrolError {
    /// Fewer than two waypoints were supplied.
    #[error("patrol route needs at least 2 waypoints, got {count}")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        count: usize,
    },
    /// A waypoint lies outside the play area.
    #[error("patrol waypoint {index} at {waypoint} is outside the play area")]
    WaypointOutOfBounds {
        /// Position of the waypoint within the route.
        index: usize,
        /// Rejected waypoint.
        waypoint: CellCoord,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct StepAccumulator {
    x: f64,
    y: f64,
}

impl StepAccumulator {
    fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    fn accumulate(&mut self, dx: f64, dy: f64) {
        self.x += dx * MOVE_STEP;
        self.y += dy * MOVE_STEP;
    }

    fn drain(&mut self) -> (i32, i32) {
        (drain_axis(&mut self.x), drain_axis(&mut self.y))
    }
}

fn drain_axis(progress: &mut f64) -> i32 {
    if progress.abs() < STEP_THRESHOLD {
        return 0;
    }
    let whole = progress.round();
    *progress -= whole;
    whole as i32
}

/// Wanders in a heading that changes at random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomWalk {
    area: PlayArea,
    heading: Option<f64>,
    progress: StepAccumulator,
}

impl RandomWalk {
    /// Creates a random walk confined to `area`.
    #[must_use]
    pub fn new(area: PlayArea) -> Self {
        Self {
            area,
            heading: None,
            progress: StepAccumulator::default(),
        }
    }

    /// Current heading in radians, if one has been drawn.
    #[must_use]
    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    /// Proposes the cell to move to from `current`.
    pub fn next_move(&mut self, current: CellCoord, roll: &mut dyn RollSource) -> CellCoord {
        let heading = self.steer(roll);
        self.progress.accumulate(heading.cos(), heading.sin());
        let (dx, dy) = self.progress.drain();
        self.area.clamp(current.offset(dx, dy))
    }

    fn steer(&mut self, roll: &mut dyn RollSource) -> f64 {
        match self.heading {
            Some(heading)
                if !self.progress.is_zero() && roll.roll_unit() >= DIRECTION_CHANGE_CHANCE =>
            {
                heading
            }
            _ => {
                let heading = roll.roll_unit() * TAU;
                self.heading = Some(heading);
                self.progress = StepAccumulator::default();
                self.progress.accumulate(heading.cos(), heading.sin());
                heading
            }
        }
    }
}

/// Walks between fixed waypoints in order, wrapping to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Patrol {
    waypoints: Vec<CellCoord>,
    target: usize,
    progress: StepAccumulator,
}

impl Patrol {
    /// Creates a patrol over `waypoints`, all of which must lie inside `area`.
    pub fn new(waypoints: Vec<CellCoord>, area: PlayArea) -> Result<Self, PatrolError> {
        if waypoints.len() < 2 {
            return Err(PatrolError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        if let Some((index, waypoint)) = waypoints
            .iter()
            .enumerate()
            .find(|(_, waypoint)| !area.contains(**waypoint))
        {
            return Err(PatrolError::WaypointOutOfBounds {
                index,
                waypoint: *waypoint,
            });
        }

        Ok(Self {
            waypoints,
            target: 0,
            progress: StepAccumulator::default(),
        })
    }

    /// Waypoints of the route in visiting order.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Index of the waypoint currently being approached.
    #[must_use]
    pub fn target_index(&self) -> usize {
        self.target
    }

    /// Waypoint currently being approached.
    #[must_use]
    pub fn target(&self) -> CellCoord {
        self.waypoints[self.target]
    }

    /// Proposes the cell to move to from `current`.
    pub fn next_move(&mut self, current: CellCoord) -> CellCoord {
        if current == self.target() {
            self.target = (self.target + 1) % self.waypoints.len();
        }

        let target = self.target();
        let (dx, dy) = chebyshev_direction(
            f64::from(target.x()) - f64::from(current.x()),
            f64::from(target.y()) - f64::from(current.y()),
        );
        self.progress.accumulate(dx, dy);
        let (step_x, step_y) = self.progress.drain();
        current.offset(step_x, step_y)
    }
}

/// Scales the vector so its larger component has magnitude one.
fn chebyshev_direction(dx: f64, dy: f64) -> (f64, f64) {
    let (dx_abs, dy_abs) = (dx.abs(), dy.abs());
    if dx_abs == 0.0 && dy_abs == 0.0 {
        return (0.0, 0.0);
    }
    if dx_abs > dy_abs {
        (dx / dx_abs, dy / dx_abs)
    } else {
        (dx / dy_abs, dy / dy_abs)
    }
}

/// Discriminates strategies without exposing their internal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// [`RandomWalk`] strategy.
    RandomWalk,
    /// [`Patrol`] strategy.
    Patrol,
}

/// Movement behaviour owned by an autonomous mech.
#[derive(Clone, Debug, PartialEq)]
pub enum MovementStrategy {
    /// Random wandering.
    RandomWalk(RandomWalk),
    /// Waypoint patrol.
    Patrol(Patrol),
}

impl MovementStrategy {
    /// Builds the strategy described by `plan`.
    pub fn from_plan(plan: &MovementPlan, area: PlayArea) -> Result<Self, PatrolError> {
        match plan {
            MovementPlan::RandomWalk => Ok(Self::RandomWalk(RandomWalk::new(area))),
            MovementPlan::Patrol { waypoints } => {
                Patrol::new(waypoints.clone(), area).map(Self::Patrol)
            }
        }
    }

    /// Builds the strategy described by `plan`, substituting a random walk
    /// when the patrol route is rejected.
    ///
    /// The rejection is handed back alongside the fallback so callers can
    /// report it.
    #[must_use]
    pub fn from_plan_or_random_walk(
        plan: &MovementPlan,
        area: PlayArea,
    ) -> (Self, Option<PatrolError>) {
        match Self::from_plan(plan, area) {
            Ok(strategy) => (strategy, None),
            Err(error) => {
                tracing::warn!(%error, "patrol route rejected, falling back to random walk");
                (Self::RandomWalk(RandomWalk::new(area)), Some(error))
            }
        }
    }

    /// Variant of the strategy.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::RandomWalk(_) => StrategyKind::RandomWalk,
            Self::Patrol(_) => StrategyKind::Patrol,
        }
    }

    /// Proposes the cell to move to from `current`.
    pub fn next_move(&mut self, current: CellCoord, roll: &mut dyn RollSource) -> CellCoord {
        match self {
            Self::RandomWalk(walk) => walk.next_move(current, roll),
            Self::Patrol(patrol) => patrol.next_move(current),
        }
    }
}

/// Gate that lets an autonomous mech move once every `delay` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveScheduler {
    delay: u32,
    elapsed: u32,
}

impl MoveScheduler {
    /// Creates a scheduler that opens every `delay` ticks.
    #[must_use]
    pub const fn new(delay: u32) -> Self {
        Self { delay, elapsed: 0 }
    }

    /// Ticks counted since the gate last opened.
    #[must_use]
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Counts one tick and reports whether a move should be evaluated.
    pub fn advance(&mut self) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= self.delay {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}

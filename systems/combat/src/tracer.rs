use std::collections::VecDeque;

use frame_assault_core::CellCoord;

const SPEED: f64 = 1.0;
const TRAIL_LENGTH: usize = 3;
const ARRIVAL_TOLERANCE: f64 = 0.5;

/// Progress reported after advancing a tracer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracerState {
    /// The tracer is still travelling towards its target.
    InFlight,
    /// The tracer reached its target cell and can be discarded.
    Arrived,
}

/// Cosmetic projectile that travels from the shooter to the target cell.
///
/// Tracers never interact with mechs or obstacles; they only record the path
/// of a shot for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct Tracer {
    origin: CellCoord,
    target: CellCoord,
    position: (f64, f64),
    direction: (f64, f64),
    trail: VecDeque<CellCoord>,
    remaining_steps: u32,
}

impl Tracer {
    /// Launches a tracer from `origin` aimed at `target`.
    #[must_use]
    pub fn new(origin: CellCoord, target: CellCoord) -> Self {
        let dx = f64::from(target.x() - origin.x());
        let dy = f64::from(target.y() - origin.y());
        let distance = dx.hypot(dy);
        let direction = if distance > 0.0 {
            (dx / distance, dy / distance)
        } else {
            (0.0, 0.0)
        };

        // Enough steps to cover the distance with one to spare.
        let remaining_steps = (distance / SPEED).ceil() as u32 + 1;

        Self {
            origin,
            target,
            position: (f64::from(origin.x()), f64::from(origin.y())),
            direction,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            remaining_steps,
        }
    }

    /// Cell the tracer was fired from.
    #[must_use]
    pub fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Cell the tracer is heading to.
    #[must_use]
    pub fn target(&self) -> CellCoord {
        self.target
    }

    /// Cell currently containing the tracer head.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        CellCoord::new(self.position.0.round() as i32, self.position.1.round() as i32)
    }

    /// Most recent cells the head passed through, oldest first.
    pub fn trail(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.trail.iter().copied()
    }

    /// Reports whether the head is within half a cell of the target on both axes.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        (self.position.0 - f64::from(self.target.x())).abs() < ARRIVAL_TOLERANCE
            && (self.position.1 - f64::from(self.target.y())).abs() < ARRIVAL_TOLERANCE
    }

    /// Moves the tracer one step along its heading.
    pub fn advance(&mut self) -> TracerState {
        if self.has_arrived() || self.remaining_steps == 0 {
            return TracerState::Arrived;
        }

        if self.trail.len() == TRAIL_LENGTH {
            let _ = self.trail.pop_front();
        }
        self.trail.push_back(self.cell());

        self.position.0 += self.direction.0 * SPEED;
        self.position.1 += self.direction.1 * SPEED;
        self.remaining_steps -= 1;

        if self.has_arrived() || self.remaining_steps == 0 {
            TracerState::Arrived
        } else {
            TracerState::InFlight
        }
    }
}

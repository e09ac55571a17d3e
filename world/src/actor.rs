use frame_assault_core::{CellCoord, MechId, MechKind, MoveRejection, RollSource};
use frame_assault_system_combat::Mech;
use frame_assault_system_movement::{MovementStrategy, MoveScheduler};

use crate::MovePhase;

/// Entry in the active entity set.
#[derive(Clone, Debug)]
pub(crate) struct Actor {
    pub(crate) id: MechId,
    pub(crate) mech: Mech,
    pub(crate) role: Role,
}

impl Actor {
    pub(crate) fn kind(&self) -> MechKind {
        match self.role {
            Role::Autonomous(_) => MechKind::Autonomous,
            Role::Player(_) => MechKind::Player,
        }
    }
}

/// Variant-specific behaviour layered on the shared combat core.
#[derive(Clone, Debug)]
pub(crate) enum Role {
    Autonomous(AutonomousMech),
    Player(PlayerMech),
}

/// Mech moved by a strategy on a fixed tick cadence.
#[derive(Clone, Debug)]
pub(crate) struct AutonomousMech {
    pub(crate) strategy: MovementStrategy,
    scheduler: MoveScheduler,
    phase: MovePhase,
}

impl AutonomousMech {
    pub(crate) fn new(strategy: MovementStrategy, move_delay_ticks: u32) -> Self {
        Self {
            strategy,
            scheduler: MoveScheduler::new(move_delay_ticks),
            phase: MovePhase::Idle,
        }
    }

    pub(crate) fn phase(&self) -> MovePhase {
        self.phase
    }

    pub(crate) fn scheduler(&self) -> &MoveScheduler {
        &self.scheduler
    }

    /// Counts one tick and, once the gate opens, asks the strategy for a
    /// candidate cell.
    pub(crate) fn evaluate(
        &mut self,
        current: CellCoord,
        roll: &mut dyn RollSource,
    ) -> Option<CellCoord> {
        self.phase = MovePhase::Idle;
        if !self.scheduler.advance() {
            return None;
        }

        let candidate = self.strategy.next_move(current, roll);
        self.phase = MovePhase::Evaluating { candidate };
        Some(candidate)
    }

    /// Records the validator's verdict on the pending candidate.
    pub(crate) fn resolve(&mut self, from: CellCoord, verdict: Result<(), MoveRejection>) {
        let MovePhase::Evaluating { candidate } = self.phase else {
            return;
        };
        self.phase = match verdict {
            Ok(()) => MovePhase::Moved {
                from,
                to: candidate,
            },
            Err(reason) => MovePhase::Rejected { candidate, reason },
        };
    }
}

/// Mech driven by discrete input events.
#[derive(Clone, Debug, Default)]
pub(crate) struct PlayerMech {
    pub(crate) roster: Vec<MechId>,
}

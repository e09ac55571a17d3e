use frame_assault_core::{CellCoord, ShotOutcome, Target, WeaponSpec};

use crate::{FireContext, Tracer};

/// Weapon mounted on a mech.
///
/// The configuration never changes; the position is synced to the holder
/// before every volley so tracers start at the firing mech.
#[derive(Clone, Debug, PartialEq)]
pub struct Weapon {
    spec: WeaponSpec,
    position: CellCoord,
}

impl Weapon {
    /// Mounts a weapon described by `spec`.
    #[must_use]
    pub fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            position: CellCoord::ORIGIN,
        }
    }

    /// Immutable configuration of the weapon.
    #[must_use]
    pub fn spec(&self) -> &WeaponSpec {
        &self.spec
    }

    /// Display name of the weapon.
    #[must_use]
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Cell the weapon fires from.
    #[must_use]
    pub fn position(&self) -> CellCoord {
        self.position
    }

    /// Moves the weapon to its holder's cell.
    pub fn sync_position(&mut self, cell: CellCoord) {
        self.position = cell;
    }

    /// Fires at `target`, returning whether the shot connected.
    pub fn fire<T>(&self, range_to_target: u32, target: &mut T, ctx: &mut FireContext<'_>) -> bool
    where
        T: Target + ?Sized,
    {
        self.discharge(range_to_target, target, ctx).is_hit()
    }

    /// Fires at `target`, reporting the detailed outcome of the shot.
    ///
    /// Targets beyond the maximum range are left untouched and no roll is
    /// drawn. Otherwise one roll decides the shot: values at or below the hit
    /// rate connect and apply the full damage.
    pub fn discharge<T>(
        &self,
        range_to_target: u32,
        target: &mut T,
        ctx: &mut FireContext<'_>,
    ) -> ShotOutcome
    where
        T: Target + ?Sized,
    {
        if range_to_target > self.spec.max_range() {
            return ShotOutcome::OutOfRange;
        }

        let roll = ctx.roll.roll_unit();
        if let Some(tracers) = ctx.tracers.as_mut() {
            tracers.push(Tracer::new(self.position, target.cell()));
        }

        if roll <= self.spec.hit_rate() {
            ShotOutcome::Hit(target.hit(self.spec.damage(), &mut *ctx.notifier))
        } else {
            ShotOutcome::Miss
        }
    }
}

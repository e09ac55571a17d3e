use frame_assault_core::{CellCoord, HitOutcome, MechBlueprint, Notifier, Target, WeaponSpec};

use crate::{FireContext, Shot, Weapon};

/// Combat core shared by autonomous and player-driven mechs.
///
/// Structure only ever decreases, and the destroyed state is derived from it
/// on every query.
#[derive(Clone, Debug, PartialEq)]
pub struct Mech {
    name: String,
    structure: i32,
    max_structure: i32,
    cell: CellCoord,
    previous_cell: CellCoord,
    weapons: Vec<Weapon>,
}

impl Mech {
    /// Creates an unarmed mech at full structure.
    #[must_use]
    pub fn new(name: impl Into<String>, structure: i32, cell: CellCoord) -> Self {
        Self {
            name: name.into(),
            structure,
            max_structure: structure,
            cell,
            previous_cell: cell,
            weapons: Vec::new(),
        }
    }

    /// Builds a mech and its loadout from construction parameters.
    #[must_use]
    pub fn from_blueprint(blueprint: &MechBlueprint) -> Self {
        let mut mech = Self::new(blueprint.name.clone(), blueprint.structure, blueprint.cell);
        for spec in &blueprint.loadout {
            mech.add_weapon(spec.clone());
        }
        mech
    }

    /// Appends a weapon to the end of the loadout.
    pub fn add_weapon(&mut self, spec: WeaponSpec) {
        let mut weapon = Weapon::new(spec);
        weapon.sync_position(self.cell);
        self.weapons.push(weapon);
    }

    /// Display name of the mech.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current structure, negative once overkilled.
    #[must_use]
    pub fn structure(&self) -> i32 {
        self.structure
    }

    /// Structure the mech was created with.
    #[must_use]
    pub fn max_structure(&self) -> i32 {
        self.max_structure
    }

    /// Cell the mech occupies.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Cell cached at the start of the current tick.
    #[must_use]
    pub fn previous_cell(&self) -> CellCoord {
        self.previous_cell
    }

    /// Weapons in loadout order.
    #[must_use]
    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    /// Reports whether structure has reached zero or below.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.structure <= 0
    }

    /// Per-tick bookkeeping: caches the current cell as the previous one.
    pub fn begin_tick(&mut self) {
        self.previous_cell = self.cell;
    }

    /// Commits a move to `cell` without validation.
    pub fn move_to(&mut self, cell: CellCoord) {
        self.cell = cell;
    }

    /// Applies `damage` unless the mech is already destroyed.
    pub fn hit(&mut self, damage: u32, notifier: &mut dyn Notifier) -> HitOutcome {
        if self.is_destroyed() {
            return HitOutcome::Ignored;
        }

        self.structure = self.structure.saturating_sub_unsigned(damage);
        notifier.add_message(&format!("{} takes {}", self.name, damage));

        if self.is_destroyed() {
            notifier.add_message(&format!("{} has been destroyed", self.name));
            HitOutcome::Destroyed {
                remaining: self.structure,
            }
        } else {
            HitOutcome::Damaged {
                remaining: self.structure,
            }
        }
    }

    /// Discharges every weapon at `target` in loadout order.
    ///
    /// Each shot is appended to `shots`; every shot that does not connect is
    /// reported to the notifier as a miss.
    pub fn fire<T>(
        &mut self,
        range_to_target: u32,
        target: &mut T,
        ctx: &mut FireContext<'_>,
        shots: &mut Vec<Shot>,
    ) where
        T: Target + ?Sized,
    {
        for weapon in &mut self.weapons {
            weapon.sync_position(self.cell);
            let outcome = weapon.discharge(range_to_target, target, ctx);
            if !outcome.is_hit() {
                ctx.notifier.add_message(&format!("Missed {}", target.name()));
            }
            shots.push(Shot {
                weapon: weapon.name().to_owned(),
                range: range_to_target,
                outcome,
            });
        }
    }

    /// Attacks `target` with the full loadout and returns the range used.
    ///
    /// Range is measured from the cell cached at the start of the tick to the
    /// target's current cell. Absent or destroyed targets are ignored.
    pub fn attack<T>(
        &mut self,
        target: Option<&mut T>,
        ctx: &mut FireContext<'_>,
        shots: &mut Vec<Shot>,
    ) -> Option<u32>
    where
        T: Target + ?Sized,
    {
        let target = target?;
        if target.is_destroyed() {
            return None;
        }

        let range = self.previous_cell.manhattan_distance(target.cell());
        tracing::debug!(
            attacker = %self.name,
            target = %target.name(),
            range,
            "attacking"
        );
        self.fire(range, target, ctx, shots);
        Some(range)
    }
}

impl Target for Mech {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self) -> CellCoord {
        self.cell
    }

    fn is_destroyed(&self) -> bool {
        Mech::is_destroyed(self)
    }

    fn hit(&mut self, damage: u32, notifier: &mut dyn Notifier) -> HitOutcome {
        Mech::hit(self, damage, notifier)
    }
}

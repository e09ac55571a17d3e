use frame_assault_core::{CellCoord, MechId, MoveRejection, PlayArea};

use crate::actor::Actor;

/// Bounds and collision check for a candidate cell.
///
/// Linear scan over the active entity set; `mover` is excluded so a mech
/// never blocks itself. Tracers are not physical and are not consulted.
pub(crate) fn validate(
    area: &PlayArea,
    actors: &[Actor],
    obstacles: &[CellCoord],
    mover: Option<MechId>,
    candidate: CellCoord,
) -> Result<(), MoveRejection> {
    if !area.contains(candidate) {
        return Err(MoveRejection::OutOfBounds);
    }

    let blocked_by_mech = actors.iter().any(|actor| {
        Some(actor.id) != mover && !actor.mech.is_destroyed() && actor.mech.cell() == candidate
    });
    if blocked_by_mech || obstacles.contains(&candidate) {
        return Err(MoveRejection::Occupied);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{PlayerMech, Role};
    use frame_assault_system_combat::Mech;

    fn actor(id: u32, cell: CellCoord, structure: i32) -> Actor {
        Actor {
            id: MechId::new(id),
            mech: Mech::new(format!("Mech {id}"), structure, cell),
            role: Role::Player(PlayerMech::default()),
        }
    }

    #[test]
    fn accepts_free_in_bounds_cell() {
        let actors = vec![actor(0, CellCoord::new(1, 1), 10)];
        let verdict = validate(
            &PlayArea::default(),
            &actors,
            &[],
            None,
            CellCoord::new(2, 1),
        );
        assert_eq!(verdict, Ok(()));
    }

    #[test]
    fn rejects_cells_outside_every_edge() {
        let area = PlayArea::new(-2, 3, 4);
        for cell in [
            CellCoord::new(-3, 0),
            CellCoord::new(0, -3),
            CellCoord::new(4, 0),
            CellCoord::new(0, 5),
        ] {
            assert_eq!(
                validate(&area, &[], &[], None, cell),
                Err(MoveRejection::OutOfBounds)
            );
        }
        assert_eq!(validate(&area, &[], &[], None, CellCoord::new(3, 4)), Ok(()));
        assert_eq!(validate(&area, &[], &[], None, CellCoord::new(-2, -2)), Ok(()));
    }

    #[test]
    fn rejects_cells_held_by_other_mechs_or_obstacles() {
        let cell = CellCoord::new(5, 5);
        let actors = vec![actor(0, cell, 10)];
        let area = PlayArea::default();

        assert_eq!(
            validate(&area, &actors, &[], Some(MechId::new(1)), cell),
            Err(MoveRejection::Occupied)
        );
        assert_eq!(
            validate(&area, &[], &[cell], None, cell),
            Err(MoveRejection::Occupied)
        );
    }

    #[test]
    fn mover_and_wrecks_do_not_block() {
        let cell = CellCoord::new(-7, 3);
        let actors = vec![actor(0, cell, 10), actor(1, CellCoord::new(-6, 3), 0)];
        let area = PlayArea::default();

        assert_eq!(validate(&area, &actors, &[], Some(MechId::new(0)), cell), Ok(()));
        assert_eq!(
            validate(&area, &actors, &[], Some(MechId::new(0)), CellCoord::new(-6, 3)),
            Ok(())
        );
    }
}

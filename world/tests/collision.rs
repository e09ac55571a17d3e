use std::collections::HashSet;

use frame_assault_core::{
    CellCoord, Command, EnemyBlueprint, MechBlueprint, MechId, MoveRejection, MovementPlan,
    PlayArea,
};
use frame_assault_world::{apply, query, World, WorldConfig};

fn crowded_world(seed: u64) -> World {
    let config = WorldConfig {
        play_area: PlayArea::new(-3, 3, 3),
        move_delay_ticks: 1,
        ..WorldConfig::default()
    };
    let mut world = World::with_seed(config, seed);
    let mut events = Vec::new();

    for cell in [CellCoord::new(0, 0), CellCoord::new(1, -1)] {
        apply(&mut world, Command::PlaceObstacle { cell }, &mut events);
    }
    for (index, cell) in [
        CellCoord::new(-2, -2),
        CellCoord::new(2, 2),
        CellCoord::new(-2, 2),
        CellCoord::new(2, -2),
        CellCoord::new(0, 2),
        CellCoord::new(-1, 0),
    ]
    .into_iter()
    .enumerate()
    {
        apply(
            &mut world,
            Command::SpawnEnemy {
                blueprint: EnemyBlueprint {
                    mech: MechBlueprint {
                        name: format!("Walker {index}"),
                        structure: 5,
                        cell,
                        loadout: Vec::new(),
                    },
                    movement: MovementPlan::RandomWalk,
                },
            },
            &mut events,
        );
    }
    world
}

#[test]
fn walkers_never_share_cells_or_leave_the_area() {
    for seed in [7, 8, 9] {
        let mut world = crowded_world(seed);
        let area = query::play_area(&world);
        let obstacles: HashSet<CellCoord> = query::obstacles(&world).iter().copied().collect();
        let mut events = Vec::new();

        for _ in 0..600 {
            apply(&mut world, Command::Tick, &mut events);

            let mut seen = HashSet::new();
            for mech in query::mech_view(&world).iter() {
                assert!(area.contains(mech.cell), "{} left the area", mech.name);
                assert!(!obstacles.contains(&mech.cell), "{} entered an obstacle", mech.name);
                assert!(seen.insert(mech.cell), "{} overlaps another mech", mech.name);
            }
        }
    }
}

#[test]
fn validator_rejects_occupied_and_out_of_bounds_cells() {
    let world = crowded_world(1);

    assert_eq!(
        query::validate_move(&world, None, CellCoord::new(0, 0)),
        Err(MoveRejection::Occupied)
    );
    assert_eq!(
        query::validate_move(&world, Some(MechId::new(1)), CellCoord::new(-2, -2)),
        Err(MoveRejection::Occupied)
    );
    assert_eq!(
        query::validate_move(&world, Some(MechId::new(0)), CellCoord::new(-2, -2)),
        Ok(())
    );
    assert_eq!(
        query::validate_move(&world, None, CellCoord::new(4, 0)),
        Err(MoveRejection::OutOfBounds)
    );
    assert!(query::is_cell_free(&world, CellCoord::new(1, 1)));
}

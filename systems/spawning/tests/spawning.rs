use frame_assault_core::{seeded_rng, CellCoord, Command, Event, MechKind, MovementPlan, PlayArea};
use frame_assault_system_spawning::{Config, Spawning};
use frame_assault_world::{self as world, query, World, WorldConfig};

fn generate(config: Config, area: PlayArea, seed: u64, occupied: &[CellCoord]) -> Vec<Command> {
    let mut rng = seeded_rng(seed);
    let mut commands = Vec::new();
    Spawning::new(config).handle(
        area,
        |cell| occupied.contains(&cell),
        &mut rng,
        &mut commands,
    );
    commands
}

#[test]
fn roster_cycles_names_and_loadouts() {
    let commands = generate(Config::new(10), PlayArea::default(), 3, &[]);
    assert_eq!(commands.len(), 10);

    let roster: Vec<(String, String)> = commands
        .iter()
        .map(|command| match command {
            Command::SpawnEnemy { blueprint } => (
                blueprint.mech.name.clone(),
                blueprint.mech.loadout[0].name().to_owned(),
            ),
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect();

    let expected = [
        ("Mech A", "Rifle"),
        ("Mech B", "Rifle"),
        ("Mech C", "Shotgun"),
        ("Mech D", "Shotgun"),
        ("Mech E", "Sword"),
        ("Mech F", "Sword"),
        ("Mech G", "Fist"),
        ("Mech H", "Fist"),
        ("Mech A", "Rifle"),
        ("Mech B", "Rifle"),
    ];
    for ((name, weapon), (expected_name, expected_weapon)) in roster.iter().zip(expected) {
        assert_eq!(name, expected_name);
        assert_eq!(weapon, expected_weapon);
    }
}

#[test]
fn generated_enemies_use_configured_structure_and_spread() {
    let commands = generate(Config::new(8).with_structure(4), PlayArea::default(), 19, &[]);
    for command in &commands {
        let Command::SpawnEnemy { blueprint } = command else {
            panic!("unexpected command emitted: {command:?}");
        };
        assert_eq!(blueprint.mech.structure, 4);
        let cell = blueprint.mech.cell;
        assert!((-15..15).contains(&cell.x()), "origin {cell} outside spread");
        assert!((-15..15).contains(&cell.y()), "origin {cell} outside spread");
    }
}

#[test]
fn open_ground_always_yields_horizontal_patrols() {
    let commands = generate(Config::new(8), PlayArea::default(), 5, &[]);
    for command in &commands {
        let Command::SpawnEnemy { blueprint } = command else {
            panic!("unexpected command emitted: {command:?}");
        };
        let origin = blueprint.mech.cell;
        assert_eq!(
            blueprint.movement,
            MovementPlan::Patrol {
                waypoints: vec![origin.offset(2, 1), origin.offset(10, 1)],
            }
        );
    }
}

#[test]
fn fully_blocked_ground_falls_back_to_random_walk() {
    let mut rng = seeded_rng(8);
    let mut commands = Vec::new();
    Spawning::new(Config::new(3).with_attempts(4)).handle(
        PlayArea::default(),
        |_| true,
        &mut rng,
        &mut commands,
    );

    assert_eq!(commands.len(), 3);
    assert!(commands.iter().all(|command| matches!(
        command,
        Command::SpawnEnemy { blueprint } if blueprint.movement == MovementPlan::RandomWalk
    )));
}

#[test]
fn same_seed_generates_same_roster() {
    let occupied = [CellCoord::new(4, 1), CellCoord::new(-3, 2)];
    assert_eq!(
        generate(Config::new(8), PlayArea::default(), 42, &occupied),
        generate(Config::new(8), PlayArea::default(), 42, &occupied)
    );
}

#[test]
fn generated_roster_spawns_into_world_without_fallbacks() {
    let mut world = World::with_seed(WorldConfig::default(), 42);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceObstacle {
            cell: CellCoord::new(0, 0),
        },
        &mut events,
    );

    let mut rng = seeded_rng(42);
    let mut commands = Vec::new();
    Spawning::new(Config::new(8)).handle(
        query::play_area(&world),
        |cell| query::is_occupied(&world, cell),
        &mut rng,
        &mut commands,
    );
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let spawned = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::MechSpawned {
                    kind: MechKind::Autonomous,
                    ..
                }
            )
        })
        .count();
    assert_eq!(spawned, 8);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PatrolFallback { .. })));
}

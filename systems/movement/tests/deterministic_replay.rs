use frame_assault_core::{seeded_rng, CellCoord, PlayArea};
use frame_assault_system_movement::RandomWalk;

fn replay(seed: u64, calls: usize) -> Vec<CellCoord> {
    let mut rng = seeded_rng(seed);
    let mut walk = RandomWalk::new(PlayArea::default());
    let mut cell = CellCoord::ORIGIN;
    let mut trail = Vec::with_capacity(calls);
    for _ in 0..calls {
        cell = walk.next_move(cell, &mut rng);
        trail.push(cell);
    }
    trail
}

#[test]
fn random_walk_is_reproducible_for_a_seed() {
    assert_eq!(replay(0x5eed, 2_000), replay(0x5eed, 2_000));
}

#[test]
fn random_walk_never_jumps_more_than_one_cell() {
    for seed in [1, 7, 42, 0xdead_beef] {
        let mut previous = CellCoord::ORIGIN;
        for cell in replay(seed, 5_000) {
            assert!(
                (cell.x() - previous.x()).abs() <= 1 && (cell.y() - previous.y()).abs() <= 1,
                "seed {seed}: jumped from {previous} to {cell}"
            );
            previous = cell;
        }
    }
}

#[test]
fn random_walk_eventually_leaves_the_start_cell() {
    let trail = replay(3, 2_000);
    assert!(trail.iter().any(|cell| *cell != CellCoord::ORIGIN));
}

#[test]
fn random_walk_stays_within_bounds() {
    let area = PlayArea::new(-2, 2, 2);
    let mut rng = seeded_rng(11);
    let mut walk = RandomWalk::new(area);
    let mut cell = CellCoord::ORIGIN;
    for _ in 0..10_000 {
        cell = walk.next_move(cell, &mut rng);
        assert!(area.contains(cell), "left the area at {cell}");
    }
}

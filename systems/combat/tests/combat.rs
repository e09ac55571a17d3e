use frame_assault_core::{
    seeded_rng, CellCoord, FixedRoll, HitOutcome, RollSource, ShotOutcome, Target, WeaponSpec,
};
use frame_assault_system_combat::{FireContext, Mech, Weapon};

fn spec(max_range: u32, damage: u32, hit_rate: f64) -> WeaponSpec {
    WeaponSpec::new("Test", max_range, damage, hit_rate).expect("valid weapon")
}

#[test]
fn repeated_hits_drive_structure_negative_then_stop() {
    let mut mech = Mech::new("Mech A", 10, CellCoord::ORIGIN);
    let mut messages = Vec::new();

    let remaining: Vec<i32> = (0..4)
        .map(|_| {
            let _ = mech.hit(4, &mut messages);
            mech.structure()
        })
        .collect();

    assert_eq!(remaining, vec![6, 2, -2, -2]);
    assert!(mech.is_destroyed());
    assert_eq!(
        messages
            .iter()
            .filter(|message| message.ends_with("has been destroyed"))
            .count(),
        1
    );
}

#[test]
fn certain_weapon_in_range_always_hits() {
    let weapon = Weapon::new(spec(5, 3, 1.0));
    let mut target = Mech::new("Mech B", 10, CellCoord::new(3, 0));
    let mut messages = Vec::new();
    let mut rng = seeded_rng(99);

    for expected in [7, 4, 1] {
        let mut ctx = FireContext::new(&mut rng, &mut messages);
        assert!(weapon.fire(3, &mut target, &mut ctx));
        assert_eq!(target.structure(), expected);
    }
}

#[test]
fn weapon_out_of_range_has_no_effect() {
    let weapon = Weapon::new(spec(2, 9, 1.0));
    let mut target = Mech::new("Mech C", 10, CellCoord::new(5, 0));
    let mut messages = Vec::new();
    let mut roll = FixedRoll(0.0);
    let mut ctx = FireContext::new(&mut roll, &mut messages);

    assert!(!weapon.fire(5, &mut target, &mut ctx));
    assert_eq!(target.structure(), 10);
    assert!(messages.is_empty());
}

#[test]
fn fixed_rolls_pin_hit_and_miss() {
    let mut messages = Vec::new();
    for hit_rate in [0.0, 0.3, 0.99] {
        let weapon = Weapon::new(spec(4, 1, hit_rate));
        let mut target = Mech::new("Mech D", 10, CellCoord::new(1, 0));

        let mut low = FixedRoll(0.0);
        let mut ctx = FireContext::new(&mut low, &mut messages);
        assert!(weapon.fire(1, &mut target, &mut ctx));

        let mut high = FixedRoll(1.0);
        let mut ctx = FireContext::new(&mut high, &mut messages);
        assert!(!weapon.fire(1, &mut target, &mut ctx));

        assert_eq!(target.structure(), 9);
    }
}

#[test]
fn zero_hit_rate_never_connects_with_real_rolls() {
    let weapon = Weapon::new(spec(10, 5, 0.0));
    let mut target = Mech::new("Mech E", 10, CellCoord::new(1, 1));
    let mut messages = Vec::new();
    let mut rng = seeded_rng(7);

    let hits = (0..200)
        .filter(|_| {
            let mut ctx = FireContext::new(&mut rng, &mut messages);
            weapon.fire(2, &mut target, &mut ctx)
        })
        .count();

    assert_eq!(hits, 0);
    assert_eq!(target.structure(), 10);
}

#[test]
fn volley_against_destroyed_target_is_ignored_mid_loadout() {
    let mut attacker = Mech::new("Player", 10, CellCoord::ORIGIN);
    attacker.add_weapon(spec(3, 6, 1.0));
    attacker.add_weapon(spec(3, 6, 1.0));
    attacker.add_weapon(spec(3, 6, 1.0));
    let mut target = Mech::new("Mech F", 8, CellCoord::new(0, 2));

    let mut messages = Vec::new();
    let mut roll = FixedRoll(0.5);
    let mut ctx = FireContext::new(&mut roll, &mut messages);
    let mut shots = Vec::new();
    let range = attacker.attack(Some(&mut target), &mut ctx, &mut shots);

    assert_eq!(range, Some(2));
    assert_eq!(target.structure(), -4);
    assert_eq!(
        shots.iter().map(|shot| shot.outcome).collect::<Vec<_>>(),
        vec![
            ShotOutcome::Hit(HitOutcome::Damaged { remaining: 2 }),
            ShotOutcome::Hit(HitOutcome::Destroyed { remaining: -4 }),
            ShotOutcome::Hit(HitOutcome::Ignored),
        ]
    );
    assert!(target.is_destroyed());
}

#[test]
fn seeded_volleys_are_reproducible() {
    fn run(seed: u64) -> (i32, Vec<String>) {
        let mut rng = seeded_rng(seed);
        let mut attacker = Mech::new("Player", 10, CellCoord::ORIGIN);
        attacker.add_weapon(WeaponSpec::rifle());
        attacker.add_weapon(WeaponSpec::shotgun());
        let mut target = Mech::new("Mech G", 30, CellCoord::new(2, 2));
        let mut messages = Vec::new();
        let mut shots = Vec::new();
        for _ in 0..5 {
            let mut ctx = FireContext::new(&mut rng, &mut messages);
            let _ = attacker.attack(Some(&mut target), &mut ctx, &mut shots);
        }
        let _ = rng.roll_unit();
        (target.structure(), messages)
    }

    assert_eq!(run(42), run(42));
}

#[test]
fn target_capability_reports_position_and_name() {
    let mech = Mech::new("Mech H", 5, CellCoord::new(-4, 9));
    let target: &dyn Target = &mech;
    assert_eq!(target.name(), "Mech H");
    assert_eq!(target.cell(), CellCoord::new(-4, 9));
    assert!(!target.is_destroyed());
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Frame Assault skirmish.

mod scenario;
mod script;

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use frame_assault_core::{seeded_rng, Command, Event, HitOutcome, MechId, MechKind, ShotOutcome};
use frame_assault_system_spawning::{Config as SpawningConfig, Spawning};
use frame_assault_world::{apply, query, World};
use tracing_subscriber::EnvFilter;

use crate::{scenario::Scenario, script::Script};

/// Runs a scripted skirmish between the player mech and generated enemies.
#[derive(Debug, Parser)]
#[command(name = "frame-assault", version)]
struct Args {
    /// Scenario file in TOML format.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Overrides the simulation seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u64>,
    /// Overrides the number of generated enemies.
    #[arg(long)]
    enemies: Option<usize>,
    /// Overrides the player input script.
    #[arg(long)]
    script: Option<String>,
    /// Routes player moves through the bounds and collision validator.
    #[arg(long)]
    validate_player_moves: bool,
}

impl Args {
    fn apply_overrides(&self, scenario: &mut Scenario) {
        if let Some(seed) = self.seed {
            scenario.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            scenario.ticks = ticks;
        }
        if let Some(enemies) = self.enemies {
            scenario.enemies = enemies;
        }
        if let Some(script) = &self.script {
            scenario.script = script.clone();
        }
        if self.validate_player_moves {
            scenario.world.validate_player_moves = true;
        }
    }
}

/// Entry point for the Frame Assault command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    args.apply_overrides(&mut scenario);
    let script = Script::parse(&scenario.script).context("invalid input script")?;

    let skirmish = Skirmish::setup(&scenario);
    println!("{}", query::welcome_banner(&skirmish.world));
    let skirmish = skirmish.run(scenario.ticks, &script, |line| println!("{line}"));
    print_summary(&skirmish);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// World plus the bookkeeping the adapter needs for reporting.
struct Skirmish {
    world: World,
    names: BTreeMap<MechId, String>,
    events: Vec<Event>,
}

impl Skirmish {
    fn setup(scenario: &Scenario) -> Self {
        let mut rng = seeded_rng(scenario.seed);

        let mut commands: Vec<Command> = scenario
            .obstacles
            .iter()
            .map(|&cell| Command::PlaceObstacle { cell })
            .collect();
        commands.push(Command::SpawnPlayer {
            blueprint: scenario.player.clone(),
        });

        let player_cell = scenario.player.cell;
        Spawning::new(
            SpawningConfig::new(scenario.enemies).with_structure(scenario.enemy_structure),
        )
        .handle(
            scenario.world.play_area,
            |cell| cell == player_cell || scenario.obstacles.contains(&cell),
            &mut rng,
            &mut commands,
        );

        let mut skirmish = Self {
            world: World::new(scenario.world, rng),
            names: BTreeMap::new(),
            events: Vec::new(),
        };
        for command in commands {
            let _ = skirmish.apply(command);
        }

        let enemies: Vec<MechId> = skirmish
            .events
            .iter()
            .filter_map(|event| match event {
                Event::MechSpawned {
                    mech,
                    kind: MechKind::Autonomous,
                    ..
                } => Some(*mech),
                _ => None,
            })
            .collect();
        let _ = skirmish.apply(Command::SetEnemyRoster { enemies });
        skirmish
    }

    fn apply(&mut self, command: Command) -> &[Event] {
        let start = self.events.len();
        apply(&mut self.world, command, &mut self.events);
        for event in &self.events[start..] {
            if let Event::MechSpawned { mech, .. } = event {
                if let Some(spawned) = query::mech(&self.world, *mech) {
                    let _ = self.names.insert(*mech, spawned.name().to_owned());
                }
            }
        }
        &self.events[start..]
    }

    fn run(mut self, ticks: u64, script: &Script, mut emit: impl FnMut(String)) -> Self {
        tracing::debug!(ticks, script_len = script.len(), "skirmish started");
        for tick in 0..ticks {
            let mut produced = self.apply(Command::Tick).to_vec();
            let input = usize::try_from(tick)
                .ok()
                .and_then(|index| script.input_at(index));
            if let Some(input) = input {
                produced.extend_from_slice(self.apply(Command::Input { input }));
            }

            for event in &produced {
                if let Some(line) = describe(event, &self.names) {
                    emit(format!("[{:>4}] {line}", tick + 1));
                }
            }
        }
        self
    }
}

fn name_of(names: &BTreeMap<MechId, String>, mech: MechId) -> &str {
    names.get(&mech).map_or("unknown mech", String::as_str)
}

fn describe(event: &Event, names: &BTreeMap<MechId, String>) -> Option<String> {
    match event {
        Event::PatrolFallback { mech, reason } => Some(format!(
            "{} could not patrol ({reason}), wandering instead",
            name_of(names, *mech)
        )),
        Event::ShotResolved {
            attacker,
            target,
            weapon,
            range,
            outcome,
        } => {
            let result = match outcome {
                ShotOutcome::OutOfRange => "out of range",
                ShotOutcome::Miss => "miss",
                ShotOutcome::Hit(HitOutcome::Ignored) => "hit a wreck",
                ShotOutcome::Hit(_) => "hit",
            };
            Some(format!(
                "{} fires {weapon} at {} from range {range}: {result}",
                name_of(names, *attacker),
                name_of(names, *target)
            ))
        }
        Event::MechDamaged {
            mech,
            damage,
            remaining,
        } => Some(format!(
            "{} takes {damage}, structure {remaining}",
            name_of(names, *mech)
        )),
        Event::MechDestroyed { mech } => {
            Some(format!("{} has been destroyed", name_of(names, *mech)))
        }
        Event::TimeAdvanced { .. }
        | Event::ObstaclePlaced { .. }
        | Event::MechSpawned { .. }
        | Event::MechMoved { .. }
        | Event::MoveRejected { .. }
        | Event::MechRemoved { .. } => None,
    }
}

fn print_summary(skirmish: &Skirmish) {
    let world = &skirmish.world;
    println!();
    println!("After {} ticks:", query::tick_index(world));
    for mech in query::mech_view(world).iter() {
        println!(
            "  {:<8} {:>3}/{:<3} at {} [{}]",
            mech.name,
            mech.structure,
            mech.max_structure,
            mech.cell,
            mech.weapons.join(", ")
        );
    }

    let destroyed: Vec<&str> = skirmish
        .events
        .iter()
        .filter_map(|event| match event {
            Event::MechRemoved { mech } => Some(name_of(&skirmish.names, *mech)),
            _ => None,
        })
        .collect();
    if !destroyed.is_empty() {
        println!("Destroyed: {}", destroyed.join(", "));
    }

    let messages = query::messages(world);
    if !messages.is_empty() {
        println!("Recent messages:");
        for message in messages.iter() {
            println!("  {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_assault_core::CellCoord;

    fn transcript(scenario: &Scenario) -> (Vec<Event>, Vec<String>) {
        let script = Script::parse(&scenario.script).expect("valid script");
        let mut lines = Vec::new();
        let skirmish = Skirmish::setup(scenario).run(scenario.ticks, &script, |line| lines.push(line));
        (skirmish.events, lines)
    }

    #[test]
    fn bundled_scenario_replays_deterministically() {
        let scenario =
            Scenario::parse(include_str!("../scenarios/skirmish.toml")).expect("bundled scenario");
        assert_eq!(transcript(&scenario), transcript(&scenario));
    }

    #[test]
    fn setup_binds_every_generated_enemy() {
        let scenario = Scenario {
            enemies: 5,
            ..Scenario::default()
        };
        let skirmish = Skirmish::setup(&scenario);
        let roster = query::enemy_roster(&skirmish.world);
        assert_eq!(roster.len(), 5);
        assert!(roster.iter().all(|id| skirmish.names[id].starts_with("Mech ")));
        assert_eq!(query::player(&skirmish.world), Some(MechId::new(0)));
    }

    #[test]
    fn scripted_moves_reach_the_world() {
        let scenario = Scenario {
            enemies: 0,
            ticks: 3,
            script: ">>^".to_owned(),
            ..Scenario::default()
        };
        let (_, lines) = transcript(&scenario);
        assert!(lines.is_empty());

        let script = Script::parse(&scenario.script).expect("valid script");
        let skirmish = Skirmish::setup(&scenario).run(scenario.ticks, &script, |_| {});
        let player = query::player(&skirmish.world).expect("player spawned");
        assert_eq!(
            query::mech(&skirmish.world, player).map(|mech| mech.cell()),
            Some(CellCoord::new(14, 7))
        );
    }

    #[test]
    fn overrides_replace_scenario_values() {
        let args = Args::parse_from([
            "frame-assault",
            "--seed",
            "7",
            "--ticks",
            "12",
            "--enemies",
            "2",
            "--script",
            "a.b",
            "--validate-player-moves",
        ]);
        let mut scenario = Scenario::default();
        args.apply_overrides(&mut scenario);

        assert_eq!(scenario.seed, 7);
        assert_eq!(scenario.ticks, 12);
        assert_eq!(scenario.enemies, 2);
        assert_eq!(scenario.script, "a.b");
        assert!(scenario.world.validate_player_moves);
    }

    #[test]
    fn shot_lines_name_both_mechs() {
        let mut names = BTreeMap::new();
        let _ = names.insert(MechId::new(0), "Player".to_owned());
        let _ = names.insert(MechId::new(1), "Mech A".to_owned());
        let line = describe(
            &Event::ShotResolved {
                attacker: MechId::new(0),
                target: MechId::new(1),
                weapon: "Rifle".to_owned(),
                range: 4,
                outcome: ShotOutcome::Miss,
            },
            &names,
        );
        assert_eq!(
            line.as_deref(),
            Some("Player fires Rifle at Mech A from range 4: miss")
        );
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Frame Assault.
//!
//! The world owns the active entity set, the obstacles that block movement,
//! the simulation generator and the on-screen message log. Every mutation
//! arrives as a [`Command`] through [`apply`], which appends the resulting
//! [`Event`] values in a deterministic order. Destroyed mechs leave the
//! active set at the end of the command that destroyed them.

mod actor;
mod validator;

use frame_assault_core::{
    seeded_rng, AttackKey, CellCoord, Command, Direction, EnemyBlueprint, Event, HitOutcome,
    MechBlueprint, MechId, MessageLog, MoveRejection, PlayArea, PlayerInput, ShotOutcome, SimRng,
    WELCOME_BANNER,
};
use frame_assault_system_combat::{FireContext, Mech, Tracer, TracerState};
use frame_assault_system_movement::MovementStrategy;
use serde::Deserialize;

use crate::actor::{Actor, AutonomousMech, PlayerMech, Role};

const DEFAULT_MOVE_DELAY_TICKS: u32 = 4;
const DEFAULT_MESSAGE_CAPACITY: usize = 8;

/// Tunables applied when the world is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Rectangle mechs are allowed to occupy.
    pub play_area: PlayArea,
    /// Ticks between two movement evaluations of an autonomous mech.
    pub move_delay_ticks: u32,
    /// Routes player moves through the bounds and collision validator.
    pub validate_player_moves: bool,
    /// Number of on-screen messages retained.
    pub message_capacity: usize,
    /// Spawns a tracer for every attempted shot.
    pub tracers_enabled: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            play_area: PlayArea::default(),
            move_delay_ticks: DEFAULT_MOVE_DELAY_TICKS,
            validate_player_moves: false,
            message_capacity: DEFAULT_MESSAGE_CAPACITY,
            tracers_enabled: true,
        }
    }
}

/// Movement state of an autonomous mech during the latest tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovePhase {
    /// The move gate stayed closed.
    Idle,
    /// A candidate cell was proposed and awaits validation.
    Evaluating {
        /// Cell proposed by the movement strategy.
        candidate: CellCoord,
    },
    /// The candidate was accepted and committed.
    Moved {
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// The candidate was refused; the mech retries on the next open gate.
    Rejected {
        /// Cell proposed by the movement strategy.
        candidate: CellCoord,
        /// Why the validator refused the candidate.
        reason: MoveRejection,
    },
}

/// Represents the authoritative Frame Assault world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    rng: SimRng,
    actors: Vec<Actor>,
    obstacles: Vec<CellCoord>,
    tracers: Vec<Tracer>,
    messages: MessageLog,
    next_mech_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates an empty world that draws every random value from `rng`.
    #[must_use]
    pub fn new(config: WorldConfig, rng: SimRng) -> Self {
        Self {
            banner: WELCOME_BANNER,
            config,
            rng,
            actors: Vec::new(),
            obstacles: Vec::new(),
            tracers: Vec::new(),
            messages: MessageLog::with_capacity(config.message_capacity),
            next_mech_id: 0,
            tick_index: 0,
        }
    }

    /// Creates an empty world seeded with `seed`.
    #[must_use]
    pub fn with_seed(config: WorldConfig, seed: u64) -> Self {
        Self::new(config, seeded_rng(seed))
    }

    fn allocate_id(&mut self) -> MechId {
        let id = MechId::new(self.next_mech_id);
        self.next_mech_id = self.next_mech_id.saturating_add(1);
        id
    }

    fn player_index(&self) -> Option<usize> {
        self.actors
            .iter()
            .position(|actor| matches!(actor.role, Role::Player(_)))
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.tracers
            .retain_mut(|tracer| tracer.advance() == TracerState::InFlight);

        for index in 0..self.actors.len() {
            self.tick_actor(index, out_events);
        }
    }

    fn tick_actor(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let actor = &mut self.actors[index];
        actor.mech.begin_tick();
        if actor.mech.is_destroyed() {
            return;
        }

        let id = actor.id;
        let from = actor.mech.cell();
        let Role::Autonomous(autonomy) = &mut actor.role else {
            return;
        };

        let candidate = autonomy.evaluate(from, &mut self.rng);
        tracing::trace!(
            mech = id.get(),
            elapsed = autonomy.scheduler().elapsed(),
            tick = self.tick_index,
            "autonomous tick"
        );
        let Some(candidate) = candidate else {
            return;
        };

        let verdict = validator::validate(
            &self.config.play_area,
            &self.actors,
            &self.obstacles,
            Some(id),
            candidate,
        );

        let actor = &mut self.actors[index];
        if let Role::Autonomous(autonomy) = &mut actor.role {
            autonomy.resolve(from, verdict);
        }

        match verdict {
            Ok(()) => {
                actor.mech.move_to(candidate);
                if candidate != from {
                    tracing::debug!(mech = id.get(), %from, to = %candidate, "move committed");
                    out_events.push(Event::MechMoved {
                        mech: id,
                        from,
                        to: candidate,
                    });
                }
            }
            Err(reason) => {
                tracing::debug!(mech = id.get(), %from, to = %candidate, ?reason, "move rejected");
                out_events.push(Event::MoveRejected {
                    mech: id,
                    from,
                    to: candidate,
                    reason,
                });
            }
        }
    }

    fn place_obstacle(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.obstacles.contains(&cell) {
            return;
        }
        self.obstacles.push(cell);
        out_events.push(Event::ObstaclePlaced { cell });
    }

    fn spawn_player(&mut self, blueprint: &MechBlueprint, out_events: &mut Vec<Event>) {
        if self.player_index().is_some() {
            tracing::warn!(name = %blueprint.name, "player mech already present, spawn ignored");
            return;
        }

        let id = self.allocate_id();
        self.spawn(
            Actor {
                id,
                mech: Mech::from_blueprint(blueprint),
                role: Role::Player(PlayerMech::default()),
            },
            out_events,
        );
    }

    fn spawn_enemy(&mut self, blueprint: &EnemyBlueprint, out_events: &mut Vec<Event>) {
        let id = self.allocate_id();
        let (strategy, rejection) =
            MovementStrategy::from_plan_or_random_walk(&blueprint.movement, self.config.play_area);

        self.spawn(
            Actor {
                id,
                mech: Mech::from_blueprint(&blueprint.mech),
                role: Role::Autonomous(AutonomousMech::new(
                    strategy,
                    self.config.move_delay_ticks,
                )),
            },
            out_events,
        );

        if let Some(error) = rejection {
            out_events.push(Event::PatrolFallback {
                mech: id,
                reason: error.to_string(),
            });
        }
    }

    fn spawn(&mut self, actor: Actor, out_events: &mut Vec<Event>) {
        tracing::debug!(mech = actor.id.get(), name = %actor.mech.name(), cell = %actor.mech.cell(), "mech spawned");
        out_events.push(Event::MechSpawned {
            mech: actor.id,
            kind: actor.kind(),
            cell: actor.mech.cell(),
        });
        self.actors.push(actor);
    }

    fn set_enemy_roster(&mut self, enemies: Vec<MechId>) {
        let Some(index) = self.player_index() else {
            tracing::warn!("no player mech to bind the enemy roster to");
            return;
        };
        if let Role::Player(pilot) = &mut self.actors[index].role {
            pilot.roster = enemies;
        }
    }

    fn handle_input(&mut self, input: PlayerInput, out_events: &mut Vec<Event>) {
        let Some(index) = self.player_index() else {
            tracing::warn!(?input, "no player mech, input ignored");
            return;
        };
        let mech = &mut self.actors[index].mech;
        if mech.is_destroyed() {
            return;
        }
        mech.begin_tick();

        match input {
            PlayerInput::Move(direction) => self.move_player(index, direction, out_events),
            PlayerInput::Attack(key) => self.player_attack(index, key, out_events),
        }
    }

    fn move_player(&mut self, index: usize, direction: Direction, out_events: &mut Vec<Event>) {
        let actor = &self.actors[index];
        let id = actor.id;
        let from = actor.mech.previous_cell();
        let candidate = from.step(direction);

        if self.config.validate_player_moves {
            if let Err(reason) = validator::validate(
                &self.config.play_area,
                &self.actors,
                &self.obstacles,
                Some(id),
                candidate,
            ) {
                tracing::debug!(mech = id.get(), %from, to = %candidate, ?reason, "player move rejected");
                out_events.push(Event::MoveRejected {
                    mech: id,
                    from,
                    to: candidate,
                    reason,
                });
                return;
            }
        }

        self.actors[index].mech.move_to(candidate);
        tracing::debug!(mech = id.get(), %from, to = %candidate, "player moved");
        out_events.push(Event::MechMoved {
            mech: id,
            from,
            to: candidate,
        });
    }

    fn resolve_target(&self, player: usize, key: AttackKey) -> Option<usize> {
        let Role::Player(pilot) = &self.actors[player].role else {
            return None;
        };
        pilot.roster.iter().find_map(|enemy| {
            self.actors.iter().position(|actor| {
                actor.id == *enemy && actor.mech.name().ends_with(key.suffix())
            })
        })
    }

    fn player_attack(&mut self, index: usize, key: AttackKey, out_events: &mut Vec<Event>) {
        let Some(target_index) = self.resolve_target(index, key) else {
            tracing::debug!(key = %key.letter(), "no enemy bound to attack key");
            return;
        };
        let Some((attacker, target)) = pair_mut(&mut self.actors, index, target_index) else {
            return;
        };

        let mut shots = Vec::new();
        let mut ctx = FireContext::new(&mut self.rng, &mut self.messages);
        if self.config.tracers_enabled {
            ctx = ctx.with_tracers(&mut self.tracers);
        }
        if attacker
            .mech
            .attack(Some(&mut target.mech), &mut ctx, &mut shots)
            .is_none()
        {
            return;
        }

        for (shot, weapon) in shots.into_iter().zip(attacker.mech.weapons()) {
            let outcome = shot.outcome;
            out_events.push(Event::ShotResolved {
                attacker: attacker.id,
                target: target.id,
                weapon: shot.weapon,
                range: shot.range,
                outcome,
            });

            let damage = weapon.spec().damage();
            match outcome {
                ShotOutcome::Hit(HitOutcome::Damaged { remaining }) => {
                    out_events.push(Event::MechDamaged {
                        mech: target.id,
                        damage,
                        remaining,
                    });
                }
                ShotOutcome::Hit(HitOutcome::Destroyed { remaining }) => {
                    out_events.push(Event::MechDamaged {
                        mech: target.id,
                        damage,
                        remaining,
                    });
                    out_events.push(Event::MechDestroyed { mech: target.id });
                }
                ShotOutcome::Hit(HitOutcome::Ignored)
                | ShotOutcome::Miss
                | ShotOutcome::OutOfRange => {}
            }
        }
    }

    fn remove_destroyed(&mut self, out_events: &mut Vec<Event>) {
        self.actors.retain(|actor| {
            if actor.mech.is_destroyed() {
                tracing::debug!(mech = actor.id.get(), name = %actor.mech.name(), "mech removed");
                out_events.push(Event::MechRemoved { mech: actor.id });
                false
            } else {
                true
            }
        });
    }
}

fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> Option<(&mut T, &mut T)> {
    if first == second || first.max(second) >= items.len() {
        return None;
    }

    if first < second {
        let (head, tail) = items.split_at_mut(second);
        Some((&mut head[first], &mut tail[0]))
    } else {
        let (head, tail) = items.split_at_mut(first);
        Some((&mut tail[0], &mut head[second]))
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.tick(out_events),
        Command::PlaceObstacle { cell } => world.place_obstacle(cell, out_events),
        Command::SpawnPlayer { blueprint } => world.spawn_player(&blueprint, out_events),
        Command::SpawnEnemy { blueprint } => world.spawn_enemy(&blueprint, out_events),
        Command::SetEnemyRoster { enemies } => world.set_enemy_roster(enemies),
        Command::Input { input } => world.handle_input(input, out_events),
    }

    world.remove_destroyed(out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use frame_assault_core::{CellCoord, MechId, MechKind, MessageLog, MoveRejection, PlayArea};
    use frame_assault_system_combat::{Mech, Tracer};
    use frame_assault_system_movement::StrategyKind;

    use super::{validator, MovePhase, Role, World, WorldConfig};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Rectangle mechs are allowed to occupy.
    #[must_use]
    pub fn play_area(world: &World) -> PlayArea {
        world.config.play_area
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the active mechs.
    #[must_use]
    pub fn mech_view(world: &World) -> MechView {
        let mut snapshots: Vec<MechSnapshot> = world
            .actors
            .iter()
            .map(|actor| {
                let (strategy, phase, ticks_since_move) = match &actor.role {
                    Role::Autonomous(autonomy) => (
                        Some(autonomy.strategy.kind()),
                        Some(autonomy.phase()),
                        Some(autonomy.scheduler().elapsed()),
                    ),
                    Role::Player(_) => (None, None, None),
                };
                MechSnapshot {
                    id: actor.id,
                    name: actor.mech.name().to_owned(),
                    kind: actor.kind(),
                    cell: actor.mech.cell(),
                    structure: actor.mech.structure(),
                    max_structure: actor.mech.max_structure(),
                    destroyed: actor.mech.is_destroyed(),
                    weapons: actor
                        .mech
                        .weapons()
                        .iter()
                        .map(|weapon| weapon.name().to_owned())
                        .collect(),
                    strategy,
                    phase,
                    ticks_since_move,
                }
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        MechView { snapshots }
    }

    /// Combat core of the mech with the provided identifier.
    #[must_use]
    pub fn mech(world: &World, id: MechId) -> Option<&Mech> {
        world
            .actors
            .iter()
            .find(|actor| actor.id == id)
            .map(|actor| &actor.mech)
    }

    /// Identifier of the player-driven mech, if one is active.
    #[must_use]
    pub fn player(world: &World) -> Option<MechId> {
        world
            .player_index()
            .map(|index| world.actors[index].id)
    }

    /// Enemies the player's attack keys resolve against, in resolution order.
    #[must_use]
    pub fn enemy_roster(world: &World) -> &[MechId] {
        world
            .player_index()
            .and_then(|index| match &world.actors[index].role {
                Role::Player(pilot) => Some(pilot.roster.as_slice()),
                Role::Autonomous(_) => None,
            })
            .unwrap_or(&[])
    }

    /// Cells blocked by static obstacles.
    #[must_use]
    pub fn obstacles(world: &World) -> &[CellCoord] {
        &world.obstacles
    }

    /// Tracers still in flight.
    #[must_use]
    pub fn tracers(world: &World) -> &[Tracer] {
        &world.tracers
    }

    /// Most recent combat messages.
    #[must_use]
    pub fn messages(world: &World) -> &MessageLog {
        &world.messages
    }

    /// Runs the bounds and collision validator for `mech` moving to `cell`.
    ///
    /// `mech` itself never blocks the cell; pass `None` to check against
    /// every tracked entity.
    pub fn validate_move(
        world: &World,
        mech: Option<MechId>,
        cell: CellCoord,
    ) -> Result<(), MoveRejection> {
        validator::validate(
            &world.config.play_area,
            &world.actors,
            &world.obstacles,
            mech,
            cell,
        )
    }

    /// Reports whether `cell` lies inside the play area and is unoccupied.
    #[must_use]
    pub fn is_cell_free(world: &World, cell: CellCoord) -> bool {
        validate_move(world, None, cell).is_ok()
    }

    /// Reports whether a mech or obstacle occupies `cell`, regardless of bounds.
    #[must_use]
    pub fn is_occupied(world: &World, cell: CellCoord) -> bool {
        world.obstacles.contains(&cell)
            || world
                .actors
                .iter()
                .any(|actor| !actor.mech.is_destroyed() && actor.mech.cell() == cell)
    }

    /// Read-only snapshot describing all active mechs.
    #[derive(Clone, Debug)]
    pub struct MechView {
        snapshots: Vec<MechSnapshot>,
    }

    impl MechView {
        /// Iterator over the captured mech snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &MechSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<MechSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single mech's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct MechSnapshot {
        /// Unique identifier assigned to the mech.
        pub id: MechId,
        /// Display name of the mech.
        pub name: String,
        /// Actor variant of the mech.
        pub kind: MechKind,
        /// Cell currently occupied by the mech.
        pub cell: CellCoord,
        /// Current structure.
        pub structure: i32,
        /// Structure the mech was created with.
        pub max_structure: i32,
        /// Whether structure has dropped to zero or below.
        pub destroyed: bool,
        /// Weapon names in loadout order.
        pub weapons: Vec<String>,
        /// Movement strategy of autonomous mechs.
        pub strategy: Option<StrategyKind>,
        /// Movement state of autonomous mechs during the latest tick.
        pub phase: Option<MovePhase>,
        /// Ticks counted towards the next movement evaluation.
        pub ticks_since_move: Option<u32>,
    }
}

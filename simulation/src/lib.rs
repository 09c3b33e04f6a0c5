#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestration for Mystic Towers.
//!
//! [`Simulation::step`] runs one logical frame in a fixed order: input
//! commands, the monster phase, spawning, the tower phase, targeting, combat
//! and finally the wave phase. Systems only ever see immutable views and
//! reply with commands, which are applied before the next phase starts.

use std::time::Duration;

use mystic_towers_core::{BalanceConfig, Command, Event, SessionOutcome, TowerTarget};
use mystic_towers_system_spawning::{Config as SpawningConfig, Spawning};
use mystic_towers_system_tower_combat::TowerCombat;
use mystic_towers_system_tower_targeting::TowerTargeting;
use mystic_towers_world::{self as world, query, World};
use tracing::{debug, warn};

/// Length of one frame at the 60 Hz target rate.
pub const TARGET_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Longest frame the clock hands to the simulation.
pub const MAX_FRAME: Duration = Duration::from_millis(100);

/// Seed used when no explicit seed is configured.
pub const DEFAULT_RNG_SEED: u64 = 0x4d59_5df4_d0f3_3173;

/// Configuration of the orchestration layer.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Balance tables the world is built from.
    pub balance: BalanceConfig,
    /// Seed of the paired-spawn RNG.
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            balance: BalanceConfig::default(),
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Converts wall-clock frame durations into simulation time steps.
///
/// Long stalls are capped at [`MAX_FRAME`] before the speed multiplier is
/// applied; a paused clock yields zero-length steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    max_frame: Duration,
    speed: f32,
    paused: bool,
}

impl FrameClock {
    /// Creates a running clock at normal speed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_frame: MAX_FRAME,
            speed: 1.0,
            paused: false,
        }
    }

    /// Current speed multiplier.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Sets the speed multiplier; negative or non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f32) {
        if !speed.is_finite() || speed < 0.0 {
            warn!(speed, "invalid game speed ignored");
            return;
        }
        self.speed = speed;
    }

    /// Reports whether the clock is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pauses or resumes the clock.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Simulation step for a frame that took `elapsed` of wall-clock time.
    #[must_use]
    pub fn frame_dt(&self, elapsed: Duration) -> Duration {
        if self.paused {
            return Duration::ZERO;
        }
        let nanos = elapsed.min(self.max_frame).as_nanos() as f64 * f64::from(self.speed);
        Duration::from_nanos(nanos.round() as u64)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the world and every pure system, and sequences them per frame.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawning: Spawning,
    targeting: TowerTargeting,
    combat: TowerCombat,
    events: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
    frames: u64,
    rng_seed: u64,
}

impl Simulation {
    /// Builds a fresh session from the provided configuration.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            spawning: seeded_spawning(&config.balance, config.rng_seed),
            world: World::with_balance(config.balance),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            events: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
            frames: 0,
            rng_seed: config.rng_seed,
        }
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of frames stepped so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Session state of the world.
    #[must_use]
    pub fn outcome(&self) -> SessionOutcome {
        query::outcome(&self.world)
    }

    /// Runs one frame of `dt` after applying `input`, returning its events.
    pub fn step(&mut self, dt: Duration, input: &[Command]) -> &[Event] {
        self.events.clear();
        let was_finished = self.outcome() != SessionOutcome::Ongoing;

        for command in input {
            world::apply(&mut self.world, command.clone(), &mut self.events);
        }
        if self.events.contains(&Event::SessionRestarted) {
            self.spawning = seeded_spawning(query::balance(&self.world), self.rng_seed);
            debug!(seed = self.rng_seed, "spawning reseeded");
        }

        world::apply(
            &mut self.world,
            Command::AdvanceMonsters { dt },
            &mut self.events,
        );

        self.spawning.handle(
            &self.events,
            query::spawn_queue(&self.world),
            query::balance(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        world::apply(
            &mut self.world,
            Command::AdvanceTowers { dt },
            &mut self.events,
        );

        self.targeting.handle(
            &query::tower_view(&self.world),
            &query::monster_view(&self.world),
            &mut self.targets,
        );
        self.combat.handle(
            query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.flush_commands();

        world::apply(&mut self.world, Command::AdvanceWave, &mut self.events);

        self.frames += 1;
        let outcome = self.outcome();
        if !was_finished && outcome != SessionOutcome::Ongoing {
            debug!(frame = self.frames, ?outcome, "simulation stopped advancing");
        }
        &self.events
    }

    /// Rebuilds the session and returns the restart events.
    ///
    /// The paired-spawn RNG restarts from the configured seed, so a restarted
    /// session replays exactly like a fresh one.
    pub fn restart(&mut self) -> &[Event] {
        self.step(Duration::ZERO, &[Command::RestartSession])
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}

fn seeded_spawning(balance: &BalanceConfig, rng_seed: u64) -> Spawning {
    Spawning::new(SpawningConfig::new(
        balance.waves.paired_spawn.chance,
        rng_seed,
    ))
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

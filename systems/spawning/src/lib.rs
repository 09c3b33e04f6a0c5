#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that paces the running wave's spawn queue.

use std::time::Duration;

use mystic_towers_core::{BalanceConfig, Command, Event, MonsterKind, SpawnPlacement, SpawnQueueView};
use mystic_towers_system_wave_composition as wave_composition;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    paired_spawn_chance: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided pairing chance and seed.
    #[must_use]
    pub const fn new(paired_spawn_chance: f64, rng_seed: u64) -> Self {
        Self {
            paired_spawn_chance,
            rng_seed,
        }
    }
}

/// Pure system that emits spawn commands whenever the wave's delay elapses.
#[derive(Debug)]
pub struct Spawning {
    paired_spawn_chance: f64,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            paired_spawn_chance: config.paired_spawn_chance,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the spawn queue view to emit spawn commands.
    ///
    /// At most one primary spawn is emitted per call; from the pairing wave
    /// onward it may be followed by a trailing second spawn.
    pub fn handle(
        &mut self,
        events: &[Event],
        queue: SpawnQueueView<'_>,
        balance: &BalanceConfig,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::WaveStarted { .. } | Event::SessionRestarted => {
                    self.accumulator = Duration::ZERO;
                    accumulated = Duration::ZERO;
                }
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                _ => {}
            }
        }

        if !queue.is_active() {
            self.accumulator = Duration::ZERO;
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);

        let Some(front) = queue.get(0) else {
            return;
        };
        let wave = queue.wave();
        let table = &balance.waves;
        if self.accumulator < wave_composition::spawn_delay(table, wave, Some(front)) {
            return;
        }
        self.accumulator = Duration::ZERO;
        out.push(spawn_command(balance, wave, front, SpawnPlacement::PathStart));

        if !wave_composition::pairs_spawns(table, wave) {
            return;
        }
        let Some(second) = queue.get(1) else {
            return;
        };
        if self.roll_pair() {
            out.push(spawn_command(balance, wave, second, SpawnPlacement::Trailing));
        }
    }

    fn roll_pair(&mut self) -> bool {
        self.rng.gen::<f64>() < self.paired_spawn_chance
    }
}

fn spawn_command(
    balance: &BalanceConfig,
    wave: u32,
    kind: MonsterKind,
    placement: SpawnPlacement,
) -> Command {
    Command::SpawnMonster {
        kind,
        reward: wave_composition::reward_for(&balance.waves, &balance.monsters, wave, kind),
        placement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certain_and_impossible_pairs() {
        let mut always = Spawning::new(Config::new(1.0, 7));
        let mut never = Spawning::new(Config::new(0.0, 7));
        for _ in 0..64 {
            assert!(always.roll_pair());
            assert!(!never.roll_pair());
        }
    }
}

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use mystic_towers_core::{Command, Event, Gold, MonsterKind, SpawnPlacement};
use mystic_towers_system_spawning::{Config, Spawning};
use mystic_towers_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SpawnRecord {
    frame: usize,
    kind: MonsterKind,
    reward: u32,
    trailing: bool,
}

/// Runs `frames` monster frames, feeding the spawning system and applying its output.
fn drive(
    world: &mut World,
    spawning: &mut Spawning,
    frames: usize,
    log: &mut Vec<SpawnRecord>,
) {
    for frame in 0..frames {
        let mut events = Vec::new();
        world::apply(world, Command::AdvanceMonsters { dt: FRAME }, &mut events);

        let mut commands = Vec::new();
        spawning.handle(
            &events,
            query::spawn_queue(world),
            query::balance(world),
            &mut commands,
        );

        for command in commands {
            if let Command::SpawnMonster {
                kind,
                reward,
                placement,
            } = command
            {
                log.push(SpawnRecord {
                    frame,
                    kind,
                    reward: reward.get(),
                    trailing: placement == SpawnPlacement::Trailing,
                });
            }
            world::apply(world, command, &mut events);
        }
    }
}

fn start(wave: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::JumpToWave { wave }, &mut events);
    world
}

#[test]
fn first_spawn_waits_for_the_tier_delay() {
    let mut world = start(1);
    let mut spawning = Spawning::new(Config::new(1.0, 1));
    let mut log = Vec::new();

    drive(&mut world, &mut spawning, 8, &mut log);
    assert!(log.is_empty(), "spawned before 0.9 s elapsed");

    drive(&mut world, &mut spawning, 1, &mut log);
    assert_eq!(
        log,
        vec![SpawnRecord {
            frame: 0,
            kind: MonsterKind::Gnome,
            reward: 8,
            trailing: false,
        }]
    );
    assert_eq!(query::spawn_queue(&world).len(), 6);
}

#[test]
fn early_waves_never_pair() {
    let mut world = start(4);
    let mut spawning = Spawning::new(Config::new(1.0, 1));
    let mut log = Vec::new();

    drive(&mut world, &mut spawning, 200, &mut log);
    assert_eq!(log.len(), 16);
    assert!(log.iter().all(|record| !record.trailing));
}

#[test]
fn certain_pairing_halves_the_spawn_ticks() {
    let mut world = start(5);
    let mut spawning = Spawning::new(Config::new(1.0, 1));
    let mut log = Vec::new();

    drive(&mut world, &mut spawning, 160, &mut log);

    assert_eq!(log.len(), 34);
    assert_eq!(log.iter().filter(|record| record.trailing).count(), 17);
    for pair in log.chunks(2) {
        assert_eq!(pair[0].frame, pair[1].frame);
        assert!(!pair[0].trailing && pair[1].trailing);
    }
    assert!(query::spawn_queue(&world).is_empty());
}

#[test]
fn impossible_pairing_spawns_one_at_a_time() {
    let mut world = start(5);
    let mut spawning = Spawning::new(Config::new(0.0, 1));
    let mut log = Vec::new();

    drive(&mut world, &mut spawning, 160, &mut log);

    assert_eq!(log.len(), 17);
    assert!(log.iter().all(|record| !record.trailing));
}

#[test]
fn boss_wave_waits_longer_and_never_pairs() {
    let mut world = start(21);
    let mut spawning = Spawning::new(Config::new(1.0, 1));
    let mut log = Vec::new();

    drive(&mut world, &mut spawning, 49, &mut log);
    assert!(log.is_empty());

    drive(&mut world, &mut spawning, 1, &mut log);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, MonsterKind::BossGnome);
    assert_eq!(log[0].reward, Gold::new(250).get());
    assert!(!log[0].trailing);
}

#[test]
fn idle_worlds_do_not_spawn() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(1.0, 1));
    let mut log = Vec::new();

    drive(&mut world, &mut spawning, 100, &mut log);
    assert!(log.is_empty());
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(0x4d59_5df4_d0f3_3173);
    let second = replay(0x4d59_5df4_d0f3_3173);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(fingerprint(&first), fingerprint(&second));

    let trailing = first.iter().filter(|record| record.trailing).count();
    let primary = first.len() - trailing;
    assert!(trailing <= primary);
    assert_eq!(first.len(), 34);
}

fn replay(seed: u64) -> Vec<SpawnRecord> {
    let mut world = start(5);
    let mut spawning = Spawning::new(Config::new(0.6, seed));
    let mut log = Vec::new();
    drive(&mut world, &mut spawning, 320, &mut log);
    log
}

fn fingerprint(records: &[SpawnRecord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.hash(&mut hasher);
    hasher.finish()
}

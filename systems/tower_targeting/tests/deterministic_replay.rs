use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use mystic_towers_core::{
    Command, Gold, MonsterId, MonsterKind, SpawnPlacement, TileCoord, TowerKind, TowerTarget,
};
use mystic_towers_system_tower_targeting::TowerTargeting;
use mystic_towers_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(50);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TargetSnapshot {
    pairs: Vec<(u32, u32)>,
}

impl From<&Vec<TowerTarget>> for TargetSnapshot {
    fn from(targets: &Vec<TowerTarget>) -> Self {
        Self {
            pairs: targets
                .iter()
                .map(|target| (target.tower.get(), target.monster.get()))
                .collect(),
        }
    }
}

#[test]
fn deterministic_replay_tracks_the_nearest_walker() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(fingerprint(&first), fingerprint(&second));

    assert_eq!(first[0].pairs, vec![(0, 0)], "water tower starts out of range");
    assert!(
        first.iter().any(|snapshot| snapshot.pairs.contains(&(1, 0))),
        "water tower engages once the walkers advance"
    );
    let last = first.last().expect("frames recorded");
    assert!(
        last.pairs.is_empty(),
        "walkers should have left every tower's range"
    );
    assert!(first
        .iter()
        .flat_map(|snapshot| snapshot.pairs.iter())
        .all(|(_, monster)| *monster <= 1));
}

fn replay() -> Vec<TargetSnapshot> {
    let mut world = World::new();
    let mut events = Vec::new();
    for (kind, tile) in [
        (TowerKind::Cannon, TileCoord::new(1, 12)),
        (TowerKind::Water, TileCoord::new(4, 12)),
    ] {
        world::apply(&mut world, Command::PlaceTower { kind, tile }, &mut events);
    }
    world::apply(&mut world, Command::StartWave, &mut events);
    for placement in [SpawnPlacement::PathStart, SpawnPlacement::Trailing] {
        world::apply(
            &mut world,
            Command::SpawnMonster {
                kind: MonsterKind::Gnome,
                reward: Gold::new(8),
                placement,
            },
            &mut events,
        );
    }

    let mut targeting = TowerTargeting::new();
    let mut targets = Vec::new();
    let mut snapshots = Vec::new();
    for _ in 0..200 {
        targeting.handle(
            &query::tower_view(&world),
            &query::monster_view(&world),
            &mut targets,
        );
        snapshots.push(TargetSnapshot::from(&targets));
        world::apply(&mut world, Command::AdvanceMonsters { dt: FRAME }, &mut events);
    }
    snapshots
}

fn fingerprint(snapshots: &[TargetSnapshot]) -> u64 {
    let mut hasher = DefaultHasher::new();
    snapshots.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn corpses_are_skipped_in_favour_of_living_monsters() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::JumpToWave { wave: 10 }, &mut events);
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Fire,
            tile: TileCoord::new(4, 12),
        },
        &mut events,
    );
    for _ in 0..2 {
        world::apply(
            &mut world,
            Command::SpawnMonster {
                kind: MonsterKind::Gnome,
                reward: Gold::new(7),
                placement: SpawnPlacement::PathStart,
            },
            &mut events,
        );
    }
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower: mystic_towers_core::TowerId::new(0),
            target: MonsterId::new(0),
        },
        &mut events,
    );
    for _ in 0..30 {
        world::apply(&mut world, Command::AdvanceTowers { dt: FRAME }, &mut events);
    }

    let mut targeting = TowerTargeting::new();
    let mut targets = Vec::new();
    targeting.handle(
        &query::tower_view(&world),
        &query::monster_view(&world),
        &mut targets,
    );
    assert!(targets.is_empty(), "splash killed both stacked gnomes");

    world::apply(
        &mut world,
        Command::SpawnMonster {
            kind: MonsterKind::Gnome,
            reward: Gold::new(7),
            placement: SpawnPlacement::PathStart,
        },
        &mut events,
    );
    targeting.handle(
        &query::tower_view(&world),
        &query::monster_view(&world),
        &mut targets,
    );
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].monster, MonsterId::new(2));
}

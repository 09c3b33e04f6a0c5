#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Nearest-in-range target selection for every placed tower.

use glam::Vec2;
use mystic_towers_core::{MonsterId, MonsterView, TowerId, TowerTarget, TowerView};

/// Assigns targets from tower and monster views, keeping its buffers between frames.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    sentries: Vec<Sentry>,
    walkers: Vec<Walker>,
}

impl TowerTargeting {
    /// Creates the system with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `out` with one assignment per tower that has an alive monster
    /// within range, nearest first and the earliest spawn on ties.
    pub fn handle(&mut self, towers: &TowerView, monsters: &MonsterView, out: &mut Vec<TowerTarget>) {
        out.clear();

        self.collect_sentries(towers);
        if self.sentries.is_empty() {
            return;
        }

        self.collect_walkers(monsters);
        if self.walkers.is_empty() {
            return;
        }

        for sentry in &self.sentries {
            let reach_sq = sentry.range * sentry.range;
            let lock = self
                .walkers
                .iter()
                .map(|walker| Lock {
                    distance_sq: walker.position.distance_squared(sentry.position),
                    monster: walker.id,
                })
                .filter(|lock| lock.distance_sq <= reach_sq)
                .reduce(|held, challenger| if challenger.beats(&held) { challenger } else { held });

            if let Some(lock) = lock {
                out.push(TowerTarget {
                    tower: sentry.id,
                    monster: lock.monster,
                });
            }
        }
    }

    fn collect_sentries(&mut self, towers: &TowerView) {
        self.sentries.clear();
        self.sentries
            .extend(towers.iter().filter(|tower| tower.range > 0.0).map(|tower| Sentry {
                id: tower.id,
                position: tower.position,
                range: tower.range,
            }));
    }

    fn collect_walkers(&mut self, monsters: &MonsterView) {
        self.walkers.clear();
        self.walkers.extend(
            monsters
                .iter()
                .filter(|monster| monster.alive)
                .map(|monster| Walker {
                    id: monster.id,
                    position: monster.position,
                }),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sentry {
    id: TowerId,
    position: Vec2,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Walker {
    id: MonsterId,
    position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Lock {
    distance_sq: f32,
    monster: MonsterId,
}

impl Lock {
    fn beats(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }
        self.monster < other.monster
    }
}

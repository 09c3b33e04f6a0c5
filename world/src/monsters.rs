//! Monster lifecycle: movement, slow effects, damage and decay.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use mystic_towers_core::{
    saturating_duration, Color, Gold, Health, MonsterId, MonsterKind, MonsterSnapshot, MonsterStats, SlowEffect,
};

use crate::economy::Economy;

/// Lifecycle stage of a monster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum MonsterState {
    Alive,
    /// Dead and inert while the corpse fades.
    Decaying { elapsed: Duration },
    /// Waiting to be pruned from the registry.
    Removed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveSlow {
    factor: f32,
    remaining: Duration,
}

/// Result of advancing a monster along the path for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stride {
    Walking,
    ReachedEnd,
}

#[derive(Clone, Debug)]
pub(crate) struct Monster {
    pub(crate) id: MonsterId,
    pub(crate) kind: MonsterKind,
    pub(crate) position: Vec2,
    pub(crate) reward: Gold,
    pub(crate) color: Color,
    pub(crate) size: f32,
    health: Health,
    max_health: Health,
    base_speed: f32,
    speed: f32,
    path_index: usize,
    slow: Option<ActiveSlow>,
    state: MonsterState,
}

impl Monster {
    pub(crate) fn spawn(
        id: MonsterId,
        kind: MonsterKind,
        stats: &MonsterStats,
        reward: Gold,
        position: Vec2,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            reward,
            color: stats.color,
            size: stats.size,
            health: stats.health,
            max_health: stats.health,
            base_speed: stats.speed,
            speed: stats.speed,
            path_index: 0,
            slow: None,
            state: MonsterState::Alive,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.state == MonsterState::Alive
    }

    pub(crate) fn state(&self) -> MonsterState {
        self.state
    }

    /// Applies damage, crediting the reward when this call is the lethal one.
    ///
    /// Damage against a monster that is no longer alive is ignored.
    pub(crate) fn take_damage(&mut self, amount: u32, economy: &mut Economy) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if !self.health.is_zero() {
            return false;
        }
        economy.earn(self.reward);
        self.die();
        true
    }

    /// Installs `effect` unless a stronger slow is already active.
    ///
    /// An equally strong slow refreshes the timer.
    pub(crate) fn apply_slow(&mut self, effect: SlowEffect) {
        if !self.is_alive() {
            return;
        }
        if let Some(active) = self.slow {
            if effect.factor > active.factor {
                return;
            }
        }
        self.speed = self.base_speed * effect.factor;
        self.slow = Some(ActiveSlow {
            factor: effect.factor,
            remaining: saturating_duration(effect.duration),
        });
    }

    pub(crate) fn is_slowed(&self) -> bool {
        self.slow.is_some()
    }

    fn slow_factor(&self) -> f32 {
        self.slow.map_or(1.0, |slow| slow.factor)
    }

    fn tick_slow(&mut self, dt: Duration) {
        let Some(active) = self.slow.as_mut() else {
            return;
        };
        active.remaining = active.remaining.saturating_sub(dt);
        if active.remaining.is_zero() {
            self.slow = None;
            self.speed = self.base_speed;
        }
    }

    /// Counts down the slow timer and walks toward the current waypoint.
    pub(crate) fn advance(&mut self, dt: Duration, waypoints: &[Vec2], epsilon: f32) -> Stride {
        if !self.is_alive() {
            return Stride::Walking;
        }
        self.tick_slow(dt);

        let Some(mut target) = waypoints.get(self.path_index).copied() else {
            return Stride::ReachedEnd;
        };
        if self.position.distance(target) < epsilon {
            self.path_index += 1;
            match waypoints.get(self.path_index) {
                Some(next) => target = *next,
                None => return Stride::ReachedEnd,
            }
        }

        let step = self.speed * dt.as_secs_f32() * self.slow_factor();
        let offset = target - self.position;
        let distance = offset.length();
        if distance <= step {
            self.position = target;
        } else if distance > 0.0 {
            self.position += offset / distance * step;
        }
        Stride::Walking
    }

    /// Zeroes health without crediting a reward.
    pub(crate) fn finish(&mut self) {
        if self.is_alive() {
            self.health = Health::ZERO;
            self.die();
        }
    }

    fn die(&mut self) {
        self.slow = None;
        self.state = if self.kind.has_decay_visual() {
            MonsterState::Decaying {
                elapsed: Duration::ZERO,
            }
        } else {
            MonsterState::Removed
        };
    }

    pub(crate) fn tick_decay(&mut self, dt: Duration, decay: Duration) {
        if let MonsterState::Decaying { elapsed } = self.state {
            let elapsed = elapsed.saturating_add(dt);
            self.state = if elapsed >= decay {
                MonsterState::Removed
            } else {
                MonsterState::Decaying { elapsed }
            };
        }
    }

    pub(crate) fn snapshot(&self, decay: Duration) -> MonsterSnapshot {
        let decay_progress = match self.state {
            MonsterState::Decaying { elapsed } if !decay.is_zero() => {
                Some((elapsed.as_secs_f32() / decay.as_secs_f32()).min(1.0))
            }
            MonsterState::Decaying { .. } | MonsterState::Removed => Some(1.0),
            MonsterState::Alive => None,
        };
        MonsterSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            alive: self.is_alive(),
            slowed: self.is_slowed(),
            decay_progress,
        }
    }
}

/// Live monster collection keyed by spawn order.
#[derive(Clone, Debug)]
pub(crate) struct MonsterRegistry {
    entries: BTreeMap<MonsterId, Monster>,
    next_monster_id: MonsterId,
}

impl MonsterRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_monster_id: MonsterId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> MonsterId {
        let id = self.next_monster_id;
        self.next_monster_id = MonsterId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, monster: Monster) {
        let _ = self.entries.insert(monster.id, monster);
    }

    pub(crate) fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.entries.get_mut(&id)
    }

    /// Handle lookup that only resolves monsters still alive.
    pub(crate) fn alive(&self, id: MonsterId) -> Option<&Monster> {
        self.get(id).filter(|monster| monster.is_alive())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Monster> {
        self.entries.values_mut()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every monster in the `Removed` state, returning their ids.
    pub(crate) fn prune(&mut self) -> Vec<MonsterId> {
        let removed: Vec<MonsterId> = self
            .entries
            .values()
            .filter(|monster| monster.state() == MonsterState::Removed)
            .map(|monster| monster.id)
            .collect();
        for id in &removed {
            let _ = self.entries.remove(id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mystic_towers_core::MonsterTable;

    fn monster(kind: MonsterKind) -> Monster {
        let stats = MonsterTable::default().stats(kind);
        Monster::spawn(MonsterId::new(1), kind, &stats, stats.reward, Vec2::ZERO)
    }

    #[test]
    fn lethal_damage_credits_the_reward_exactly_once() {
        let mut economy = Economy::new(Gold::ZERO);
        let mut gnome = monster(MonsterKind::Gnome);

        assert!(!gnome.take_damage(10, &mut economy));
        assert!(gnome.take_damage(30, &mut economy));
        assert!(!gnome.take_damage(30, &mut economy));
        assert_eq!(economy.balance(), Gold::new(7));
        assert_eq!(
            gnome.state(),
            MonsterState::Decaying {
                elapsed: Duration::ZERO
            }
        );
    }

    #[test]
    fn boss_spiders_skip_decay() {
        let mut economy = Economy::new(Gold::ZERO);
        let mut boss = monster(MonsterKind::BossBigSpider);
        assert!(boss.take_damage(1500, &mut economy));
        assert_eq!(boss.state(), MonsterState::Removed);
        assert_eq!(economy.balance(), Gold::new(250));
    }

    #[test]
    fn weaker_slow_is_ignored_and_equal_slow_refreshes() {
        let mut gnome = monster(MonsterKind::Gnome);
        gnome.apply_slow(SlowEffect {
            factor: 0.75,
            duration: 3.0,
        });
        gnome.tick_slow(Duration::from_secs(2));

        gnome.apply_slow(SlowEffect {
            factor: 0.9,
            duration: 3.0,
        });
        let active = gnome.slow.expect("slow active");
        assert_eq!(active.factor, 0.75);
        assert_eq!(active.remaining, Duration::from_secs(1));

        gnome.apply_slow(SlowEffect {
            factor: 0.75,
            duration: 3.0,
        });
        let active = gnome.slow.expect("slow active");
        assert_eq!(active.remaining, Duration::from_secs(3));
        assert_eq!(gnome.speed, 80.0 * 0.75);
    }

    #[test]
    fn unbounded_slow_durations_saturate() {
        let mut gnome = monster(MonsterKind::Gnome);
        gnome.apply_slow(SlowEffect {
            factor: 0.5,
            duration: f32::INFINITY,
        });
        let active = gnome.slow.expect("slow active");
        assert_eq!(active.remaining, Duration::MAX);

        gnome.tick_slow(Duration::from_secs(3_600));
        assert!(gnome.is_slowed());
    }

    #[test]
    fn slow_expiry_restores_speed() {
        let mut gnome = monster(MonsterKind::Gnome);
        gnome.apply_slow(SlowEffect {
            factor: 0.5,
            duration: 1.0,
        });
        gnome.tick_slow(Duration::from_secs(1));
        assert!(!gnome.is_slowed());
        assert_eq!(gnome.speed, 80.0);
    }

    #[test]
    fn walking_advances_the_path_index_without_overshooting() {
        let waypoints = [Vec2::ZERO, Vec2::new(32.0, 0.0)];
        let mut gnome = monster(MonsterKind::Gnome);

        assert_eq!(
            gnome.advance(Duration::from_millis(100), &waypoints, 2.0),
            Stride::Walking
        );
        assert_eq!(gnome.path_index, 1);
        assert_eq!(gnome.position, Vec2::new(8.0, 0.0));

        assert_eq!(
            gnome.advance(Duration::from_secs(1), &waypoints, 2.0),
            Stride::Walking
        );
        assert_eq!(gnome.position, Vec2::new(32.0, 0.0));
        assert_eq!(
            gnome.advance(Duration::from_millis(16), &waypoints, 2.0),
            Stride::ReachedEnd
        );
    }

    #[test]
    fn decay_expires_into_removal() {
        let mut registry = MonsterRegistry::new();
        let mut gnome = monster(MonsterKind::Gnome);
        gnome.finish();
        registry.insert(gnome);

        let decay = Duration::from_secs(2);
        for monster in registry.iter_mut() {
            monster.tick_decay(Duration::from_secs(1), decay);
        }
        assert!(registry.prune().is_empty());
        for monster in registry.iter_mut() {
            monster.tick_decay(Duration::from_secs(1), decay);
        }
        assert_eq!(registry.prune(), vec![MonsterId::new(1)]);
        assert!(registry.is_empty());
    }
}

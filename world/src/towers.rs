//! Authoritative tower state: stats, upgrades, cooldowns and owned projectiles.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use mystic_towers_core::{
    saturating_duration, Color, MonsterId, ProjectileId, ProjectileSnapshot, SlowEffect, TileCoord, TowerCooldownSnapshot,
    TowerId, TowerKind, TowerSnapshot, TowerStats, UpgradeBonus, UpgradeError, UpgradeStats,
};

const DEFAULT_SLOW_SECONDS: f32 = 3.0;

/// A projectile homing toward a monster handle.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) position: Vec2,
    pub(crate) target: MonsterId,
    /// Last position at which the target was seen alive.
    pub(crate) last_known: Vec2,
    /// Set once the target handle stopped resolving.
    pub(crate) target_lost: bool,
    pub(crate) speed: f32,
}

/// A placed tower.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) tile: TileCoord,
    pub(crate) position: Vec2,
    pub(crate) damage: u32,
    /// Targeting range in pixels.
    pub(crate) range: f32,
    pub(crate) attack_speed: f32,
    /// Splash radius in pixels.
    pub(crate) splash: f32,
    pub(crate) slow: Option<SlowEffect>,
    pub(crate) projectile_speed: f32,
    pub(crate) projectile_color: Color,
    pub(crate) cooldown: Duration,
    pub(crate) target: Option<MonsterId>,
    pub(crate) selected: bool,
    pub(crate) projectiles: Vec<Projectile>,
    upgrades: Vec<UpgradeStats>,
    upgrades_bought: usize,
    tile_size: f32,
}

impl Tower {
    pub(crate) fn new(
        id: TowerId,
        kind: TowerKind,
        tile: TileCoord,
        stats: &TowerStats,
        tile_size: f32,
    ) -> Self {
        Self {
            id,
            kind,
            tile,
            position: tile.center(tile_size),
            damage: stats.damage,
            range: stats.range_tiles * tile_size,
            attack_speed: stats.attack_speed,
            splash: stats.splash_tiles * tile_size,
            slow: stats.slow,
            projectile_speed: stats.projectile.speed,
            projectile_color: stats.projectile.color,
            cooldown: Duration::ZERO,
            target: None,
            selected: false,
            projectiles: Vec::new(),
            upgrades: stats.upgrades.clone(),
            upgrades_bought: 0,
            tile_size,
        }
    }

    /// Seconds between shots, derived from the current attack speed.
    pub(crate) fn attack_period(&self) -> Duration {
        if self.attack_speed > 0.0 {
            saturating_duration(1.0 / self.attack_speed)
        } else {
            Duration::MAX
        }
    }

    pub(crate) fn level(&self) -> u32 {
        u32::try_from(self.upgrades_bought)
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }

    pub(crate) fn next_upgrade(&self) -> Result<&UpgradeStats, UpgradeError> {
        self.upgrades
            .get(self.upgrades_bought)
            .ok_or(UpgradeError::FullyUpgraded)
    }

    /// Applies the next upgrade's bonus. The caller pays for it.
    pub(crate) fn apply_next_upgrade(&mut self) {
        let Some(bonus) = self.upgrades.get(self.upgrades_bought).map(|upgrade| upgrade.bonus) else {
            return;
        };
        match bonus {
            UpgradeBonus::AttackSpeed { shots_per_second } => {
                self.attack_speed += shots_per_second;
            }
            UpgradeBonus::Damage { amount } => {
                self.damage = self.damage.saturating_add(amount);
            }
            UpgradeBonus::Slow { effect } => {
                let duration = self.slow.map_or(DEFAULT_SLOW_SECONDS, |slow| slow.duration);
                self.slow = Some(SlowEffect {
                    factor: (1.0 - effect).clamp(0.0, 1.0),
                    duration,
                });
            }
            UpgradeBonus::Splash { tiles } => {
                self.splash += tiles * self.tile_size;
            }
        }
        self.upgrades_bought += 1;
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            position: self.position,
            range: self.range,
            level: self.level(),
            selected: self.selected,
            target: self.target,
        }
    }

    pub(crate) fn cooldown_snapshot(&self) -> TowerCooldownSnapshot {
        TowerCooldownSnapshot {
            tower: self.id,
            kind: self.kind,
            ready_in: self.cooldown,
        }
    }

    pub(crate) fn projectile_snapshots(&self) -> impl Iterator<Item = ProjectileSnapshot> + '_ {
        self.projectiles.iter().map(|projectile| ProjectileSnapshot {
            id: projectile.id,
            tower: self.id,
            kind: self.kind,
            position: projectile.position,
            color: self.projectile_color,
            target: (!projectile.target_lost).then_some(projectile.target),
        })
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
    next_projectile_id: ProjectileId,
}

impl TowerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn allocate_tower_id(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, tower: Tower) {
        let _ = self.entries.insert(tower.id, tower);
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    /// Selects `tower` exclusively, or clears the selection for `None`.
    pub(crate) fn select(&mut self, tower: Option<TowerId>) {
        for entry in self.entries.values_mut() {
            entry.selected = Some(entry.id) == tower;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mystic_towers_core::TowerTable;

    fn tower(kind: TowerKind) -> Tower {
        let table = TowerTable::default();
        Tower::new(
            TowerId::new(0),
            kind,
            TileCoord::new(4, 12),
            table.stats(kind),
            32.0,
        )
    }

    #[test]
    fn ranges_and_splash_scale_with_tile_size() {
        let fire = tower(TowerKind::Fire);
        assert_eq!(fire.range, 160.0);
        assert_eq!(fire.splash, 32.0);
        assert_eq!(fire.position, Vec2::new(144.0, 400.0));
        assert_eq!(tower(TowerKind::Cannon).splash, 0.0);
    }

    #[test]
    fn attack_period_is_the_inverse_of_attack_speed() {
        assert_eq!(tower(TowerKind::Cannon).attack_period(), Duration::from_secs(1));
        let water = tower(TowerKind::Water);
        assert_eq!(water.attack_period(), Duration::from_secs_f32(2.5));
    }

    #[test]
    fn vanishing_attack_speed_never_fires_again() {
        let mut cannon = tower(TowerKind::Cannon);
        cannon.attack_speed = 1.0e-38;
        assert_eq!(cannon.attack_period(), Duration::MAX);
        cannon.attack_speed = 0.0;
        assert_eq!(cannon.attack_period(), Duration::MAX);
    }

    #[test]
    fn upgrades_apply_in_order_until_exhausted() {
        let mut water = tower(TowerKind::Water);
        assert_eq!(water.level(), 1);
        assert_eq!(water.next_upgrade().map(|upgrade| upgrade.name.as_str()), Ok("Ice Bolt"));

        water.apply_next_upgrade();
        let slow = water.slow.expect("water slows");
        assert_eq!(slow.factor, 0.75);
        assert_eq!(slow.duration, 3.0);

        water.apply_next_upgrade();
        assert_eq!(water.damage, 27);
        assert_eq!(water.level(), 3);
        assert_eq!(
            water.next_upgrade().map(|upgrade| upgrade.cost),
            Err(UpgradeError::FullyUpgraded)
        );
    }

    #[test]
    fn selection_is_exclusive() {
        let mut registry = TowerRegistry::new();
        for _ in 0..3 {
            let id = registry.allocate_tower_id();
            let mut entry = tower(TowerKind::Cannon);
            entry.id = id;
            registry.insert(entry);
        }
        registry.select(Some(TowerId::new(1)));
        let selected: Vec<_> = registry.iter().filter(|t| t.selected).map(|t| t.id).collect();
        assert_eq!(selected, vec![TowerId::new(1)]);
        registry.select(None);
        assert!(registry.iter().all(|t| !t.selected));
    }
}

//! Projectile flight and impact resolution.

use std::time::Duration;

use glam::Vec2;
use mystic_towers_core::{DiscardReason, Event, MonsterId, MotionConfig};
use tracing::debug;

use crate::{
    economy::Economy,
    monsters::MonsterRegistry,
    towers::{Projectile, Tower},
};

enum Flight {
    InFlight,
    Impact(Vec2),
    Lost,
}

/// Moves every projectile owned by `tower` and resolves those that arrive.
pub(crate) fn advance_projectiles(
    tower: &mut Tower,
    monsters: &mut MonsterRegistry,
    economy: &mut Economy,
    motion: &MotionConfig,
    dt: Duration,
    out_events: &mut Vec<Event>,
) {
    if tower.projectiles.is_empty() {
        return;
    }

    let projectiles = std::mem::take(&mut tower.projectiles);
    let mut in_flight = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        match fly(&mut projectile, tower.splash, monsters, motion, dt) {
            Flight::InFlight => in_flight.push(projectile),
            Flight::Impact(point) => {
                resolve_impact(tower, &projectile, point, monsters, economy, motion, out_events);
            }
            Flight::Lost => {
                debug!(
                    tower = tower.id.get(),
                    projectile = projectile.id.get(),
                    "projectile discarded after losing its target"
                );
                out_events.push(Event::ProjectileDiscarded {
                    tower: tower.id,
                    projectile: projectile.id,
                    reason: DiscardReason::TargetLost,
                });
            }
        }
    }

    tower.projectiles = in_flight;
}

fn fly(
    projectile: &mut Projectile,
    splash: f32,
    monsters: &MonsterRegistry,
    motion: &MotionConfig,
    dt: Duration,
) -> Flight {
    match monsters.alive(projectile.target) {
        Some(monster) => projectile.last_known = monster.position,
        None => projectile.target_lost = true,
    }
    if projectile.target_lost && splash <= 0.0 {
        return Flight::Lost;
    }

    let offset = projectile.last_known - projectile.position;
    let distance = offset.length();
    if distance < motion.impact_threshold {
        return Flight::Impact(projectile.position);
    }

    let step = projectile.speed * dt.as_secs_f32();
    if step >= distance {
        projectile.position = projectile.last_known;
    } else {
        projectile.position += offset / distance * step;
    }
    Flight::InFlight
}

fn resolve_impact(
    tower: &Tower,
    projectile: &Projectile,
    point: Vec2,
    monsters: &mut MonsterRegistry,
    economy: &mut Economy,
    motion: &MotionConfig,
    out_events: &mut Vec<Event>,
) {
    let victims: Vec<MonsterId> = if tower.splash > 0.0 {
        monsters
            .iter()
            .filter(|monster| monster.is_alive() && monster.position.distance(point) <= tower.splash)
            .map(|monster| monster.id)
            .collect()
    } else {
        monsters
            .alive(projectile.target)
            .map(|monster| monster.id)
            .into_iter()
            .collect()
    };

    for id in victims {
        let Some(monster) = monsters.get_mut(id) else {
            continue;
        };
        let lethal = monster.take_damage(tower.damage, economy);
        if let Some(slow) = tower.slow {
            monster.apply_slow(slow);
        }

        out_events.push(Event::MonsterHit {
            monster: id,
            position: Vec2::new(monster.position.x, monster.position.y - monster.size),
            color: monster.color,
            particles: motion.hit_particles,
        });

        if lethal {
            debug!(monster = id.get(), kind = ?monster.kind, "monster killed");
            out_events.push(Event::MonsterKilled {
                monster: id,
                kind: monster.kind,
                reward: monster.reward,
                position: monster.position,
                color: monster.color,
                particles: motion.hit_particles,
            });
            out_events.push(Event::GoldChanged {
                balance: economy.balance(),
            });
        }
    }

    out_events.push(Event::ProjectileImpact {
        tower: tower.id,
        position: point,
        color: tower.projectile_color,
        particles: motion.impact_particles,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use mystic_towers_core::{
        Gold, MonsterKind, MonsterTable, ProjectileId, TileCoord, TowerId, TowerKind, TowerTable,
    };

    use crate::monsters::Monster;

    fn spawn(registry: &mut MonsterRegistry, position: Vec2) -> MonsterId {
        let id = registry.allocate_id();
        let stats = MonsterTable::default().stats(MonsterKind::BigSpider);
        registry.insert(Monster::spawn(
            id,
            MonsterKind::BigSpider,
            &stats,
            stats.reward,
            position,
        ));
        id
    }

    fn armed_tower(kind: TowerKind, target: MonsterId, at: Vec2) -> Tower {
        let table = TowerTable::default();
        let mut tower = Tower::new(TowerId::new(0), kind, TileCoord::new(4, 12), table.stats(kind), 32.0);
        tower.projectiles.push(Projectile {
            id: ProjectileId::new(0),
            position: at,
            target,
            last_known: at,
            target_lost: false,
            speed: tower.projectile_speed,
        });
        tower
    }

    fn hits(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, Event::MonsterHit { .. }))
            .count()
    }

    #[test]
    fn splash_damages_every_live_monster_in_radius() {
        let mut monsters = MonsterRegistry::new();
        let target = spawn(&mut monsters, Vec2::new(100.0, 100.0));
        let _ = spawn(&mut monsters, Vec2::new(120.0, 100.0));
        let _ = spawn(&mut monsters, Vec2::new(300.0, 100.0));
        let mut tower = armed_tower(TowerKind::Fire, target, Vec2::new(100.0, 100.0));
        let mut economy = Economy::new(Gold::ZERO);
        let mut events = Vec::new();

        advance_projectiles(
            &mut tower,
            &mut monsters,
            &mut economy,
            &MotionConfig::default(),
            Duration::from_millis(16),
            &mut events,
        );

        assert_eq!(hits(&events), 2);
        assert!(tower.projectiles.is_empty());
        let damaged = monsters
            .iter()
            .filter(|monster| monster.snapshot(Duration::ZERO).health.get() < 300)
            .count();
        assert_eq!(damaged, 2);
    }

    #[test]
    fn single_target_towers_hit_one_monster() {
        let mut monsters = MonsterRegistry::new();
        let target = spawn(&mut monsters, Vec2::new(100.0, 100.0));
        let _ = spawn(&mut monsters, Vec2::new(100.0, 100.0));
        let mut tower = armed_tower(TowerKind::Water, target, Vec2::new(100.0, 100.0));
        let mut economy = Economy::new(Gold::ZERO);
        let mut events = Vec::new();

        advance_projectiles(
            &mut tower,
            &mut monsters,
            &mut economy,
            &MotionConfig::default(),
            Duration::from_millis(16),
            &mut events,
        );

        assert_eq!(hits(&events), 1);
        let hit = monsters.get(target).expect("target alive");
        assert!(hit.is_slowed());
    }

    #[test]
    fn lost_single_target_projectiles_are_discarded() {
        let mut monsters = MonsterRegistry::new();
        let mut tower = armed_tower(TowerKind::Cannon, MonsterId::new(99), Vec2::ZERO);
        let mut economy = Economy::new(Gold::ZERO);
        let mut events = Vec::new();

        advance_projectiles(
            &mut tower,
            &mut monsters,
            &mut economy,
            &MotionConfig::default(),
            Duration::from_millis(16),
            &mut events,
        );

        assert!(tower.projectiles.is_empty());
        assert!(matches!(
            events.as_slice(),
            [Event::ProjectileDiscarded {
                reason: DiscardReason::TargetLost,
                ..
            }]
        ));
    }

    #[test]
    fn lost_splash_projectiles_land_at_the_last_known_point() {
        let mut monsters = MonsterRegistry::new();
        let bystander = spawn(&mut monsters, Vec2::new(50.0, 0.0));
        let mut tower = armed_tower(TowerKind::Fire, MonsterId::new(99), Vec2::ZERO);
        tower.projectiles[0].last_known = Vec2::new(40.0, 0.0);
        let mut economy = Economy::new(Gold::ZERO);
        let mut events = Vec::new();
        let motion = MotionConfig::default();

        for _ in 0..30 {
            advance_projectiles(
                &mut tower,
                &mut monsters,
                &mut economy,
                &motion,
                Duration::from_millis(16),
                &mut events,
            );
        }

        assert!(tower.projectiles.is_empty());
        assert_eq!(hits(&events), 1);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::MonsterHit { monster, .. } if *monster == bystander
        )));
    }
}

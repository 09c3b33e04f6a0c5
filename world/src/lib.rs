#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Mystic Towers.
//!
//! The world owns the path, the gold ledger, the base, every monster, tower
//! and projectile, the spawn roster of the running wave and the wave counter.
//! All mutation flows through [`apply`]; everything else reads through
//! [`query`].

mod combat;
mod economy;
mod monsters;
mod path;
mod towers;
mod waves;

use std::time::Duration;

use mystic_towers_core::{
    saturating_duration, BalanceConfig, Command, Event, Gold, MonsterId, MonsterKind,
    PlacementError, SessionOutcome, SpawnPlacement, TileCoord, TowerId, TowerKind, UpgradeError,
};
use mystic_towers_system_wave_composition as wave_composition;
use tracing::{debug, info, warn};

use crate::{
    economy::{Base, Economy},
    monsters::{Monster, MonsterRegistry, Stride},
    path::Path,
    towers::{Projectile, Tower, TowerRegistry},
    waves::{SpawnRoster, WaveManager},
};

/// Represents the authoritative Mystic Towers world state.
#[derive(Clone, Debug)]
pub struct World {
    balance: BalanceConfig,
    path: Path,
    economy: Economy,
    base: Base,
    monsters: MonsterRegistry,
    towers: TowerRegistry,
    roster: SpawnRoster,
    waves: WaveManager,
    outcome: SessionOutcome,
}

impl World {
    /// Creates a new world using the shipped balance tables.
    #[must_use]
    pub fn new() -> Self {
        Self::with_balance(BalanceConfig::default())
    }

    /// Creates a new world from the provided balance tables.
    #[must_use]
    pub fn with_balance(balance: BalanceConfig) -> Self {
        Self {
            path: Path::new(&balance.path, &balance.grid),
            economy: Economy::new(balance.economy.starting_gold),
            base: Base::new(balance.base.health),
            monsters: MonsterRegistry::new(),
            towers: TowerRegistry::new(),
            roster: SpawnRoster::default(),
            waves: WaveManager::new(),
            outcome: SessionOutcome::Ongoing,
            balance,
        }
    }

    fn decay_duration(&self) -> Duration {
        saturating_duration(self.balance.motion.decay_seconds)
    }

    fn advance_monsters(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let decay = self.decay_duration();
        let epsilon = self.balance.motion.waypoint_epsilon;
        let contact_damage = self.balance.base.contact_damage;

        for monster in self.monsters.iter_mut() {
            if !monster.is_alive() {
                monster.tick_decay(dt, decay);
                continue;
            }
            if monster.advance(dt, self.path.waypoints(), epsilon) == Stride::Walking {
                continue;
            }

            monster.finish();
            out_events.push(Event::MonsterReachedBase {
                monster: monster.id,
                kind: monster.kind,
            });
            if monster.kind.is_boss() {
                self.base.breach();
                warn!(monster = monster.id.get(), kind = ?monster.kind, "boss breached the base");
                out_events.push(Event::BaseBreached {
                    monster: monster.id,
                });
            } else {
                let remaining = self.base.damage(contact_damage);
                debug!(
                    monster = monster.id.get(),
                    remaining = remaining.get(),
                    "monster reached the base"
                );
                out_events.push(Event::BaseDamaged {
                    amount: contact_damage,
                    remaining,
                });
            }
        }

        for monster in self.monsters.prune() {
            out_events.push(Event::MonsterRemoved { monster });
        }

        if self.roster.settle(self.monsters.is_empty()) {
            debug!(wave = self.waves.counter(), "spawn roster drained");
        }
    }

    fn spawn_monster(
        &mut self,
        kind: MonsterKind,
        reward: Gold,
        placement: SpawnPlacement,
        out_events: &mut Vec<Event>,
    ) {
        if !self.roster.pop_if(kind) {
            warn!(?kind, "spawn request does not match the spawn queue front");
            return;
        }

        let position = match placement {
            SpawnPlacement::PathStart => self.path.waypoints().first().copied(),
            SpawnPlacement::Trailing => self
                .path
                .trailing_start(self.balance.waves.paired_spawn.trailing_offset),
        };
        let Some(position) = position else {
            warn!("path has no waypoints; spawn dropped");
            return;
        };

        let id = self.monsters.allocate_id();
        let stats = self.balance.monsters.stats(kind);
        self.monsters
            .insert(Monster::spawn(id, kind, &stats, reward, position));
        debug!(monster = id.get(), ?kind, reward = reward.get(), "monster spawned");
        out_events.push(Event::MonsterSpawned {
            monster: id,
            kind,
            position,
        });
    }

    fn advance_towers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let motion = self.balance.motion;
        for tower in self.towers.iter_mut() {
            combat::advance_projectiles(
                tower,
                &mut self.monsters,
                &mut self.economy,
                &motion,
                dt,
                out_events,
            );
            tower.cooldown = tower.cooldown.saturating_sub(dt);
            if tower.cooldown.is_zero() {
                tower.target = None;
            }
        }
    }

    fn fire_projectile(&mut self, tower: TowerId, target: MonsterId, out_events: &mut Vec<Event>) {
        let Some(monster) = self.monsters.alive(target) else {
            debug!(tower = tower.get(), monster = target.get(), "fire request for a dead target");
            return;
        };
        let monster_position = monster.position;
        let projectile_id = self.towers.allocate_projectile_id();
        let Some(entry) = self.towers.get_mut(tower) else {
            warn!(tower = tower.get(), "fire request for an unknown tower");
            return;
        };
        if !entry.cooldown.is_zero() || entry.position.distance(monster_position) > entry.range {
            return;
        }

        entry.projectiles.push(Projectile {
            id: projectile_id,
            position: entry.position,
            target,
            last_known: monster_position,
            target_lost: false,
            speed: entry.projectile_speed,
        });
        entry.cooldown = entry.attack_period();
        entry.target = Some(target);
        out_events.push(Event::ProjectileFired {
            tower,
            projectile: projectile_id,
            target,
        });
    }

    fn place_tower(&mut self, kind: TowerKind, tile: TileCoord) -> Result<TowerId, PlacementError> {
        self.path.check_placement(tile)?;
        let stats = self.balance.towers.stats(kind);
        if self.waves.counter() < stats.unlock_wave {
            return Err(PlacementError::Locked {
                unlock_wave: stats.unlock_wave,
            });
        }
        if !self.economy.spend(stats.cost) {
            return Err(PlacementError::InsufficientFunds);
        }
        self.path.occupy(tile);

        let id = self.towers.allocate_tower_id();
        let tower = Tower::new(id, kind, tile, stats, self.path.tile_size());
        self.towers.insert(tower);
        Ok(id)
    }

    fn upgrade_tower(&mut self, tower: TowerId) -> Result<u32, UpgradeError> {
        let entry = self
            .towers
            .get_mut(tower)
            .ok_or(UpgradeError::MissingTower)?;
        let cost = entry.next_upgrade()?.cost;
        if !self.economy.spend(cost) {
            return Err(UpgradeError::InsufficientFunds);
        }
        entry.apply_next_upgrade();
        Ok(entry.level())
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        let Some(wave) = self.waves.start() else {
            debug!(wave = self.waves.counter(), "wave already in progress");
            return;
        };

        let table = &self.balance.waves;
        let queue = wave_composition::compose(table, wave);
        let queued = queue.len();
        self.roster.start(wave, queue);
        info!(wave, queued, "wave started");
        out_events.push(Event::WaveStarted { wave, queued });
        if let Some(milestone) = wave_composition::milestone(table, wave) {
            out_events.push(Event::WaveMilestone { wave, milestone });
        }
    }

    fn advance_wave(&mut self, out_events: &mut Vec<Event>) {
        if let Some(wave) = self.waves.settle(self.roster.is_active()) {
            let bonus = wave_composition::completion_bonus(&self.balance.waves, wave);
            info!(wave, bonus = bonus.get(), "wave completed");
            out_events.push(Event::WaveCompleted { wave, bonus });
            if bonus != Gold::ZERO {
                self.economy.earn(bonus);
                out_events.push(Event::GoldChanged {
                    balance: self.economy.balance(),
                });
            }
        }

        let outcome = self.evaluate_outcome();
        if outcome != self.outcome {
            self.outcome = outcome;
            info!(?outcome, wave = self.waves.counter(), "session ended");
            out_events.push(Event::SessionEnded { outcome });
        }
    }

    fn evaluate_outcome(&self) -> SessionOutcome {
        if self.base.is_destroyed() {
            return SessionOutcome::Defeat;
        }
        // Decaying boss corpses still hold the session open.
        let boss_present = self.monsters.iter().any(|monster| monster.kind.is_boss());
        if self.waves.counter() > self.balance.waves.total_waves && !boss_present {
            return SessionOutcome::Victory;
        }
        SessionOutcome::Ongoing
    }

    fn is_finished(&self) -> bool {
        self.outcome != SessionOutcome::Ongoing
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.is_finished() && !matches!(command, Command::RestartSession) {
        return;
    }

    match command {
        Command::RestartSession => {
            *world = World::with_balance(world.balance.clone());
            info!("session restarted");
            out_events.push(Event::SessionRestarted);
            out_events.push(Event::GoldChanged {
                balance: world.economy.balance(),
            });
        }
        Command::AdvanceMonsters { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_monsters(dt, out_events);
        }
        Command::AdvanceTowers { dt } => world.advance_towers(dt, out_events),
        Command::AdvanceWave => world.advance_wave(out_events),
        Command::StartWave => world.start_wave(out_events),
        Command::JumpToWave { wave } => {
            world.roster.clear();
            world.waves.rewind_to(wave.max(1));
            world.start_wave(out_events);
        }
        Command::SpawnMonster {
            kind,
            reward,
            placement,
        } => world.spawn_monster(kind, reward, placement, out_events),
        Command::PlaceTower { kind, tile } => match world.place_tower(kind, tile) {
            Ok(tower) => {
                info!(tower = tower.get(), ?kind, ?tile, "tower placed");
                out_events.push(Event::TowerPlaced { tower, kind, tile });
                out_events.push(Event::GoldChanged {
                    balance: world.economy.balance(),
                });
            }
            Err(reason) => {
                warn!(?kind, ?tile, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, tile, reason });
            }
        },
        Command::UpgradeTower { tower } => match world.upgrade_tower(tower) {
            Ok(level) => {
                info!(tower = tower.get(), level, "tower upgraded");
                out_events.push(Event::TowerUpgraded { tower, level });
                out_events.push(Event::GoldChanged {
                    balance: world.economy.balance(),
                });
            }
            Err(reason) => {
                warn!(tower = tower.get(), %reason, "tower upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected { tower, reason });
            }
        },
        Command::SelectTower { tower } => {
            if let Some(id) = tower {
                if world.towers.get(id).is_none() {
                    warn!(tower = id.get(), "selection of an unknown tower ignored");
                    return;
                }
            }
            world.towers.select(tower);
            out_events.push(Event::TowerSelectionChanged { tower });
        }
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::GrantGold { amount } => {
            world.economy.earn(amount);
            out_events.push(Event::GoldChanged {
                balance: world.economy.balance(),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use mystic_towers_core::{
        BalanceConfig, Gold, Health, MonsterView, ProjectileSnapshot, SessionOutcome,
        SpawnQueueView, TileCoord, TowerCooldownView, TowerView,
    };

    use super::World;

    /// Captures a read-only view of every monster in the live collection.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        let decay = world.decay_duration();
        MonsterView::from_snapshots(
            world
                .monsters
                .iter()
                .map(|monster| monster.snapshot(decay))
                .collect(),
        )
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures the cooldown of every placed tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower.cooldown_snapshot())
                .collect(),
        )
    }

    /// Lists every projectile in flight, grouped by owning tower.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .towers
            .iter()
            .flat_map(|tower| tower.projectile_snapshots())
            .collect()
    }

    /// Pending spawns of the running wave.
    #[must_use]
    pub fn spawn_queue(world: &World) -> SpawnQueueView<'_> {
        world.roster.view()
    }

    /// Balance tables the world was built from.
    #[must_use]
    pub fn balance(world: &World) -> &BalanceConfig {
        &world.balance
    }

    /// Current gold balance.
    #[must_use]
    pub fn gold(world: &World) -> Gold {
        world.economy.balance()
    }

    /// Remaining hit points of the base.
    #[must_use]
    pub fn base_health(world: &World) -> Health {
        world.base.health()
    }

    /// Tile the base stands on.
    #[must_use]
    pub fn base_tile(world: &World) -> TileCoord {
        world.path.base()
    }

    /// Number of the current (or last finished) wave; zero before the first.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.waves.counter()
    }

    /// Whether a wave is running.
    #[must_use]
    pub fn wave_in_progress(world: &World) -> bool {
        world.waves.in_progress()
    }

    /// Session state surfaced to the flow controller.
    #[must_use]
    pub fn outcome(world: &World) -> SessionOutcome {
        world.outcome
    }

    /// Reports whether a tower could stand on `tile`.
    #[must_use]
    pub fn is_buildable(world: &World, tile: TileCoord) -> bool {
        world.path.is_buildable(tile)
    }

    /// Reports whether monsters walk across `tile`.
    #[must_use]
    pub fn is_path_tile(world: &World, tile: TileCoord) -> bool {
        world.path.is_on_path(tile)
    }

    /// Enumerates every tile a tower could currently be placed on.
    #[must_use]
    pub fn buildable_tiles(world: &World) -> Vec<TileCoord> {
        world.path.buildable_tiles().collect()
    }

    /// Waypoints monsters walk along, in pixels.
    #[must_use]
    pub fn waypoints(world: &World) -> &[Vec2] {
        world.path.waypoints()
    }

    /// Waypoint an agent at `position` is heading to, by bounding-box scan.
    #[must_use]
    pub fn next_waypoint(world: &World, position: Vec2) -> Option<Vec2> {
        world.path.next_waypoint(position)
    }
}

//! Static balance tables consumed by the world and the wave systems.
//!
//! Every number that shapes a session lives here so adapters can load an
//! override from disk. [`BalanceConfig::default`] reproduces the shipped game.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Color, Gold, Health, MonsterKind, TileCoord, TowerKind};

/// Aggregated tuning knobs for a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Map dimensions.
    pub grid: GridConfig,
    /// Tile sequence monsters walk along.
    pub path: PathConfig,
    /// Ledger starting state.
    pub economy: EconomyConfig,
    /// Defended base parameters.
    pub base: BaseConfig,
    /// Per-kind monster statistics.
    pub monsters: MonsterTable,
    /// Per-kind tower statistics.
    pub towers: TowerTable,
    /// Wave composition tables.
    pub waves: WaveTable,
    /// Distance and timing thresholds used by movement and projectiles.
    pub motion: MotionConfig,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            path: PathConfig::default(),
            economy: EconomyConfig::default(),
            base: BaseConfig::default(),
            monsters: MonsterTable::default(),
            towers: TowerTable::default(),
            waves: WaveTable::default(),
            motion: MotionConfig::default(),
        }
    }
}

/// Map dimensions measured in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Edge length of a tile in pixels.
    pub tile_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            tile_size: 32.0,
        }
    }
}

/// Ordered tiles monsters walk from spawn to base.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Path tiles in walking order.
    pub tiles: Vec<TileCoord>,
    /// Tile the defended base stands on.
    pub base: TileCoord,
}

impl Default for PathConfig {
    fn default() -> Self {
        let mut tiles = Vec::new();
        tiles.extend((0..=5).map(|column| TileCoord::new(column, 13)));
        tiles.extend((9..=12).rev().map(|row| TileCoord::new(5, row)));
        tiles.extend((6..=10).map(|column| TileCoord::new(column, 9)));
        tiles.extend((5..=8).rev().map(|row| TileCoord::new(10, row)));
        tiles.extend((3..=9).rev().map(|column| TileCoord::new(column, 5)));
        tiles.extend([TileCoord::new(3, 4), TileCoord::new(3, 3)]);
        tiles.extend((4..=18).map(|column| TileCoord::new(column, 3)));
        Self {
            tiles,
            base: TileCoord::new(19, 3),
        }
    }
}

/// Ledger starting state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Balance at session start.
    pub starting_gold: Gold,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: Gold::new(160),
        }
    }
}

/// Defended base parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseConfig {
    /// Base hit points at session start.
    pub health: Health,
    /// Damage dealt by a non-boss monster reaching the end of the path.
    pub contact_damage: u32,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            health: Health::new(80),
            contact_damage: 10,
        }
    }
}

/// Statistics shared by every monster of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterStats {
    /// Hit points at spawn.
    pub health: Health,
    /// Walking speed in pixels per second.
    pub speed: f32,
    /// Gold granted on death unless overridden at spawn.
    pub reward: Gold,
    /// Sprite radius in pixels, used to place hit feedback above the sprite.
    pub size: f32,
    /// Particle color for hit and death feedback.
    pub color: Color,
}

/// Statistics for each monster archetype plus the shared boss tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterTable {
    /// Gnome statistics.
    pub gnome: MonsterStats,
    /// Fast spider statistics.
    pub fast_spider: MonsterStats,
    /// Big spider statistics.
    pub big_spider: MonsterStats,
    /// Boss-tier statistics used by every boss variant.
    pub boss: MonsterStats,
}

impl MonsterTable {
    /// Resolves the statistics a monster of `kind` spawns with.
    ///
    /// Boss variants use the boss tier but keep their archetype's color.
    #[must_use]
    pub fn stats(&self, kind: MonsterKind) -> MonsterStats {
        let archetype = match kind.archetype() {
            MonsterKind::FastSpider => self.fast_spider,
            MonsterKind::BigSpider => self.big_spider,
            _ => self.gnome,
        };
        if kind.is_boss() {
            MonsterStats {
                color: archetype.color,
                ..self.boss
            }
        } else {
            archetype
        }
    }
}

impl Default for MonsterTable {
    fn default() -> Self {
        Self {
            gnome: MonsterStats {
                health: Health::new(24),
                speed: 80.0,
                reward: Gold::new(7),
                size: 10.0,
                color: Color::from_rgb(40, 100, 200),
            },
            fast_spider: MonsterStats {
                health: Health::new(80),
                speed: 120.0,
                reward: Gold::new(12),
                size: 12.0,
                color: Color::from_rgb(139, 69, 19),
            },
            big_spider: MonsterStats {
                health: Health::new(300),
                speed: 60.0,
                reward: Gold::new(35),
                size: 16.0,
                color: Color::from_rgb(0, 90, 40),
            },
            boss: MonsterStats {
                health: Health::new(1500),
                speed: 45.0,
                reward: Gold::new(250),
                size: 24.0,
                color: Color::from_rgb(139, 0, 0),
            },
        }
    }
}

/// Temporary multiplicative speed reduction applied on hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    /// Speed multiplier while slowed; smaller is stronger.
    pub factor: f32,
    /// Seconds the slow lasts.
    pub duration: f32,
}

/// Projectile flight parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileStyle {
    /// Flight speed in pixels per second.
    pub speed: f32,
    /// Draw and impact particle color.
    pub color: Color,
}

/// Bonus granted by a purchased upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "bonus", rename_all = "snake_case")]
pub enum UpgradeBonus {
    /// Adds shots per second.
    AttackSpeed {
        /// Shots per second added.
        shots_per_second: f32,
    },
    /// Adds damage per hit.
    Damage {
        /// Damage added.
        amount: u32,
    },
    /// Installs a slow that removes `effect` of the target's speed.
    Slow {
        /// Fraction of speed removed.
        effect: f32,
    },
    /// Widens the splash radius.
    Splash {
        /// Tiles added to the splash radius.
        tiles: f32,
    },
}

/// A purchasable tower upgrade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeStats {
    /// Display name.
    pub name: String,
    /// Gold cost.
    pub cost: Gold,
    /// Bonus applied when purchased.
    pub bonus: UpgradeBonus,
}

/// Statistics shared by every tower of a kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Placement cost.
    pub cost: Gold,
    /// First wave during which the tower may be placed.
    #[serde(default)]
    pub unlock_wave: u32,
    /// Damage dealt per hit.
    pub damage: u32,
    /// Targeting range in tiles.
    pub range_tiles: f32,
    /// Shots per second.
    pub attack_speed: f32,
    /// Splash radius in tiles; zero for single-target towers.
    pub splash_tiles: f32,
    /// Status effect applied on hit.
    pub slow: Option<SlowEffect>,
    /// Projectile flight parameters.
    pub projectile: ProjectileStyle,
    /// Upgrades purchasable in order.
    pub upgrades: Vec<UpgradeStats>,
}

/// Statistics for each tower kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerTable {
    /// Cannon tower statistics.
    pub cannon: TowerStats,
    /// Water tower statistics.
    pub water: TowerStats,
    /// Fire tower statistics.
    pub fire: TowerStats,
}

impl TowerTable {
    /// Statistics for the provided tower kind.
    #[must_use]
    pub fn stats(&self, kind: TowerKind) -> &TowerStats {
        match kind {
            TowerKind::Cannon => &self.cannon,
            TowerKind::Water => &self.water,
            TowerKind::Fire => &self.fire,
        }
    }
}

impl Default for TowerTable {
    fn default() -> Self {
        Self {
            cannon: TowerStats {
                cost: Gold::new(60),
                damage: 7,
                range_tiles: 3.0,
                attack_speed: 1.0,
                splash_tiles: 0.0,
                slow: None,
                projectile: ProjectileStyle {
                    speed: 400.0,
                    color: Color::from_rgb(150, 75, 0),
                },
                upgrades: vec![
                    UpgradeStats {
                        name: "Rapid Fire".to_owned(),
                        cost: Gold::new(195),
                        bonus: UpgradeBonus::AttackSpeed {
                            shots_per_second: 0.4,
                        },
                    },
                    UpgradeStats {
                        name: "Sharp Arrows".to_owned(),
                        cost: Gold::new(260),
                        bonus: UpgradeBonus::Damage { amount: 5 },
                    },
                ],
                unlock_wave: 0,
            },
            water: TowerStats {
                cost: Gold::new(85),
                damage: 15,
                range_tiles: 4.0,
                attack_speed: 0.4,
                splash_tiles: 0.0,
                slow: Some(SlowEffect {
                    factor: 0.9,
                    duration: 3.0,
                }),
                projectile: ProjectileStyle {
                    speed: 300.0,
                    color: Color::from_rgb(0, 100, 255),
                },
                upgrades: vec![
                    UpgradeStats {
                        name: "Ice Bolt".to_owned(),
                        cost: Gold::new(225),
                        bonus: UpgradeBonus::Slow { effect: 0.25 },
                    },
                    UpgradeStats {
                        name: "Arcane Power".to_owned(),
                        cost: Gold::new(325),
                        bonus: UpgradeBonus::Damage { amount: 12 },
                    },
                ],
                unlock_wave: 0,
            },
            fire: TowerStats {
                cost: Gold::new(120),
                damage: 25,
                range_tiles: 5.0,
                attack_speed: 0.3,
                splash_tiles: 1.0,
                slow: None,
                projectile: ProjectileStyle {
                    speed: 200.0,
                    color: Color::from_rgb(100, 100, 100),
                },
                upgrades: vec![
                    UpgradeStats {
                        name: "Larger Splash".to_owned(),
                        cost: Gold::new(260),
                        bonus: UpgradeBonus::Splash { tiles: 1.0 },
                    },
                    UpgradeStats {
                        name: "Heavy Impact".to_owned(),
                        cost: Gold::new(390),
                        bonus: UpgradeBonus::Damage { amount: 20 },
                    },
                ],
                unlock_wave: 10,
            },
        }
    }
}

/// Closed-form monster count for a wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "formula", rename_all = "snake_case")]
pub enum CountFormula {
    /// Looked up by position of the wave inside its tier.
    Table {
        /// Counts for the first, second, ... wave of the tier.
        values: Vec<u32>,
    },
    /// `floor(wave * factor)`.
    Scaled {
        /// Multiplier applied to the wave number.
        factor: f64,
    },
    /// `max(0, floor((wave - offset) / divisor))`.
    Offset {
        /// Subtracted from the wave number.
        offset: i64,
        /// Divides the difference.
        divisor: i64,
    },
}

impl CountFormula {
    /// Evaluates the formula for `wave`, the `index`-th wave of its tier.
    #[must_use]
    pub fn evaluate(&self, wave: u32, index: usize) -> u32 {
        match self {
            Self::Table { values } => values
                .get(index)
                .or_else(|| values.last())
                .copied()
                .unwrap_or(0),
            Self::Scaled { factor } => {
                let scaled = (f64::from(wave) * factor).floor();
                if scaled <= 0.0 {
                    0
                } else {
                    scaled as u32
                }
            }
            Self::Offset { offset, divisor } => {
                let divisor = (*divisor).max(1);
                let value = (i64::from(wave) - offset).div_euclid(divisor);
                u32::try_from(value.max(0)).unwrap_or(u32::MAX)
            }
        }
    }
}

/// Gold granted by the basic monster kind, computed from the wave number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "formula", rename_all = "snake_case")]
pub enum RewardFormula {
    /// Looked up by position of the wave inside its tier.
    Table {
        /// Rewards for the first, second, ... wave of the tier.
        values: Vec<u32>,
    },
    /// `base + floor(wave / divisor)`.
    Stepped {
        /// Reward before the wave bonus.
        base: u32,
        /// Waves per extra gold.
        divisor: u32,
    },
}

impl RewardFormula {
    /// Evaluates the formula for `wave`, the `index`-th wave of its tier.
    #[must_use]
    pub fn evaluate(&self, wave: u32, index: usize) -> Gold {
        match self {
            Self::Table { values } => Gold::new(
                values
                    .get(index)
                    .or_else(|| values.last())
                    .copied()
                    .unwrap_or(0),
            ),
            Self::Stepped { base, divisor } => {
                Gold::new(base.saturating_add(wave / (*divisor).max(1)))
            }
        }
    }
}

/// Monsters of one kind queued per wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnGroup {
    /// Kind queued.
    pub kind: MonsterKind,
    /// Count formula.
    pub count: CountFormula,
}

/// Extra monsters appended to even-numbered waves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvenWaveBonus {
    /// Kind added.
    pub kind: MonsterKind,
    /// Fixed part of the extra count.
    pub base: u32,
    /// Waves per additional extra monster.
    pub divisor: u32,
}

impl EvenWaveBonus {
    /// Extra monsters for `wave`, zero on odd waves.
    #[must_use]
    pub fn extra(&self, wave: u32) -> u32 {
        if wave % 2 != 0 {
            return 0;
        }
        self.base.saturating_add(wave / self.divisor.max(1))
    }
}

/// One of the early, mid or late wave tiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// First wave covered by the tier.
    pub first_wave: u32,
    /// Last wave covered by the tier.
    pub last_wave: u32,
    /// Seconds between spawns.
    pub spawn_delay: f32,
    /// Queued groups, in spawn order.
    pub groups: Vec<SpawnGroup>,
    /// Extra monsters on even waves.
    pub even_wave_bonus: Option<EvenWaveBonus>,
    /// Reward override for the basic monster kind.
    pub basic_reward: RewardFormula,
}

impl TierConfig {
    /// Reports whether the tier covers `wave`.
    #[must_use]
    pub fn covers(&self, wave: u32) -> bool {
        (self.first_wave..=self.last_wave).contains(&wave)
    }

    /// Position of `wave` inside the tier.
    #[must_use]
    pub fn index_of(&self, wave: u32) -> usize {
        usize::try_from(wave.saturating_sub(self.first_wave)).unwrap_or(usize::MAX)
    }
}

/// Spawn pacing of the final wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossTierConfig {
    /// Seconds waited before a boss enters.
    pub boss_delay: f32,
    /// Seconds waited before any other monster enters.
    pub escort_delay: f32,
}

/// A fixed group appended to one specific wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedExtra {
    /// Wave the group is appended to.
    pub wave: u32,
    /// Kind appended.
    pub kind: MonsterKind,
    /// Number appended.
    pub count: u32,
}

/// Gold granted for finishing one specific wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveBonus {
    /// Wave whose completion pays out.
    pub wave: u32,
    /// Gold granted.
    pub gold: Gold,
}

/// Chance of a second spawn in the same frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairedSpawnConfig {
    /// First wave on which spawns may pair.
    pub from_wave: u32,
    /// Probability in `0.0..=1.0` that a spawn is paired.
    pub chance: f64,
    /// Pixels the second monster trails behind the first waypoint.
    pub trailing_offset: f32,
}

/// Wave composition tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveTable {
    /// Number of the final (boss) wave.
    pub total_waves: u32,
    /// Waves 1 to 5.
    pub early: TierConfig,
    /// Waves 6 to 15.
    pub mid: TierConfig,
    /// Waves 16 to 20.
    pub late: TierConfig,
    /// Pacing of the final wave.
    pub boss: BossTierConfig,
    /// Every this-many waves below the final wave is a challenge wave.
    pub challenge_interval: u32,
    /// Count multiplier on challenge waves, rounded up.
    pub challenge_multiplier: f64,
    /// Groups appended to specific waves after scaling.
    pub fixed_extras: Vec<FixedExtra>,
    /// Kind whose reward follows the tier reward formula.
    pub basic_kind: MonsterKind,
    /// Paired spawn behaviour.
    pub paired_spawn: PairedSpawnConfig,
    /// One-off completion bonus.
    pub completion_bonus: WaveBonus,
}

impl Default for WaveTable {
    fn default() -> Self {
        let even_wave_bonus = Some(EvenWaveBonus {
            kind: MonsterKind::FastSpider,
            base: 2,
            divisor: 6,
        });
        Self {
            total_waves: 21,
            early: TierConfig {
                first_wave: 1,
                last_wave: 5,
                spawn_delay: 0.9,
                groups: vec![SpawnGroup {
                    kind: MonsterKind::Gnome,
                    count: CountFormula::Table {
                        values: vec![7, 10, 13, 16, 19],
                    },
                }],
                even_wave_bonus: None,
                basic_reward: RewardFormula::Table {
                    values: vec![8, 7, 7, 7, 7],
                },
            },
            mid: TierConfig {
                first_wave: 6,
                last_wave: 15,
                spawn_delay: 1.0,
                groups: vec![
                    SpawnGroup {
                        kind: MonsterKind::Gnome,
                        count: CountFormula::Scaled { factor: 2.2 },
                    },
                    SpawnGroup {
                        kind: MonsterKind::FastSpider,
                        count: CountFormula::Offset {
                            offset: 5,
                            divisor: 1,
                        },
                    },
                    SpawnGroup {
                        kind: MonsterKind::BigSpider,
                        count: CountFormula::Offset {
                            offset: 8,
                            divisor: 2,
                        },
                    },
                ],
                even_wave_bonus,
                basic_reward: RewardFormula::Stepped { base: 8, divisor: 4 },
            },
            late: TierConfig {
                first_wave: 16,
                last_wave: 20,
                spawn_delay: 0.8,
                groups: vec![
                    SpawnGroup {
                        kind: MonsterKind::Gnome,
                        count: CountFormula::Scaled { factor: 2.8 },
                    },
                    SpawnGroup {
                        kind: MonsterKind::FastSpider,
                        count: CountFormula::Offset {
                            offset: 10,
                            divisor: 1,
                        },
                    },
                    SpawnGroup {
                        kind: MonsterKind::BigSpider,
                        count: CountFormula::Offset {
                            offset: 13,
                            divisor: 1,
                        },
                    },
                ],
                even_wave_bonus,
                basic_reward: RewardFormula::Stepped {
                    base: 10,
                    divisor: 5,
                },
            },
            boss: BossTierConfig {
                boss_delay: 5.0,
                escort_delay: 1.0,
            },
            challenge_interval: 5,
            challenge_multiplier: 1.5,
            fixed_extras: vec![FixedExtra {
                wave: 5,
                kind: MonsterKind::FastSpider,
                count: 5,
            }],
            basic_kind: MonsterKind::Gnome,
            paired_spawn: PairedSpawnConfig {
                from_wave: 5,
                chance: 0.6,
                trailing_offset: 18.0,
            },
            completion_bonus: WaveBonus {
                wave: 1,
                gold: Gold::new(10),
            },
        }
    }
}

/// Distance and timing thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Distance in pixels at which a monster counts as arrived at a waypoint.
    pub waypoint_epsilon: f32,
    /// Distance in pixels at which a projectile counts as hitting.
    pub impact_threshold: f32,
    /// Seconds a corpse lingers before removal.
    pub decay_seconds: f32,
    /// Particles emitted for a monster hit or death.
    pub hit_particles: u32,
    /// Particles emitted for a projectile burst.
    pub impact_particles: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            waypoint_epsilon: 2.0,
            impact_threshold: 5.0,
            decay_seconds: 2.0,
            hit_particles: 8,
            impact_particles: 6,
        }
    }
}

/// Converts balance seconds into a [`Duration`] without panicking.
///
/// Negative and NaN inputs map to zero; values too large to represent,
/// infinity included, saturate to [`Duration::MAX`].
#[must_use]
pub fn saturating_duration(seconds: f32) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(seconds).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_has_forty_three_tiles_ending_beside_the_base() {
        let path = PathConfig::default();
        assert_eq!(path.tiles.len(), 43);
        assert_eq!(path.tiles.first(), Some(&TileCoord::new(0, 13)));
        assert_eq!(path.tiles.last(), Some(&TileCoord::new(18, 3)));
        assert!(path
            .tiles
            .windows(2)
            .all(|pair| pair[0].is_adjacent(pair[1])));
    }

    #[test]
    fn scaled_counts_truncate_like_the_tables() {
        let mid = CountFormula::Scaled { factor: 2.2 };
        assert_eq!(mid.evaluate(6, 0), 13);
        assert_eq!(mid.evaluate(10, 4), 22);
        let late = CountFormula::Scaled { factor: 2.8 };
        assert_eq!(late.evaluate(20, 4), 56);
    }

    #[test]
    fn offset_counts_floor_and_clamp_at_zero() {
        let big = CountFormula::Offset {
            offset: 8,
            divisor: 2,
        };
        assert_eq!(big.evaluate(6, 0), 0);
        assert_eq!(big.evaluate(7, 1), 0);
        assert_eq!(big.evaluate(11, 5), 1);
        assert_eq!(big.evaluate(14, 8), 3);
    }

    #[test]
    fn boss_variants_take_boss_stats_with_archetype_color() {
        let table = MonsterTable::default();
        let boss = table.stats(MonsterKind::BossGnome);
        assert_eq!(boss.health, Health::new(1500));
        assert_eq!(boss.color, table.gnome.color);
        assert_eq!(table.stats(MonsterKind::BigSpider), table.big_spider);
    }

    #[test]
    fn even_wave_bonus_skips_odd_waves() {
        let bonus = EvenWaveBonus {
            kind: MonsterKind::FastSpider,
            base: 2,
            divisor: 6,
        };
        assert_eq!(bonus.extra(7), 0);
        assert_eq!(bonus.extra(12), 4);
    }

    #[test]
    fn balance_survives_a_toml_round_trip() {
        let balance = BalanceConfig::default();
        let text = toml::to_string(&balance).expect("serialize balance");
        let restored: BalanceConfig = toml::from_str(&text).expect("parse balance");
        assert_eq!(restored, balance);
    }

    #[test]
    fn partial_toml_overrides_keep_defaults() {
        let restored: BalanceConfig =
            toml::from_str("[economy]\nstarting_gold = 999\n").expect("parse override");
        assert_eq!(restored.economy.starting_gold, Gold::new(999));
        assert_eq!(restored.waves.total_waves, 21);
    }

    #[test]
    fn fire_towers_unlock_later_than_the_rest() {
        let towers = TowerTable::default();
        assert_eq!(towers.stats(TowerKind::Cannon).unlock_wave, 0);
        assert_eq!(towers.stats(TowerKind::Water).unlock_wave, 0);
        assert_eq!(towers.stats(TowerKind::Fire).unlock_wave, 10);
    }

    #[test]
    fn unlock_wave_defaults_to_zero_when_omitted() {
        let mut fire = toml::to_string(&TowerTable::default().fire).expect("serialize fire");
        fire = fire
            .lines()
            .filter(|line| !line.starts_with("unlock_wave"))
            .collect::<Vec<_>>()
            .join("\n");
        let restored: TowerStats = toml::from_str(&fire).expect("parse fire");
        assert_eq!(restored.unlock_wave, 0);
        assert_eq!(restored.cost, Gold::new(120));
    }

    #[test]
    fn out_of_range_seconds_saturate() {
        assert_eq!(saturating_duration(1.5), Duration::from_millis(1_500));
        assert_eq!(saturating_duration(-3.0), Duration::ZERO);
        assert_eq!(saturating_duration(f32::NAN), Duration::ZERO);
        assert_eq!(saturating_duration(1.0e30), Duration::MAX);
        assert_eq!(saturating_duration(f32::INFINITY), Duration::MAX);
    }

    #[test]
    fn infinite_seconds_parse_from_toml() {
        let text = "[motion]\n\
            waypoint_epsilon = 2.0\n\
            impact_threshold = 5.0\n\
            decay_seconds = inf\n\
            hit_particles = 8\n\
            impact_particles = 6\n";
        let restored: BalanceConfig = toml::from_str(text).expect("parse override");
        assert_eq!(
            saturating_duration(restored.motion.decay_seconds),
            Duration::MAX
        );
    }
}

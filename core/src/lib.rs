#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mystic Towers simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and the frame loop submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems, renderers and audio layers to react to. Systems consume event
//! streams, query immutable snapshots, and respond exclusively with new command
//! batches.

pub mod balance;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use balance::{
    saturating_duration, BalanceConfig, BaseConfig, BossTierConfig, CountFormula, EconomyConfig,
    EvenWaveBonus, FixedExtra, GridConfig, MonsterStats, MonsterTable, MotionConfig,
    PairedSpawnConfig, PathConfig, ProjectileStyle, RewardFormula, SlowEffect, SpawnGroup,
    TierConfig, TowerStats, TowerTable, UpgradeBonus, UpgradeStats, WaveBonus, WaveTable,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the session from the world's balance configuration.
    RestartSession,
    /// Runs the monster phase of a frame: slow timers, movement, base contact,
    /// decay, pruning and spawn-roster completion.
    AdvanceMonsters {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Runs the tower phase of a frame: projectile flight, impact resolution
    /// and cooldown countdown.
    AdvanceTowers {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Runs the wave phase of a frame and evaluates the session outcome.
    AdvanceWave,
    /// Starts the next wave if no wave is currently in progress.
    StartWave,
    /// Development hook that jumps straight to the provided wave number.
    JumpToWave {
        /// Wave that should start immediately.
        wave: u32,
    },
    /// Pops the front of the spawn queue and places the monster on the path.
    SpawnMonster {
        /// Kind expected at the front of the spawn queue.
        kind: MonsterKind,
        /// Gold granted when the monster is killed.
        reward: Gold,
        /// Where along the path the monster enters.
        placement: SpawnPlacement,
    },
    /// Requests placement of a tower on the provided tile.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Tile the tower should occupy.
        tile: TileCoord,
    },
    /// Purchases the next upgrade of an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Selects a single tower, or clears the selection when `None`.
    SelectTower {
        /// Tower to mark as selected.
        tower: Option<TowerId>,
    },
    /// Requests that a tower launch a projectile at the provided monster.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Monster the projectile homes toward.
        target: MonsterId,
    },
    /// Development hook that credits gold to the ledger.
    GrantGold {
        /// Amount of gold to credit.
        amount: Gold,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the monster phase advanced the simulation clock.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the frame.
        dt: Duration,
    },
    /// Confirms that the session was rebuilt from its configuration.
    SessionRestarted,
    /// Announces that a wave started and its spawn queue was loaded.
    WaveStarted {
        /// Number of the wave that started.
        wave: u32,
        /// Number of monsters queued for the wave.
        queued: usize,
    },
    /// Signals that a notable wave started so audio and warning layers can react.
    WaveMilestone {
        /// Number of the wave that started.
        wave: u32,
        /// Kind of milestone reached.
        milestone: Milestone,
    },
    /// Announces that the current wave finished.
    WaveCompleted {
        /// Number of the wave that finished.
        wave: u32,
        /// Bonus gold granted for finishing the wave.
        bonus: Gold,
    },
    /// Confirms that a monster entered the path.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        monster: MonsterId,
        /// Kind of the monster.
        kind: MonsterKind,
        /// Position the monster entered at.
        position: Vec2,
    },
    /// Visual feedback for a monster struck by a projectile.
    MonsterHit {
        /// Monster that was struck.
        monster: MonsterId,
        /// Point where feedback should be drawn.
        position: Vec2,
        /// Particle color.
        color: Color,
        /// Number of particles to emit.
        particles: u32,
    },
    /// Visual feedback for a projectile bursting on a monster.
    ProjectileImpact {
        /// Tower that fired the projectile.
        tower: TowerId,
        /// Point where feedback should be drawn.
        position: Vec2,
        /// Particle color taken from the projectile.
        color: Color,
        /// Number of particles to emit.
        particles: u32,
    },
    /// Reports that a monster was killed by tower damage.
    MonsterKilled {
        /// Monster that died.
        monster: MonsterId,
        /// Kind of the monster.
        kind: MonsterKind,
        /// Gold credited for the kill.
        reward: Gold,
        /// Point where feedback should be drawn.
        position: Vec2,
        /// Particle color.
        color: Color,
        /// Number of particles to emit.
        particles: u32,
    },
    /// Reports that a monster left the live collection.
    MonsterRemoved {
        /// Monster that was removed.
        monster: MonsterId,
    },
    /// Reports that a monster walked off the end of the path.
    MonsterReachedBase {
        /// Monster that reached the base.
        monster: MonsterId,
        /// Kind of the monster.
        kind: MonsterKind,
    },
    /// Reports contact damage dealt to the base.
    BaseDamaged {
        /// Damage applied.
        amount: u32,
        /// Base health after the damage.
        remaining: Health,
    },
    /// Reports that a boss reached the base and destroyed it outright.
    BaseBreached {
        /// Boss responsible for the breach.
        monster: MonsterId,
    },
    /// Reports the ledger balance after any change.
    GoldChanged {
        /// Balance after the change.
        balance: Gold,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Type of the tower.
        kind: TowerKind,
        /// Tile the tower occupies.
        tile: TileCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Tile requested.
        tile: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower upgrade was purchased.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached after the upgrade.
        level: u32,
    },
    /// Reports that a tower upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Reports the tower selected after a selection request.
    TowerSelectionChanged {
        /// Tower that is now selected, if any.
        tower: Option<TowerId>,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Monster targeted by the projectile.
        target: MonsterId,
    },
    /// Reports that a projectile vanished without resolving damage.
    ProjectileDiscarded {
        /// Tower that owned the projectile.
        tower: TowerId,
        /// Identifier of the discarded projectile.
        projectile: ProjectileId,
        /// Reason the projectile was discarded.
        reason: DiscardReason,
    },
    /// Reports that the session reached a terminal outcome.
    SessionEnded {
        /// Terminal outcome of the session.
        outcome: SessionOutcome,
    },
}

/// RGB color attached to visual feedback events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Unique identifier assigned to a spawned monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Amount of gold held by the ledger or granted by a reward.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Gold(u32);

impl Gold {
    /// Zero gold.
    pub const ZERO: Self = Self(0);

    /// Creates a new gold amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Hit points carried by a monster or the base.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Health(u32);

impl Health {
    /// Zero hit points.
    pub const ZERO: Self = Self(0);

    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts damage, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Location of a single map tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Pixel coordinates of the tile centre for the provided tile size.
    #[must_use]
    pub fn center(&self, tile_size: f32) -> Vec2 {
        Vec2::new(
            self.column as f32 * tile_size + tile_size / 2.0,
            self.row as f32 * tile_size + tile_size / 2.0,
        )
    }

    /// Reports whether the tiles touch orthogonally or diagonally.
    #[must_use]
    pub fn is_adjacent(self, other: TileCoord) -> bool {
        let column_diff = self.column.abs_diff(other.column);
        let row_diff = self.row.abs_diff(other.row);
        column_diff <= 1 && row_diff <= 1 && (column_diff, row_diff) != (0, 0)
    }
}

/// Monster archetypes that can appear in a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    /// Small, weak walker used as the basic fodder unit.
    Gnome,
    /// Quick medium-weight spider.
    FastSpider,
    /// Slow, heavily armoured spider.
    BigSpider,
    /// Boss-tier gnome.
    BossGnome,
    /// Boss-tier fast spider.
    BossFastSpider,
    /// Boss-tier big spider.
    BossBigSpider,
}

impl MonsterKind {
    /// Every monster kind in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Gnome,
        Self::FastSpider,
        Self::BigSpider,
        Self::BossGnome,
        Self::BossFastSpider,
        Self::BossBigSpider,
    ];

    /// Reports whether the kind is a boss variant.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(
            self,
            Self::BossGnome | Self::BossFastSpider | Self::BossBigSpider
        )
    }

    /// Base archetype whose sprite and behaviour the kind shares.
    #[must_use]
    pub const fn archetype(self) -> Self {
        match self {
            Self::Gnome | Self::BossGnome => Self::Gnome,
            Self::FastSpider | Self::BossFastSpider => Self::FastSpider,
            Self::BigSpider | Self::BossBigSpider => Self::BigSpider,
        }
    }

    /// Reports whether a corpse lingers and fades before removal.
    ///
    /// The fast and big boss spiders have no death visual and leave the live
    /// collection at the first prune after death.
    #[must_use]
    pub const fn has_decay_visual(self) -> bool {
        !matches!(self, Self::BossFastSpider | Self::BossBigSpider)
    }
}

/// Tower archetypes that can be placed beside the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Cheap, fast-firing single-target tower.
    Cannon,
    /// Single-target tower whose hits slow monsters.
    Water,
    /// Slow-firing tower whose hits splash.
    Fire,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [Self; 3] = [Self::Cannon, Self::Water, Self::Fire];
}

/// Entry point used for a spawned monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnPlacement {
    /// Enter at the first waypoint.
    PathStart,
    /// Enter slightly behind the first waypoint so paired spawns do not overlap.
    Trailing,
}

/// Notable wave starts surfaced to audio and warning layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    /// Every fifth wave below the final wave, with scaled counts.
    Challenge,
    /// The final wave spawning one boss per archetype.
    Boss,
}

/// Terminal state of the session surfaced to the flow controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// The session continues.
    #[default]
    Ongoing,
    /// The base health reached zero.
    Defeat,
    /// Every wave was cleared and no boss remains alive.
    Victory,
}

/// Reasons a projectile may be discarded without resolving damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// The target died or was removed before impact and the projectile does not splash.
    TargetLost,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// The tile is not adjacent to the path, lies on it, or lies outside the grid.
    #[error("tile is not buildable")]
    NotBuildable,
    /// Another tower already stands on the tile.
    #[error("tile is already occupied")]
    Occupied,
    /// The tower kind is not available before `unlock_wave`.
    #[error("tower unlocks at wave {unlock_wave}")]
    Locked {
        /// First wave during which the kind may be placed.
        unlock_wave: u32,
    },
    /// The ledger cannot cover the tower cost.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
    /// Every upgrade for the tower has been purchased.
    #[error("tower is fully upgraded")]
    FullyUpgraded,
    /// The ledger cannot cover the upgrade cost.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Immutable representation of a single monster's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterSnapshot {
    /// Identifier assigned to the monster.
    pub id: MonsterId,
    /// Kind of the monster.
    pub kind: MonsterKind,
    /// Current position in pixels.
    pub position: Vec2,
    /// Remaining hit points.
    pub health: Health,
    /// Hit points at spawn.
    pub max_health: Health,
    /// Whether the monster is alive and targetable.
    pub alive: bool,
    /// Whether a slow effect is active.
    pub slowed: bool,
    /// Fraction of the corpse fade elapsed, present while decaying.
    pub decay_progress: Option<f32>,
}

impl MonsterSnapshot {
    /// Remaining health as a fraction of maximum, for health bars.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health.is_zero() {
            return 0.0;
        }
        self.health.get() as f32 / self.max_health.get() as f32
    }
}

/// Read-only snapshot describing all monsters in the live collection.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile occupied by the tower.
    pub tile: TileCoord,
    /// Centre of the tower in pixels.
    pub position: Vec2,
    /// Targeting range in pixels.
    pub range: f32,
    /// Upgrade level, starting at one.
    pub level: u32,
    /// Whether the player selected the tower.
    pub selected: bool,
    /// Monster the tower last fired at, for display only.
    pub target: Option<MonsterId>,
}

/// Read-only snapshot describing all towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Cooldown state of a tower used to decide whether it may fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Identifier of the tower.
    pub tower: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Time remaining before the tower may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot of every tower's cooldown, sorted by tower identifier.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured cooldowns.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Tower that owns the projectile.
    pub tower: TowerId,
    /// Kind of the owning tower, for sprite lookup.
    pub kind: TowerKind,
    /// Current position in pixels.
    pub position: Vec2,
    /// Draw color.
    pub color: Color,
    /// Monster the projectile still homes toward, if it is alive.
    pub target: Option<MonsterId>,
}

/// Assignment of a monster to a tower produced by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that should engage.
    pub tower: TowerId,
    /// Monster selected for the tower.
    pub monster: MonsterId,
}

/// Read-only view of the pending spawn queue of the current wave.
#[derive(Clone, Copy, Debug)]
pub struct SpawnQueueView<'a> {
    wave: u32,
    active: bool,
    pending: &'a [MonsterKind],
}

impl<'a> SpawnQueueView<'a> {
    /// Captures a new spawn queue view backed by the provided slice.
    #[must_use]
    pub const fn new(wave: u32, active: bool, pending: &'a [MonsterKind]) -> Self {
        Self {
            wave,
            active,
            pending,
        }
    }

    /// Wave the queue belongs to.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Whether the wave is still in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Kinds still waiting to spawn, front first.
    #[must_use]
    pub const fn pending(&self) -> &'a [MonsterKind] {
        self.pending
    }

    /// Kind at the given queue position, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<MonsterKind> {
        self.pending.get(index).copied()
    }

    /// Number of monsters waiting to spawn.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether nothing is waiting to spawn.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Gold, Health, MonsterKind, PlacementError, TileCoord, TowerId, TowerKind};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn wire_types_round_trip_through_bincode() {
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&TileCoord::new(5, 7));
        assert_round_trip(&PlacementError::InsufficientFunds);
        assert_round_trip(&PlacementError::Locked { unlock_wave: 10 });
        assert_round_trip(&MonsterKind::BossBigSpider);
    }

    #[test]
    fn locked_placements_name_the_unlock_wave() {
        let reason = PlacementError::Locked { unlock_wave: 10 };
        assert_eq!(reason.to_string(), "tower unlocks at wave 10");
    }

    #[test]
    fn diagonal_and_orthogonal_tiles_are_adjacent() {
        let origin = TileCoord::new(4, 4);
        assert!(origin.is_adjacent(TileCoord::new(5, 5)));
        assert!(origin.is_adjacent(TileCoord::new(4, 3)));
        assert!(!origin.is_adjacent(origin));
        assert!(!origin.is_adjacent(TileCoord::new(6, 4)));
    }

    #[test]
    fn tile_center_is_offset_by_half_a_tile() {
        let center = TileCoord::new(2, 3).center(32.0);
        assert_eq!(center.x, 80.0);
        assert_eq!(center.y, 112.0);
    }

    #[test]
    fn boss_variants_share_their_archetype() {
        assert_eq!(MonsterKind::BossGnome.archetype(), MonsterKind::Gnome);
        assert_eq!(MonsterKind::BossFastSpider.archetype(), MonsterKind::FastSpider);
        assert_eq!(MonsterKind::BossBigSpider.archetype(), MonsterKind::BigSpider);
        let bosses = MonsterKind::ALL.iter().filter(|kind| kind.is_boss()).count();
        assert_eq!(bosses, 3);
    }

    #[test]
    fn only_two_boss_spiders_skip_the_decay_visual() {
        let lingering: Vec<_> = MonsterKind::ALL
            .into_iter()
            .filter(|kind| !kind.has_decay_visual())
            .collect();
        assert_eq!(
            lingering,
            vec![MonsterKind::BossFastSpider, MonsterKind::BossBigSpider]
        );
    }

    #[test]
    fn health_clamps_at_zero() {
        let health = Health::new(5).saturating_sub(9);
        assert!(health.is_zero());
        assert_eq!(Gold::ZERO.get(), 0);
        assert_eq!(TowerKind::ALL.len(), 3);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tower Defense match engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Systems read immutable snapshots such as
//! [`TowerView`] and [`EnemyView`] and respond exclusively with new commands.
//!
//! Archetype tables for towers and enemies are closed enums resolved at
//! compile time; there is no string-keyed lookup anywhere in the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tower Defense.";

/// Width of the playing field measured in world units.
pub const FIELD_WIDTH: f32 = 800.0;

/// Height of the playing field measured in world units.
pub const FIELD_HEIGHT: f32 = 600.0;

/// Width of the shop panel docked against the right edge of the field.
///
/// Towers may not be placed inside the panel.
pub const SHOP_PANEL_WIDTH: f32 = 150.0;

/// Number of simulation ticks executed per second of wall-clock time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Money available to the player when a match begins.
pub const STARTING_MONEY: Gold = Gold::new(300);

/// Lives available to the player when a match begins.
pub const STARTING_LIVES: u32 = 20;

/// Lowest cooldown, in ticks, that upgrades may reduce a tower to.
pub const COOLDOWN_FLOOR_TICKS: f32 = 10.0;

/// Waypoints of the path enemies follow when no custom path is configured.
pub const DEFAULT_PATH: [WorldPoint; 6] = [
    WorldPoint::new(0.0, 300.0),
    WorldPoint::new(300.0, 300.0),
    WorldPoint::new(300.0, 100.0),
    WorldPoint::new(500.0, 100.0),
    WorldPoint::new(500.0, 500.0),
    WorldPoint::new(800.0, 500.0),
];

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by a single fixed tick.
    ///
    /// Enemies walk along the path, escaped and defeated enemies are removed,
    /// and tower cooldown timers count down.
    Tick,
    /// Requests that a new enemy enters the field at the first path waypoint.
    SpawnEnemy {
        /// Archetype of the enemy to spawn.
        kind: EnemyKind,
    },
    /// Requests that a tower shoots at an enemy.
    FireAtEnemy {
        /// Identifier of the tower that fires.
        tower: TowerId,
        /// Identifier of the enemy being shot.
        enemy: EnemyId,
    },
    /// Credits the completion bonus for a cleared wave.
    AwardWaveBonus {
        /// Wave number that was cleared.
        wave: u32,
        /// Money granted for clearing the wave.
        amount: Gold,
    },
    /// Requests placement of a tower centred on the provided point.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Centre of the tower expressed in world units.
        position: WorldPoint,
    },
    /// Requests an upgrade of every tower under the provided click point.
    UpgradeTower {
        /// Point, in world units, where the player clicked.
        position: WorldPoint,
    },
    /// Selects the tower archetype used by subsequent placements.
    SelectTowerKind {
        /// Archetype to select.
        kind: TowerKind,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Confirms that an enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Spawn location in world units.
        position: WorldPoint,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
        /// Lives left after deducting the escape.
        lives_remaining: u32,
    },
    /// Reports that an enemy ran out of health and was removed.
    EnemyKilled {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Archetype of the defeated enemy.
        kind: EnemyKind,
        /// Money credited for the kill.
        bounty: Gold,
    },
    /// Confirms that a tower shot landed on an enemy.
    EnemyDamaged {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Damage dealt by the shot.
        damage: f32,
        /// Health left after the hit.
        remaining: Health,
    },
    /// Confirms that a wave completion bonus was credited.
    WaveBonusAwarded {
        /// Wave number that was cleared.
        wave: u32,
        /// Money credited.
        amount: Gold,
    },
    /// Confirms that a tower was placed on the field.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of the tower.
        kind: TowerKind,
        /// Centre of the tower.
        position: WorldPoint,
        /// Money spent on the purchase.
        cost: Gold,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Requested centre point.
        position: WorldPoint,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was upgraded.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached after the upgrade.
        level: u32,
        /// Money spent on the upgrade.
        cost: Gold,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Point where the player clicked.
        position: WorldPoint,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a new tower archetype is selected for placement.
    TowerKindSelected {
        /// Archetype that became active.
        kind: TowerKind,
    },
    /// Announces that the last life was lost and the match is over.
    LivesDepleted,
}

/// Location on the playing field expressed in continuous world units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, growing to the right.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate, growing downwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns a copy of the point translated by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Reports whether the point lies on the field, shop panel included.
    #[must_use]
    pub fn is_on_field(&self) -> bool {
        (0.0..FIELD_WIDTH).contains(&self.x) && (0.0..FIELD_HEIGHT).contains(&self.y)
    }

    /// Reports whether the point lies over the shop panel.
    #[must_use]
    pub fn is_in_shop_region(&self) -> bool {
        self.x >= FIELD_WIDTH - SHOP_PANEL_WIDTH
    }
}

/// Visual appearance applied to towers and enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl EntityColor {
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

/// Unique identifier assigned to an enemy.
///
/// Identifiers are allocated in spawn order, so sorting by identifier yields
/// field order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
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

/// Amount of money owned, spent, or earned by the player.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Gold(u32);

impl Gold {
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

    /// Adds two amounts, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: Gold) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts `cost`, returning `None` when the balance is insufficient.
    #[must_use]
    pub const fn checked_sub(self, cost: Gold) -> Option<Self> {
        match self.0.checked_sub(cost.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Multiplies the amount by `factor`, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_mul(self, factor: u32) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

/// Remaining hit points of an enemy. Never negative.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Health(f32);

impl Health {
    /// Creates a health value, clamping negative inputs to zero.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.max(0.0))
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Deducts `damage`, clamping the result at zero.
    #[must_use]
    pub fn saturating_sub(self, damage: f32) -> Self {
        Self::new(self.0 - damage)
    }

    /// Reports whether no health remains.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.0 <= 0.0
    }
}

/// Types of towers that can be purchased from the shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced tower.
    Basic,
    /// Long range, high damage tower with a slow rate of fire.
    Sniper,
    /// Short range tower that hits harder than the basic tower.
    Splash,
}

impl TowerKind {
    /// Every tower archetype in shop order.
    pub const ALL: [TowerKind; 3] = [Self::Basic, Self::Sniper, Self::Splash];

    /// Price of purchasing the tower, which is also its first upgrade price.
    #[must_use]
    pub const fn cost(self) -> Gold {
        match self {
            Self::Basic => Gold::new(100),
            Self::Sniper => Gold::new(200),
            Self::Splash => Gold::new(150),
        }
    }

    /// Targeting radius in world units before any upgrades.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Basic => 150.0,
            Self::Sniper => 300.0,
            Self::Splash => 120.0,
        }
    }

    /// Damage dealt per shot before any upgrades.
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::Basic => 25.0,
            Self::Sniper => 100.0,
            Self::Splash => 35.0,
        }
    }

    /// Ticks between consecutive shots before any upgrades.
    #[must_use]
    pub const fn cooldown_ticks(self) -> f32 {
        match self {
            Self::Basic => 30.0,
            Self::Sniper => 60.0,
            Self::Splash => 45.0,
        }
    }

    /// Radius of the tower body in world units before any upgrades.
    #[must_use]
    pub const fn size(self) -> f32 {
        match self {
            Self::Basic => 20.0,
            Self::Sniper => 25.0,
            Self::Splash => 22.0,
        }
    }

    /// Fill color used when drawing the tower.
    #[must_use]
    pub const fn color(self) -> EntityColor {
        match self {
            Self::Basic => EntityColor::from_rgb(30, 144, 255),
            Self::Sniper => EntityColor::from_rgb(218, 165, 32),
            Self::Splash => EntityColor::from_rgb(147, 112, 219),
        }
    }

    /// Human readable name shown in the shop.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Sniper => "Sniper",
            Self::Splash => "Splash",
        }
    }

    /// Short description shown for the selected tower.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Basic => "Balanced tower",
            Self::Sniper => "Long range, high damage",
            Self::Splash => "Area damage",
        }
    }
}

/// Types of enemies that may walk the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Standard enemy.
    Normal,
    /// Fragile enemy that moves twice as fast.
    Fast,
    /// Slow enemy with double health.
    Tank,
}

impl EnemyKind {
    /// Every enemy archetype.
    pub const ALL: [EnemyKind; 3] = [Self::Normal, Self::Fast, Self::Tank];

    /// Health the enemy spawns with.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Normal => 100.0,
            Self::Fast => 50.0,
            Self::Tank => 200.0,
        }
    }

    /// Distance travelled along the path per tick.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Normal => 1.5,
            Self::Fast => 3.0,
            Self::Tank => 0.8,
        }
    }

    /// Money credited when the enemy is killed.
    #[must_use]
    pub const fn bounty(self) -> Gold {
        match self {
            Self::Normal => Gold::new(25),
            Self::Fast => Gold::new(35),
            Self::Tank => Gold::new(50),
        }
    }

    /// Radius of the enemy body in world units.
    #[must_use]
    pub const fn size(self) -> f32 {
        match self {
            Self::Normal => 15.0,
            Self::Fast => 12.0,
            Self::Tank => 20.0,
        }
    }

    /// Fill color used when drawing the enemy.
    #[must_use]
    pub const fn color(self) -> EntityColor {
        match self {
            Self::Normal => EntityColor::from_rgb(255, 0, 0),
            Self::Fast => EntityColor::from_rgb(0, 255, 0),
            Self::Tank => EntityColor::from_rgb(147, 112, 219),
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The player cannot afford the tower.
    #[error("not enough money")]
    InsufficientFunds,
    /// The requested point lies over the shop panel.
    #[error("cannot build over the shop")]
    ShopRegion,
    /// The requested point lies outside the playing field.
    #[error("outside the playing field")]
    OutOfBounds,
    /// The match already ended.
    #[error("the match is over")]
    MatchOver,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// No tower body covers the clicked point.
    #[error("no tower at that point")]
    NoTowerAtPoint,
    /// The player cannot afford the upgrade of any tower under the click.
    #[error("not enough money")]
    InsufficientFunds,
    /// The match already ended.
    #[error("the match is over")]
    MatchOver,
}

/// Phase of the wave director state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// Countdown before the very first wave.
    PreGame,
    /// A wave is active: enemies are being introduced or are still alive.
    Spawning,
    /// The previous wave was cleared and the next one has not started yet.
    Intermission,
}

/// Read-only description of the wave director's progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveStatus {
    /// Current phase of the director.
    pub phase: WavePhase,
    /// Current wave number, starting at one.
    pub wave: u32,
    /// Ticks left in the current countdown or wave timer.
    pub countdown: u32,
    /// Ticks left until the next spawn opportunity.
    pub spawn_timer: u32,
}

impl WaveStatus {
    /// Reports whether a wave is currently active.
    #[must_use]
    pub fn wave_in_progress(&self) -> bool {
        self.phase == WavePhase::Spawning
    }

    /// Remaining countdown expressed in whole seconds, rounded up.
    ///
    /// Returns `None` while a wave is in progress.
    #[must_use]
    pub fn countdown_seconds(&self) -> Option<u32> {
        if self.wave_in_progress() {
            return None;
        }

        Some(self.countdown / TICKS_PER_SECOND + 1)
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Centre of the tower.
    pub position: WorldPoint,
    /// Current targeting radius.
    pub range: f32,
    /// Current damage per shot.
    pub damage: f32,
    /// Current ticks between shots.
    pub cooldown: f32,
    /// Ticks left until the tower may fire again.
    pub cooldown_remaining: f32,
    /// Upgrade level, starting at one.
    pub level: u32,
    /// Price of the next upgrade.
    pub upgrade_cost: Gold,
    /// Current body radius.
    pub size: f32,
}

impl TowerSnapshot {
    /// Reports whether the cooldown timer elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Reports whether `point` lies within the tower's targeting radius.
    #[must_use]
    pub fn in_range(&self, point: WorldPoint) -> bool {
        self.position.distance(point) <= self.range
    }

    /// Reports whether the tower may shoot the provided enemy this tick.
    #[must_use]
    pub fn can_engage(&self, enemy: &EnemySnapshot) -> bool {
        self.in_range(enemy.position) && self.is_ready()
    }
}

/// Read-only snapshot describing all towers placed on the field.
#[derive(Clone, Debug, Default, PartialEq)]
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

    /// Iterator over the captured tower snapshots in placement order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current location on the field.
    pub position: WorldPoint,
    /// Index of the last waypoint the enemy passed.
    pub path_index: usize,
    /// Remaining health.
    pub health: Health,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of the archetype's maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        let max = self.kind.max_health();
        if max <= 0.0 {
            return 0.0;
        }

        (self.health.get() / max).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all enemies on the field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in field order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn basic_tower_at(x: f32, y: f32) -> TowerSnapshot {
        let kind = TowerKind::Basic;
        TowerSnapshot {
            id: TowerId::new(0),
            kind,
            position: WorldPoint::new(x, y),
            range: kind.range(),
            damage: kind.damage(),
            cooldown: kind.cooldown_ticks(),
            cooldown_remaining: 0.0,
            level: 1,
            upgrade_cost: kind.cost(),
            size: kind.size(),
        }
    }

    fn enemy_at(id: u32, x: f32, y: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Normal,
            position: WorldPoint::new(x, y),
            path_index: 0,
            health: Health::new(EnemyKind::Normal.max_health()),
        }
    }

    #[test]
    fn distance_matches_pythagoras() {
        let origin = WorldPoint::new(1.0, 1.0);
        let destination = WorldPoint::new(4.0, 5.0);
        assert!((origin.distance(destination) - 5.0).abs() < f32::EPSILON);
        assert!((destination.distance(origin) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn basic_tower_engages_within_range_only() {
        let tower = basic_tower_at(100.0, 100.0);
        assert!(tower.can_engage(&enemy_at(1, 200.0, 100.0)));
        assert!(!tower.can_engage(&enemy_at(2, 300.0, 100.0)));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let tower = basic_tower_at(0.0, 0.0);
        assert!(tower.can_engage(&enemy_at(1, 150.0, 0.0)));
    }

    #[test]
    fn cooling_tower_cannot_engage() {
        let mut tower = basic_tower_at(100.0, 100.0);
        tower.cooldown_remaining = 1.0;
        assert!(!tower.can_engage(&enemy_at(1, 110.0, 100.0)));
    }

    #[test]
    fn health_never_drops_below_zero() {
        let health = Health::new(100.0).saturating_sub(35.0);
        assert!((health.get() - 65.0).abs() < f32::EPSILON);
        assert!(!health.is_depleted());

        let overkill = health.saturating_sub(500.0);
        assert_eq!(overkill.get(), 0.0);
        assert!(overkill.is_depleted());
    }

    #[test]
    fn gold_rejects_overdraw() {
        let money = Gold::new(99);
        assert_eq!(money.checked_sub(TowerKind::Basic.cost()), None);
        assert_eq!(
            Gold::new(300).checked_sub(TowerKind::Basic.cost()),
            Some(Gold::new(200))
        );
        assert_eq!(Gold::new(u32::MAX).saturating_mul(2).get(), u32::MAX);
    }

    #[test]
    fn shop_region_starts_at_panel_edge() {
        assert!(!WorldPoint::new(649.0, 10.0).is_in_shop_region());
        assert!(WorldPoint::new(650.0, 10.0).is_in_shop_region());
        assert!(!WorldPoint::new(-1.0, 10.0).is_on_field());
        assert!(!WorldPoint::new(10.0, 600.0).is_on_field());
    }

    #[test]
    fn countdown_seconds_rounds_up_outside_waves() {
        let status = WaveStatus {
            phase: WavePhase::PreGame,
            wave: 1,
            countdown: 300,
            spawn_timer: 0,
        };
        assert_eq!(status.countdown_seconds(), Some(6));

        let active = WaveStatus {
            phase: WavePhase::Spawning,
            ..status
        };
        assert_eq!(active.countdown_seconds(), None);
    }

    #[test]
    fn enemy_view_orders_by_spawn() {
        let view = EnemyView::from_snapshots(vec![enemy_at(4, 0.0, 0.0), enemy_at(2, 0.0, 0.0)]);
        let ids: Vec<u32> = view.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn tower_kind_round_trips_through_bincode() {
        for kind in TowerKind::ALL {
            assert_round_trip(&kind);
        }
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::ShopRegion);
        assert_round_trip(&UpgradeError::NoTowerAtPoint);
    }

    #[test]
    fn world_point_round_trips_through_bincode() {
        assert_round_trip(&WorldPoint::new(312.5, 99.25));
    }
}

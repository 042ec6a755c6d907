#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state management for Tower Defense.
//!
//! The world owns every tower and enemy together with the player's money and
//! lives. It only changes in response to [`Command`] values passed to
//! [`apply`], and reports what happened through [`Event`] values.

mod enemies;
mod towers;

use tower_defense_core::{
    Command, EnemyId, EnemyKind, Event, Gold, PlacementError, TowerId, TowerKind, UpgradeError,
    WorldPoint, DEFAULT_PATH, STARTING_LIVES, STARTING_MONEY,
};
use tracing::{debug, info};

use self::{enemies::Enemy, towers::Tower};

/// Represents the authoritative Tower Defense match state.
#[derive(Debug)]
pub struct World {
    path: Vec<WorldPoint>,
    towers: Vec<Tower>,
    enemies: Vec<Enemy>,
    money: Gold,
    lives: u32,
    selected_tower: TowerKind,
    next_tower_id: TowerId,
    next_enemy_id: EnemyId,
    tick_index: u64,
}

impl World {
    /// Creates a new world whose enemies follow the default path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(DEFAULT_PATH.to_vec())
    }

    /// Creates a new world whose enemies follow the provided waypoints.
    #[must_use]
    pub fn with_path(path: Vec<WorldPoint>) -> Self {
        Self {
            path,
            towers: Vec::new(),
            enemies: Vec::new(),
            money: STARTING_MONEY,
            lives: STARTING_LIVES,
            selected_tower: TowerKind::Basic,
            next_tower_id: TowerId::new(0),
            next_enemy_id: EnemyId::new(0),
            tick_index: 0,
        }
    }

    fn is_defeated(&self) -> bool {
        self.lives == 0
    }

    fn allocate_tower_id(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        id
    }

    fn tower_mut(&mut self, tower: TowerId) -> Option<&mut Tower> {
        self.towers
            .binary_search_by_key(&tower, |candidate| candidate.id)
            .ok()
            .map(|index| &mut self.towers[index])
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .binary_search_by_key(&enemy, |candidate| candidate.id)
            .ok()
            .map(|index| &mut self.enemies[index])
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        if self.path.is_empty() {
            return;
        }

        let id = self.allocate_enemy_id();
        let Some(enemy) = Enemy::spawn(id, kind, &self.path) else {
            return;
        };

        debug!(enemy = id.get(), ?kind, "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            position: enemy.position(),
        });
        self.enemies.push(enemy);
    }

    /// Walks every enemy one tick, then removes escaped and defeated ones.
    ///
    /// An enemy that escapes costs a life even when its health is depleted.
    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let path = &self.path;
        let mut lives = self.lives;
        let mut money = self.money;
        let mut lives_lost = false;

        self.enemies.retain_mut(|enemy| {
            if !enemy.advance(path) {
                let was_alive = lives > 0;
                lives = lives.saturating_sub(1);
                out_events.push(Event::EnemyEscaped {
                    enemy: enemy.id,
                    lives_remaining: lives,
                });
                lives_lost |= was_alive && lives == 0;
                return false;
            }

            if enemy.health().is_depleted() {
                let bounty = enemy.kind.bounty();
                money = money.saturating_add(bounty);
                out_events.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    kind: enemy.kind,
                    bounty,
                });
                return false;
            }

            true
        });

        self.lives = lives;
        self.money = money;

        if lives_lost {
            info!(tick = self.tick_index, "last life lost");
            out_events.push(Event::LivesDepleted);
        }
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        position: WorldPoint,
    ) -> Result<Tower, PlacementError> {
        if self.is_defeated() {
            return Err(PlacementError::MatchOver);
        }

        if !position.is_on_field() {
            return Err(PlacementError::OutOfBounds);
        }

        if position.is_in_shop_region() {
            return Err(PlacementError::ShopRegion);
        }

        let remaining = self
            .money
            .checked_sub(kind.cost())
            .ok_or(PlacementError::InsufficientFunds)?;

        self.money = remaining;
        let tower = Tower::new(self.allocate_tower_id(), kind, position);
        self.towers.push(tower.clone());
        Ok(tower)
    }

    /// Upgrades every tower whose body covers `position`, in placement order,
    /// for as long as the money lasts.
    ///
    /// A tower that is too expensive is skipped so a cheaper one under the
    /// same click may still be upgraded.
    fn upgrade_towers(
        &mut self,
        position: WorldPoint,
    ) -> Result<Vec<(TowerId, u32, Gold)>, UpgradeError> {
        if self.is_defeated() {
            return Err(UpgradeError::MatchOver);
        }

        let mut covered = false;
        let mut upgraded = Vec::new();
        for tower in self.towers.iter_mut().filter(|tower| tower.covers(position)) {
            covered = true;
            let cost = tower.upgrade_cost();
            let Some(remaining) = self.money.checked_sub(cost) else {
                continue;
            };

            self.money = remaining;
            tower.upgrade();
            upgraded.push((tower.id, tower.level(), cost));
        }

        match (covered, upgraded.is_empty()) {
            (false, _) => Err(UpgradeError::NoTowerAtPoint),
            (true, true) => Err(UpgradeError::InsufficientFunds),
            (true, false) => Ok(upgraded),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if world.is_defeated() {
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });

            world.advance_enemies(out_events);
            for tower in &mut world.towers {
                tower.cool_down();
            }
        }
        Command::SpawnEnemy { kind } => {
            if world.is_defeated() {
                return;
            }

            world.spawn_enemy(kind, out_events);
        }
        Command::FireAtEnemy { tower, enemy } => {
            let Some(damage) = world
                .tower_mut(tower)
                .filter(|shooter| shooter.is_ready())
                .map(|shooter| shooter.damage())
            else {
                return;
            };
            let Some(target) = world.enemy_mut(enemy) else {
                return;
            };
            let remaining = target.take_damage(damage);
            if let Some(shooter) = world.tower_mut(tower) {
                shooter.rearm();
            }
            out_events.push(Event::EnemyDamaged {
                tower,
                enemy,
                damage,
                remaining,
            });
        }
        Command::AwardWaveBonus { wave, amount } => {
            world.money = world.money.saturating_add(amount);
            out_events.push(Event::WaveBonusAwarded { wave, amount });
        }
        Command::PlaceTower { kind, position } => match world.place_tower(kind, position) {
            Ok(tower) => {
                debug!(tower = tower.id.get(), ?kind, "tower placed");
                out_events.push(Event::TowerPlaced {
                    tower: tower.id,
                    kind,
                    position: tower.position,
                    cost: kind.cost(),
                });
            }
            Err(reason) => {
                debug!(?kind, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    position,
                    reason,
                });
            }
        },
        Command::UpgradeTower { position } => match world.upgrade_towers(position) {
            Ok(upgraded) => {
                for (tower, level, cost) in upgraded {
                    debug!(tower = tower.get(), level, "tower upgraded");
                    out_events.push(Event::TowerUpgraded { tower, level, cost });
                }
            }
            Err(reason) => {
                debug!(%reason, "tower upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected { position, reason });
            }
        },
        Command::SelectTowerKind { kind } => {
            world.selected_tower = kind;
            out_events.push(Event::TowerKindSelected { kind });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tower_defense_core::{EnemyView, Gold, TowerKind, TowerView, WorldPoint};

    /// Waypoints enemies follow, from spawn to exit.
    #[must_use]
    pub fn path(world: &World) -> &[WorldPoint] {
        &world.path
    }

    /// Money currently available to the player.
    #[must_use]
    pub fn money(world: &World) -> Gold {
        world.money
    }

    /// Lives left before the match ends.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Reports whether all lives were lost.
    #[must_use]
    pub fn is_defeated(world: &World) -> bool {
        world.is_defeated()
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Tower archetype used by the next placement.
    #[must_use]
    pub fn selected_tower_kind(world: &World) -> TowerKind {
        world.selected_tower
    }

    /// Number of enemies currently on the field.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the towers on the field.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the enemies on the field in field order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }
}

//! Authoritative tower state and the upgrade rules applied to it.

use tower_defense_core::{
    Gold, TowerId, TowerKind, TowerSnapshot, WorldPoint, COOLDOWN_FLOOR_TICKS,
};

const DAMAGE_GROWTH: f32 = 1.5;
const RANGE_GROWTH: f32 = 1.2;
const COOLDOWN_DECAY: f32 = 0.8;
const UPGRADE_COST_GROWTH: u32 = 2;
const SIZE_GROWTH: f32 = 2.0;

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) position: WorldPoint,
    damage: f32,
    range: f32,
    cooldown: f32,
    cooldown_remaining: f32,
    level: u32,
    upgrade_cost: Gold,
    size: f32,
}

impl Tower {
    /// Builds a level one tower using the archetype's base statistics.
    pub(crate) fn new(id: TowerId, kind: TowerKind, position: WorldPoint) -> Self {
        Self {
            id,
            kind,
            position,
            damage: kind.damage(),
            range: kind.range(),
            cooldown: kind.cooldown_ticks(),
            cooldown_remaining: 0.0,
            level: 1,
            upgrade_cost: kind.cost(),
            size: kind.size(),
        }
    }

    /// Reports whether the click point lies strictly inside the tower body.
    pub(crate) fn covers(&self, point: WorldPoint) -> bool {
        self.position.distance(point) < self.size
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    pub(crate) fn damage(&self) -> f32 {
        self.damage
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn upgrade_cost(&self) -> Gold {
        self.upgrade_cost
    }

    /// Counts the cooldown timer down by one tick without going negative.
    pub(crate) fn cool_down(&mut self) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - 1.0).max(0.0);
        }
    }

    /// Restarts the cooldown timer after a shot.
    pub(crate) fn rearm(&mut self) {
        self.cooldown_remaining = self.cooldown;
    }

    /// Raises the tower one level.
    ///
    /// Levels are unbounded; damage and range keep compounding while the
    /// price doubles every time.
    pub(crate) fn upgrade(&mut self) {
        self.level = self.level.saturating_add(1);
        self.damage *= DAMAGE_GROWTH;
        self.range *= RANGE_GROWTH;
        self.cooldown = (self.cooldown * COOLDOWN_DECAY).max(COOLDOWN_FLOOR_TICKS);
        self.upgrade_cost = self.upgrade_cost.saturating_mul(UPGRADE_COST_GROWTH);
        self.size += SIZE_GROWTH;
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            range: self.range,
            damage: self.damage,
            cooldown: self.cooldown,
            cooldown_remaining: self.cooldown_remaining,
            level: self.level,
            upgrade_cost: self.upgrade_cost,
            size: self.size,
        }
    }
}

//! Enemy state and the path-following step applied every tick.

use tower_defense_core::{EnemyId, EnemyKind, EnemySnapshot, Health, WorldPoint};

/// Enemy walking the path inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    position: WorldPoint,
    path_index: usize,
    health: Health,
}

impl Enemy {
    /// Places a full-health enemy on the first waypoint of `path`.
    ///
    /// Returns `None` when the path has no waypoints.
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, path: &[WorldPoint]) -> Option<Self> {
        let start = path.first().copied()?;
        Some(Self {
            id,
            kind,
            position: start,
            path_index: 0,
            health: Health::new(kind.max_health()),
        })
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    pub(crate) fn health(&self) -> Health {
        self.health
    }

    /// Moves the enemy one tick along `path`.
    ///
    /// Returns `false` once the enemy has reached the final waypoint, meaning
    /// it escaped. When the next waypoint is closer than one tick of travel the
    /// enemy only advances its waypoint index and keeps its position for this
    /// tick.
    pub(crate) fn advance(&mut self, path: &[WorldPoint]) -> bool {
        let last = path.len().saturating_sub(1);
        if self.path_index >= last {
            self.path_index = self.path_index.min(last);
            return false;
        }

        let target = path[self.path_index + 1];
        let dx = target.x() - self.position.x();
        let dy = target.y() - self.position.y();
        let distance = (dx * dx + dy * dy).sqrt();
        let speed = self.kind.speed();

        if distance < speed {
            self.path_index += 1;
            return self.path_index < last;
        }

        self.position = self
            .position
            .offset(dx / distance * speed, dy / distance * speed);
        true
    }

    /// Applies a hit, clamping health at zero.
    pub(crate) fn take_damage(&mut self, damage: f32) -> Health {
        self.health = self.health.saturating_sub(damage);
        self.health
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            path_index: self.path_index,
            health: self.health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defense_core::DEFAULT_PATH;

    fn normal(path: &[WorldPoint]) -> Enemy {
        Enemy::spawn(EnemyId::new(1), EnemyKind::Normal, path).expect("path has waypoints")
    }

    #[test]
    fn spawn_requires_a_waypoint() {
        assert!(Enemy::spawn(EnemyId::new(1), EnemyKind::Normal, &[]).is_none());
    }

    #[test]
    fn advance_moves_by_speed_toward_next_waypoint() {
        let mut enemy = normal(&DEFAULT_PATH);
        assert!(enemy.advance(&DEFAULT_PATH));

        let position = enemy.position();
        assert!((position.x() - 1.5).abs() < 1e-4);
        assert!((position.y() - 300.0).abs() < 1e-4);
        assert_eq!(enemy.snapshot().path_index, 0);
    }

    #[test]
    fn close_waypoint_advances_index_without_moving() {
        let path = [
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(1.0, 0.0),
            WorldPoint::new(50.0, 0.0),
        ];
        let mut enemy = normal(&path);

        assert!(enemy.advance(&path));
        assert_eq!(enemy.snapshot().path_index, 1);
        assert_eq!(enemy.position(), WorldPoint::new(0.0, 0.0));
    }

    #[test]
    fn reaching_final_waypoint_escapes() {
        let path = [WorldPoint::new(0.0, 0.0), WorldPoint::new(3.0, 0.0)];
        let mut enemy = normal(&path);

        assert!(enemy.advance(&path));
        assert!(enemy.advance(&path));
        assert!(!enemy.advance(&path));
        assert_eq!(enemy.snapshot().path_index, 1);
    }

    #[test]
    fn advance_at_final_waypoint_keeps_health() {
        let path = [WorldPoint::new(0.0, 0.0)];
        let mut enemy = normal(&path);
        let _ = enemy.take_damage(40.0);

        for _ in 0..3 {
            assert!(!enemy.advance(&path));
        }

        assert_eq!(enemy.health(), Health::new(60.0));
        assert_eq!(enemy.snapshot().path_index, 0);
    }

    #[test]
    fn repeated_hits_clamp_health_at_zero() {
        let mut enemy = normal(&DEFAULT_PATH);
        for hit in 1..=5 {
            let remaining = enemy.take_damage(25.0);
            let expected = (100.0 - 25.0 * hit as f32).max(0.0);
            assert_eq!(remaining.get(), expected);
        }
        assert!(enemy.health().is_depleted());
    }

    #[test]
    fn enemy_walks_default_path_to_escape() {
        let mut enemy = normal(&DEFAULT_PATH);
        let mut ticks = 0;
        while enemy.advance(&DEFAULT_PATH) {
            ticks += 1;
            assert!(ticks < 10_000, "enemy never escaped");
        }

        assert_eq!(enemy.snapshot().path_index, DEFAULT_PATH.len() - 1);
    }
}

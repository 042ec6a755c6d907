#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides which enemy each ready tower shoots.
//!
//! Every tower whose cooldown elapsed scans the enemies in field order and
//! fires at the first one inside its range. There is no priority beyond
//! field order and each tower fires at most once per tick.

use tower_defense_core::{Command, EnemyView, TowerView};

/// Tower targeting system.
#[derive(Debug, Default)]
pub struct TowerTargeting;

impl TowerTargeting {
    /// Creates a new tower targeting system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Appends a `Command::FireAtEnemy` to `out` for every tower able to shoot.
    pub fn handle(&self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<Command>) {
        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        for tower in towers.iter().filter(|tower| tower.is_ready()) {
            if let Some(enemy) = enemies.iter().find(|enemy| tower.can_engage(enemy)) {
                out.push(Command::FireAtEnemy {
                    tower: tower.id,
                    enemy: enemy.id,
                });
            }
        }
    }
}

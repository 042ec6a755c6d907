//! Translation between session snapshots and the rendering contracts.

use glam::Vec2;
use tower_defense_core::{EnemyView, TowerView, WorldPoint};
use tower_defense_rendering::{
    shop_button_at, Color, CountdownBanner, EnemyPresentation, FieldPresentation,
    GameOverPresentation, HudPresentation, PathPresentation, PointerButton, PointerClick, Scene,
    ShopPresentation, TowerPresentation,
};
use tower_defense_session::{MatchSnapshot, PlayerAction};

/// Builds a scene presenting `snapshot` on the standard field.
pub(crate) fn build_scene(snapshot: &MatchSnapshot) -> Scene {
    let mut scene = Scene::new(
        FieldPresentation::standard(),
        PathPresentation::new(to_vec2_path(&snapshot.path)),
    );
    populate_scene(&mut scene, snapshot);
    scene
}

/// Refreshes every dynamic part of `scene` from `snapshot`.
pub(crate) fn populate_scene(scene: &mut Scene, snapshot: &MatchSnapshot) {
    scene.path.waypoints = to_vec2_path(&snapshot.path);
    scene.towers = tower_presentations(&snapshot.towers);
    scene.enemies = enemy_presentations(&snapshot.enemies);
    scene.hud = HudPresentation {
        money: snapshot.money,
        lives: snapshot.lives,
        wave: snapshot.wave.wave,
        score: snapshot.score,
        high_score: snapshot.high_score,
        countdown: CountdownBanner::from_status(snapshot.wave),
    };
    scene.shop = ShopPresentation::new(snapshot.selected_tower, snapshot.money);
    scene.game_over = snapshot.outcome.map(|outcome| GameOverPresentation {
        score: outcome.score,
        high_score: snapshot.high_score,
        new_high_score: outcome.new_high_score,
    });
}

/// Maps a click to the player action it requests.
///
/// Any button pressed over a shop entry selects that kind. Otherwise the
/// primary button buys a tower and the secondary button upgrades one.
pub(crate) fn action_for_click(click: PointerClick) -> PlayerAction {
    if let Some(kind) = shop_button_at(click.position) {
        return PlayerAction::SelectTowerKind { kind };
    }

    let position = WorldPoint::new(click.position.x, click.position.y);
    match click.button {
        PointerButton::Primary => PlayerAction::PlaceTower { position },
        PointerButton::Secondary => PlayerAction::UpgradeTower { position },
    }
}

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

fn to_vec2_path(path: &[WorldPoint]) -> Vec<Vec2> {
    path.iter().copied().map(to_vec2).collect()
}

fn tower_presentations(towers: &TowerView) -> Vec<TowerPresentation> {
    towers
        .iter()
        .map(|tower| TowerPresentation {
            position: to_vec2(tower.position),
            size: tower.size,
            range: tower.range,
            level: tower.level,
            color: Color::from_entity(tower.kind.color()),
        })
        .collect()
}

fn enemy_presentations(enemies: &EnemyView) -> Vec<EnemyPresentation> {
    enemies
        .iter()
        .map(|enemy| EnemyPresentation {
            position: to_vec2(enemy.position),
            size: enemy.kind.size(),
            color: Color::from_entity(enemy.kind.color()),
            health_fraction: enemy.health_fraction(),
        })
        .collect()
}

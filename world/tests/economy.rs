use tower_defense_core::{
    Command, EnemyKind, Event, Gold, PlacementError, TowerId, TowerKind, UpgradeError, WorldPoint,
    STARTING_LIVES, STARTING_MONEY,
};
use tower_defense_world::{self as world, query, World};

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn place(kind: TowerKind, x: f32, y: f32) -> Command {
    Command::PlaceTower {
        kind,
        position: WorldPoint::new(x, y),
    }
}

#[test]
fn purchase_deducts_exact_cost() {
    let mut world = World::new();
    let events = apply_all(&mut world, vec![place(TowerKind::Basic, 100.0, 100.0)]);

    assert_eq!(
        query::money(&world),
        Gold::new(STARTING_MONEY.get() - TowerKind::Basic.cost().get())
    );
    assert_eq!(
        events,
        vec![Event::TowerPlaced {
            tower: TowerId::new(0),
            kind: TowerKind::Basic,
            position: WorldPoint::new(100.0, 100.0),
            cost: Gold::new(100),
        }]
    );
    assert_eq!(query::tower_view(&world).len(), 1);
}

#[test]
fn unaffordable_purchase_leaves_state_untouched() {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![
            place(TowerKind::Sniper, 100.0, 100.0),
            place(TowerKind::Basic, 200.0, 100.0),
        ],
    );
    assert_eq!(query::money(&world), Gold::new(0));

    let events = apply_all(&mut world, vec![place(TowerKind::Basic, 300.0, 100.0)]);
    assert_eq!(query::money(&world), Gold::new(0));
    assert_eq!(query::tower_view(&world).len(), 2);
    assert!(matches!(
        events.as_slice(),
        [Event::TowerPlacementRejected {
            reason: PlacementError::InsufficientFunds,
            ..
        }]
    ));
}

#[test]
fn placement_over_shop_or_outside_field_is_rejected() {
    let mut world = World::new();
    let events = apply_all(
        &mut world,
        vec![
            place(TowerKind::Basic, 700.0, 100.0),
            place(TowerKind::Basic, 100.0, 650.0),
        ],
    );

    let reasons: Vec<PlacementError> = events
        .iter()
        .filter_map(|event| match event {
            Event::TowerPlacementRejected { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(
        reasons,
        vec![PlacementError::ShopRegion, PlacementError::OutOfBounds]
    );
    assert_eq!(query::money(&world), STARTING_MONEY);
    assert!(query::tower_view(&world).is_empty());
}

#[test]
fn upgrade_spends_upgrade_cost_and_doubles_it() {
    let mut world = World::new();
    let _ = apply_all(&mut world, vec![place(TowerKind::Basic, 100.0, 100.0)]);

    let events = apply_all(
        &mut world,
        vec![Command::UpgradeTower {
            position: WorldPoint::new(105.0, 100.0),
        }],
    );

    assert_eq!(
        events,
        vec![Event::TowerUpgraded {
            tower: TowerId::new(0),
            level: 2,
            cost: Gold::new(100),
        }]
    );
    assert_eq!(query::money(&world), Gold::new(100));

    let tower = query::tower_view(&world).into_vec()[0];
    assert_eq!(tower.upgrade_cost, Gold::new(200));
    assert!((tower.damage - 37.5).abs() < 1e-4);
    assert!((tower.range - 180.0).abs() < 1e-4);
}

#[test]
fn upgrade_rejections_do_not_mutate() {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![
            place(TowerKind::Basic, 100.0, 100.0),
            place(TowerKind::Basic, 300.0, 100.0),
            place(TowerKind::Basic, 500.0, 200.0),
        ],
    );
    assert_eq!(query::money(&world), Gold::new(0));

    let events = apply_all(
        &mut world,
        vec![
            Command::UpgradeTower {
                position: WorldPoint::new(100.0, 100.0),
            },
            Command::UpgradeTower {
                position: WorldPoint::new(200.0, 400.0),
            },
        ],
    );

    let reasons: Vec<UpgradeError> = events
        .iter()
        .filter_map(|event| match event {
            Event::TowerUpgradeRejected { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(
        reasons,
        vec![UpgradeError::InsufficientFunds, UpgradeError::NoTowerAtPoint]
    );
    assert!(query::tower_view(&world).iter().all(|tower| tower.level == 1));
}

#[test]
fn wave_bonus_is_credited() {
    let mut world = World::new();
    let events = apply_all(
        &mut world,
        vec![Command::AwardWaveBonus {
            wave: 1,
            amount: Gold::new(100),
        }],
    );

    assert_eq!(query::money(&world), Gold::new(400));
    assert_eq!(
        events,
        vec![Event::WaveBonusAwarded {
            wave: 1,
            amount: Gold::new(100),
        }]
    );
}

#[test]
fn splash_hit_leaves_normal_enemy_alive() {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![
            place(TowerKind::Splash, 20.0, 300.0),
            Command::SpawnEnemy {
                kind: EnemyKind::Normal,
            },
        ],
    );

    let enemy = query::enemy_view(&world).into_vec()[0].id;
    let tower = query::tower_view(&world).into_vec()[0].id;
    let events = apply_all(&mut world, vec![Command::FireAtEnemy { tower, enemy }]);

    let snapshot = query::enemy_view(&world).into_vec()[0];
    assert_eq!(snapshot.health.get(), 65.0);
    assert!(!snapshot.health.is_depleted());
    assert_eq!(events.len(), 1);

    let tower_state = query::tower_view(&world).into_vec()[0];
    assert_eq!(tower_state.cooldown_remaining, 45.0);
}

#[test]
fn cooling_tower_cannot_fire_again() {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![
            place(TowerKind::Basic, 20.0, 300.0),
            Command::SpawnEnemy {
                kind: EnemyKind::Normal,
            },
        ],
    );
    let enemy = query::enemy_view(&world).into_vec()[0].id;
    let tower = TowerId::new(0);

    let events = apply_all(
        &mut world,
        vec![
            Command::FireAtEnemy { tower, enemy },
            Command::FireAtEnemy { tower, enemy },
        ],
    );

    assert_eq!(events.len(), 1);
    assert_eq!(query::enemy_view(&world).into_vec()[0].health.get(), 75.0);
}

#[test]
fn killed_enemy_pays_bounty_on_next_tick() {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![
            place(TowerKind::Sniper, 20.0, 300.0),
            Command::SpawnEnemy {
                kind: EnemyKind::Normal,
            },
        ],
    );
    let enemy = query::enemy_view(&world).into_vec()[0].id;
    let money_before = query::money(&world);

    let events = apply_all(
        &mut world,
        vec![
            Command::FireAtEnemy {
                tower: TowerId::new(0),
                enemy,
            },
            Command::Tick,
        ],
    );

    assert!(events.contains(&Event::EnemyKilled {
        enemy,
        kind: EnemyKind::Normal,
        bounty: Gold::new(25),
    }));
    assert_eq!(
        query::money(&world),
        money_before.saturating_add(Gold::new(25))
    );
    assert_eq!(query::enemy_count(&world), 0);
}

#[test]
fn escaping_enemies_cost_lives_until_defeat() {
    let path = vec![WorldPoint::new(0.0, 0.0), WorldPoint::new(1.0, 0.0)];
    let mut world = World::with_path(path);
    let spawns = (0..STARTING_LIVES)
        .map(|_| Command::SpawnEnemy {
            kind: EnemyKind::Fast,
        })
        .collect();
    let _ = apply_all(&mut world, spawns);

    let events = apply_all(&mut world, vec![Command::Tick]);

    assert_eq!(query::lives(&world), 0);
    assert!(query::is_defeated(&world));
    assert_eq!(query::enemy_count(&world), 0);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::EnemyEscaped { .. }))
            .count(),
        STARTING_LIVES as usize
    );
    assert_eq!(events.last(), Some(&Event::LivesDepleted));

    let after = apply_all(
        &mut world,
        vec![Command::Tick, place(TowerKind::Basic, 100.0, 100.0)],
    );
    assert_eq!(
        after,
        vec![Event::TowerPlacementRejected {
            kind: TowerKind::Basic,
            position: WorldPoint::new(100.0, 100.0),
            reason: PlacementError::MatchOver,
        }]
    );
}

#[test]
fn selecting_tower_kind_is_reported() {
    let mut world = World::new();
    let events = apply_all(
        &mut world,
        vec![Command::SelectTowerKind {
            kind: TowerKind::Splash,
        }],
    );

    assert_eq!(query::selected_tower_kind(&world), TowerKind::Splash);
    assert_eq!(
        events,
        vec![Event::TowerKindSelected {
            kind: TowerKind::Splash
        }]
    );
}

fn upgrade_at(x: f32, y: f32) -> Command {
    Command::UpgradeTower {
        position: WorldPoint::new(x, y),
    }
}

fn tower_levels(world: &World) -> Vec<u32> {
    query::tower_view(world).iter().map(|tower| tower.level).collect()
}

#[test]
fn one_click_upgrades_every_overlapping_tower() {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![
            place(TowerKind::Basic, 100.0, 100.0),
            place(TowerKind::Basic, 110.0, 100.0),
            Command::AwardWaveBonus {
                wave: 1,
                amount: Gold::new(1_000),
            },
        ],
    );

    let events = apply_all(&mut world, vec![upgrade_at(105.0, 100.0)]);

    assert_eq!(
        events,
        vec![
            Event::TowerUpgraded {
                tower: TowerId::new(0),
                level: 2,
                cost: Gold::new(100),
            },
            Event::TowerUpgraded {
                tower: TowerId::new(1),
                level: 2,
                cost: Gold::new(100),
            },
        ]
    );
    assert_eq!(tower_levels(&world), vec![2, 2]);
    assert_eq!(query::money(&world), Gold::new(900));
}

#[test]
fn unaffordable_tower_does_not_block_a_cheaper_neighbour() {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![
            place(TowerKind::Basic, 100.0, 100.0),
            place(TowerKind::Basic, 110.0, 100.0),
            upgrade_at(90.0, 100.0),
            Command::AwardWaveBonus {
                wave: 1,
                amount: Gold::new(100),
            },
        ],
    );
    assert_eq!(tower_levels(&world), vec![2, 1]);
    assert_eq!(query::money(&world), Gold::new(100));

    let events = apply_all(&mut world, vec![upgrade_at(105.0, 100.0)]);

    assert_eq!(
        events,
        vec![Event::TowerUpgraded {
            tower: TowerId::new(1),
            level: 2,
            cost: Gold::new(100),
        }]
    );
    assert_eq!(tower_levels(&world), vec![2, 2]);
    assert_eq!(query::money(&world), Gold::new(0));
}

use tower_defense_core::{Command, Gold, WavePhase};
use tower_defense_system_wave_director::{
    Config, WaveDirector, INTERMISSION_TICKS, PRE_GAME_TICKS, SPAWN_INTERVAL_TICKS,
    WAVE_DURATION_TICKS,
};
use tower_defense_world::{self as world, query, World};

const SEED: u64 = 0x4d59_5df4_d0f3_3173;

fn run_ticks(director: &mut WaveDirector, ticks: u32, live_enemies: usize) -> Vec<Command> {
    let mut commands = Vec::new();
    for _ in 0..ticks {
        director.handle(live_enemies, &mut commands);
    }
    commands
}

#[test]
fn pre_game_lasts_exactly_three_hundred_ticks() {
    let mut director = WaveDirector::new(Config::new(SEED));
    assert_eq!(director.status().phase, WavePhase::PreGame);
    assert_eq!(director.status().countdown, PRE_GAME_TICKS);

    let commands = run_ticks(&mut director, PRE_GAME_TICKS - 1, 0);
    assert!(commands.is_empty());
    assert_eq!(director.status().phase, WavePhase::PreGame);
    assert_eq!(director.status().countdown, 1);

    let commands = run_ticks(&mut director, 1, 0);
    assert!(commands.is_empty());
    let status = director.status();
    assert_eq!(status.phase, WavePhase::Spawning);
    assert_eq!(status.countdown, WAVE_DURATION_TICKS);
    assert_eq!(status.wave, 1);
}

#[test]
fn spawns_follow_interval_until_population_cap() {
    let mut director = WaveDirector::new(Config::new(SEED));
    let _ = run_ticks(&mut director, PRE_GAME_TICKS, 0);

    let mut live = 0;
    let mut spawn_ticks = Vec::new();
    for tick in 0..(SPAWN_INTERVAL_TICKS * 8) {
        let mut commands = Vec::new();
        director.handle(live, &mut commands);
        for command in commands {
            assert!(matches!(command, Command::SpawnEnemy { .. }));
            live += 1;
            spawn_ticks.push(tick);
        }
    }

    assert_eq!(live, director.population_cap());
    let expected: Vec<u32> = (0..5).map(|index| index * SPAWN_INTERVAL_TICKS).collect();
    assert_eq!(spawn_ticks, expected);
}

#[test]
fn wave_waits_for_field_to_clear() {
    let mut director = WaveDirector::new(Config::new(SEED));
    let commands = run_ticks(&mut director, PRE_GAME_TICKS + WAVE_DURATION_TICKS * 3, 1);

    assert!(commands
        .iter()
        .all(|command| !matches!(command, Command::AwardWaveBonus { .. })));
    assert_eq!(director.status().phase, WavePhase::Spawning);
    assert_eq!(director.status().wave, 1);
}

#[test]
fn cleared_wave_awards_bonus_then_pauses() {
    let mut director = WaveDirector::new(Config::new(SEED));
    let mut commands = Vec::new();
    let mut ticks = 0;
    while !commands
        .iter()
        .any(|command| matches!(command, Command::AwardWaveBonus { .. }))
    {
        director.handle(0, &mut commands);
        ticks += 1;
        assert!(ticks < 10_000, "wave never cleared");
    }

    assert_eq!(
        commands.last(),
        Some(&Command::AwardWaveBonus {
            wave: 1,
            amount: Gold::new(100),
        })
    );
    assert!(ticks > PRE_GAME_TICKS + WAVE_DURATION_TICKS);

    let status = director.status();
    assert_eq!(status.phase, WavePhase::Intermission);
    assert_eq!(status.wave, 2);
    assert_eq!(status.countdown, INTERMISSION_TICKS);

    let pause = run_ticks(&mut director, INTERMISSION_TICKS, 0);
    assert!(pause.is_empty());
    let status = director.status();
    assert_eq!(status.phase, WavePhase::Spawning);
    assert_eq!(status.countdown, WAVE_DURATION_TICKS);
    assert_eq!(status.spawn_timer, 0);
    assert_eq!(director.population_cap(), 10);
}

#[test]
fn live_population_never_exceeds_wave_cap() {
    let mut world = World::new();
    let mut director = WaveDirector::new(Config::new(SEED));

    for _ in 0..20_000 {
        if query::is_defeated(&world) {
            break;
        }

        let mut commands = Vec::new();
        director.handle(query::enemy_count(&world), &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::Tick, &mut events);

        assert!(query::enemy_count(&world) <= director.population_cap());
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let first = run_ticks(&mut WaveDirector::new(Config::new(SEED)), 12_000, 0);
    let second = run_ticks(&mut WaveDirector::new(Config::new(SEED)), 12_000, 0);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that paces enemy waves and emits spawn commands.
//!
//! The director is a tick-driven state machine with three phases:
//!
//! * [`WavePhase::PreGame`] counts down before the very first wave.
//! * [`WavePhase::Spawning`] introduces one enemy every spawn interval while
//!   the live population stays below `wave * 5`. The wave ends once the wave
//!   timer elapsed, the spawn timer is idle and the field is empty, at which
//!   point the completion bonus is awarded.
//! * [`WavePhase::Intermission`] counts down before the next wave begins.
//!
//! There is no terminal phase. The match ends externally when lives run out.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tower_defense_core::{Command, EnemyKind, Gold, WavePhase, WaveStatus};
use tracing::{debug, info};

/// Ticks counted down before the first wave begins.
pub const PRE_GAME_TICKS: u32 = 300;
/// Ticks a wave keeps spawning before it may end.
pub const WAVE_DURATION_TICKS: u32 = 1_200;
/// Ticks between the end of a wave and the start of the next.
pub const INTERMISSION_TICKS: u32 = 300;
/// Ticks between consecutive spawns within a wave.
pub const SPAWN_INTERVAL_TICKS: u32 = 60;
/// Live population allowed per wave number.
pub const ENEMIES_PER_WAVE: u32 = 5;
/// Money credited whenever a wave is cleared.
pub const WAVE_COMPLETION_BONUS: Gold = Gold::new(100);

const FAST_ENEMY_FIRST_WAVE: u32 = 3;
const MIXED_ENEMY_FIRST_WAVE: u32 = 5;
const FAST_ENEMY_CHANCE: f64 = 0.3;

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding archetype selection with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// State machine governing wave pacing and enemy spawning.
#[derive(Debug)]
pub struct WaveDirector {
    phase: WavePhase,
    wave: u32,
    countdown: u32,
    spawn_timer: u32,
    rng: ChaCha8Rng,
}

impl WaveDirector {
    /// Creates a director in the pre-game phase of wave one.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            phase: WavePhase::PreGame,
            wave: 1,
            countdown: PRE_GAME_TICKS,
            spawn_timer: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Captures the director's progress for presentation.
    #[must_use]
    pub fn status(&self) -> WaveStatus {
        WaveStatus {
            phase: self.phase,
            wave: self.wave,
            countdown: self.countdown,
            spawn_timer: self.spawn_timer,
        }
    }

    /// Largest number of enemies allowed on the field during the current wave.
    #[must_use]
    pub fn population_cap(&self) -> usize {
        let cap = self.wave.saturating_mul(ENEMIES_PER_WAVE);
        usize::try_from(cap).unwrap_or(usize::MAX)
    }

    /// Advances the director by one tick.
    ///
    /// `live_enemies` is the number of enemies on the field before the tick.
    /// Spawn and bonus commands are appended to `out`.
    pub fn handle(&mut self, live_enemies: usize, out: &mut Vec<Command>) {
        match self.phase {
            WavePhase::PreGame | WavePhase::Intermission => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown == 0 {
                    self.begin_wave();
                }
            }
            WavePhase::Spawning => {
                if live_enemies == 0 && self.spawn_timer == 0 && self.countdown == 0 {
                    self.finish_wave(out);
                    return;
                }

                if self.spawn_timer == 0 && live_enemies < self.population_cap() {
                    let kind = self.choose_enemy();
                    debug!(wave = self.wave, ?kind, "spawning enemy");
                    out.push(Command::SpawnEnemy { kind });
                    self.spawn_timer = SPAWN_INTERVAL_TICKS;
                }

                self.spawn_timer = self.spawn_timer.saturating_sub(1);
                self.countdown = self.countdown.saturating_sub(1);
            }
        }
    }

    fn begin_wave(&mut self) {
        info!(wave = self.wave, "wave started");
        self.phase = WavePhase::Spawning;
        self.countdown = WAVE_DURATION_TICKS;
        self.spawn_timer = 0;
    }

    fn finish_wave(&mut self, out: &mut Vec<Command>) {
        info!(wave = self.wave, "wave cleared");
        out.push(Command::AwardWaveBonus {
            wave: self.wave,
            amount: WAVE_COMPLETION_BONUS,
        });
        self.wave = self.wave.saturating_add(1);
        self.phase = WavePhase::Intermission;
        self.countdown = INTERMISSION_TICKS;
    }

    fn choose_enemy(&mut self) -> EnemyKind {
        if self.wave >= MIXED_ENEMY_FIRST_WAVE {
            let index = self.rng.gen_range(0..EnemyKind::ALL.len());
            return EnemyKind::ALL[index];
        }

        if self.wave >= FAST_ENEMY_FIRST_WAVE && self.rng.gen_bool(FAST_ENEMY_CHANCE) {
            return EnemyKind::Fast;
        }

        EnemyKind::Normal
    }
}

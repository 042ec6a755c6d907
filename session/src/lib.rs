#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match loop that drives a Tower Defense match one fixed tick at a time.
//!
//! A [`Session`] owns the world together with the wave director and the
//! tower targeting system. Player intents are queued between ticks and
//! applied at the start of the next [`Session::step`], followed by the
//! director, the simulation tick and finally tower fire. The session keeps
//! the score of the running match and reports it to a [`HighScoreStore`]
//! once lives run out.

mod high_score;

pub use high_score::{HighScoreStore, InMemoryHighScores, NoHighScores};

use tower_defense_core::{
    Command, EnemyView, Event, Gold, TowerKind, TowerView, WaveStatus, WorldPoint, DEFAULT_PATH,
};
use tower_defense_system_tower_targeting::TowerTargeting;
use tower_defense_system_wave_director::{self as wave_director, WaveDirector};
use tower_defense_world::{self as world, query, World};
use tracing::{debug, info};

/// Seed used when no explicit seed is configured.
pub const DEFAULT_SEED: u64 = 0x7d3a_91c4_2be8_05f1;

/// Parameters fixed for the lifetime of a match.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Seed driving enemy archetype selection.
    pub seed: u64,
    /// Waypoints enemies follow from spawn to exit.
    pub path: Vec<WorldPoint>,
}

impl SessionConfig {
    /// Creates a configuration that walks the default path with `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            path: DEFAULT_PATH.to_vec(),
        }
    }
}

/// Intents a player may issue between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerAction {
    /// Buys the selected tower kind centred on the given point.
    PlaceTower {
        /// Centre of the requested tower.
        position: WorldPoint,
    },
    /// Upgrades the tower under the given point.
    UpgradeTower {
        /// Point where the player clicked.
        position: WorldPoint,
    },
    /// Changes the tower kind used by later placements.
    SelectTowerKind {
        /// Kind to select.
        kind: TowerKind,
    },
}

/// Summary of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Sum of the bounties earned from kills.
    pub score: u32,
    /// Number of waves whose completion bonus was awarded.
    pub waves_cleared: u32,
    /// Number of enemies destroyed by towers.
    pub enemies_killed: u32,
    /// Simulation tick at which the last life was lost.
    pub tick: u64,
    /// Whether the score beat the previous best.
    pub new_high_score: bool,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchSnapshot {
    /// Path enemies follow.
    pub path: Vec<WorldPoint>,
    /// Towers on the field ordered by identifier.
    pub towers: TowerView,
    /// Enemies on the field ordered by identifier.
    pub enemies: EnemyView,
    /// Money available to the player.
    pub money: Gold,
    /// Lives left.
    pub lives: u32,
    /// Progress of the wave director.
    pub wave: WaveStatus,
    /// Score of the running match.
    pub score: u32,
    /// Best score known to the high score store.
    pub high_score: Option<u32>,
    /// Tower kind used by the next placement.
    pub selected_tower: TowerKind,
    /// Number of completed simulation ticks.
    pub tick: u64,
    /// Outcome once the match is over.
    pub outcome: Option<MatchOutcome>,
}

/// A single Tower Defense match together with its high score collaborator.
#[derive(Debug)]
pub struct Session<S = NoHighScores> {
    config: SessionConfig,
    world: World,
    director: WaveDirector,
    targeting: TowerTargeting,
    pending: Vec<PlayerAction>,
    commands: Vec<Command>,
    events: Vec<Event>,
    score: u32,
    enemies_killed: u32,
    waves_cleared: u32,
    outcome: Option<MatchOutcome>,
    high_scores: S,
}

impl<S: HighScoreStore> Session<S> {
    /// Starts a new match.
    #[must_use]
    pub fn new(config: SessionConfig, high_scores: S) -> Self {
        info!(seed = config.seed, "match started");
        Self {
            world: World::with_path(config.path.clone()),
            director: WaveDirector::new(wave_director::Config::new(config.seed)),
            targeting: TowerTargeting::new(),
            config,
            pending: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
            score: 0,
            enemies_killed: 0,
            waves_cleared: 0,
            outcome: None,
            high_scores,
        }
    }

    /// Discards the current match and starts a fresh one in place.
    ///
    /// The high score store carries over. The seed advances by one so the
    /// next match draws a different enemy mix.
    pub fn restart(&mut self) {
        self.config.seed = self.config.seed.wrapping_add(1);
        info!(seed = self.config.seed, "match restarted");
        self.world = World::with_path(self.config.path.clone());
        self.director = WaveDirector::new(wave_director::Config::new(self.config.seed));
        self.pending.clear();
        self.commands.clear();
        self.events.clear();
        self.score = 0;
        self.enemies_killed = 0;
        self.waves_cleared = 0;
        self.outcome = None;
    }

    /// Queues a player action for the next tick.
    pub fn queue(&mut self, action: PlayerAction) {
        self.pending.push(action);
    }

    /// Advances the match by one fixed tick and returns the events it raised.
    ///
    /// Once the match is over, queued actions are still answered but the
    /// simulation no longer advances.
    pub fn step(&mut self) -> &[Event] {
        self.events.clear();
        self.apply_player_actions();

        if self.outcome.is_some() {
            return &self.events;
        }

        self.director
            .handle(query::enemy_count(&self.world), &mut self.commands);
        self.commands.push(Command::Tick);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting
            .handle(&towers, &enemies, &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        self.record_events();
        &self.events
    }

    /// Captures the state required to present the match.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            path: query::path(&self.world).to_vec(),
            towers: query::tower_view(&self.world),
            enemies: query::enemy_view(&self.world),
            money: query::money(&self.world),
            lives: query::lives(&self.world),
            wave: self.director.status(),
            score: self.score,
            high_score: self.high_scores.best(),
            selected_tower: query::selected_tower_kind(&self.world),
            tick: query::tick_index(&self.world),
            outcome: self.outcome,
        }
    }

    /// Score of the running match.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Reports whether lives ran out.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Outcome of the match once it is over.
    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Read access to the high score store.
    #[must_use]
    pub fn high_scores(&self) -> &S {
        &self.high_scores
    }

    fn apply_player_actions(&mut self) {
        for action in self.pending.drain(..) {
            let command = match action {
                PlayerAction::PlaceTower { position } => Command::PlaceTower {
                    kind: query::selected_tower_kind(&self.world),
                    position,
                },
                PlayerAction::UpgradeTower { position } => Command::UpgradeTower { position },
                PlayerAction::SelectTowerKind { kind } => Command::SelectTowerKind { kind },
            };
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn record_events(&mut self) {
        let mut defeated = false;
        for event in &self.events {
            match event {
                Event::EnemyKilled { bounty, .. } => {
                    self.score = self.score.saturating_add(bounty.get());
                    self.enemies_killed = self.enemies_killed.saturating_add(1);
                }
                Event::WaveBonusAwarded { .. } => {
                    self.waves_cleared = self.waves_cleared.saturating_add(1);
                }
                Event::LivesDepleted => defeated = true,
                _ => {}
            }
        }

        if defeated {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let new_high_score = self.high_scores.submit(self.score);
        let outcome = MatchOutcome {
            score: self.score,
            waves_cleared: self.waves_cleared,
            enemies_killed: self.enemies_killed,
            tick: query::tick_index(&self.world),
            new_high_score,
        };
        info!(
            score = outcome.score,
            waves_cleared = outcome.waves_cleared,
            new_high_score,
            "match over"
        );
        debug!(?outcome, "final match summary");
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_starts_in_pre_game() {
        let session = Session::new(SessionConfig::default(), NoHighScores);
        let snapshot = session.snapshot();

        assert_eq!(snapshot.money, Gold::new(300));
        assert_eq!(snapshot.lives, 20);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.wave.wave, 1);
        assert_eq!(snapshot.wave.countdown_seconds(), Some(6));
        assert_eq!(snapshot.selected_tower, TowerKind::Basic);
        assert!(snapshot.towers.is_empty());
        assert!(snapshot.enemies.is_empty());
        assert!(snapshot.outcome.is_none());
    }

    #[test]
    fn placement_uses_selected_kind() {
        let mut session = Session::new(SessionConfig::default(), NoHighScores);
        session.queue(PlayerAction::SelectTowerKind {
            kind: TowerKind::Sniper,
        });
        session.queue(PlayerAction::PlaceTower {
            position: WorldPoint::new(200.0, 200.0),
        });

        let events = session.step().to_vec();

        assert!(events.contains(&Event::TowerKindSelected {
            kind: TowerKind::Sniper
        }));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.money, Gold::new(100));
        let placed: Vec<TowerKind> = snapshot.towers.iter().map(|tower| tower.kind).collect();
        assert_eq!(placed, vec![TowerKind::Sniper]);
    }

    #[test]
    fn restart_advances_seed_and_resets_match() {
        let mut session = Session::new(SessionConfig::with_seed(9), InMemoryHighScores::new());
        session.queue(PlayerAction::PlaceTower {
            position: WorldPoint::new(200.0, 200.0),
        });
        for _ in 0..10 {
            let _ = session.step();
        }

        session.restart();
        assert_eq!(session.config.seed, 10);
        assert_eq!(session.snapshot().tick, 0);
        assert_eq!(session.score(), 0);
        assert!(session.snapshot().towers.is_empty());
        assert_eq!(session.snapshot().money, Gold::new(300));
    }
}

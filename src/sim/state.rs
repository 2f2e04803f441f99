//! Session state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; one tick mutates it in place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, Edge};
use super::enemy::{Enemy, EnemyKind};
use super::entity::{EntityIds, Projectile};
use super::player::Player;
use super::spawner::Spawner;
use super::tank::TankClass;
use crate::consts::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu at full arena size, waiting for confirm
    Welcome,
    /// Arena collapsing into the playfield
    Transitioning,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for confirm to restart
    GameOver,
}

/// Per-run counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Seconds of unpaused play
    pub time_survived: f32,
    pub bullets_fired: u32,
    pub enemies_killed: u32,
    pub bosses_killed: u32,
    pub currency_collected: u32,
    /// Player shots that left the arena and pushed a wall
    pub wall_hits: u32,
    pub level_reached: u32,
}

/// Something that happened during the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallHit { edge: Edge },
    EnemySpawned { id: u32, kind: EnemyKind },
    BossSpawned { id: u32 },
    EnemyKilled {
        id: u32,
        kind: EnemyKind,
        currency: u32,
        xp: u32,
    },
    PlayerDamaged { amount: f32 },
    LevelUp { level: u32 },
    TankUpgraded { class: TankClass },
    PhaseChanged { from: GamePhase, to: GamePhase },
    PlayerDied,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub arena: Arena,
    pub player: Player,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub spawner: Spawner,
    pub stats: GameStats,
    pub phase: GamePhase,
    /// Upgrade overlay open (simulation paused)
    pub shop_open: bool,
    /// Seconds of unpaused play this run
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ids: EntityIds,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New session on the welcome screen
    pub fn new(seed: u64, screen: Vec2, tuning: Tuning) -> Self {
        let arena = Arena::new(
            screen.x,
            screen.y,
            tuning.arena.menu_size,
            tuning.arena.clone(),
        );
        let player = Player::new(arena.rect().center(), &tuning);
        Self {
            seed,
            arena,
            player,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            spawner: Spawner::new(seed, tuning.spawner.clone()),
            stats: GameStats::default(),
            phase: GamePhase::Welcome,
            shop_open: false,
            elapsed: 0.0,
            time_ticks: 0,
            ids: EntityIds::default(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Default screen and tuning
    pub fn with_seed(seed: u64) -> Self {
        Self::new(
            seed,
            Vec2::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT),
            Tuning::default(),
        )
    }

    /// Reset the run and start collapsing the arena into the playfield
    pub fn start_run(&mut self) {
        self.player = Player::new(self.arena.screen() / 2.0, &self.tuning);
        self.enemies.clear();
        self.player_projectiles.clear();
        self.enemy_projectiles.clear();
        self.spawner.reset();
        self.stats = GameStats {
            level_reached: 1,
            ..Default::default()
        };
        self.elapsed = 0.0;
        self.shop_open = false;
        self.arena.resize(self.tuning.arena.menu_size);
        self.arena.start_collapse_animation();
        self.set_phase(GamePhase::Transitioning);
    }

    /// Leave the run and grow the arena back to menu size
    pub fn end_run(&mut self) {
        self.shop_open = false;
        self.arena.resize(self.tuning.arena.menu_size);
        self.stats.level_reached = self.player.progression.level;
        log::info!(
            "Run over: {:.1}s survived, {} kills ({} bosses), level {}, {} currency",
            self.stats.time_survived,
            self.stats.enemies_killed,
            self.stats.bosses_killed,
            self.stats.level_reached,
            self.stats.currency_collected
        );
        self.set_phase(GamePhase::GameOver);
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.events.push(GameEvent::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }

    pub fn boss_alive(&self) -> bool {
        self.enemies.iter().any(Enemy::is_boss)
    }

    /// Award an enemy's drops to the player and count the kill
    pub fn credit_kill(&mut self, enemy: &Enemy) {
        let currency = enemy.currency_drop();
        let xp = enemy.xp_drop();
        let progression = &mut self.player.progression;
        progression.earn_currency(currency);
        let levels = progression.earn_xp(xp);
        let level = progression.level;

        self.stats.enemies_killed += 1;
        if enemy.is_boss() {
            self.stats.bosses_killed += 1;
            log::info!("Boss #{} destroyed", enemy.id);
        } else {
            log::debug!(
                "Killed {:?} #{} (+{currency} currency, +{xp} xp)",
                enemy.kind,
                enemy.id
            );
        }
        self.stats.currency_collected += currency;
        self.stats.level_reached = level;
        self.events.push(GameEvent::EnemyKilled {
            id: enemy.id,
            kind: enemy.kind,
            currency,
            xp,
        });
        if levels > 0 {
            self.events.push(GameEvent::LevelUp { level });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Scaling;

    #[test]
    fn test_new_session_on_welcome() {
        let state = GameState::with_seed(1);
        assert_eq!(state.phase, GamePhase::Welcome);
        assert_eq!(state.arena.width(), 900.0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_start_run_resets_and_collapses() {
        let mut state = GameState::with_seed(1);
        state.stats.enemies_killed = 9;
        state.player.health = 1.0;
        state.start_run();
        assert_eq!(state.phase, GamePhase::Transitioning);
        assert_eq!(state.stats.enemies_killed, 0);
        assert_eq!(state.player.health, 100.0);
        assert!(!state.arena.is_animation_complete());
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::PhaseChanged {
                to: GamePhase::Transitioning,
                ..
            })
        ));
    }

    #[test]
    fn test_credit_kill_rewards_once() {
        let mut state = GameState::with_seed(1);
        let enemy = Enemy::new(
            7,
            EnemyKind::Turret,
            Vec2::ZERO,
            Scaling::default(),
            &state.tuning.enemies,
        );
        state.credit_kill(&enemy);
        assert_eq!(state.player.progression.currency, 100);
        assert_eq!(state.stats.enemies_killed, 1);
        assert_eq!(state.stats.bosses_killed, 1);
        // 200 xp from level 1 clears both the 100 and 200 thresholds
        assert_eq!(state.player.progression.level, 3);
        assert_eq!(state.player.progression.xp, 0);
        assert!(state.events.contains(&GameEvent::LevelUp { level: 3 }));
    }
}

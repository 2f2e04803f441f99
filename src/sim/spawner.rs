//! Timed enemy spawning with a seeded RNG

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::{Edge, Rect};
use super::enemy::{Enemy, EnemyKind, Scaling};
use super::entity::EntityIds;
use crate::dir_to_deg;
use crate::tuning::{EnemyTuning, SpawnerTuning};

#[derive(Debug, Clone)]
pub struct Spawner {
    /// Seconds accumulated toward the next spawn
    timer: f32,
    rng: Pcg32,
    tuning: SpawnerTuning,
}

impl Spawner {
    pub fn new(seed: u64, tuning: SpawnerTuning) -> Self {
        Self {
            timer: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Restart the interval; the RNG stream carries on
    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Count down and, when the interval elapses, create one enemy outside
    /// `arena` already heading for the player.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        elapsed: f32,
        arena: &Rect,
        player_pos: Vec2,
        boss_alive: bool,
        enemy_tuning: &EnemyTuning,
        ids: &mut EntityIds,
    ) -> Option<Enemy> {
        self.timer += dt;
        if self.timer < self.tuning.interval {
            return None;
        }
        self.timer -= self.tuning.interval;

        let kind = self.choose_kind(elapsed, boss_alive);
        let pos = self.spawn_position(arena);
        let mut enemy = Enemy::new(
            ids.next_id(),
            kind,
            pos,
            self.scaling(elapsed),
            enemy_tuning,
        );
        let toward = enemy.body.dir_to(player_pos);
        enemy.body.rotation = dir_to_deg(toward);
        enemy.body.vel = toward * enemy.speed;

        if kind.is_boss() {
            log::info!(
                "Boss spawned at {:.0},{:.0} after {:.1}s",
                pos.x,
                pos.y,
                elapsed
            );
        } else {
            log::debug!(
                "Spawned {:?} #{} at {:.0},{:.0}",
                kind,
                enemy.id,
                pos.x,
                pos.y
            );
        }
        Some(enemy)
    }

    /// Weighted roll over unlocked variants, with a rare boss override
    pub fn choose_kind(&mut self, elapsed: f32, boss_alive: bool) -> EnemyKind {
        let t = &self.tuning;
        if elapsed >= t.boss_unlock
            && !boss_alive
            && self.rng.random_bool(t.boss_chance.clamp(0.0, 1.0))
        {
            return EnemyKind::Turret;
        }

        let total = t.chaser_weight + t.burst_weight + t.dasher_weight;
        if total <= 0.0 {
            return EnemyKind::Chaser;
        }
        let roll = self.rng.random::<f32>() * total;
        let kind = if roll < t.chaser_weight {
            EnemyKind::Chaser
        } else if roll < t.chaser_weight + t.burst_weight {
            EnemyKind::BurstMover
        } else {
            EnemyKind::Dasher
        };

        // Locked variants fall back to the basic chaser
        match kind {
            EnemyKind::BurstMover if elapsed < t.burst_unlock => EnemyKind::Chaser,
            EnemyKind::Dasher if elapsed < t.dasher_unlock => EnemyKind::Chaser,
            other => other,
        }
    }

    /// Uniformly random edge, uniformly along it, pushed out by the buffer
    pub fn spawn_position(&mut self, arena: &Rect) -> Vec2 {
        let buffer = self.tuning.edge_buffer;
        let edge = Edge::ALL[self.rng.random_range(0..Edge::ALL.len())];
        let along_x = lerp(arena.left, arena.right, self.rng.random::<f32>());
        let along_y = lerp(arena.top, arena.bottom, self.rng.random::<f32>());
        match edge {
            Edge::Left => Vec2::new(arena.left - buffer, along_y),
            Edge::Right => Vec2::new(arena.right + buffer, along_y),
            Edge::Top => Vec2::new(along_x, arena.top - buffer),
            Edge::Bottom => Vec2::new(along_x, arena.bottom + buffer),
        }
    }

    /// Stat multipliers growing linearly with survival time
    pub fn scaling(&self, elapsed: f32) -> Scaling {
        let minutes = elapsed.max(0.0) / 60.0;
        Scaling {
            health: 1.0 + self.tuning.health_scale_per_min * minutes,
            speed: 1.0 + self.tuning.speed_scale_per_min * minutes,
            reward: 1.0 + self.tuning.reward_scale_per_min * minutes,
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Rect {
        Rect::new(500.0, 1400.0, 100.0, 1000.0)
    }

    fn spawner(seed: u64) -> Spawner {
        Spawner::new(seed, SpawnerTuning::default())
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut s = spawner(1);
        let tuning = EnemyTuning::default();
        let mut ids = EntityIds::default();
        let player = Vec2::new(950.0, 550.0);
        assert!(s.update(0.5, 0.5, &arena(), player, false, &tuning, &mut ids).is_none());
        assert!(s.update(0.5, 1.0, &arena(), player, false, &tuning, &mut ids).is_none());
        let enemy = s.update(0.5, 1.5, &arena(), player, false, &tuning, &mut ids);
        let enemy = enemy.expect("spawn after 1.5 s");
        // Heading for the player
        let to_player = (player - enemy.body.pos).normalize();
        assert!(enemy.body.vel.normalize().dot(to_player) > 0.999);
        assert!(s.update(0.5, 2.0, &arena(), player, false, &tuning, &mut ids).is_none());
    }

    #[test]
    fn test_spawn_position_outside_arena() {
        let mut s = spawner(7);
        let rect = arena();
        for _ in 0..200 {
            let pos = s.spawn_position(&rect);
            let outside = pos.x <= rect.left - 40.0
                || pos.x >= rect.right + 40.0
                || pos.y <= rect.top - 40.0
                || pos.y >= rect.bottom + 40.0;
            assert!(outside, "{pos:?}");
        }
    }

    #[test]
    fn test_only_chasers_early() {
        let mut s = spawner(3);
        for _ in 0..500 {
            assert_eq!(s.choose_kind(10.0, false), EnemyKind::Chaser);
        }
    }

    #[test]
    fn test_all_variants_after_unlock() {
        let mut s = spawner(3);
        let kinds: Vec<EnemyKind> = (0..500).map(|_| s.choose_kind(45.0, false)).collect();
        assert!(kinds.contains(&EnemyKind::Chaser));
        assert!(kinds.contains(&EnemyKind::BurstMover));
        assert!(kinds.contains(&EnemyKind::Dasher));
        assert!(!kinds.contains(&EnemyKind::Turret));
    }

    #[test]
    fn test_boss_exclusive() {
        let tuning = SpawnerTuning {
            boss_chance: 1.0,
            ..Default::default()
        };
        let mut s = Spawner::new(5, tuning);
        assert_ne!(s.choose_kind(59.0, false), EnemyKind::Turret);
        assert_eq!(s.choose_kind(60.0, false), EnemyKind::Turret);
        for _ in 0..100 {
            assert_ne!(s.choose_kind(600.0, true), EnemyKind::Turret);
        }
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = spawner(42);
        let mut b = spawner(42);
        for i in 0..100 {
            let t = i as f32;
            assert_eq!(a.choose_kind(t, false), b.choose_kind(t, false));
            assert_eq!(a.spawn_position(&arena()), b.spawn_position(&arena()));
        }
    }

    #[test]
    fn test_scaling_is_linear() {
        let s = spawner(1);
        assert_eq!(s.scaling(0.0), Scaling::default());
        let two_min = s.scaling(120.0);
        assert!((two_min.health - 2.0).abs() < 1e-5);
        assert!((two_min.speed - 1.2).abs() < 1e-5);
        assert!((two_min.reward - 1.5).abs() < 1e-5);
    }
}

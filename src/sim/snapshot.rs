//! Read-only view of a frame for a renderer or HUD
//!
//! Copies out only what drawing needs so the presenter never holds on to
//! simulation state.

use glam::Vec2;
use serde::Serialize;

use super::arena::{ArenaAnimation, ClipView, Rect};
use super::enemy::EnemyKind;
use super::entity::{Barrel, Faction, Projectile};
use super::progression::{DerivedStats, STAT_COUNT};
use super::state::{GamePhase, GameState, GameStats};
use super::tank::TankClass;

/// Type tag a renderer picks colors and shapes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityTag {
    Player,
    Chaser,
    BurstMover,
    Dasher,
    Turret,
    PlayerBullet,
    EnemyBullet,
}

impl From<EnemyKind> for EntityTag {
    fn from(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Chaser => EntityTag::Chaser,
            EnemyKind::BurstMover => EntityTag::BurstMover,
            EnemyKind::Dasher => EntityTag::Dasher,
            EnemyKind::Turret => EntityTag::Turret,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub tag: EntityTag,
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub barrels: Vec<Barrel>,
    /// 0..=1, for health bars
    pub health_fraction: f32,
}

impl EntityView {
    fn projectile(proj: &Projectile) -> Self {
        Self {
            id: proj.id,
            tag: match proj.faction {
                Faction::Player => EntityTag::PlayerBullet,
                Faction::Enemy => EntityTag::EnemyBullet,
            },
            pos: proj.pos,
            radius: proj.radius,
            rotation: crate::dir_to_deg(proj.vel),
            barrels: Vec::new(),
            health_fraction: 1.0,
        }
    }
}

/// HUD and shop counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub health: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub skill_points: u32,
    pub currency: u32,
    pub stat_levels: [u8; STAT_COUNT],
    pub stats: DerivedStats,
    pub tank: TankClass,
    pub tank_upgrades: Vec<TankClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub shop_open: bool,
    pub arena: Rect,
    /// Present while the collapse transition is playing
    pub arena_animation: Option<ArenaAnimation>,
    pub clip: ClipView,
    pub player: EntityView,
    /// Enemies, then player shots, then enemy shots
    pub entities: Vec<EntityView>,
    pub hud: HudView,
    pub run: GameStats,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let progression = &player.progression;
        let max_health = player.stats().max_health;

        let mut entities = Vec::with_capacity(
            state.enemies.len() + state.player_projectiles.len() + state.enemy_projectiles.len(),
        );
        entities.extend(state.enemies.iter().map(|enemy| EntityView {
            id: enemy.id,
            tag: enemy.kind.into(),
            pos: enemy.body.pos,
            radius: enemy.body.radius,
            rotation: enemy.body.rotation,
            barrels: enemy.body.barrels.clone(),
            health_fraction: fraction(enemy.health, enemy.max_health),
        }));
        entities.extend(state.player_projectiles.iter().map(EntityView::projectile));
        entities.extend(state.enemy_projectiles.iter().map(EntityView::projectile));

        Self {
            phase: state.phase,
            shop_open: state.shop_open,
            arena: state.arena.rect(),
            arena_animation: state.arena.animation().copied(),
            clip: state.arena.clipping_view(),
            player: EntityView {
                id: 0,
                tag: EntityTag::Player,
                pos: player.body.pos,
                radius: player.body.radius,
                rotation: player.body.rotation,
                barrels: player.body.barrels.clone(),
                health_fraction: fraction(player.health, max_health),
            },
            entities,
            hud: HudView {
                health: player.health,
                level: progression.level,
                xp: progression.xp,
                xp_to_next: progression.xp_to_next(),
                skill_points: progression.skill_points,
                currency: progression.currency,
                stat_levels: progression.stat_levels,
                stats: *player.stats(),
                tank: player.tank,
                tank_upgrades: player.available_tanks(),
            },
            run: state.stats.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn fraction(value: f32, max: f32) -> f32 {
    if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Enemy, Scaling};

    #[test]
    fn test_capture_lists_everything() {
        let mut state = GameState::with_seed(1);
        let id = state.ids.next_id();
        let mut enemy = Enemy::new(
            id,
            EnemyKind::Dasher,
            Vec2::new(100.0, 100.0),
            Scaling::default(),
            &state.tuning.enemies,
        );
        enemy.health = 1.5;
        state.enemies.push(enemy);
        let shots = state.player.try_fire(&mut state.ids);
        state.player_projectiles.extend(shots);

        let snap = FrameSnapshot::capture(&state);
        assert_eq!(snap.entities.len(), 2);
        assert_eq!(snap.entities[0].tag, EntityTag::Dasher);
        assert!((snap.entities[0].health_fraction - 0.5).abs() < 1e-6);
        assert_eq!(snap.entities[1].tag, EntityTag::PlayerBullet);
        assert_eq!(snap.player.barrels.len(), 1);
        assert_eq!(snap.arena, state.arena.rect());
        assert!(snap.arena_animation.is_none());
        assert_eq!(snap.hud.level, 1);
        assert_eq!(snap.hud.xp_to_next, 100);
    }

    #[test]
    fn test_capture_reports_collapse_progress() {
        let mut state = GameState::with_seed(1);
        state.start_run();
        state.arena.update(0.1);
        let snap = FrameSnapshot::capture(&state);
        let anim = snap.arena_animation.expect("collapse running");
        assert!(anim.progress > 0.0 && anim.progress < 1.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::with_seed(1);
        let json = FrameSnapshot::capture(&state).to_json().unwrap();
        assert!(json.contains("\"phase\":\"Welcome\""));
        assert!(json.contains("\"clip\""));
    }
}

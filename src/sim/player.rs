//! The player tank: movement, aim, reload, firing and upgrades

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Rect;
use super::entity::{Body, EntityIds, Faction, Projectile};
use super::progression::{DerivedStats, Progression, Stat};
use super::tank::TankClass;
use crate::{deg_to_dir, dir_to_deg};
use crate::tuning::{PlayerTuning, Tuning};

/// Pressed movement directions, already debounced by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Sum of the pressed unit vectors (diagonals are not normalized)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub health: f32,
    pub progression: Progression,
    pub tank: TankClass,
    /// Seconds until the next volley is allowed
    pub reload_timer: f32,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        let progression = Progression::new(tuning.progression.clone(), tuning.player.clone());
        let mut body = Body::new(pos, tuning.player.radius);
        body.set_barrels(TankClass::Basic.barrels());
        Self {
            body,
            health: progression.stats().max_health,
            progression,
            tank: TankClass::Basic,
            reload_timer: 0.0,
            tuning: tuning.player.clone(),
        }
    }

    pub fn stats(&self) -> &DerivedStats {
        self.progression.stats()
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn set_movement(&mut self, intent: MoveIntent) {
        self.body.vel = intent.direction() * self.stats().move_speed;
    }

    /// Face the pointer; movement direction does not affect facing
    pub fn aim(&mut self, pointer: Vec2) {
        let delta = pointer - self.body.pos;
        if delta != Vec2::ZERO {
            self.body.rotation = dir_to_deg(delta);
        }
    }

    /// Integrate movement, count down reload, regenerate health
    pub fn update(&mut self, dt: f32) {
        self.body.advance(dt, self.tuning.recoil_recovery);
        self.reload_timer = (self.reload_timer - dt).max(0.0);
        let max = self.stats().max_health;
        if self.health > 0.0 {
            self.health = (self.health + self.stats().regen * dt).min(max);
        }
    }

    /// Keep the whole body inside `rect`
    pub fn constrain_to(&mut self, rect: &Rect) {
        let r = self.body.radius;
        let pos = &mut self.body.pos;
        // Ordered so an arena narrower than the body centers it on the min side
        pos.x = pos.x.min(rect.right - r).max(rect.left + r);
        pos.y = pos.y.min(rect.bottom - r).max(rect.top + r);
    }

    pub fn can_fire(&self) -> bool {
        self.reload_timer <= 0.0
    }

    /// Fire one projectile per barrel if reloaded; otherwise fire nothing.
    ///
    /// Each shot spawns at its barrel tip and travels along the aim, so
    /// flank and rear barrels only change where the shot starts.
    pub fn try_fire(&mut self, ids: &mut EntityIds) -> Vec<Projectile> {
        if !self.can_fire() {
            return Vec::new();
        }
        let stats = *self.stats();
        self.reload_timer = stats.reload_interval;

        let rotation = self.body.rotation;
        let pos = self.body.pos;
        let vel = deg_to_dir(rotation) * stats.bullet_speed;
        let damage = stats.bullet_damage.round().max(1.0);
        let shots: Vec<Projectile> = self
            .body
            .barrels
            .iter()
            .map(|barrel| {
                Projectile::new(
                    ids.next_id(),
                    Faction::Player,
                    barrel.tip(pos, rotation),
                    vel,
                    self.tuning.projectile_radius,
                    damage,
                )
                .with_pierce(stats.penetration)
            })
            .collect();
        for i in 0..self.body.barrels.len() {
            self.body.apply_recoil(i, self.tuning.recoil_amount);
        }
        shots
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Spend a skill point. Raising max health also heals by the increase.
    pub fn upgrade_stat(&mut self, stat: Stat) -> bool {
        let old_max = self.stats().max_health;
        if !self.progression.upgrade_stat(stat) {
            return false;
        }
        let new_max = self.stats().max_health;
        if new_max > old_max {
            self.health += new_max - old_max;
        }
        self.health = self.health.min(new_max);
        true
    }

    /// Advance to `class` if it is a child of the current class and unlocked
    pub fn select_tank(&mut self, class: TankClass) -> bool {
        if !self
            .tank
            .can_upgrade_to(class, self.progression.level, self.progression.tuning())
        {
            return false;
        }
        log::info!("Tank upgraded: {} -> {}", self.tank.name(), class.name());
        self.tank = class;
        self.body.set_barrels(class.barrels());
        true
    }

    pub fn available_tanks(&self) -> Vec<TankClass> {
        self.tank
            .available_upgrades(self.progression.level, self.progression.tuning())
    }
}

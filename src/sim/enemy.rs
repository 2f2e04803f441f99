//! Enemy variants and their movement/attack behaviors
//!
//! The variant set is closed, so behavior is a tagged enum carrying each
//! variant's phase timers rather than a trait object per enemy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{BarrelSpec, Body, EntityIds, Faction, Projectile};
use crate::consts::PROJECTILE_RADIUS;
use crate::dir_to_deg;
use crate::tuning::{EnemyParams, EnemyTuning};

/// Turret barrel proportions relative to body radius
const TURRET_BARREL_LENGTH: f32 = 1.6;
const TURRET_BARREL_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks straight at the player, hesitating when close
    Chaser,
    /// Stop-and-go approach
    BurstMover,
    /// Telegraphs, then lunges along a locked direction
    Dasher,
    /// Slow spinning boss that fires rings of bullets
    Turret,
}

impl EnemyKind {
    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::Turret)
    }

    pub fn params(self, tuning: &EnemyTuning) -> EnemyParams {
        match self {
            EnemyKind::Chaser => tuning.chaser,
            EnemyKind::BurstMover => tuning.burst,
            EnemyKind::Dasher => tuning.dasher,
            EnemyKind::Turret => tuning.turret,
        }
    }
}

/// Per-variant phase state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Chase,
    Burst {
        moving: bool,
        timer: f32,
    },
    Dash {
        dashing: bool,
        timer: f32,
        /// Direction committed to at the end of the telegraph
        locked_dir: Vec2,
    },
    Turret {
        reload_timer: f32,
    },
}

impl Behavior {
    fn initial(kind: EnemyKind, tuning: &EnemyTuning) -> Self {
        match kind {
            EnemyKind::Chaser => Behavior::Chase,
            EnemyKind::BurstMover => Behavior::Burst {
                moving: true,
                timer: tuning.burst_move_time,
            },
            EnemyKind::Dasher => Behavior::Dash {
                dashing: false,
                timer: tuning.dash_cooldown,
                locked_dir: Vec2::ZERO,
            },
            EnemyKind::Turret => Behavior::Turret {
                reload_timer: tuning.turret_reload,
            },
        }
    }
}

/// Multipliers applied to base stats at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaling {
    pub health: f32,
    pub speed: f32,
    pub reward: f32,
}

impl Default for Scaling {
    fn default() -> Self {
        Self {
            health: 1.0,
            speed: 1.0,
            reward: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    currency_drop: u32,
    xp_drop: u32,
    pub behavior: Behavior,
    /// Seconds until this enemy may ram the player again
    pub contact_cooldown: f32,
}

impl Enemy {
    pub fn new(
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
        scaling: Scaling,
        tuning: &EnemyTuning,
    ) -> Self {
        let params = kind.params(tuning);
        let mut body = Body::new(pos, params.radius);
        if kind == EnemyKind::Turret {
            let count = tuning.turret_barrels.max(1);
            let step = 360.0 / count as f32;
            let specs: Vec<BarrelSpec> = (0..count)
                .map(|i| {
                    BarrelSpec::new(
                        TURRET_BARREL_LENGTH,
                        TURRET_BARREL_WIDTH,
                        0.0,
                        i as f32 * step,
                    )
                })
                .collect();
            body.set_barrels(&specs);
        }
        let health = params.health * scaling.health;
        Self {
            id,
            kind,
            body,
            speed: params.speed * scaling.speed,
            health,
            max_health: health,
            currency_drop: (params.currency as f32 * scaling.reward).round() as u32,
            xp_drop: (params.xp as f32 * scaling.reward).round() as u32,
            behavior: Behavior::initial(kind, tuning),
            contact_cooldown: 0.0,
        }
    }

    /// Advance one frame. Returns projectiles fired this frame (turret only).
    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        tuning: &EnemyTuning,
        ids: &mut EntityIds,
    ) -> Vec<Projectile> {
        self.contact_cooldown = (self.contact_cooldown - dt).max(0.0);

        let distance = self.body.pos.distance(player_pos);
        let toward = self.body.dir_to(player_pos);
        let mut fire = false;

        match &mut self.behavior {
            Behavior::Chase => {
                let speed = if distance < tuning.chaser_slow_radius {
                    self.speed * tuning.chaser_slow_factor
                } else {
                    self.speed
                };
                self.body.vel = toward * speed;
                self.body.rotation = dir_to_deg(toward);
            }
            Behavior::Burst { moving, timer } => {
                *timer -= dt;
                if *timer <= 0.0 {
                    *moving = !*moving;
                    *timer = if *moving {
                        tuning.burst_move_time
                    } else {
                        tuning.burst_stop_time
                    };
                }
                self.body.vel = if *moving {
                    toward * self.speed
                } else {
                    Vec2::ZERO
                };
                self.body.rotation = dir_to_deg(toward);
            }
            Behavior::Dash {
                dashing,
                timer,
                locked_dir,
            } => {
                *timer -= dt;
                if *timer <= 0.0 {
                    *dashing = !*dashing;
                    if *dashing {
                        *timer = tuning.dash_duration;
                        *locked_dir = toward;
                    } else {
                        *timer = tuning.dash_cooldown;
                    }
                }
                if *dashing {
                    self.body.vel = *locked_dir * self.speed * tuning.dash_multiplier;
                } else {
                    self.body.vel = Vec2::ZERO;
                    self.body.rotation = dir_to_deg(toward);
                }
            }
            Behavior::Turret { reload_timer } => {
                self.body.vel = toward * self.speed * tuning.turret_speed_factor;
                self.body.rotation = crate::normalize_degrees(
                    self.body.rotation + tuning.turret_spin_rate * dt,
                );
                *reload_timer -= dt;
                if *reload_timer <= 0.0 {
                    *reload_timer = tuning.turret_reload;
                    fire = true;
                }
            }
        }

        self.body.advance(dt, tuning.recoil_recovery);

        if fire {
            self.fire_volley(tuning, ids)
        } else {
            Vec::new()
        }
    }

    /// One projectile per barrel along the barrel's current direction
    pub fn fire_volley(&mut self, tuning: &EnemyTuning, ids: &mut EntityIds) -> Vec<Projectile> {
        let rotation = self.body.rotation;
        let pos = self.body.pos;
        let shots: Vec<Projectile> = self
            .body
            .barrels
            .iter()
            .map(|barrel| {
                let dir = barrel.direction(rotation);
                Projectile::new(
                    ids.next_id(),
                    Faction::Enemy,
                    barrel.tip(pos, rotation),
                    dir * tuning.turret_projectile_speed,
                    PROJECTILE_RADIUS,
                    tuning.turret_projectile_damage,
                )
            })
            .collect();
        for i in 0..self.body.barrels.len() {
            self.body.apply_recoil(i, tuning.recoil_amount);
        }
        shots
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn currency_drop(&self) -> u32 {
        self.currency_drop
    }

    pub fn xp_drop(&self) -> u32 {
        self.xp_drop
    }

    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }

    pub fn can_ram(&self) -> bool {
        self.contact_cooldown <= 0.0
    }
}

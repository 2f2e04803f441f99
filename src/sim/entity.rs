//! Shared body model: position, velocity, facing and weapon mounts
//!
//! Player and enemies own a [`Body`]; projectiles are plain moving circles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::deg_to_dir;

/// A weapon mount point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Barrel {
    /// Distance from body center to the muzzle
    pub length: f32,
    pub width: f32,
    /// Lateral offset, positive to the right of the facing
    pub offset: f32,
    /// Angle relative to body rotation (degrees)
    pub angle: f32,
    /// Current visual kick-back, decays to zero
    pub recoil: f32,
}

impl Barrel {
    pub fn new(length: f32, width: f32, offset: f32, angle: f32) -> Self {
        Self {
            length,
            width,
            offset,
            angle,
            recoil: 0.0,
        }
    }

    /// Firing direction for a body facing `rotation` degrees
    pub fn direction(&self, rotation: f32) -> Vec2 {
        deg_to_dir(rotation + self.angle)
    }

    /// Muzzle position: forward by the barrel length, right by the offset
    pub fn tip(&self, pos: Vec2, rotation: f32) -> Vec2 {
        let forward = self.direction(rotation);
        let right = forward.perp();
        pos + forward * self.length + right * self.offset
    }

    fn recover(&mut self, rate: f32, dt: f32) {
        self.recoil = (self.recoil - rate * dt).max(0.0);
    }
}

/// Barrel geometry relative to the owning body's radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrelSpec {
    pub length: f32,
    pub width: f32,
    pub offset: f32,
    pub angle: f32,
}

impl BarrelSpec {
    pub const fn new(length: f32, width: f32, offset: f32, angle: f32) -> Self {
        Self {
            length,
            width,
            offset,
            angle,
        }
    }

    /// Scale to a body of `radius`
    pub fn build(&self, radius: f32) -> Barrel {
        Barrel::new(
            self.length * radius,
            self.width * radius,
            self.offset * radius,
            self.angle,
        )
    }
}

/// Kinematic state common to player and enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Facing in degrees
    pub rotation: f32,
    pub barrels: Vec<Barrel>,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            rotation: 0.0,
            barrels: Vec::new(),
        }
    }

    /// Integrate position and let barrel recoil settle
    pub fn advance(&mut self, dt: f32, recoil_recovery: f32) {
        self.pos += self.vel * dt;
        for barrel in &mut self.barrels {
            barrel.recover(recoil_recovery, dt);
        }
    }

    /// Kick a single barrel back; out-of-range indices are ignored
    pub fn apply_recoil(&mut self, index: usize, amount: f32) {
        if let Some(barrel) = self.barrels.get_mut(index) {
            barrel.recoil = amount;
        }
    }

    /// Replace the weapon layout with one scaled to this body
    pub fn set_barrels(&mut self, specs: &[BarrelSpec]) {
        self.barrels = specs.iter().map(|spec| spec.build(self.radius)).collect();
    }

    /// Unit vector toward `target`, or the current facing if on top of it
    pub fn dir_to(&self, target: Vec2) -> Vec2 {
        (target - self.pos).try_normalize().unwrap_or_else(|| deg_to_dir(self.rotation))
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

/// A bullet in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub faction: Faction,
    /// Enemies this projectile may still hit
    pub pierce_left: u32,
    /// Enemies already hit, never hit twice
    #[serde(default)]
    pub hit_ids: Vec<u32>,
}

impl Projectile {
    pub fn new(id: u32, faction: Faction, pos: Vec2, vel: Vec2, radius: f32, damage: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            damage,
            faction,
            pierce_left: 1,
            hit_ids: Vec::new(),
        }
    }

    pub fn with_pierce(mut self, pierce: u32) -> Self {
        self.pierce_left = pierce.max(1);
        self
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Record a hit on `enemy_id`; returns true when the projectile is spent
    pub fn register_hit(&mut self, enemy_id: u32) -> bool {
        self.hit_ids.push(enemy_id);
        self.pierce_left = self.pierce_left.saturating_sub(1);
        self.pierce_left == 0
    }

    pub fn has_hit(&self, enemy_id: u32) -> bool {
        self.hit_ids.contains(&enemy_id)
    }
}

/// Monotonic entity id allocator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        self.next = self.next.wrapping_add(1);
        self.next
    }
}

//! WindowShock - an arcade shooter where the play window is the arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena boundary, entities, collisions, spawning)
//! - `tuning`: Data-driven game balance
//! - `settings`: Host preferences (screen size, seed, runner options)

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{ConfigError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per displayed frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default physical screen size used when the host does not report one
    pub const DEFAULT_SCREEN_WIDTH: f32 = 1920.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 1080.0;

    /// Arena size shown on the welcome and game-over screens
    pub const MENU_ARENA_SIZE: f32 = 900.0;

    /// Player body radius
    pub const PLAYER_RADIUS: f32 = 12.5;
    /// Projectile radius (player and enemy shots)
    pub const PROJECTILE_RADIUS: f32 = 6.0;
}

/// Unit vector for a facing given in degrees (0 = +x, 90 = +y, screen space)
#[inline]
pub fn deg_to_dir(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Facing in degrees of a direction vector (0 for a zero vector)
#[inline]
pub fn dir_to_deg(dir: Vec2) -> f32 {
    if dir == Vec2::ZERO {
        return 0.0;
    }
    dir.y.atan2(dir.x).to_degrees()
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

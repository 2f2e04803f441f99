//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through the `dt` passed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod player;
pub mod progression;
pub mod resolve;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tank;
pub mod tick;

pub use arena::{Arena, ArenaAnimation, ClipView, Edge, Rect};
pub use enemy::{Behavior, Enemy, EnemyKind, Scaling};
pub use entity::{Barrel, BarrelSpec, Body, EntityIds, Faction, Projectile};
pub use player::{MoveIntent, Player};
pub use progression::{DerivedStats, Progression, STAT_COUNT, Stat};
pub use snapshot::{EntityTag, EntityView, FrameSnapshot, HudView};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState, GameStats};
pub use tank::TankClass;
pub use tick::{TickInput, tick};

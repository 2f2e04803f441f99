//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a run can be rebalanced from
//! a JSON file without recompiling. Each group is `#[serde(default)]`, so a
//! file only needs to name the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors from loading or validating configuration files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Boundary controller constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Auto-shrink never takes the target rectangle below these
    pub min_width: f32,
    pub min_height: f32,
    /// How far an edge's target moves out when a projectile hits it
    pub expand_amount: f32,
    /// Inward drift of each target edge (units/s)
    pub shrink_rate: f32,
    /// Max speed at which current edges chase their targets (units/s)
    pub catch_up_speed: f32,
    /// Closest an expanded edge may get to the physical screen edge
    pub wall_buffer: f32,
    /// Square size the game-start collapse animation settles on
    pub collapse_size: f32,
    /// Collapse animation length (seconds)
    pub collapse_duration: f32,
    /// Arena size on the welcome and game-over screens
    pub menu_size: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            min_width: 250.0,
            min_height: 250.0,
            expand_amount: 20.0,
            shrink_rate: 10.0,
            catch_up_speed: 900.0,
            wall_buffer: 50.0,
            collapse_size: 300.0,
            collapse_duration: 2.0,
            menu_size: crate::consts::MENU_ARENA_SIZE,
        }
    }
}

/// Player base values and per-level growth of derived stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub base_max_health: f32,
    pub max_health_per_level: f32,
    /// Health regenerated per second
    pub base_regen: f32,
    pub regen_per_level: f32,
    /// Damage dealt to an enemy that rams the player
    pub base_body_damage: f32,
    pub body_damage_per_level: f32,
    pub base_bullet_speed: f32,
    pub bullet_speed_per_level: f32,
    /// Number of distinct enemies one projectile may hit
    pub base_penetration: f32,
    pub penetration_per_level: f32,
    pub base_bullet_damage: f32,
    pub bullet_damage_per_level: f32,
    /// Seconds between volleys at reload level 0
    pub base_reload: f32,
    /// Reload interval multiplier per reload level
    pub reload_factor: f32,
    pub base_move_speed: f32,
    pub move_speed_per_level: f32,
    /// Barrel kick-back applied on each shot
    pub recoil_amount: f32,
    /// Recoil recovered per second
    pub recoil_recovery: f32,
    pub projectile_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: crate::consts::PLAYER_RADIUS,
            base_max_health: 100.0,
            max_health_per_level: 20.0,
            base_regen: 0.5,
            regen_per_level: 0.75,
            base_body_damage: 1.0,
            body_damage_per_level: 1.0,
            base_bullet_speed: 500.0,
            bullet_speed_per_level: 50.0,
            base_penetration: 1.0,
            penetration_per_level: 1.0,
            base_bullet_damage: 1.0,
            bullet_damage_per_level: 0.5,
            base_reload: 0.4,
            reload_factor: 0.9,
            base_move_speed: 300.0,
            move_speed_per_level: 20.0,
            recoil_amount: 4.0,
            recoil_recovery: 40.0,
            projectile_radius: crate::consts::PROJECTILE_RADIUS,
        }
    }
}

/// Base stats for one enemy variant (before difficulty scaling)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyParams {
    pub radius: f32,
    pub health: f32,
    pub speed: f32,
    pub currency: u32,
    pub xp: u32,
}

/// Enemy behavior constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub chaser: EnemyParams,
    /// Chasers slow down inside this distance of the player
    pub chaser_slow_radius: f32,
    pub chaser_slow_factor: f32,

    pub burst: EnemyParams,
    pub burst_move_time: f32,
    pub burst_stop_time: f32,

    pub dasher: EnemyParams,
    /// Telegraph (aim) time before each dash
    pub dash_cooldown: f32,
    pub dash_duration: f32,
    pub dash_multiplier: f32,

    pub turret: EnemyParams,
    /// Fraction of base speed the turret creeps at
    pub turret_speed_factor: f32,
    /// Self-rotation in degrees per second
    pub turret_spin_rate: f32,
    pub turret_reload: f32,
    pub turret_barrels: u32,
    pub turret_projectile_speed: f32,
    pub turret_projectile_damage: f32,

    /// Damage every enemy deals on contact
    pub ram_damage: f32,
    /// Extra contact damage from the turret boss
    pub boss_ram_bonus: f32,
    /// Minimum time between two contact hits from the same enemy
    pub contact_cooldown: f32,
    /// Enemies further than this outside the screen are dropped
    pub world_margin: f32,
    pub recoil_amount: f32,
    pub recoil_recovery: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            chaser: EnemyParams {
                radius: 12.0,
                health: 3.0,
                speed: 80.0,
                currency: 5,
                xp: 10,
            },
            chaser_slow_radius: 150.0,
            chaser_slow_factor: 0.3,

            burst: EnemyParams {
                radius: 14.0,
                health: 4.0,
                speed: 140.0,
                currency: 8,
                xp: 15,
            },
            burst_move_time: 1.2,
            burst_stop_time: 0.6,

            dasher: EnemyParams {
                radius: 12.0,
                health: 3.0,
                speed: 60.0,
                currency: 10,
                xp: 20,
            },
            dash_cooldown: 1.5,
            dash_duration: 0.35,
            dash_multiplier: 6.0,

            turret: EnemyParams {
                radius: 40.0,
                health: 60.0,
                speed: 60.0,
                currency: 100,
                xp: 200,
            },
            turret_speed_factor: 0.25,
            turret_spin_rate: 30.0,
            turret_reload: 0.8,
            turret_barrels: 8,
            turret_projectile_speed: 220.0,
            turret_projectile_damage: 8.0,

            ram_damage: 10.0,
            boss_ram_bonus: 20.0,
            contact_cooldown: 0.5,
            world_margin: 300.0,
            recoil_amount: 6.0,
            recoil_recovery: 30.0,
        }
    }
}

/// Spawner timing, variant weights and difficulty growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    /// Seconds between spawns
    pub interval: f32,
    /// Distance outside the arena edge new enemies appear at
    pub edge_buffer: f32,
    pub chaser_weight: f32,
    pub burst_weight: f32,
    pub dasher_weight: f32,
    /// Survival time before burst-movers may spawn
    pub burst_unlock: f32,
    /// Survival time before dashers may spawn
    pub dasher_unlock: f32,
    /// Survival time before the boss may spawn
    pub boss_unlock: f32,
    /// Chance per spawn cycle of a boss once unlocked (only if none alive)
    pub boss_chance: f64,
    /// Fractional increase per minute survived
    pub health_scale_per_min: f32,
    pub speed_scale_per_min: f32,
    pub reward_scale_per_min: f32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            interval: 1.5,
            edge_buffer: 40.0,
            chaser_weight: 0.5,
            burst_weight: 0.25,
            dasher_weight: 0.25,
            burst_unlock: 15.0,
            dasher_unlock: 30.0,
            boss_unlock: 60.0,
            boss_chance: 0.05,
            health_scale_per_min: 0.5,
            speed_scale_per_min: 0.1,
            reward_scale_per_min: 0.25,
        }
    }
}

/// Leveling curve and caps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub max_level: u32,
    pub max_stat_level: u8,
    /// Cumulative XP at which level `n` is left is `xp_per_level * n`
    pub xp_per_level: u32,
    /// Player level required to pick a tank of tier 2, 3 and 4
    pub tier_unlock_levels: [u32; 3],
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            max_level: 45,
            max_stat_level: 7,
            xp_per_level: 100,
            tier_unlock_levels: [5, 10, 15],
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub enemies: EnemyTuning,
    pub spawner: SpawnerTuning,
    pub progression: ProgressionTuning,
}

impl Tuning {
    /// Parse and validate a tuning table from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values that would produce degenerate geometry or timers
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.arena;
        let positive = [
            ("arena.min_width", a.min_width),
            ("arena.min_height", a.min_height),
            ("arena.catch_up_speed", a.catch_up_speed),
            ("arena.collapse_size", a.collapse_size),
            ("arena.collapse_duration", a.collapse_duration),
            ("arena.menu_size", a.menu_size),
            ("player.radius", self.player.radius),
            ("player.base_reload", self.player.base_reload),
            ("player.reload_factor", self.player.reload_factor),
            ("enemies.turret_reload", self.enemies.turret_reload),
            ("enemies.burst_move_time", self.enemies.burst_move_time),
            ("enemies.burst_stop_time", self.enemies.burst_stop_time),
            ("enemies.dash_cooldown", self.enemies.dash_cooldown),
            ("enemies.dash_duration", self.enemies.dash_duration),
            ("spawner.interval", self.spawner.interval),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(
                    format!("{name} must be > 0 (got {value})"),
                ));
            }
        }
        if self.player.reload_factor > 1.0 {
            return Err(ConfigError::Invalid(
                "player.reload_factor must be <= 1".into(),
            ));
        }
        let s = &self.spawner;
        let weights = [s.chaser_weight, s.burst_weight, s.dasher_weight];
        if weights.iter().any(|w| *w < 0.0) || weights.iter().sum::<f32>() <= 0.0 {
            return Err(ConfigError::Invalid(
                "spawner weights must be >= 0 and not all zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&s.boss_chance) {
            return Err(ConfigError::Invalid(
                "spawner.boss_chance must be within [0, 1]".into(),
            ));
        }
        if self.enemies.turret_barrels == 0 {
            return Err(ConfigError::Invalid(
                "enemies.turret_barrels must be >= 1".into(),
            ));
        }
        let p = &self.progression;
        if p.max_level == 0 || p.xp_per_level == 0 {
            return Err(ConfigError::Invalid(
                "progression.max_level and xp_per_level must be >= 1".into(),
            ));
        }
        if !p.tier_unlock_levels.windows(2).all(|w| w[0] <= w[1]) {
            return Err(ConfigError::Invalid(
                "progression.tier_unlock_levels must be ascending".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "arena": { "expand_amount": 35.0 } }"#).unwrap();
        assert_eq!(tuning.arena.expand_amount, 35.0);
        assert_eq!(tuning.arena.min_width, 250.0);
        assert_eq!(tuning.spawner, SpawnerTuning::default());
    }

    #[test]
    fn test_rejects_zero_duration() {
        let err = Tuning::from_json(r#"{ "arena": { "collapse_duration": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(tuning, Tuning::default());
    }
}

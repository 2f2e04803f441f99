//! Host settings and preferences
//!
//! Read from `windowshock.json` in the working directory, then overridden by
//! `WINDOWSHOCK_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::tuning::ConfigError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Physical screen the arena is laid out on
    pub screen_width: f32,
    pub screen_height: f32,
    /// Run seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Hold fire without input
    pub auto_fire: bool,
    /// Simulated seconds the headless runner plays before stopping
    pub run_seconds: f32,
    /// Optional balance table to load instead of the built-in one
    pub tuning_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            seed: None,
            auto_fire: true,
            run_seconds: 300.0,
            tuning_path: None,
        }
    }
}

impl Settings {
    /// Settings file looked up in the working directory
    pub const FILE_NAME: &'static str = "windowshock.json";

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// File settings if readable, defaults otherwise, then env overrides
    pub fn load_or_default() -> Self {
        let path = Path::new(Self::FILE_NAME);
        let mut settings = if path.exists() {
            match Self::load(path) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("{e}; using default settings");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Apply `WINDOWSHOCK_*` overrides; invalid values are logged and ignored
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = var("WINDOWSHOCK_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => self.seed = Some(parsed),
                Err(_) => log::warn!("Invalid WINDOWSHOCK_SEED '{}', ignoring", seed),
            }
        }

        if let Some(screen) = var("WINDOWSHOCK_SCREEN") {
            match parse_screen(&screen) {
                Some((w, h)) => {
                    self.screen_width = w;
                    self.screen_height = h;
                }
                None => log::warn!("Invalid WINDOWSHOCK_SCREEN '{}', expected WxH", screen),
            }
        }

        if let Some(seconds) = var("WINDOWSHOCK_RUN_SECONDS") {
            match seconds.parse::<f32>() {
                Ok(parsed) if parsed > 0.0 && parsed.is_finite() => self.run_seconds = parsed,
                _ => log::warn!(
                    "WINDOWSHOCK_RUN_SECONDS must be a positive number, got '{}'",
                    seconds
                ),
            }
        }

        if let Some(path) = var("WINDOWSHOCK_TUNING") {
            self.tuning_path = Some(PathBuf::from(path));
        }
    }
}

/// Parse `1920x1080` into positive dimensions
fn parse_screen(value: &str) -> Option<(f32, f32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let w: f32 = w.trim().parse().ok()?;
    let h: f32 = h.trim().parse().ok()?;
    (w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()).then_some((w, h))
}

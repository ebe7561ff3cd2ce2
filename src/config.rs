//! Game configuration
//!
//! All tuning constants live in one serde struct so a run can be
//! reconfigured from JSON without recompiling. Defaults reproduce the
//! classic feel of the game.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Viewport / world width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 667.0,
        }
    }
}

/// Player body and movement tuning (per-tick units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    /// Upward speed applied on every landing
    pub jump_force: f32,
    pub move_speed: f32,
    pub gravity: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
    /// Spawn height measured up from the bottom of the canvas
    pub spawn_offset: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 30.0,
            jump_force: 12.0,
            move_speed: 5.0,
            gravity: 0.5,
            max_fall_speed: 15.0,
            spawn_offset: 100.0,
        }
    }
}

/// Platform geometry, spacing and recycling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub width: f32,
    pub height: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    /// World y of the starting platform
    pub initial_y: f32,
    /// Platforms stacked above the starting one when a run begins
    pub initial_count: usize,
    /// Live platforms the registry keeps after every tick
    pub min_live: usize,
    /// Proposals closer than this on both axes to a live platform are discarded
    pub dedup_tolerance: f32,
    /// Distance below the viewport before a platform is evicted
    pub eviction_margin: f32,
    pub moving_speed: f32,
    pub moving_range: f32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            width: 80.0,
            height: 12.0,
            min_gap: 60.0,
            max_gap: 120.0,
            initial_y: 600.0,
            initial_count: 15,
            min_live: 15,
            dedup_tolerance: 5.0,
            eviction_margin: 100.0,
            moving_speed: 2.0,
            moving_range: 100.0,
        }
    }
}

/// Milestone ladder and spawn mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Ascending distance thresholds in meters
    pub milestones: Vec<u32>,
    /// One more entry than `milestones`; index 0 is the base
    pub speed_multipliers: Vec<f32>,
    /// Multiplier at which moving platforms start to appear
    pub moving_threshold: f32,
    /// Chance an eligible platform is generated as moving
    pub moving_probability: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            milestones: vec![500, 1000, 1500, 2000, 2500],
            speed_multipliers: vec![1.0, 1.3, 1.6, 2.0, 2.5, 3.0],
            moving_threshold: 1.6,
            moving_probability: 0.3,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub player: PlayerConfig,
    pub platform: PlatformConfig,
    pub difficulty: DifficultyConfig,
    /// How far below the best height the player may fall before the run ends.
    /// `None` means one full viewport height.
    pub fall_limit: Option<f32>,
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing sections fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Effective elimination distance below the highest point
    pub fn fall_limit(&self) -> f32 {
        self.fall_limit.unwrap_or(self.canvas.height)
    }

    /// Starting position of the player's top-left corner
    pub fn player_spawn(&self) -> (f32, f32) {
        (
            self.canvas.width / 2.0,
            self.canvas.height - self.player.spawn_offset,
        )
    }

    /// Check the constraints the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (player, platform) = (&self.player, &self.platform);
        let finite = [
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("player.width", player.width),
            ("player.height", player.height),
            ("player.jump_force", player.jump_force),
            ("player.move_speed", player.move_speed),
            ("player.gravity", player.gravity),
            ("player.max_fall_speed", player.max_fall_speed),
            ("player.spawn_offset", player.spawn_offset),
            ("platform.width", platform.width),
            ("platform.height", platform.height),
            ("platform.min_gap", platform.min_gap),
            ("platform.max_gap", platform.max_gap),
            ("platform.initial_y", platform.initial_y),
            ("platform.dedup_tolerance", platform.dedup_tolerance),
            ("platform.eviction_margin", platform.eviction_margin),
            ("platform.moving_speed", platform.moving_speed),
            ("platform.moving_range", platform.moving_range),
            ("difficulty.moving_threshold", self.difficulty.moving_threshold),
            ("fall_limit", self.fall_limit()),
        ];
        let multipliers = self
            .difficulty
            .speed_multipliers
            .iter()
            .map(|&m| ("difficulty.speed_multipliers", m));
        for (field, value) in finite.into_iter().chain(multipliers) {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        let positive = [
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.gravity", self.player.gravity),
            ("player.max_fall_speed", self.player.max_fall_speed),
            ("platform.width", self.platform.width),
            ("platform.height", self.platform.height),
            ("platform.min_gap", self.platform.min_gap),
            ("fall_limit", self.fall_limit()),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.platform.width > self.canvas.width {
            return Err(ConfigError::PlatformTooWide {
                platform: self.platform.width,
                canvas: self.canvas.width,
            });
        }
        if self.platform.min_gap > self.platform.max_gap {
            return Err(ConfigError::GapRange {
                min: self.platform.min_gap,
                max: self.platform.max_gap,
            });
        }
        if self.platform.min_live == 0 {
            return Err(ConfigError::NoLivePlatforms);
        }

        let difficulty = &self.difficulty;
        if difficulty.speed_multipliers.len() != difficulty.milestones.len() + 1 {
            return Err(ConfigError::MultiplierCount {
                milestones: difficulty.milestones.len(),
                multipliers: difficulty.speed_multipliers.len(),
            });
        }
        if difficulty.milestones.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::MilestonesUnsorted);
        }
        if difficulty.speed_multipliers.windows(2).any(|w| w[0] > w[1])
            || difficulty.speed_multipliers[0] < 1.0
        {
            return Err(ConfigError::MultipliersDecreasing);
        }
        if !(0.0..=1.0).contains(&difficulty.moving_probability) {
            return Err(ConfigError::Probability(difficulty.moving_probability));
        }

        Ok(())
    }
}

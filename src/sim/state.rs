//! Entities and world state
//!
//! Everything a renderer needs to draw a frame lives here; the tick
//! module is the only place these values are mutated during a run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, PlatformConfig};

/// Direction the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player's body. Position is the top-left corner in world units,
/// with y growing downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntity {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    /// Set on the tick the player lands on a platform
    pub grounded: bool,
}

impl PlayerEntity {
    /// Spawn a player at rest at the configured start position
    pub fn spawn(config: &GameConfig) -> Self {
        let (x, y) = config.player_spawn();
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            width: config.player.width,
            height: config.player.height,
            facing: Facing::default(),
            grounded: false,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }
}

/// Platform behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    /// Oscillates horizontally around `origin_x`
    Moving {
        speed: f32,
        /// +1.0 or -1.0
        direction: f32,
        origin_x: f32,
        range: f32,
    },
}

/// A platform the player can bounce on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformEntity {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl PlatformEntity {
    pub fn new_static(x: f32, y: f32, config: &PlatformConfig) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: config.width,
            height: config.height,
            kind: PlatformKind::Static,
        }
    }

    pub fn new_moving(x: f32, y: f32, direction: f32, config: &PlatformConfig) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: config.width,
            height: config.height,
            kind: PlatformKind::Moving {
                speed: config.moving_speed,
                direction,
                origin_x: x,
                range: config.moving_range,
            },
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        matches!(self.kind, PlatformKind::Moving { .. })
    }

    /// Advance a moving platform by one tick, keeping it inside `[0, world_width]`
    pub fn advance(&mut self, world_width: f32) {
        let PlatformKind::Moving {
            speed,
            ref mut direction,
            origin_x,
            range,
        } = self.kind
        else {
            return;
        };

        self.pos.x += speed * *direction;

        if (self.pos.x - origin_x).abs() > range {
            *direction = -*direction;
        }

        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            *direction = 1.0;
        } else if self.pos.x + self.width > world_width {
            self.pos.x = world_width - self.width;
            *direction = -1.0;
        }
    }
}

/// Progress tracking for a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Climbed distance in meters, never decreases
    pub distance: u32,
    /// Vertical translation from world to screen space
    pub camera_offset: f32,
    pub speed_multiplier: f32,
    /// Smallest player y seen this run
    pub highest_point: f32,
    /// Latched once the player rises above the spawn height
    pub climbing_started: bool,
    pub game_over: bool,
    /// Ticks simulated this run
    pub ticks: u64,
}

impl WorldState {
    pub fn new(spawn_y: f32, base_multiplier: f32) -> Self {
        Self {
            distance: 0,
            camera_offset: 0.0,
            speed_multiplier: base_multiplier,
            highest_point: spawn_y,
            climbing_started: false,
            game_over: false,
            ticks: 0,
        }
    }

    /// Tighten the highest-point marker and latch the climb flag
    pub fn track_height(&mut self, player_y: f32, spawn_y: f32) {
        if player_y < self.highest_point {
            self.highest_point = player_y;
        }
        if !self.climbing_started && player_y < spawn_y {
            log::debug!("Climb started at tick {}", self.ticks);
            self.climbing_started = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving_at(x: f32, direction: f32) -> PlatformEntity {
        PlatformEntity::new_moving(x, 100.0, direction, &PlatformConfig::default())
    }

    #[test]
    fn test_static_platform_does_not_move() {
        let mut platform = PlatformEntity::new_static(50.0, 100.0, &PlatformConfig::default());
        platform.advance(375.0);
        assert_eq!(platform.pos, Vec2::new(50.0, 100.0));
    }

    #[test]
    fn test_moving_platform_reverses_past_range() {
        let mut platform = moving_at(100.0, 1.0);
        // 51 steps of 2 units puts it 102 past the origin
        for _ in 0..51 {
            platform.advance(375.0);
        }
        assert!(matches!(
            platform.kind,
            PlatformKind::Moving { direction, .. } if direction < 0.0
        ));

        let peak = platform.pos.x;
        platform.advance(375.0);
        assert!(platform.pos.x < peak);
    }

    #[test]
    fn test_moving_platform_clamped_to_left_edge() {
        let mut platform = moving_at(1.0, -1.0);
        platform.advance(375.0);
        assert_eq!(platform.pos.x, 0.0);
        assert!(matches!(
            platform.kind,
            PlatformKind::Moving { direction, .. } if direction == 1.0
        ));
    }

    #[test]
    fn test_moving_platform_clamped_to_right_edge() {
        let mut platform = moving_at(294.0, 1.0);
        platform.advance(375.0);
        assert_eq!(platform.pos.x, 375.0 - 80.0);
        assert!(matches!(
            platform.kind,
            PlatformKind::Moving { direction, .. } if direction == -1.0
        ));
    }

    #[test]
    fn test_highest_point_only_tightens() {
        let mut world = WorldState::new(567.0, 1.0);
        world.track_height(570.0, 567.0);
        assert_eq!(world.highest_point, 567.0);
        assert!(!world.climbing_started);

        world.track_height(500.0, 567.0);
        world.track_height(550.0, 567.0);
        assert_eq!(world.highest_point, 500.0);
        assert!(world.climbing_started);
    }
}

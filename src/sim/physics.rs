//! Player integration and landing detection
//!
//! Physics runs in per-tick units: velocities are distances per tick and
//! gravity is a per-tick velocity increment. There is no jump button; every
//! landing bounces the player back up.

use super::state::{Facing, PlatformEntity, PlayerEntity};
use crate::config::PlayerConfig;

/// Horizontal intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub move_left: bool,
    pub move_right: bool,
}

impl InputIntent {
    pub const IDLE: Self = Self {
        move_left: false,
        move_right: false,
    };
    pub const LEFT: Self = Self {
        move_left: true,
        move_right: false,
    };
    pub const RIGHT: Self = Self {
        move_left: false,
        move_right: true,
    };

    /// Intent from held keys
    pub fn from_keys(left: bool, right: bool) -> Self {
        Self {
            move_left: left,
            move_right: right,
        }
    }

    /// Intent from a pointer or touch position: left half steers left, right half steers right
    pub fn toward_pointer(pointer_x: f32, viewport_width: f32) -> Self {
        if pointer_x < viewport_width / 2.0 {
            Self::LEFT
        } else {
            Self::RIGHT
        }
    }

    /// Signed horizontal direction. Left wins when both directions are held.
    pub fn direction(&self) -> f32 {
        if self.move_left {
            -1.0
        } else if self.move_right {
            1.0
        } else {
            0.0
        }
    }
}

/// Result of a landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Index of the platform landed on
    pub platform: usize,
    /// World y of the platform's top edge
    pub surface_y: f32,
}

/// Advance the player by one Euler step and wrap horizontally
pub fn integrate(player: &mut PlayerEntity, intent: InputIntent, config: &PlayerConfig, world_width: f32) {
    let direction = intent.direction();
    player.vel.x = direction * config.move_speed;
    if direction < 0.0 {
        player.facing = Facing::Left;
    } else if direction > 0.0 {
        player.facing = Facing::Right;
    }

    player.vel.y = (player.vel.y + config.gravity).min(config.max_fall_speed);

    player.pos += player.vel;

    // Screen wrap: fully off one edge reappears at the other
    if player.pos.x < -player.width {
        player.pos.x = world_width;
    } else if player.pos.x > world_width {
        player.pos.x = -player.width;
    }

    player.grounded = false;
}

/// Whether the step that just happened carried the player's feet onto `platform`.
///
/// Only a falling player can land. The feet must have been at or above the
/// platform top before the step and now sit within the platform's thickness,
/// with the horizontal spans overlapping.
pub fn lands_on(player: &PlayerEntity, platform: &PlatformEntity) -> bool {
    if player.vel.y <= 0.0 {
        return false;
    }

    let bottom = player.bottom();
    let top = platform.pos.y;

    let was_above = bottom - player.vel.y <= top;
    let is_on = bottom >= top && bottom <= top + platform.height;
    let overlaps = player.pos.x + player.width > platform.pos.x
        && player.pos.x < platform.pos.x + platform.width;

    was_above && is_on && overlaps
}

/// Snap the player onto a surface and bounce
pub fn land(player: &mut PlayerEntity, surface_y: f32, jump_force: f32) {
    player.pos.y = surface_y - player.height;
    player.vel.y = -jump_force;
    player.grounded = true;
}

/// Check every live platform and bounce off the first one landed on
pub fn resolve_landing(
    player: &mut PlayerEntity,
    platforms: &[PlatformEntity],
    jump_force: f32,
) -> Option<Landing> {
    let (index, platform) = platforms
        .iter()
        .enumerate()
        .find(|(_, platform)| lands_on(player, platform))?;

    let landing = Landing {
        platform: index,
        surface_y: platform.pos.y,
    };
    land(player, landing.surface_y, jump_force);
    Some(landing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, PlatformConfig};
    use glam::Vec2;

    fn player_at(x: f32, y: f32) -> PlayerEntity {
        let mut player = PlayerEntity::spawn(&GameConfig::default());
        player.pos = Vec2::new(x, y);
        player
    }

    #[test]
    fn test_left_wins_tie() {
        let config = PlayerConfig::default();
        let mut player = player_at(100.0, 100.0);
        integrate(&mut player, InputIntent::from_keys(true, true), &config, 375.0);
        assert_eq!(player.vel.x, -5.0);
        assert_eq!(player.pos.x, 95.0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_horizontal_velocity_not_accumulated() {
        let config = PlayerConfig::default();
        let mut player = player_at(100.0, 100.0);
        integrate(&mut player, InputIntent::RIGHT, &config, 375.0);
        integrate(&mut player, InputIntent::RIGHT, &config, 375.0);
        assert_eq!(player.vel.x, 5.0);
        integrate(&mut player, InputIntent::IDLE, &config, 375.0);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.pos.x, 110.0);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_gravity_clamped_to_terminal_velocity() {
        let config = PlayerConfig::default();
        let mut player = player_at(100.0, 0.0);
        for _ in 0..100 {
            integrate(&mut player, InputIntent::IDLE, &config, 375.0);
        }
        assert_eq!(player.vel.y, config.max_fall_speed);
    }

    #[test]
    fn test_wrap_left_edge() {
        let config = PlayerConfig::default();
        let mut player = player_at(-28.0, 100.0);
        integrate(&mut player, InputIntent::LEFT, &config, 375.0);
        assert_eq!(player.pos.x, 375.0);
    }

    #[test]
    fn test_wrap_right_edge() {
        let config = PlayerConfig::default();
        let mut player = player_at(373.0, 100.0);
        integrate(&mut player, InputIntent::RIGHT, &config, 375.0);
        assert_eq!(player.pos.x, -30.0);
    }

    #[test]
    fn test_no_landing_while_rising() {
        let platform = PlatformEntity::new_static(100.0, 130.0, &PlatformConfig::default());
        let mut player = player_at(100.0, 100.0);
        player.vel.y = -3.0;
        assert!(!lands_on(&player, &platform));
    }

    #[test]
    fn test_no_landing_when_feet_started_below_top() {
        let platform = PlatformEntity::new_static(100.0, 130.0, &PlatformConfig::default());
        // Feet at 135, were at 133 before the step: already below the top
        let mut player = player_at(100.0, 105.0);
        player.vel.y = 2.0;
        assert!(!lands_on(&player, &platform));
    }

    #[test]
    fn test_no_landing_on_edge_contact() {
        let platform = PlatformEntity::new_static(100.0, 130.0, &PlatformConfig::default());
        // Player's right edge touches the platform's left edge exactly
        let mut player = player_at(70.0, 101.0);
        player.vel.y = 2.0;
        assert!(!lands_on(&player, &platform));
    }

    #[test]
    fn test_falling_player_lands_and_bounces() {
        let config = GameConfig::default();
        let platforms = vec![PlatformEntity::new_static(
            150.0,
            300.0,
            &config.platform,
        )];
        // At rest directly above the platform
        let mut player = player_at(170.0, 250.0);

        let mut landing = None;
        for _ in 0..60 {
            integrate(&mut player, InputIntent::IDLE, &config.player, config.canvas.width);
            landing = resolve_landing(&mut player, &platforms, config.player.jump_force);
            if landing.is_some() {
                break;
            }
        }

        assert_eq!(
            landing,
            Some(Landing {
                platform: 0,
                surface_y: 300.0
            })
        );
        assert_eq!(player.vel.y, -config.player.jump_force);
        assert_eq!(player.pos.y, 300.0 - config.player.height);
        assert!(player.grounded);
    }

    #[test]
    fn test_pointer_halves() {
        assert_eq!(InputIntent::toward_pointer(10.0, 375.0), InputIntent::LEFT);
        assert_eq!(InputIntent::toward_pointer(187.5, 375.0), InputIntent::RIGHT);
    }
}

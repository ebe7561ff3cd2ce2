//! World <-> screen mapping
//!
//! The camera only scrolls upward: it follows the player once they pass the
//! middle of the viewport and the distance metric is a ratchet on top of it.

use crate::consts::UNITS_PER_METER;

/// Vertical camera over an unbounded world
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    viewport_height: f32,
}

impl Camera {
    pub fn new(viewport_height: f32) -> Self {
        Self { viewport_height }
    }

    #[inline]
    pub fn midpoint(&self) -> f32 {
        self.viewport_height / 2.0
    }

    /// Camera offset for the player's y, if the player is above the midpoint
    pub fn follow(&self, player_y: f32) -> Option<f32> {
        (player_y < self.midpoint()).then(|| self.midpoint() - player_y)
    }

    /// Distance ratchet: the larger of the previous distance and the offset in meters
    pub fn distance(previous: u32, offset: f32) -> u32 {
        let meters = (offset / UNITS_PER_METER).floor();
        if meters <= 0.0 {
            return previous;
        }
        previous.max(meters as u32)
    }

    #[inline]
    pub fn to_screen(world_y: f32, offset: f32) -> f32 {
        world_y + offset
    }

    #[inline]
    pub fn to_world(screen_y: f32, offset: f32) -> f32 {
        screen_y - offset
    }

    /// World y of the bottom edge of the viewport
    pub fn visible_bottom(&self, offset: f32) -> f32 {
        Self::to_world(self.viewport_height, offset)
    }

    /// True once the player has dropped more than `fall_limit` below their best height.
    /// Never fires before the climb has started.
    pub fn is_eliminated(
        player_y: f32,
        highest_point: f32,
        climbing_started: bool,
        fall_limit: f32,
    ) -> bool {
        climbing_started && player_y - highest_point > fall_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_ignores_player_below_midpoint() {
        let camera = Camera::new(667.0);
        assert_eq!(camera.follow(400.0), None);
        assert_eq!(camera.follow(333.5), None);
    }

    #[test]
    fn test_camera_tracks_player_above_midpoint() {
        let camera = Camera::new(667.0);
        assert_eq!(camera.follow(233.5), Some(100.0));
        assert_eq!(camera.follow(-666.5), Some(1000.0));
    }

    #[test]
    fn test_distance_ratchets() {
        assert_eq!(Camera::distance(0, 99.0), 9);
        assert_eq!(Camera::distance(9, 50.0), 9);
        assert_eq!(Camera::distance(9, 250.0), 25);
        assert_eq!(Camera::distance(25, -10.0), 25);
    }

    #[test]
    fn test_screen_world_mapping() {
        let camera = Camera::new(667.0);
        assert_eq!(Camera::to_screen(-100.0, 300.0), 200.0);
        assert_eq!(Camera::to_world(200.0, 300.0), -100.0);
        assert_eq!(camera.visible_bottom(300.0), 367.0);
    }

    #[test]
    fn test_elimination_needs_climb() {
        assert!(!Camera::is_eliminated(2000.0, 567.0, false, 667.0));
        assert!(!Camera::is_eliminated(1234.0, 567.0, true, 667.0));
        assert!(Camera::is_eliminated(1234.5, 567.0, true, 667.0));
    }
}
